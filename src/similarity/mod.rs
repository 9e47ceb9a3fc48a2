// Similarity metrics — set overlap and embedding cosine, behind one trait.

pub mod traits;
pub mod set;
pub mod embedding;
