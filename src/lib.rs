// phrasefind: locate the span of a text most similar to a short phrase.
//
// This is the library root. `search` slides a target-sized window over the
// text; `similarity` holds the metrics it scores windows with; `model`
// provides the pretrained word vectors the embedding metric needs.

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod search;
pub mod similarity;
pub mod status;

pub use error::{Error, Result};
pub use search::{best_window, rank_windows, similarity_search, top_windows, WindowMatch};
pub use similarity::embedding::{make_embedding_similarity, EmbeddingModel, EmbeddingSimilarity};
pub use similarity::set::{dice_similarity, jaccard_similarity, simpson_similarity, SetMetric};
pub use similarity::traits::SimilarityMetric;
