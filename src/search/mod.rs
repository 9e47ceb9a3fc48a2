// Similarity search — slide a target-sized window over a text and keep the
// window that scores best against the target.

pub mod tokenize;
pub mod window;

pub use window::{best_window, rank_windows, similarity_search, top_windows, WindowMatch};
