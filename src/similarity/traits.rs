// Similarity metric trait — the pluggable scoring capability.
//
// The window search is generic over this trait, so any of the built-in
// metrics (Jaccard, Dice, Simpson, embedding cosine) or a plain closure can
// be dropped in without the search knowing how scores are computed.

use crate::error::Result;

/// Scores how similar two token collections are. Higher is more similar.
///
/// The search calls this with the lower-cased candidate window first and the
/// normalized target second.
pub trait SimilarityMetric {
    fn score(&self, xs: &[String], ys: &[String]) -> Result<f64>;
}

/// Any infallible scoring closure (or fn item) is a metric.
impl<F> SimilarityMetric for F
where
    F: Fn(&[String], &[String]) -> f64,
{
    fn score(&self, xs: &[String], ys: &[String]) -> Result<f64> {
        Ok(self(xs, ys))
    }
}
