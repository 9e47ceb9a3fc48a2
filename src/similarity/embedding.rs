// Word-embedding similarity: mean-pooled word vectors compared by cosine.
//
// Each side's tokens are mapped to vectors by an EmbeddingModel, averaged
// into one vector per side, and the two means are compared with cosine
// similarity. Unlike the set metrics this captures near-synonyms: "drive" and
// "storage" score above zero even though they share no characters.
//
// Model acquisition (download, file parsing) lives in crate::model. This
// module only needs something that can hand back a vector for a token.

use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};

use super::traits::SimilarityMetric;

/// A source of word vectors. Every token gets a vector of length `dim()`,
/// including tokens the model has never seen.
pub trait EmbeddingModel {
    /// Dimensionality of every vector this model returns.
    fn dim(&self) -> usize;

    /// The embedding vector for a single token.
    fn vector_for(&self, token: &str) -> Vec<f32>;
}

impl<M: EmbeddingModel + ?Sized> EmbeddingModel for &M {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn vector_for(&self, token: &str) -> Vec<f32> {
        (**self).vector_for(token)
    }
}

impl<M: EmbeddingModel + ?Sized> EmbeddingModel for Arc<M> {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn vector_for(&self, token: &str) -> Vec<f32> {
        (**self).vector_for(token)
    }
}

/// Average a set of vectors component-wise.
///
/// Fails on an empty set (there is nothing to divide by) and on vectors
/// whose length differs from `dim`.
pub fn mean_embedding(vectors: &[Vec<f32>], dim: usize) -> Result<Vec<f64>> {
    if vectors.is_empty() {
        return Err(Error::EmptyTokens);
    }

    let mut mean = vec![0.0_f64; dim];
    for vector in vectors {
        if vector.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: vector.len(),
            });
        }
        for (acc, &val) in mean.iter_mut().zip(vector) {
            *acc += val as f64;
        }
    }

    let n = vectors.len() as f64;
    for val in &mut mean {
        *val /= n;
    }

    Ok(mean)
}

/// Cosine similarity between two vectors, in `[-1.0, 1.0]`.
///
/// A zero-norm side scores 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        Ok(0.0)
    } else {
        Ok((dot / denom).clamp(-1.0, 1.0))
    }
}

/// Cosine similarity of mean word vectors, bound to a loaded model.
///
/// Build one with [`make_embedding_similarity`] after loading the model once;
/// the metric itself never touches the filesystem or network.
pub struct EmbeddingSimilarity<M> {
    model: M,
}

/// Bind a ready embedding model into a similarity metric.
pub fn make_embedding_similarity<M: EmbeddingModel>(model: M) -> EmbeddingSimilarity<M> {
    EmbeddingSimilarity { model }
}

impl<M: EmbeddingModel> EmbeddingSimilarity<M> {
    pub fn model(&self) -> &M {
        &self.model
    }

    fn mean_for(&self, tokens: &[String]) -> Result<Vec<f64>> {
        let vectors: Vec<Vec<f32>> = tokens.iter().map(|t| self.model.vector_for(t)).collect();
        mean_embedding(&vectors, self.model.dim())
    }
}

impl<M: EmbeddingModel> SimilarityMetric for EmbeddingSimilarity<M> {
    fn score(&self, xs: &[String], ys: &[String]) -> Result<f64> {
        if xs.is_empty() || ys.is_empty() {
            return Err(Error::EmptyTokens);
        }

        let xs_vec = self.mean_for(xs)?;
        let ys_vec = self.mean_for(ys)?;
        let sim = cosine_similarity(&xs_vec, &ys_vec)?;

        trace!(xs = xs.len(), ys = ys.len(), sim, "Embedding similarity");
        Ok(sim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct TableModel {
        dim: usize,
        table: HashMap<&'static str, Vec<f32>>,
    }

    impl EmbeddingModel for TableModel {
        fn dim(&self) -> usize {
            self.dim
        }

        fn vector_for(&self, token: &str) -> Vec<f32> {
            self.table
                .get(token)
                .cloned()
                .unwrap_or_else(|| vec![0.0; self.dim])
        }
    }

    fn model() -> TableModel {
        let table = HashMap::from([
            ("google", vec![1.0, 0.0, 0.0]),
            ("drive", vec![0.0, 1.0, 0.0]),
            ("storage", vec![0.0, 0.9, 0.1]),
            ("happy", vec![0.0, 0.0, 1.0]),
        ]);
        TableModel { dim: 3, table }
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_mean_embedding_averages_components() {
        let mean = mean_embedding(&[vec![1.0, 0.0], vec![0.0, 1.0]], 2).unwrap();
        assert!((mean[0] - 0.5).abs() < 1e-12);
        assert!((mean[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mean_embedding_empty_is_error() {
        assert_eq!(mean_embedding(&[], 3), Err(Error::EmptyTokens));
    }

    #[test]
    fn test_mean_embedding_wrong_length_is_error() {
        let err = mean_embedding(&[vec![1.0, 2.0]], 3).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_opposite_is_negative() {
        // No clamping to [0, 1]: opposite vectors score -1
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-10, "got {sim}");
    }

    #[test]
    fn test_cosine_zero_vector_scores_zero() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap();
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_cosine_mismatched_dimensions() {
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_embedding_similarity_identical_tokens() {
        let metric = make_embedding_similarity(model());
        let sim = metric
            .score(&tokens(&["google", "drive"]), &tokens(&["google", "drive"]))
            .unwrap();
        assert!((sim - 1.0).abs() < 1e-10, "got {sim}");
    }

    #[test]
    fn test_embedding_similarity_prefers_near_synonym() {
        let metric = make_embedding_similarity(model());
        let target = tokens(&["google", "drive"]);
        let near = metric.score(&tokens(&["google", "storage"]), &target).unwrap();
        let far = metric.score(&tokens(&["google", "happy"]), &target).unwrap();
        assert!(near > far, "near={near} far={far}");
    }

    #[test]
    fn test_embedding_similarity_is_order_independent() {
        let metric = make_embedding_similarity(model());
        let a = metric
            .score(&tokens(&["drive", "google"]), &tokens(&["happy"]))
            .unwrap();
        let b = metric
            .score(&tokens(&["google", "drive"]), &tokens(&["happy"]))
            .unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_embedding_similarity_rejects_empty_side() {
        let metric = make_embedding_similarity(model());
        assert_eq!(
            metric.score(&[], &tokens(&["google"])),
            Err(Error::EmptyTokens)
        );
        assert_eq!(
            metric.score(&tokens(&["google"]), &[]),
            Err(Error::EmptyTokens)
        );
    }

    #[test]
    fn test_unknown_tokens_only_scores_zero() {
        let metric = make_embedding_similarity(model());
        let sim = metric
            .score(&tokens(&["unknown"]), &tokens(&["google"]))
            .unwrap();
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_borrowed_model_is_a_model() {
        let m = model();
        let metric = make_embedding_similarity(&m);
        assert_eq!(metric.model().dim(), 3);
    }
}
