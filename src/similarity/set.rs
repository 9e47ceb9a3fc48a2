// Set-based similarity: Jaccard, Dice and Simpson (overlap coefficient).
//
// All three collapse their inputs into sets for the intersection, so token
// order and repetition don't matter there. Dice and Simpson still use the raw
// collection lengths in the denominator, which means repeated tokens lower
// the score. Each metric defines a fallback for empty input instead of
// dividing by zero:
//
//   jaccard  = |X ∩ Y| / |X ∪ Y|            (1.0 when the union is empty)
//   dice     = 2·|X ∩ Y| / (|xs| + |ys|)     (1.0 when both are empty)
//   simpson  = |X ∩ Y| / min(|xs|, |ys|)     (1.0 when either is empty)

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::error::Result;

use super::traits::SimilarityMetric;

fn intersection_size<T: Eq + Hash>(xs: &[T], ys: &[T]) -> usize {
    let set_x: HashSet<&T> = xs.iter().collect();
    let set_y: HashSet<&T> = ys.iter().collect();
    set_x.intersection(&set_y).count()
}

/// Jaccard similarity: shared distinct tokens over all distinct tokens.
pub fn jaccard_similarity<T: Eq + Hash>(xs: &[T], ys: &[T]) -> f64 {
    let set_x: HashSet<&T> = xs.iter().collect();
    let set_y: HashSet<&T> = ys.iter().collect();

    let num_union = set_x.union(&set_y).count();
    if num_union == 0 {
        return 1.0;
    }

    set_x.intersection(&set_y).count() as f64 / num_union as f64
}

/// Dice similarity: twice the shared distinct tokens over the combined raw length.
pub fn dice_similarity<T: Eq + Hash>(xs: &[T], ys: &[T]) -> f64 {
    let total = xs.len() + ys.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * intersection_size(xs, ys) as f64 / total as f64
}

/// Simpson similarity: shared distinct tokens over the shorter raw length.
pub fn simpson_similarity<T: Eq + Hash>(xs: &[T], ys: &[T]) -> f64 {
    let shorter = xs.len().min(ys.len());
    if shorter == 0 {
        return 1.0;
    }

    intersection_size(xs, ys) as f64 / shorter as f64
}

/// The set-based metrics as a value, for picking one at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMetric {
    Jaccard,
    Dice,
    Simpson,
}

impl SetMetric {
    pub const ALL: [SetMetric; 3] = [SetMetric::Jaccard, SetMetric::Dice, SetMetric::Simpson];

    pub fn name(&self) -> &'static str {
        match self {
            SetMetric::Jaccard => "jaccard",
            SetMetric::Dice => "dice",
            SetMetric::Simpson => "simpson",
        }
    }

    pub fn compute<T: Eq + Hash>(&self, xs: &[T], ys: &[T]) -> f64 {
        match self {
            SetMetric::Jaccard => jaccard_similarity(xs, ys),
            SetMetric::Dice => dice_similarity(xs, ys),
            SetMetric::Simpson => simpson_similarity(xs, ys),
        }
    }
}

impl fmt::Display for SetMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SimilarityMetric for SetMetric {
    fn score(&self, xs: &[String], ys: &[String]) -> Result<f64> {
        Ok(self.compute(xs, ys))
    }
}
