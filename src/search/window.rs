// Sliding-window search.
//
// The text is tokenized with case preserved, the target is tokenized and
// lower-cased. Every contiguous run of text tokens the same length as the
// target is a candidate; each candidate is lower-cased only at scoring time
// and compared against the target with the supplied metric. The best window
// is the first one to reach the maximum score, and it is returned in its
// original case.
//
// For n text tokens and m target tokens there are exactly n - m + 1
// candidates and the metric is called once per candidate.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::similarity::traits::SimilarityMetric;

use super::tokenize::{lowercase_tokens, normalize_target, tokenize};

/// A scored candidate window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowMatch {
    /// Token offset of the window's first token within the text
    pub start: usize,
    /// Token offset one past the window's last token
    pub end: usize,
    /// The window's tokens in their original case, joined by single spaces
    pub text: String,
    /// Metric score against the target
    pub score: f64,
}

/// Score every candidate window, in start-offset order.
///
/// Fails with [`Error::TargetTooLong`] when the target has more tokens than
/// the text. Errors from the metric stop the search and are returned as-is.
pub fn rank_windows<M>(text: &str, target: &str, metric: &M) -> Result<Vec<WindowMatch>>
where
    M: SimilarityMetric + ?Sized,
{
    let text_tokens = tokenize(text);
    let target_tokens = normalize_target(target);

    let n = text_tokens.len();
    let m = target_tokens.len();
    if m > n {
        return Err(Error::TargetTooLong { target: m, text: n });
    }

    // Slices rather than slice::windows, which panics on an empty target.
    let mut windows = Vec::with_capacity(n - m + 1);
    for start in 0..=(n - m) {
        let candidate = &text_tokens[start..start + m];
        let score = metric.score(&lowercase_tokens(candidate), &target_tokens)?;
        windows.push(WindowMatch {
            start,
            end: start + m,
            text: candidate.join(" "),
            score,
        });
    }

    debug!(
        text_tokens = n,
        target_tokens = m,
        candidates = windows.len(),
        "Scored candidate windows"
    );

    Ok(windows)
}

/// Index of the first maximum. A later score replaces the current best only
/// when strictly greater, so ties keep the earliest window. NaN scores are
/// skipped; if every score is NaN the first window is chosen.
fn first_argmax(windows: &[WindowMatch]) -> usize {
    let mut best: Option<usize> = None;
    for (i, window) in windows.iter().enumerate() {
        if window.score.is_nan() {
            continue;
        }
        match best {
            Some(b) if window.score <= windows[b].score => {}
            _ => best = Some(i),
        }
    }
    best.unwrap_or(0)
}

/// Descending by score, NaN last. Used with a stable sort so equal scores
/// keep their offset order.
fn by_score_desc(a: &WindowMatch, b: &WindowMatch) -> Ordering {
    match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
    }
}

/// The highest-scoring window; the earliest one wins ties.
pub fn best_window<M>(text: &str, target: &str, metric: &M) -> Result<WindowMatch>
where
    M: SimilarityMetric + ?Sized,
{
    let mut windows = rank_windows(text, target, metric)?;
    // rank_windows always yields at least one window once the length check passes
    let best = windows.swap_remove(first_argmax(&windows));

    debug!(
        start = best.start,
        score = best.score,
        matched = %best.text,
        "Selected best window"
    );

    Ok(best)
}

/// Return the span of `text` most similar to `target` under `metric`.
pub fn similarity_search<M>(text: &str, target: &str, metric: &M) -> Result<String>
where
    M: SimilarityMetric + ?Sized,
{
    best_window(text, target, metric).map(|w| w.text)
}

/// The `k` best windows, highest score first. Equal scores keep their
/// offset order, so the first entry is always the [`best_window`].
pub fn top_windows<M>(text: &str, target: &str, metric: &M, k: usize) -> Result<Vec<WindowMatch>>
where
    M: SimilarityMetric + ?Sized,
{
    let mut windows = rank_windows(text, target, metric)?;
    windows.sort_by(by_score_desc);
    windows.truncate(k);
    Ok(windows)
}
