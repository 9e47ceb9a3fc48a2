// Colored terminal output for search results and metric comparisons.
//
// main.rs decides what to show; this module decides how it looks.

use colored::Colorize;

use crate::search::WindowMatch;

/// Longest text shown verbatim in headers before truncation.
const TEXT_PREVIEW_CHARS: usize = 100;

/// Display the best window for a single search.
pub fn display_best_match(text: &str, target: &str, metric: &str, best: &WindowMatch) {
    println!("  {} {}", "Text:".dimmed(), super::truncate_chars(text, TEXT_PREVIEW_CHARS));
    println!("  {} {}", "Target:".dimmed(), target);
    println!();
    println!(
        "  {:<10} {}  {}",
        metric,
        best.text.bold(),
        format!("(tokens {}..{}, score {})", best.start, best.end, colorize_score(best.score))
            .dimmed(),
    );
}

/// Display a ranked list of windows, best first.
pub fn display_ranked_windows(metric: &str, windows: &[WindowMatch]) {
    println!(
        "\n{}",
        format!("=== Top {} windows ({}) ===", windows.len(), metric).bold()
    );
    println!();

    println!(
        "  {:>4}  {:>6}  {:>9}  {}",
        "Rank".dimmed(),
        "Score".dimmed(),
        "Tokens".dimmed(),
        "Window".dimmed(),
    );
    println!("  {}", "-".repeat(60).dimmed());

    for (i, window) in windows.iter().enumerate() {
        println!(
            "  {:>4}. {:>6}  {:>9}  {}",
            i + 1,
            colorize_score(window.score),
            format!("{}..{}", window.start, window.end),
            window.text,
        );
    }
    println!();
}

/// Display the scores of several metrics for one pair of phrases.
pub fn display_comparison(a: &str, b: &str, scores: &[(String, f64)]) {
    println!("\n{}", format!("=== \"{a}\" vs \"{b}\" ===").bold());
    println!();
    for (metric, score) in scores {
        println!("  {:<10} {}", metric, colorize_score(*score));
    }
    println!();
}

/// Display the per-metric results of one demo case.
pub fn display_demo_case(text: &str, target: &str, results: &[(String, String)]) {
    println!("{} {}", "text:".dimmed(), text);
    println!("{} {}", "target:".dimmed(), target);
    println!();
    for (metric, matched) in results {
        println!("  {:<10} {}", format!("{metric}:"), matched.bold());
    }
    println!("{}", "=".repeat(50).dimmed());
}

/// Colorize a similarity score: green for strong, yellow for partial, dimmed for weak.
fn colorize_score(score: f64) -> colored::ColoredString {
    let formatted = format!("{score:.3}");
    if score >= 0.75 {
        formatted.green().bold()
    } else if score >= 0.4 {
        formatted.yellow()
    } else {
        formatted.dimmed()
    }
}
