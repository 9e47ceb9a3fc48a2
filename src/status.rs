// Status display — shows resolved configuration and whether the word
// vectors are ready.

use crate::config::Config;

/// Display status to the terminal.
pub fn show(config: &Config) {
    println!("Language: {}", config.language);
    println!("Model directory: {}", config.model_dir.display());

    let path = config.resolved_model_path();
    match std::fs::metadata(&path) {
        Ok(meta) => {
            println!("Word vectors: {} ({})", path.display(), format_bytes(meta.len()));
        }
        Err(_) => {
            println!("Word vectors: not downloaded ({})", path.display());
            println!("  Run `phrasefind download-model` to enable the fasttext metric");
        }
    }

    match config.max_words {
        Some(n) => println!("Vector rows loaded: first {n}"),
        None => println!("Vector rows loaded: all"),
    }
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
