// Download helper for fastText pretrained word vectors.
//
// Fetches the Common Crawl vectors for one language (cc.<lang>.300.vec.gz,
// ~1.2 GB for English) from fastText's public mirror. The file is kept
// compressed; WordVectors::load decompresses while reading.
//
// Files are stored in a platform-appropriate directory
// (~/.local/share/phrasefind/models/ on Linux) so they persist across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Base URL for fastText's Common Crawl vectors.
const FASTTEXT_CC_URL: &str = "https://dl.fbaipublicfiles.com/fasttext/vectors-crawl";

/// Returns the default directory for storing model files.
/// Uses the platform data directory: ~/.local/share/phrasefind/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("phrasefind")
        .join("models")
}

/// File name of the vectors for a language, e.g. `cc.en.300.vec.gz`.
pub fn model_file_name(language: &str) -> String {
    format!("cc.{language}.300.vec.gz")
}

/// Full path the vectors for `language` would have inside `dir`.
pub fn model_path(dir: &Path, language: &str) -> PathBuf {
    dir.join(model_file_name(language))
}

/// Check whether the vectors for `language` are already in `dir`.
pub fn model_present(dir: &Path, language: &str) -> bool {
    model_path(dir, language).exists()
}

/// fastText language codes are two or three lowercase ASCII letters.
pub fn validate_language(language: &str) -> Result<()> {
    let valid = (2..=3).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_lowercase());
    if !valid {
        anyhow::bail!(
            "Invalid language code {:?}: expected two or three lowercase letters (e.g. \"en\")",
            language
        );
    }
    Ok(())
}

/// Download the vectors for `language` into `dir` unless they're already there.
///
/// Returns the path of the vectors file either way. No retries: a failed
/// download leaves only a `.part` file behind, which the next attempt
/// overwrites.
pub async fn download_if_absent(dir: &Path, language: &str) -> Result<PathBuf> {
    validate_language(language)?;

    let dest = model_path(dir, language);
    if dest.exists() {
        info!(path = %dest.display(), "Word vectors already exist, skipping download");
        return Ok(dest);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    let file_name = model_file_name(language);
    println!("  Downloading {file_name} (~1.2 GB)...");
    download_file(&format!("{FASTTEXT_CC_URL}/{file_name}"), &dest).await?;

    Ok(dest)
}

/// Stream a single file from a URL to a local path with a progress bar.
///
/// Writes to `<dest>.part` and renames on success so an interrupted download
/// never looks like a complete model.
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .context("Invalid progress bar template")?
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .context("Invalid progress bar template")?,
            );
            pb
        }
    };

    let part_path = part_path(dest);
    let mut file = tokio::fs::File::create(&part_path)
        .await
        .with_context(|| format!("Failed to create {}", part_path.display()))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {}", part_path.display()))?;
        pb.inc(chunk.len() as u64);
    }

    file.flush()
        .await
        .with_context(|| format!("Failed to flush {}", part_path.display()))?;
    drop(file);

    tokio::fs::rename(&part_path, dest)
        .await
        .with_context(|| format!("Failed to move download into place: {}", dest.display()))?;

    pb.finish_and_clear();
    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_under_phrasefind() {
        let dir = default_model_dir();
        let path_str = dir.to_string_lossy();
        assert!(
            path_str.contains("phrasefind") && path_str.contains("models"),
            "Expected path containing phrasefind/models, got: {path_str}"
        );
    }

    #[test]
    fn test_model_file_name_per_language() {
        assert_eq!(model_file_name("en"), "cc.en.300.vec.gz");
        assert_eq!(model_file_name("ja"), "cc.ja.300.vec.gz");
    }

    #[test]
    fn test_validate_language() {
        assert!(validate_language("en").is_ok());
        assert!(validate_language("ceb").is_ok());
        assert!(validate_language("EN").is_err());
        assert!(validate_language("e").is_err());
        assert!(validate_language("../x").is_err());
        assert!(validate_language("english").is_err());
    }

    #[test]
    fn test_part_path_appends_suffix() {
        let dest = PathBuf::from("/tmp/models/cc.en.300.vec.gz");
        assert_eq!(
            part_path(&dest),
            PathBuf::from("/tmp/models/cc.en.300.vec.gz.part")
        );
    }

    #[test]
    fn test_model_present_false_when_missing() {
        let dir = std::env::temp_dir().join("phrasefind-test-nonexistent");
        assert!(!model_present(&dir, "en"));
    }

    #[tokio::test]
    async fn test_download_if_absent_skips_existing_file() {
        let dir = std::env::temp_dir().join("phrasefind-download-skip-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(model_path(&dir, "en"), b"fake").unwrap();

        // Returns immediately without touching the network
        let path = download_if_absent(&dir, "en").await.unwrap();
        assert_eq!(path, model_path(&dir, "en"));
        assert!(model_present(&dir, "en"));

        // Cleanup
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_download_if_absent_rejects_bad_language() {
        let dir = std::env::temp_dir().join("phrasefind-download-bad-lang");
        assert!(download_if_absent(&dir, "../../etc").await.is_err());
        assert!(!dir.exists());
    }
}
