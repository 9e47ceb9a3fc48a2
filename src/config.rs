use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::model::download;

/// Default fastText language when PHRASEFIND_LANG is unset.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy, so any of
/// these can live there instead of the shell environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding downloaded word vectors (PHRASEFIND_MODEL_DIR)
    pub model_dir: PathBuf,
    /// fastText language code (PHRASEFIND_LANG, default "en")
    pub language: String,
    /// Explicit vectors file, overriding model_dir + language (PHRASEFIND_MODEL_PATH)
    pub model_path: Option<PathBuf>,
    /// Cap on vector rows loaded into memory (PHRASEFIND_MAX_WORDS)
    pub max_words: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only a malformed PHRASEFIND_MAX_WORDS or
    /// PHRASEFIND_LANG is an error.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("PHRASEFIND_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| download::default_model_dir());

        let language =
            env::var("PHRASEFIND_LANG").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());
        download::validate_language(&language).context("PHRASEFIND_LANG is invalid")?;

        let max_words = match env::var("PHRASEFIND_MAX_WORDS") {
            Ok(raw) => Some(parse_max_words(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            model_dir,
            language,
            model_path: env::var("PHRASEFIND_MODEL_PATH").ok().map(PathBuf::from),
            max_words,
        })
    }

    /// The vectors file to load: the explicit path if set, otherwise the
    /// downloaded file for the configured language.
    pub fn resolved_model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| download::model_path(&self.model_dir, &self.language))
    }

    pub fn model_available(&self) -> bool {
        self.resolved_model_path().exists()
    }

    /// Check that the word vectors exist.
    /// Call this before any operation that needs the fastText metric.
    pub fn require_model(&self) -> Result<()> {
        if !self.model_available() {
            anyhow::bail!(
                "Word vectors not found: {}\n\
                 Run `phrasefind download-model` to download them,\n\
                 or set PHRASEFIND_MODEL_PATH to an existing .vec file.",
                self.resolved_model_path().display()
            );
        }
        Ok(())
    }
}

fn parse_max_words(raw: &str) -> Result<usize> {
    let n = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("PHRASEFIND_MAX_WORDS must be a positive integer, got {raw:?}"))?;
    if n == 0 {
        anyhow::bail!("PHRASEFIND_MAX_WORDS must be greater than zero");
    }
    Ok(n)
}
