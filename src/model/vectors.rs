// In-memory word vectors loaded from fastText's text format.
//
// The .vec format is a header line "<count> <dim>" followed by one row per
// word: the word, then `dim` space-separated floats. Rows are sorted by
// corpus frequency, so reading only the first N rows keeps the N most common
// words. Files ending in .gz are decompressed while reading.
//
// Lookups are exact. A word that isn't in the table gets the zero vector,
// which adds nothing to a mean but still counts towards its divisor.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::similarity::embedding::EmbeddingModel;

/// Upper bound on rows reserved up front. The header count is only a hint;
/// the table grows past this if the file really is that large.
const MAX_PREALLOCATED_ROWS: usize = 1 << 20;

/// A word → vector table with a fixed dimensionality.
#[derive(Debug)]
pub struct WordVectors {
    dim: usize,
    table: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    /// Build a table from `(word, vector)` pairs.
    ///
    /// Every vector must have length `dim`. If a word repeats, the first
    /// vector is kept.
    pub fn from_entries<I, S>(dim: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        if dim == 0 {
            anyhow::bail!("Word vector dimension must be greater than zero");
        }

        let mut table = HashMap::new();
        for (word, vector) in entries {
            let word = word.into();
            if vector.len() != dim {
                anyhow::bail!(
                    "Vector for {:?} has {} components, expected {}",
                    word,
                    vector.len(),
                    dim
                );
            }
            table.entry(word).or_insert(vector);
        }

        Ok(Self { dim, table })
    }

    /// Load vectors from a `.vec` or `.vec.gz` file.
    ///
    /// `max_words` caps the number of rows read after the header.
    pub fn load(path: &Path, max_words: Option<usize>) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open word vectors: {}", path.display()))?;

        let is_gz = path.extension().is_some_and(|ext| ext == "gz");
        let reader: Box<dyn Read> = if is_gz {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let vectors = Self::from_reader(BufReader::new(reader), max_words)
            .with_context(|| format!("Failed to parse word vectors: {}", path.display()))?;

        info!(
            words = vectors.len(),
            dim = vectors.dim,
            path = %path.display(),
            "Loaded word vectors"
        );

        Ok(vectors)
    }

    /// Parse the `.vec` text format from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R, max_words: Option<usize>) -> Result<Self> {
        let mut lines = reader.lines();

        let header = lines
            .next()
            .context("Word vector file is empty")?
            .context("Failed to read header line")?;
        let (declared, dim) = parse_header(&header)?;

        let limit = max_words.map_or(declared, |cap| cap.min(declared));
        let mut table = HashMap::with_capacity(limit.min(MAX_PREALLOCATED_ROWS));

        for (i, line) in lines.take(limit).enumerate() {
            // Line numbers are 1-based and the header is line 1
            let line_no = i + 2;
            let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
            if line.trim().is_empty() {
                continue;
            }

            let (word, vector) = parse_row(&line, dim)
                .with_context(|| format!("Malformed word vector on line {line_no}"))?;
            table.entry(word).or_insert(vector);
        }

        debug!(declared, read = table.len(), dim, "Parsed word vector rows");

        Ok(Self { dim, table })
    }

    /// Number of distinct words in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.table.contains_key(word)
    }
}

impl EmbeddingModel for WordVectors {
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

fn parse_header(header: &str) -> Result<(usize, usize)> {
    let mut parts = header.split_whitespace();
    let count = parts
        .next()
        .context("Header is missing the word count")?
        .parse::<usize>()
        .context("Header word count is not an integer")?;
    let dim = parts
        .next()
        .context("Header is missing the dimension")?
        .parse::<usize>()
        .context("Header dimension is not an integer")?;

    if dim == 0 {
        anyhow::bail!("Header declares a zero dimension");
    }
    if parts.next().is_some() {
        anyhow::bail!("Header has trailing fields: {header:?}");
    }

    Ok((count, dim))
}

fn parse_row(line: &str, dim: usize) -> Result<(String, Vec<f32>)> {
    // fastText splits only on ASCII spaces, so a word may contain other
    // whitespace (e.g. U+00A0). Rows end with a trailing space.
    let (word, rest) = line
        .split_once(' ')
        .context("Row has no vector components")?;
    if word.is_empty() {
        anyhow::bail!("Row is missing the word");
    }
    let word = word.to_string();

    let vector = rest
        .trim_end_matches(' ')
        .split(' ')
        .map(|v| {
            v.parse::<f32>()
                .with_context(|| format!("Not a float: {v:?}"))
        })
        .collect::<Result<Vec<f32>>>()?;

    if vector.len() != dim {
        anyhow::bail!(
            "Row for {:?} has {} components, expected {}",
            word,
            vector.len(),
            dim
        );
    }

    Ok((word, vector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "3 2\nthe 0.5 0.5 \ngoogle 1.0 0.0 \ndrive 0.0 1.0 \n";

    #[test]
    fn test_from_reader_parses_rows() {
        let vectors = WordVectors::from_reader(Cursor::new(SAMPLE), None).unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors.dim(), 2);
        assert_eq!(vectors.vector_for("google"), vec![1.0, 0.0]);
    }

    #[test]
    fn test_max_words_keeps_leading_rows() {
        let vectors = WordVectors::from_reader(Cursor::new(SAMPLE), Some(2)).unwrap();
        assert_eq!(vectors.len(), 2);
        assert!(vectors.contains("the"));
        assert!(vectors.contains("google"));
        assert!(!vectors.contains("drive"));
    }

    #[test]
    fn test_unknown_word_is_zero_vector() {
        let vectors = WordVectors::from_reader(Cursor::new(SAMPLE), None).unwrap();
        assert_eq!(vectors.vector_for("workspace"), vec![0.0, 0.0]);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let vectors = WordVectors::from_reader(Cursor::new(SAMPLE), None).unwrap();
        assert_eq!(vectors.vector_for("Google"), vec![0.0, 0.0]);
    }

    #[test]
    fn test_wrong_arity_row_is_error() {
        let input = "1 3\nword 0.1 0.2\n";
        let err = WordVectors::from_reader(Cursor::new(input), None).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "got: {err:#}");
    }

    #[test]
    fn test_bad_float_is_error() {
        let input = "1 2\nword 0.1 abc\n";
        assert!(WordVectors::from_reader(Cursor::new(input), None).is_err());
    }

    #[test]
    fn test_bad_header_is_error() {
        assert!(WordVectors::from_reader(Cursor::new("not a header\n"), None).is_err());
        assert!(WordVectors::from_reader(Cursor::new("3 0\n"), None).is_err());
        assert!(WordVectors::from_reader(Cursor::new(""), None).is_err());
    }

    #[test]
    fn test_duplicate_word_keeps_first() {
        let input = "2 1\nx 1.0\nx 2.0\n";
        let vectors = WordVectors::from_reader(Cursor::new(input), None).unwrap();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors.vector_for("x"), vec![1.0]);
    }

    #[test]
    fn test_huge_header_count_does_not_preallocate() {
        let input = "18446744073709551615 2\nx 1 2\n";
        let vectors = WordVectors::from_reader(Cursor::new(input), None).unwrap();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors.vector_for("x"), vec![1.0, 2.0]);
    }

    #[test]
    fn test_word_with_non_breaking_space() {
        let input = "2 2\n\u{00a0} 0.1 0.2 \ngoogle 1.0 0.0 \n";
        let vectors = WordVectors::from_reader(Cursor::new(input), None).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors.vector_for("\u{00a0}"), vec![0.1, 0.2]);
        assert_eq!(vectors.vector_for("google"), vec![1.0, 0.0]);
    }

    #[test]
    fn test_row_without_trailing_space() {
        let input = "1 2\nword 0.5 0.25\n";
        let vectors = WordVectors::from_reader(Cursor::new(input), None).unwrap();
        assert_eq!(vectors.vector_for("word"), vec![0.5, 0.25]);
    }

    #[test]
    fn test_row_with_only_a_word_is_error() {
        assert!(WordVectors::from_reader(Cursor::new("1 2\nlonely\n"), None).is_err());
    }

    #[test]
    fn test_from_entries_rejects_wrong_length() {
        let result = WordVectors::from_entries(2, [("a", vec![1.0])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_entries_rejects_zero_dim() {
        let entries: Vec<(&str, Vec<f32>)> = vec![];
        assert!(WordVectors::from_entries(0, entries).is_err());
    }
}
