// Tokenization for the window search.
//
// Deliberately minimal: only '.' and ',' are stripped, then the text is split
// on whitespace. Other punctuation stays attached to its word, so
// "Workspace:2020" is a single token that won't match "workspace".

/// Characters removed from both text and target before splitting.
pub const STRIPPED_PUNCTUATION: [char; 2] = ['.', ','];

/// Split a text into tokens, keeping the original case.
pub fn tokenize(text: &str) -> Vec<String> {
    text.replace(&STRIPPED_PUNCTUATION[..], "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Split a target phrase into lower-cased tokens.
pub fn normalize_target(target: &str) -> Vec<String> {
    tokenize(&target.to_lowercase())
}

/// Lower-case a run of tokens for scoring.
pub fn lowercase_tokens(tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|t| t.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_periods_and_commas() {
        assert_eq!(
            tokenize("Hello World, I'm so happy and enjoy today."),
            vec!["Hello", "World", "I'm", "so", "happy", "and", "enjoy", "today"]
        );
    }

    #[test]
    fn test_tokenize_keeps_other_punctuation() {
        assert_eq!(
            tokenize("part of Google Workspace:2020, is"),
            vec!["part", "of", "Google", "Workspace:2020", "is"]
        );
    }

    #[test]
    fn test_tokenize_joins_across_stripped_chars() {
        // Stripping happens before splitting, so "a,b" is one token
        assert_eq!(tokenize("a,b c.d"), vec!["ab", "cd"]);
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(tokenize("  one \t two\nthree  "), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_tokenize_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" ., ,. ").is_empty());
    }

    #[test]
    fn test_normalize_target_lowercases() {
        assert_eq!(normalize_target("Google Workspace."), vec!["google", "workspace"]);
    }

    #[test]
    fn test_tokenize_preserves_case() {
        assert_eq!(tokenize("Google Drive"), vec!["Google", "Drive"]);
    }
}
