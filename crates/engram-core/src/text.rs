//! Shared tokenization — identical for BM25 indexing and GloVe embedding,
//! per spec.md §4.5's "same way as BM25" requirement.

/// Lower-case, split on non-alphanumeric boundaries, drop tokens shorter
/// than 2 characters, keep digits.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_non_alphanumeric_and_lowercases() {
        assert_eq!(
            tokenize("Apple, Banana-Cherry!"),
            vec!["apple", "banana", "cherry"]
        );
    }

    #[test]
    fn drops_single_character_tokens() {
        assert_eq!(tokenize("a bb c dd"), vec!["bb", "dd"]);
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(tokenize("oauth2 v2.0"), vec!["oauth2", "v2", "0"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
