/// Split text into words separated by runs of spaces, preserving order.
///
/// Only the space character separates words; tabs, newlines and other
/// control characters stay inside the word and are rejected later by
/// [`is_valid_word`].
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|w| !w.is_empty()).collect()
}

/// A word is valid when it contains no characters with codes 0..=31.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| (c as u32) < 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_space_runs() {
        assert_eq!(split_words("  curly   cat curly tail "), vec!["curly", "cat", "curly", "tail"]);
        assert!(split_words("").is_empty());
        assert!(split_words("    ").is_empty());
    }

    #[test]
    fn keeps_other_whitespace_inside_words() {
        assert_eq!(split_words("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn rejects_control_characters() {
        assert!(is_valid_word("test"));
        assert!(is_valid_word("кот-пушистый"));
        assert!(!is_valid_word("te\x01st"));
        assert!(!is_valid_word("line\n"));
        assert!(!is_valid_word("\x1f"));
    }
}
