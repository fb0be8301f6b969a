//! Draft accounting.
//!
//! The composer always ends its document with a newline that the user
//! never typed, so one trailing newline is excluded from the visible
//! length. Only one: a draft that really ends in a blank line keeps
//! the rest.

/// Length of the draft as the user perceives it, in characters.
///
/// Exactly one trailing `'\n'`, if present, is excluded. Counting is
/// by Unicode scalar values so multi-byte text is not over-counted.
pub fn visible_len(text: &str) -> usize {
    let trimmed = text.strip_suffix('\n').unwrap_or(text);
    trimmed.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_draft_counts_zero() {
        assert_eq!(visible_len(""), 0);
    }

    #[test]
    fn test_lone_newline_counts_zero() {
        assert_eq!(visible_len("\n"), 0);
    }

    #[test]
    fn test_trailing_newline_excluded() {
        assert_eq!(visible_len("hello\n"), 5);
    }

    #[test]
    fn test_only_one_trailing_newline_stripped() {
        assert_eq!(visible_len("hello\n\n"), 6);
    }

    #[test]
    fn test_plain_text_counts_chars() {
        assert_eq!(visible_len("hello"), 5);
    }

    #[test]
    fn test_interior_newlines_counted() {
        assert_eq!(visible_len("a\nb\nc"), 5);
        assert_eq!(visible_len("a\nb\nc\n"), 5);
    }

    #[test]
    fn test_multibyte_counts_scalar_values() {
        // 4 chars, 12 bytes
        assert_eq!(visible_len("日本語だ"), 4);
        assert_eq!(visible_len("日本語だ\n"), 4);
    }
}
