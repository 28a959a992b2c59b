//! String utilities for the domain layer.

/// Single-line preview of free text for logs and progress output.
///
/// Collapses all whitespace runs into one space and cuts the result at
/// `max_chars` characters (not bytes), appending `...` when shortened.
pub fn preview(s: &str, max_chars: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let kept: String = collapsed
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn test_preview_collapses_whitespace() {
        assert_eq!(preview("line one\n\n  line two", 40), "line one line two");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("hello world", 8), "hello...");
        assert_eq!(preview("日本語テスト文字列", 6), "日本語...");
    }
}
