//! Reply text helpers

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Like `truncate_chars`, appending `...` when something was cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let prefix = truncate_chars(text, max_chars);
    if prefix.len() < text.len() {
        format!("{}...", prefix)
    } else {
        prefix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("🎉🎉🎉", 1), "🎉");
    }

    #[test]
    fn preview_marks_truncation() {
        assert_eq!(preview("Hello World", 5), "Hello...");
        assert_eq!(preview("Hello", 5), "Hello");
    }
}
