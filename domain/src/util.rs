//! Shared utility functions.

/// Bounded preview of a content field for notification payloads and audit
/// records.
///
/// Truncates to at most `max_bytes` without splitting a UTF-8 character
/// boundary and allocates only when truncation happens.
pub fn preview(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_untouched() {
        assert_eq!(preview("18 locations", 200), "18 locations");
    }

    #[test]
    fn long_content_is_cut_at_limit() {
        let long = "a".repeat(300);
        assert_eq!(preview(&long, 200).len(), 200);
    }

    #[test]
    fn cut_backs_up_to_char_boundary() {
        // 'é' is 2 bytes; cutting at byte 3 lands mid-character
        let s = "éé";
        assert_eq!(preview(s, 3), "é");
        assert_eq!(preview(s, 4), "éé");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(preview("", 200), "");
    }
}
