//! Token estimation

/// Estimate tokens using a chars/4 heuristic.
///
/// Counts Unicode code points, not bytes — byte length over-counts for
/// multi-byte UTF-8 content (CJK text, emoji).
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

#[cfg(test)]
mod tests {
    use super::estimate_tokens;

    #[test]
    fn estimates_by_code_points() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        // 4 CJK chars are 12 bytes but 4 code points.
        assert_eq!(estimate_tokens("日本語字"), 1);
    }
}
