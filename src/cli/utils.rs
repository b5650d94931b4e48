//! Shared CLI helpers.

/// Split a comma-separated flag value into trimmed, non-empty entries.
pub fn parse_csv(value: &Option<String>) -> Vec<String> {
    value
        .as_deref()
        .map(|v| {
            v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::parse_csv;

    #[test]
    fn splits_and_trims() {
        let parsed = parse_csv(&Some("a, b ,,c".to_string()));
        assert_eq!(parsed, vec!["a", "b", "c"]);
    }

    #[test]
    fn none_yields_empty() {
        assert!(parse_csv(&None).is_empty());
    }
}
