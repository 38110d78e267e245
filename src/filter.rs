//! Filter engine: case-insensitive substring match across a row's raw fields.
//!
//! The predicate runs over every stored field of the raw row, not only the
//! projected ones, so a filter can hit a column that is not displayed.

/// Whether a raw row passes a filter. `None` or empty matches everything.
#[must_use]
pub fn matches(row: &[String], filter: Option<&str>) -> bool {
    RowFilter::new(filter).matches(row)
}

/// A filter with its needle case-folded once, for repeated use over many rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    needle: Option<String>,
}

impl RowFilter {
    /// Create a filter from optional free text.
    #[must_use]
    pub fn new(filter: Option<&str>) -> Self {
        let needle = filter
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    /// Whether this filter lets everything through.
    #[must_use]
    pub fn is_pass_all(&self) -> bool {
        self.needle.is_none()
    }

    /// Whether a raw row passes.
    #[must_use]
    pub fn matches(&self, row: &[String]) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        row.iter().any(|field| field.to_lowercase().contains(needle.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn anna() -> Vec<String> {
        vec!["Anna Muster".to_string(), "anna@example.com".to_string()]
    }

    #[rstest]
    #[case(Some("MUSTER"), true)]
    #[case(Some("muster"), true)]
    #[case(Some("@EXAMPLE"), true)]
    #[case(Some("xyz"), false)]
    #[case(Some(""), true)]
    #[case(None, true)]
    fn test_matches(#[case] filter: Option<&str>, #[case] expected: bool) {
        assert_eq!(matches(&anna(), filter), expected);
    }

    #[test]
    fn test_unicode_case_folding() {
        let row = vec!["Thüringen".to_string(), "ÄNDERUNG".to_string()];
        assert!(matches(&row, Some("THÜR")));
        assert!(matches(&row, Some("änderung")));
    }

    #[test]
    fn test_empty_row() {
        assert!(!matches(&[], Some("a")));
        assert!(matches(&[], None));
    }

    #[test]
    fn test_pass_all() {
        assert!(RowFilter::new(None).is_pass_all());
        assert!(RowFilter::new(Some("")).is_pass_all());
        assert!(!RowFilter::new(Some(" ")).is_pass_all());
    }
}
