//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for task force results
///
/// This is a domain concept representing how the output should be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full report: first-round contributions, rounds, score and solution
    Full,
    /// Only the synthesized solution (default)
    #[default]
    Solution,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_solution() {
        assert_eq!(OutputFormat::default(), OutputFormat::Solution);
    }

    #[test]
    fn test_deserialize_lowercase() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
