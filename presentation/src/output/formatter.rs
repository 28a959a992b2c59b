//! Output formatter trait

use taskforce_domain::{OutputFormat, TaskForceResult};

/// Trait for formatting task force results
pub trait OutputFormatter {
    /// Format the complete report
    fn format(&self, result: &TaskForceResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &TaskForceResult) -> String;

    /// Format the solution only (concise output)
    fn format_solution_only(&self, result: &TaskForceResult) -> String;

    /// Dispatch on the selected [`OutputFormat`]
    fn render(&self, result: &TaskForceResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(result),
            OutputFormat::Solution => self.format_solution_only(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
