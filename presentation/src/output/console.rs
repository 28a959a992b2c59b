//! Console output formatter for task force results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use taskforce_domain::TaskForceResult;

/// Formats task force results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(result: &TaskForceResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Task Force Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Task force:".cyan().bold(),
            result.task_force_id
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan().bold(),
            result
                .participants
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.push_str(&format!(
            "{} {} after {} round(s), {} messages, {:.1}s\n",
            "Outcome:".cyan().bold(),
            Self::outcome(result),
            result.rounds_completed,
            result.message_count,
            result.execution_time.as_secs_f64()
        ));
        output.push_str(&format!(
            "{} {:.2}\n",
            "Consensus:".cyan().bold(),
            result.consensus_score
        ));

        output.push_str(&Self::section_header("Round 1: Contributions"));
        for (participant, content) in &result.first_round_contributions {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", participant).yellow().bold(),
                Self::indent(content, "  ")
            ));
        }
        let silent: Vec<_> = result
            .participants
            .iter()
            .filter(|p| !result.first_round_contributions.contains_key(*p))
            .map(|p| p.as_str())
            .collect();
        if !silent.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "No contribution from:".red().bold(),
                silent.join(", ")
            ));
        }

        output.push_str(&Self::section_header("Solution"));
        output.push_str(&format!("\n{}\n", result.solution));

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &TaskForceResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the solution only
    pub fn format_solution_only(result: &TaskForceResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Task Force Solution ===".cyan().bold()
        ));
        output.push_str(&format!(
            "{} {} (consensus {:.2}, {} round(s))\n\n",
            "Outcome:".dimmed(),
            Self::outcome(result),
            result.consensus_score,
            result.rounds_completed
        ));

        output.push_str(&result.solution);
        output.push('\n');

        output
    }

    fn outcome(result: &TaskForceResult) -> String {
        let name = result.stop_reason.display_name();
        if result.success {
            name.green().to_string()
        } else {
            name.yellow().to_string()
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &TaskForceResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &TaskForceResult) -> String {
        Self::format_json(result)
    }

    fn format_solution_only(&self, result: &TaskForceResult) -> String {
        Self::format_solution_only(result)
    }
}
