//! Progress reporting for task force execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use taskforce_application::ports::progress::ProgressNotifier;
use taskforce_domain::{Participant, TaskForceResult};

/// Reports progress during execution with one bar per round
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
    synthesis_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
            synthesis_spinner: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn lock(slot: &Mutex<Option<ProgressBar>>) -> MutexGuard<'_, Option<ProgressBar>> {
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `Round 1: Contributions`, `Round 3: Refinement`
pub(crate) fn round_title(round: usize) -> String {
    if round <= 1 {
        format!("Round {}: Contributions", round)
    } else {
        format!("Round {}: Refinement", round)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_round_start(&self, round: usize, participants: usize) {
        let pb = self.multi.add(ProgressBar::new(participants as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(round_title(round));
        pb.set_message("Consulting...");

        *Self::lock(&self.round_bar) = Some(pb);
    }

    fn on_contribution(&self, _round: usize, participant: &Participant, success: bool) {
        if let Some(pb) = Self::lock(&self.round_bar).as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), participant.label)
            } else {
                format!("{} {}", "x".red(), participant.label)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, round: usize, collected: usize) {
        if let Some(pb) = Self::lock(&self.round_bar).take() {
            pb.finish_with_message(format!(
                "{} ({} contributions)",
                format!("Round {} complete", round).green(),
                collected
            ));
        }
    }

    fn on_consensus(&self, _round: usize, score: f64) {
        let _ = self
            .multi
            .println(format!("  {} {:.2}", "consensus".dimmed(), score));
    }

    fn on_synthesis_start(&self) {
        let spinner = self.multi.add(ProgressBar::new_spinner());
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix("Synthesis");
        spinner.set_message("Condensing the discussion...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        *Self::lock(&self.synthesis_spinner) = Some(spinner);
    }

    fn on_complete(&self, result: &TaskForceResult) {
        if let Some(spinner) = Self::lock(&self.synthesis_spinner).take() {
            spinner.finish_with_message(format!("{} ({})", "done".green(), result.stop_reason));
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: usize, participants: usize) {
        eprintln!(
            "{} {} ({} participants)",
            "->".cyan(),
            round_title(round).bold(),
            participants
        );
    }

    fn on_contribution(&self, _round: usize, participant: &Participant, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), participant);
        } else {
            eprintln!("  {} {} (excluded)", "x".red(), participant);
        }
    }

    fn on_round_complete(&self, _round: usize, _collected: usize) {}

    fn on_consensus(&self, round: usize, score: f64) {
        eprintln!("  consensus after round {}: {:.2}", round, score);
    }

    fn on_synthesis_start(&self) {
        eprintln!("{} {}", "->".cyan(), "Synthesis".bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_titles() {
        assert_eq!(round_title(1), "Round 1: Contributions");
        assert_eq!(round_title(4), "Round 4: Refinement");
    }
}
