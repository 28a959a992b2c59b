//! Prompt templates for the task force flow

use crate::message::Message;
use crate::taskforce::{Participant, TaskForceConfig};

/// Opening line of every consensus scoring prompt.
pub const CONSENSUS_PROMPT_HEADER: &str = "You are measuring agreement in a discussion.";

/// Opening line of every synthesis prompt.
pub const SYNTHESIS_PROMPT_HEADER: &str = "You are synthesizing a task force discussion.";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Round-1 prompt: built from the problem statement only.
    pub fn contribution_prompt(config: &TaskForceConfig, participant: &Participant) -> String {
        let mut prompt = format!(
            r#"You are {}, a member of the task force "{}".
Work independently and give your best answer to the problem below.
Be concrete and actionable. Support your points with reasoning.

Problem:
{}
"#,
            participant.label, config.name, config.problem_statement
        );
        Self::push_capabilities(&mut prompt, config);
        prompt
    }

    /// Round-N prompt (N >= 2): the problem plus a window of recent messages.
    pub fn refinement_prompt(
        config: &TaskForceConfig,
        participant: &Participant,
        round: usize,
        recent: &[Message],
    ) -> String {
        let mut prompt = format!(
            r#"You are {}, a member of the task force "{}". This is round {}.

Problem:
{}
"#,
            participant.label, config.name, round, config.problem_statement
        );
        Self::push_capabilities(&mut prompt, config);

        prompt.push_str("\nRecent discussion:\n");
        Self::push_messages(&mut prompt, recent);

        prompt.push_str(
            r#"
Review the discussion above. Keep what is well supported, challenge what is not,
and give your refined answer. Move toward agreement where the arguments allow it."#,
        );
        prompt
    }

    /// Scoring prompt: asks for a single agreement score in [0.0, 1.0].
    pub fn consensus_prompt(problem: &str, recent: &[Message]) -> String {
        let mut prompt = format!(
            r#"{}

Problem under discussion:
{}

Messages:
"#,
            CONSENSUS_PROMPT_HEADER, problem
        );
        Self::push_messages(&mut prompt, recent);
        prompt.push_str(
            r#"
Rate how much the participants agree on a single answer, from 0.0 (no agreement)
to 1.0 (full agreement). Reply with only the number, e.g. {"score": 0.75}."#,
        );
        prompt
    }

    /// Synthesis prompt over the entire discussion.
    pub fn synthesis_prompt(config: &TaskForceConfig, messages: &[Message]) -> String {
        let mut prompt = format!(
            r#"{}

Task force: {}
Problem:
{}

Full discussion:
"#,
            SYNTHESIS_PROMPT_HEADER, config.name, config.problem_statement
        );
        Self::push_messages(&mut prompt, messages);
        prompt.push_str(
            r#"
Produce one consolidated, actionable answer to the problem. Incorporate the
strongest arguments, resolve disagreements where the discussion supports it,
and state any open risks briefly."#,
        );
        prompt
    }

    fn push_capabilities(prompt: &mut String, config: &TaskForceConfig) {
        if !config.required_capabilities.is_empty() {
            prompt.push_str(&format!(
                "\nRequired capabilities: {}\n",
                config.required_capabilities.join(", ")
            ));
        }
    }

    fn push_messages(prompt: &mut String, messages: &[Message]) {
        for message in messages {
            prompt.push_str(&format!(
                "\n--- {} (round {}) ---\n{}\n",
                message.participant_label, message.round, message.content
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taskforce::TaskForceId;

    fn config() -> TaskForceConfig {
        TaskForceConfig::builder("Infra council", "Choose a message broker")
            .capability("messaging")
            .build()
            .unwrap()
    }

    #[test]
    fn test_contribution_prompt_has_problem_only() {
        let prompt =
            PromptTemplate::contribution_prompt(&config(), &Participant::new("a1", "Architect"));
        assert!(prompt.contains("Architect"));
        assert!(prompt.contains("Choose a message broker"));
        assert!(prompt.contains("messaging"));
        assert!(!prompt.contains("Recent discussion"));
    }

    #[test]
    fn test_refinement_prompt_embeds_messages() {
        let tf = TaskForceId::new("tf");
        let recent = vec![Message::new(
            tf,
            &Participant::new("b2", "Operator"),
            "Kafka is overkill here",
            1,
        )];
        let prompt = PromptTemplate::refinement_prompt(
            &config(),
            &Participant::new("a1", "Architect"),
            2,
            &recent,
        );
        assert!(prompt.contains("round 2"));
        assert!(prompt.contains("--- Operator (round 1) ---"));
        assert!(prompt.contains("Kafka is overkill here"));
    }

    #[test]
    fn test_consensus_and_synthesis_headers() {
        assert!(PromptTemplate::consensus_prompt("p", &[]).starts_with(CONSENSUS_PROMPT_HEADER));
        assert!(
            PromptTemplate::synthesis_prompt(&config(), &[]).starts_with(SYNTHESIS_PROMPT_HEADER)
        );
    }
}
