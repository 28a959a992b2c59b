//! Prompt construction for contribution, scoring and synthesis consultations.

mod template;

pub use template::{CONSENSUS_PROMPT_HEADER, PromptTemplate, SYNTHESIS_PROMPT_HEADER};
