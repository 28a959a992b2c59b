//! Reasoning oracle adapters.
//!
//! [`CommandOracle`] consults an external program: the prompt goes to its
//! stdin and the answer is read back from its stdout.

mod command;

pub use command::CommandOracle;
