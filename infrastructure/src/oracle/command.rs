//! External-process oracle adapter
//!
//! Each consultation spawns the configured program once. Generation options
//! travel as environment variables so any script or wrapper around a model
//! API can act as the oracle:
//!
//! | Variable                 | Value                        |
//! |--------------------------|------------------------------|
//! | `TASKFORCE_TEMPERATURE`  | sampling temperature         |
//! | `TASKFORCE_MAX_TOKENS`   | response length cap          |
//! | `TASKFORCE_TIER`         | `fast`, `standard`, `advanced` |
//!
//! No shell is involved: `program` is executed directly with `args`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use taskforce_application::ports::oracle::{ConsultOptions, OracleError, ReasoningOracle};
use taskforce_domain::preview;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Oracle backed by an external command
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
    /// No limit unless configured
    timeout: Option<Duration>,
}

impl CommandOracle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn run(&self, prompt: &str, options: &ConsultOptions) -> Result<String, OracleError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("TASKFORCE_TEMPERATURE", options.temperature.to_string())
            .env("TASKFORCE_MAX_TOKENS", options.max_tokens.to_string())
            .env("TASKFORCE_TIER", options.tier.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                OracleError::Unavailable(format!("failed to spawn '{}': {}", self.program, e))
            })?;

        // Feed stdin while stdout and stderr drain, so a prompt larger than
        // the pipe buffer cannot stall against a child that writes as it reads
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(prompt.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|e| {
            OracleError::Unavailable(format!("failed to wait for '{}': {}", self.program, e))
        })?;
        match written {
            Ok(()) => {}
            // The program may answer without reading its input
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
            Err(e) => {
                return Err(OracleError::Unavailable(format!(
                    "failed to write prompt to '{}': {}",
                    self.program, e
                )));
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OracleError::Unavailable(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                preview(&stderr, 200)
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(
            program = %self.program,
            tier = options.tier.as_str(),
            "Oracle answered with {} bytes",
            text.len()
        );
        Ok(text)
    }
}

#[async_trait]
impl ReasoningOracle for CommandOracle {
    async fn consult(&self, prompt: &str, options: &ConsultOptions) -> Result<String, OracleError> {
        let Some(limit) = self.timeout else {
            return self.run(prompt, options).await;
        };
        match tokio::time::timeout(limit, self.run(prompt, options)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    program = %self.program,
                    "Oracle did not answer within {:?}",
                    limit
                );
                Err(OracleError::Timeout)
            }
        }
    }
}
