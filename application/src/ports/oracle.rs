//! Reasoning oracle port
//!
//! Defines the interface for consulting the external text-generation service.
//! The engine treats the oracle as an opaque, stateless request/response
//! collaborator and never retries a consultation on its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during an oracle consultation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle timeout")]
    Timeout,
}

/// Capability tier requested from the oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleTier {
    /// Cheap, low-latency; used for scoring
    Fast,
    #[default]
    Standard,
    /// Most capable; used for synthesis
    Advanced,
}

impl OracleTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            OracleTier::Fast => "fast",
            OracleTier::Standard => "standard",
            OracleTier::Advanced => "advanced",
        }
    }
}

/// Per-consultation generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub tier: OracleTier,
}

impl ConsultOptions {
    pub fn new(temperature: f32, max_tokens: u32, tier: OracleTier) -> Self {
        Self {
            temperature,
            max_tokens,
            tier,
        }
    }

    /// Options for participant contributions
    pub fn contribution() -> Self {
        Self::new(0.7, 1024, OracleTier::Standard)
    }

    /// Options for consensus scoring: deterministic and tiny
    pub fn scoring() -> Self {
        Self::new(0.0, 16, OracleTier::Fast)
    }

    /// Options for the final synthesis
    pub fn synthesis() -> Self {
        Self::new(0.3, 2048, OracleTier::Advanced)
    }
}

/// Gateway to the reasoning oracle
///
/// This port defines how the application layer consults the oracle.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    /// Send a prompt and get the oracle's text response
    async fn consult(&self, prompt: &str, options: &ConsultOptions) -> Result<String, OracleError>;
}
