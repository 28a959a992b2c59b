//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string::preview`]: UTF-8 safe previews for log lines

pub mod error;
pub mod string;
