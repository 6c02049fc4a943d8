//! Error types for the Axobase core.
//!
//! Fatal conditions are [`AxobaseError`]; non-fatal expression diagnostics
//! are [`ExpressionWarning`] values attached to the expression result
//! rather than raised.

use crate::gene::GeneId;
use thiserror::Error;

/// Result type for Axobase operations.
pub type Result<T> = std::result::Result<T, AxobaseError>;

/// Errors that can occur inside the evolutionary core.
#[derive(Debug, Clone, Error)]
pub enum AxobaseError {
    /// A structural invariant was broken. Unreachable outside bugs;
    /// terminates the current tick.
    #[error("genome invariant violated: {0}")]
    InvariantViolated(String),

    /// A serialized genome record carries an unsupported major version.
    #[error("incompatible genome record: expected version {expected}, found {found}")]
    IncompatibleGenome { expected: u32, found: u32 },

    /// Breeding refused because the partners are too closely related.
    #[error("inbreeding rejected: {0}")]
    Inbreeding(String),

    /// An inbound port failed; carries the port identity.
    #[error("port '{port}' failed: {reason}")]
    PortFailure { port: &'static str, reason: String },

    /// The decision engine was invoked before the minimum interval elapsed.
    #[error("decision rate limited: retry in {wait_ms} ms")]
    RateLimited { wait_ms: u64 },

    /// Encoding or decoding failed below the version check.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AxobaseError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        AxobaseError::InvariantViolated(msg.into())
    }

    pub fn port(port: &'static str, reason: impl Into<String>) -> Self {
        AxobaseError::PortFailure {
            port,
            reason: reason.into(),
        }
    }
}

/// Non-fatal diagnostics produced during expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionWarning {
    /// The regulatory fixed point exited by iteration cap rather than
    /// convergence.
    Convergence { iterations: u32, residual: f64 },
    /// An activation condition failed to parse; the gene was treated as
    /// active for this call.
    InvalidCondition { gene: GeneId, condition: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let e = AxobaseError::port("wallet", "connection refused");
        assert!(e.to_string().contains("wallet"));
        let e = AxobaseError::IncompatibleGenome {
            expected: 2,
            found: 3,
        };
        assert!(e.to_string().contains("found 3"));
    }
}
