//! Error types for artifact decoding and reconciliation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("malformed gating decision: {0}")]
    MalformedDecision(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for domain operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_decision_display() {
        let err = ReconcileError::MalformedDecision("policies_satisfied is not a boolean".into());
        let msg = err.to_string();
        assert!(msg.contains("malformed gating decision"));
        assert!(msg.contains("policies_satisfied"));
    }

    #[test]
    fn test_serialization_error_from() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ReconcileError = parse_err.into();
        assert!(err.to_string().starts_with("serialization error"));
    }
}
