//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Storage operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A persisted event row failed validation.
    #[error("Malformed {domain} event {event_id}: {reason}")]
    MalformedEvent {
        domain: &'static str,
        event_id: String,
        reason: String,
    },
}

impl RepoError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn malformed(domain: &'static str, event_id: impl ToString, reason: impl ToString) -> Self {
        Self::MalformedEvent {
            domain,
            event_id: event_id.to_string(),
            reason: reason.to_string(),
        }
    }
}
