//! Audit Log Port (Driven Port)
//!
//! Interface for recording the outcome of every price request.

use async_trait::async_trait;

/// Audit log error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuditLogError {
    /// The record could not be written.
    #[error("Audit log write failed: {message}")]
    WriteFailed {
        /// Error details.
        message: String,
    },
}

/// Port for the append-only audit log.
#[async_trait]
pub trait AuditLogPort: Send + Sync {
    /// Append one event line.
    async fn record(&self, event: &str) -> Result<(), AuditLogError>;
}

/// Audit log that discards every event.
#[derive(Debug, Clone, Default)]
pub struct NoOpAuditLog;

#[async_trait]
impl AuditLogPort for NoOpAuditLog {
    async fn record(&self, _event: &str) -> Result<(), AuditLogError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_op_audit_log_succeeds() {
        let log = NoOpAuditLog;
        assert!(log.record("Returned cached price for BTCUSDT: 1").await.is_ok());
    }
}
