//! File Audit Log Adapter
//!
//! Implements `AuditLogPort` as an append-only text file with one line per
//! event:
//!
//! ```text
//! [2024-05-01 12:00:00] Requested price for ETHUSDT from Binance: 3500.12
//! ```
//!
//! The file is opened, appended, and closed on every event. No handle is
//! kept and no lock is taken; concurrent writers rely on `O_APPEND`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{AuditLogError, AuditLogPort};

/// Default audit log location, relative to the working directory.
pub const DEFAULT_AUDIT_LOG_PATH: &str = "crypto_requests.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only audit log file.
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    /// Create an audit log writing to `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditLogPort for FileAuditLog {
    async fn record(&self, event: &str) -> Result<(), AuditLogError> {
        let line = format_line(&Local::now(), event);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| write_failed(&self.path, &e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| write_failed(&self.path, &e))?;
        file.flush()
            .await
            .map_err(|e| write_failed(&self.path, &e))?;

        Ok(())
    }
}

fn format_line<Tz>(at: &DateTime<Tz>, event: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("[{}] {event}\n", at.format(TIMESTAMP_FORMAT))
}

fn write_failed(path: &Path, e: &std::io::Error) -> AuditLogError {
    AuditLogError::WriteFailed {
        message: format!("{}: {e}", path.display()),
    }
}
