//! Append-only register of client-submitted log entries.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logbook_core::Username;

/// One submitted log line, stamped with its author.
///
/// Serialized as `{"timestamp", "message", "level", "user"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub level: String,
    #[serde(rename = "user")]
    pub username: Username,
}

impl LogEntry {
    pub fn new(
        username: Username,
        message: impl Into<String>,
        level: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            message: message.into(),
            level: level.into(),
            username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogRegisterError {
    /// Nothing has been appended yet. Not a failure of the register.
    #[error("no log entries")]
    Empty,
}

/// Log register abstraction.
///
/// Entries are kept in insertion order and never modified or removed.
pub trait LogRegister: Send + Sync {
    fn append(&self, entry: LogEntry) -> LogEntry;

    /// All entries, oldest first, or `Empty` when there are none.
    fn list_all(&self) -> Result<Vec<LogEntry>, LogRegisterError>;
}

impl<S> LogRegister for Arc<S>
where
    S: LogRegister + ?Sized,
{
    fn append(&self, entry: LogEntry) -> LogEntry {
        (**self).append(entry)
    }

    fn list_all(&self) -> Result<Vec<LogEntry>, LogRegisterError> {
        (**self).list_all()
    }
}

/// In-memory log register for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryLogRegister {
    // A writer that panicked can only have pushed a complete entry or nothing,
    // so a poisoned lock is still consistent and is recovered.
    entries: RwLock<Vec<LogEntry>>,
}

impl InMemoryLogRegister {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogRegister for InMemoryLogRegister {
    fn append(&self, entry: LogEntry) -> LogEntry {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push(entry.clone());
        entry
    }

    fn list_all(&self) -> Result<Vec<LogEntry>, LogRegisterError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        if entries.is_empty() {
            return Err(LogRegisterError::Empty);
        }
        Ok(entries.clone())
    }
}
