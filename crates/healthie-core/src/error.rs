//! Error types for the planner library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Day, SlotKind};

/// Comprehensive error type for all planner operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A caller supplied an option index outside the slot's option list
    #[error("Option {index} is out of range for {slot} on {day} ({len} options)")]
    InvalidSelection {
        day: Day,
        slot: SlotKind,
        index: usize,
        len: usize,
    },
    /// A chat request is already outstanding
    #[error("A conversation request is already in flight")]
    RequestOutstanding,
    /// A rationale regeneration is already running for the day
    #[error("Rationale for {day} is already being regenerated")]
    RationaleInFlight { day: Day },
    /// Empty or whitespace-only chat input
    #[error("Message text must not be empty")]
    EmptyMessage,
    /// The referenced chat message carries no pending proposal
    #[error("Message {index} has no pending plan proposal")]
    NoProposal { index: usize },
    /// No plan has been generated or restored yet
    #[error("No active plan; generate or restore one first")]
    NoActivePlan,
    /// The generative service could not produce a plan
    #[error("Plan generation failed: {message}")]
    Generation { message: String },
    /// Persistent store read/write errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating storage errors with optional context.
pub struct StorageErrorBuilder {
    message: String,
}

impl StorageErrorBuilder {
    /// Create a new storage error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> PlannerError {
        PlannerError::Storage {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// Creates a builder for storage errors.
    pub fn storage(message: impl Into<String>) -> StorageErrorBuilder {
        StorageErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a `spawn_blocking` join failure.
    pub(crate) fn join(err: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {err}"),
        }
    }

    /// Whether the error belongs to the single-flight class: the caller
    /// should wait for the running operation instead of retrying at once.
    pub fn is_single_flight(&self) -> bool {
        matches!(
            self,
            Self::RequestOutstanding | Self::RationaleInFlight { .. }
        )
    }
}

/// Specialized extension trait for storage-related Results.
pub trait StorageResultExt<T> {
    /// Map storage errors with a message.
    fn storage_context(self, message: &str) -> Result<T>;
}

impl<T> StorageResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn storage_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::storage(message).with_source(e))
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;
