//! Error types for asg.

use thiserror::Error;

/// Errors produced by the guard and its CLI.
#[derive(Debug, Error)]
pub enum AsgError {
    /// Invalid or unusable configuration. Fatal at guard initialization:
    /// the guard refuses to start rather than run without its safety net.
    #[error("configuration error: {0}")]
    Config(String),

    /// Required configuration is absent entirely.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// I/O failure during a quarantine or audit write. Surfaced to the
    /// caller as a failure of the enclosing operation, never swallowed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The audit log contains a line that is not a valid entry.
    #[error("corrupt audit entry at line {line}: {message}")]
    CorruptAuditEntry { line: usize, message: String },

    /// A quarantine record could not be found.
    #[error("quarantine record not found: {0}")]
    QuarantineNotFound(String),
}

pub type Result<T> = std::result::Result<T, AsgError>;

impl AsgError {
    /// Stable machine-readable code for robot-mode error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::MissingConfig(_) => "missing_config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::CorruptAuditEntry { .. } => "corrupt_audit_entry",
            Self::QuarantineNotFound(_) => "quarantine_not_found",
        }
    }
}

impl From<serde_json::Error> for AsgError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
