use thiserror::Error;

/// Raised for any structural or semantic problem in the configuration file.
///
/// Always fatal: the server never starts with a partially valid
/// configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid configuration at line {line}: {reason}")]
pub struct ConfigError {
    /// 1-based line in the configuration file.
    pub line: usize,
    pub reason: String,
}

impl ConfigError {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}
