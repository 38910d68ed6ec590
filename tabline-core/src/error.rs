//! Error types for the tabline core.
//!
//! Uses `thiserror` for public API error types. Resolution failures are not
//! errors: a line that matches no command is a normal outcome reported by the
//! console as text. The variants here cover the two places that can fail:
//! command callbacks interpreting their own arguments, and configuration.

/// Errors a command callback raises while interpreting its arguments.
///
/// Caught at the dispatch boundary and turned into a fixed user-visible
/// message; the details never leave the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("argument out of range")]
    OutOfRange,

    #[error("invalid argument")]
    Invalid,
}

impl ArgumentError {
    /// The message shown in the output log when dispatch catches this error.
    pub fn user_message(&self) -> String {
        format!("error: {self}")
    }
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}
