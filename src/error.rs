//! Error types for taskboard.
//!
//! Exit codes:
//! - 0: Success (process default)
//! - 2: User error (bad args, unknown id, rejected write)
//! - 4: Operation failed (storage unreachable, corrupt data)

use thiserror::Error;

use crate::record::{CATEGORIES, TASKS};

/// Exit codes for the `tb` CLI.
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for store, backend and CLI operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage unavailable: {0}")]
    Transport(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// A missing record in `collection`, named by the kind it holds.
    pub fn not_found(collection: &str, id: u64) -> Self {
        let kind = match collection {
            TASKS => "Task",
            CATEGORIES => "Category",
            _ => "Record",
        };
        Error::NotFound { kind, id }
    }

    /// Wrap an I/O failure from a backing store.
    pub fn transport(context: &str, err: std::io::Error) -> Self {
        Error::Transport(format!("{context}: {err}"))
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotFound { .. }
            | Error::Validation(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::TomlParse(_) => exit_codes::USER_ERROR,

            Error::Transport(_) | Error::Json(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for taskboard operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_kind() {
        assert_eq!(Error::not_found(TASKS, 7).to_string(), "Task 7 not found");
        assert_eq!(Error::not_found(CATEGORIES, 3).to_string(), "Category 3 not found");
    }

    #[test]
    fn exit_codes_split_user_and_storage_failures() {
        assert_eq!(Error::not_found(TASKS, 1).exit_code(), exit_codes::USER_ERROR);
        assert_eq!(Error::Validation("x".into()).exit_code(), exit_codes::USER_ERROR);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            Error::transport("write", io).exit_code(),
            exit_codes::OPERATION_FAILED
        );
    }
}
