//! Core type definitions for the basis object model.
//!
//! This crate defines the leaf types shared by every container flavour:
//! - [`Error`] and [`Result`] — the single error taxonomy of the model
//! - [`Key`] — scalar offsets used by ordered collections
//! - [`Operation`] — the access kind an access table is consulted for
//!
//! The containers themselves live in `basis-model`.

mod key;

pub use key::Key;

use std::fmt;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of access being checked against a class's access tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
    Call,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Read => "readable",
            Self::Write => "writable",
            Self::Call => "callable",
        };
        f.write_str(s)
    }
}

/// Errors raised by container, entity and collection operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The name is not present in the access table for this operation.
    #[error("property `{name}` does not exist or is not {operation} on `{class}`")]
    AccessDenied {
        class: &'static str,
        operation: Operation,
        name: String,
    },

    /// A configuration or programming defect, not a runtime condition.
    #[error("logic error: {0}")]
    Logic(String),

    /// Caller-supplied input was rejected before any mutation happened.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    #[must_use]
    pub fn is_logic(&self) -> bool {
        matches!(self, Self::Logic(_))
    }

    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
