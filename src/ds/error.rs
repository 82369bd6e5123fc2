use std::fmt;

use thiserror::Error;

/// Which way an accessor moves a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Read,
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => write!(f, "getter"),
            Direction::Write => write!(f, "setter"),
        }
    }
}

/// Failure reported by a getter or setter while it runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvocationError {
    #[error("expected {expected} argument, got {actual}")]
    ArgumentType { expected: String, actual: String },
    #[error("receiver is not a {expected}")]
    ReceiverMismatch { expected: String },
    #[error("{0}")]
    Failed(String),
}

/// Errors surfaced by property services.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// No map key, method or field answers to the property.
    #[error("no matching {direction} found for property '{property}' on {type_name}")]
    NotFound {
        type_name: String,
        property: String,
        direction: Direction,
    },
    /// An accessor was resolved but failed when called.
    #[error("{type_name}.{property}: accessor invocation failed: {source}")]
    Invocation {
        type_name: String,
        property: String,
        #[source]
        source: InvocationError,
    },
    #[error("invalid property path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl PropertyError {
    pub fn not_found(type_name: impl Into<String>, property: &str, direction: Direction) -> Self {
        PropertyError::NotFound {
            type_name: type_name.into(),
            property: property.to_string(),
            direction,
        }
    }

    pub fn invocation(
        type_name: impl Into<String>,
        property: &str,
        source: InvocationError,
    ) -> Self {
        PropertyError::Invocation {
            type_name: type_name.into(),
            property: property.to_string(),
            source,
        }
    }

    pub fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        PropertyError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PropertyError::NotFound { .. })
    }
}
