//! Error taxonomy for the dispatcher boundary.

use crate::coordinator::ResourceState;
use crate::platform::PlatformError;
use crate::screens::ScreenLookupError;
use thiserror::Error;

/// Kind of name that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    MouseButton,
    Key,
    KeyFlag,
    ToggleState,
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IdentifierKind::MouseButton => "mouse button",
            IdentifierKind::Key => "key",
            IdentifierKind::KeyFlag => "key flag",
            IdentifierKind::ToggleState => "toggle state",
        };
        f.write_str(name)
    }
}

/// Malformed input: wrong count, type or range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("missing argument `{0}`")]
    Missing(&'static str),
    #[error("argument `{0}` is null")]
    Null(&'static str),
    #[error("argument `{name}` must be {expected}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
    },
    #[error("argument `{name}` out of range: {value}")]
    OutOfRange { name: &'static str, value: String },
    #[error("argument `{name}` is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Errors surfaced to callers of the dispatcher.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error("unrecognized {kind}: {name:?}")]
    Unrecognized { kind: IdentifierKind, name: String },
    #[error("native resources unavailable (state {0:?})")]
    ResourceUnavailable(ResourceState),
    #[error("platform call failed: {0}")]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Screen(#[from] ScreenLookupError),
}

impl Error {
    pub(crate) fn unrecognized(kind: IdentifierKind, name: impl Into<String>) -> Self {
        Error::Unrecognized {
            kind,
            name: name.into(),
        }
    }

    /// True for typos in otherwise well-formed input.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Error::Unrecognized { .. })
    }

    /// True for malformed arguments (missing, null, wrong type, out of range).
    pub fn is_argument(&self) -> bool {
        matches!(self, Error::Argument(_))
    }
}

/// Result type for dispatcher operations.
pub type Result<T> = std::result::Result<T, Error>;
