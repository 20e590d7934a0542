//! HTTP-to-typed-error classification.
//!
//! Two stages, composed rather than subclassed: [`classify_status`] derives a
//! coarse kind from the raw HTTP status, and [`classify_response`] overlays
//! the structured `{"error": {"status", "message"}}` platform envelope when
//! the body carries one. A body that fails to decode never masks the
//! underlying HTTP error.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, FirebaseError>;

/// Coarse classification of a failed Firebase API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    Unauthenticated,
    PermissionDenied,
    NotFound,
    Conflict,
    ResourceExhausted,
    Internal,
    Unavailable,
    Unknown,
}

impl ErrorKind {
    /// Maps a raw HTTP status code to its kind.
    ///
    /// Every status maps to exactly one kind; statuses outside the table map
    /// to `Unknown`.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidArgument,
            401 => ErrorKind::Unauthenticated,
            403 => ErrorKind::PermissionDenied,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::ResourceExhausted,
            500 => ErrorKind::Internal,
            503 => ErrorKind::Unavailable,
            _ => ErrorKind::Unknown,
        }
    }

    /// Maps a platform-reported status string to its kind.
    ///
    /// Only the recognized subset overrides the status-derived kind; anything
    /// else returns `None` and the caller keeps the coarser classification.
    pub fn from_platform_status(status: &str) -> Option<Self> {
        match status {
            "INVALID_ARGUMENT" => Some(ErrorKind::InvalidArgument),
            "INTERNAL" => Some(ErrorKind::Internal),
            "PERMISSION_DENIED" => Some(ErrorKind::PermissionDenied),
            "UNAUTHENTICATED" => Some(ErrorKind::Unauthenticated),
            "UNAVAILABLE" => Some(ErrorKind::Unavailable),
            _ => None,
        }
    }

    /// Whether a caller-side retry can plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unavailable | ErrorKind::ResourceExhausted | ErrorKind::Internal
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid-argument",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::ResourceExhausted => "resource-exhausted",
            ErrorKind::Internal => "internal",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one failed HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

/// Status-derived classification refined by the platform error envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    pub info: ErrorInfo,
    /// Raw platform status string, when the body carried one
    pub status: Option<String>,
}

/// Wire shape of the structured platform error envelope (input only)
#[derive(Debug, Deserialize)]
struct PlatformErrorBody {
    #[serde(default)]
    error: Option<PlatformErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct PlatformErrorDetail {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Builds the generic status-derived classification.
///
/// Never invoked for 2xx responses; success short-circuits before any error
/// path runs.
pub fn classify_status(status: u16, body: &str) -> ErrorInfo {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown");
    ErrorInfo {
        kind: ErrorKind::from_status(status),
        message: format!(
            "Unexpected HTTP response with status: {status} ({reason})\n{body}"
        ),
    }
}

/// Classifies a non-success response, overlaying the structured platform
/// error envelope when the body carries one.
///
/// A malformed or non-JSON body degrades silently to [`classify_status`]'s
/// result. An unrecognized status string keeps the status-derived kind; an
/// empty or absent structured message keeps the generic message.
pub fn classify_response(status: u16, body: &str) -> PlatformError {
    let generic = classify_status(status, body);

    let detail = match serde_json::from_str::<PlatformErrorBody>(body) {
        Ok(envelope) => envelope.error,
        Err(_) => None,
    };
    let detail = match detail {
        Some(detail) => detail,
        None => {
            return PlatformError {
                info: generic,
                status: None,
            }
        }
    };

    let kind = detail
        .status
        .as_deref()
        .and_then(ErrorKind::from_platform_status)
        .unwrap_or(generic.kind);
    let message = match detail.message {
        Some(message) if !message.is_empty() => message,
        _ => generic.message,
    };

    PlatformError {
        info: ErrorInfo { kind, message },
        status: detail.status,
    }
}

/// Error type for Firebase API operations outside Cloud Messaging
#[derive(Debug, Clone, Error)]
pub enum FirebaseError {
    /// The backend answered with a non-success HTTP status
    #[error("{message}")]
    Api { kind: ErrorKind, message: String },

    /// The exchange could not be completed at all
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl FirebaseError {
    /// Builds the classified failure for a non-success response
    pub fn from_response(status: u16, body: &str) -> Self {
        let classified = classify_response(status, body);
        FirebaseError::Api {
            kind: classified.info.kind,
            message: classified.info.message,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        FirebaseError::Api {
            kind: ErrorKind::InvalidArgument,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        FirebaseError::Api {
            kind: ErrorKind::Internal,
            message: message.into(),
        }
    }

    /// Stable coarse kind for programmatic branching
    pub fn kind(&self) -> ErrorKind {
        match self {
            FirebaseError::Api { kind, .. } => *kind,
            FirebaseError::Transport(_) => ErrorKind::Unknown,
        }
    }
}
