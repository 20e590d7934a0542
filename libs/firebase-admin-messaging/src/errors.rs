//! Messaging error types.
//!
//! Failures carry the shared coarse [`ErrorKind`] plus, when the backend
//! reports one of the FCM-specific status strings, a finer
//! [`MessagingErrorCode`]. The sub-code vocabulary is disjoint from the
//! strings the shared overlay recognizes, so a sub-code never changes the
//! coarse kind.

use std::fmt;

use thiserror::Error;

use firebase_admin_core::{classify_response, ErrorKind, TransportError};

pub type Result<T> = std::result::Result<T, MessagingError>;

/// FCM-specific error sub-codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessagingErrorCode {
    Unspecified,
    Unregistered,
    SenderIdMismatch,
    QuotaExceeded,
    ThirdPartyAuthError,
}

impl MessagingErrorCode {
    /// Maps the platform-reported status string to its sub-code.
    ///
    /// Returns `None` for anything outside the messaging vocabulary; other
    /// APIs sharing the overlay never produce a sub-code.
    pub fn from_platform_status(status: &str) -> Option<Self> {
        match status {
            "UNSPECIFIED" => Some(MessagingErrorCode::Unspecified),
            "UNREGISTERED" => Some(MessagingErrorCode::Unregistered),
            "SENDER_ID_MISMATCH" => Some(MessagingErrorCode::SenderIdMismatch),
            "QUOTA_EXCEEDED" => Some(MessagingErrorCode::QuotaExceeded),
            "THIRD_PARTY_AUTH_ERROR" => Some(MessagingErrorCode::ThirdPartyAuthError),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessagingErrorCode::Unspecified => "UNSPECIFIED",
            MessagingErrorCode::Unregistered => "UNREGISTERED",
            MessagingErrorCode::SenderIdMismatch => "SENDER_ID_MISMATCH",
            MessagingErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            MessagingErrorCode::ThirdPartyAuthError => "THIRD_PARTY_AUTH_ERROR",
        }
    }
}

impl fmt::Display for MessagingErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for Cloud Messaging operations
#[derive(Debug, Clone, Error)]
pub enum MessagingError {
    /// The backend rejected the message
    #[error("{message}")]
    Service {
        kind: ErrorKind,
        code: Option<MessagingErrorCode>,
        message: String,
    },

    /// The exchange could not be completed at all
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl MessagingError {
    /// Builds the classified failure for a non-success response, extracting
    /// the messaging sub-code when the platform status string carries one
    pub fn from_response(status: u16, body: &str) -> Self {
        let classified = classify_response(status, body);
        let code = classified
            .status
            .as_deref()
            .and_then(MessagingErrorCode::from_platform_status);
        MessagingError::Service {
            kind: classified.info.kind,
            code,
            message: classified.info.message,
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        MessagingError::Service {
            kind: ErrorKind::Internal,
            code: None,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        MessagingError::Service {
            kind: ErrorKind::InvalidArgument,
            code: None,
            message: message.into(),
        }
    }

    /// Stable coarse kind for programmatic branching
    pub fn kind(&self) -> ErrorKind {
        match self {
            MessagingError::Service { kind, .. } => *kind,
            MessagingError::Transport(_) => ErrorKind::Unknown,
        }
    }

    /// Messaging sub-code, when the backend reported one
    pub fn code(&self) -> Option<MessagingErrorCode> {
        match self {
            MessagingError::Service { code, .. } => *code,
            MessagingError::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_code_table() {
        let cases = [
            ("UNSPECIFIED", MessagingErrorCode::Unspecified),
            ("UNREGISTERED", MessagingErrorCode::Unregistered),
            ("SENDER_ID_MISMATCH", MessagingErrorCode::SenderIdMismatch),
            ("QUOTA_EXCEEDED", MessagingErrorCode::QuotaExceeded),
            (
                "THIRD_PARTY_AUTH_ERROR",
                MessagingErrorCode::ThirdPartyAuthError,
            ),
        ];
        for (status, expected) in cases {
            assert_eq!(
                MessagingErrorCode::from_platform_status(status),
                Some(expected)
            );
            assert_eq!(expected.as_str(), status);
        }
    }

    #[test]
    fn test_kind_table_strings_produce_no_sub_code() {
        for status in [
            "INVALID_ARGUMENT",
            "INTERNAL",
            "PERMISSION_DENIED",
            "UNAUTHENTICATED",
            "UNAVAILABLE",
        ] {
            assert_eq!(MessagingErrorCode::from_platform_status(status), None);
        }
    }

    #[test]
    fn test_from_response_extracts_sub_code() {
        let body = r#"{"error": {"status": "UNREGISTERED", "message": "token gone"}}"#;
        let err = MessagingError::from_response(404, body);

        // UNREGISTERED is outside the kind table, so the kind comes from the
        // HTTP status while the sub-code comes from the messaging vocabulary
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), Some(MessagingErrorCode::Unregistered));
        assert_eq!(err.to_string(), "token gone");
    }

    #[test]
    fn test_from_response_without_structured_body() {
        let err = MessagingError::from_response(429, "too many requests");
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_recognized_kind_string_has_no_sub_code() {
        let body = r#"{"error": {"status": "UNAVAILABLE", "message": "try later"}}"#;
        let err = MessagingError::from_response(503, body);
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_transport_failures_carry_no_classification() {
        let err = MessagingError::Transport(TransportError::new("connection reset"));
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.code(), None);
    }
}
