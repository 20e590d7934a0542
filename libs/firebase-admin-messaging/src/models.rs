//! Message and result models for the FCM v1 send API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::MessagingError;

/// A Cloud Messaging message.
///
/// Targets exactly one of `token`, `topic` or `condition`; the backend
/// rejects anything else. Platform-specific overrides (`android`, `webpush`,
/// `apns`) are carried as opaque JSON values and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webpush: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apns: Option<serde_json::Value>,
}

impl Message {
    /// Message addressed to a single device registration token
    pub fn to_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Message addressed to a topic
    pub fn to_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Self::default()
        }
    }

    /// Message addressed by a topic condition expression
    pub fn to_condition(condition: impl Into<String>) -> Self {
        Self {
            condition: Some(condition.into()),
            ..Self::default()
        }
    }

    /// Attach a display notification
    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }

    /// Attach custom key-value data
    pub fn with_data(mut self, data: HashMap<String, String>) -> Self {
        self.data = Some(data);
        self
    }
}

/// Display notification payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            image: None,
        }
    }
}

/// Wire envelope for one send call.
///
/// `validate_only` is omitted on the wire when false and defaulted on
/// decode, per the v1 API contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendRequest {
    pub message: Message,
    #[serde(default, skip_serializing_if = "is_false")]
    pub validate_only: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Wire shape of a successful send response
#[derive(Debug, Deserialize)]
pub(crate) struct SendResponseBody {
    /// Opaque message id, `projects/*/messages/*`
    pub name: String,
}

/// Outcome of one message within a batch dispatch
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// The message was accepted; carries the opaque message id
    Sent { message_id: String },
    /// The message was rejected; carries the classified failure
    Failed(MessagingError),
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }

    pub fn message_id(&self) -> Option<&str> {
        match self {
            SendOutcome::Sent { message_id } => Some(message_id),
            SendOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&MessagingError> {
        match self {
            SendOutcome::Sent { .. } => None,
            SendOutcome::Failed(error) => Some(error),
        }
    }
}

/// Result of a batch dispatch: one outcome per input message, input order
#[derive(Debug, Clone)]
pub struct BatchResponse {
    pub responses: Vec<SendOutcome>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl BatchResponse {
    pub(crate) fn new(responses: Vec<SendOutcome>) -> Self {
        let success_count = responses.iter().filter(|r| r.is_success()).count();
        let failure_count = responses.len() - success_count;
        Self {
            responses,
            success_count,
            failure_count,
        }
    }
}
