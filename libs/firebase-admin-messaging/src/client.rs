//! Cloud Messaging client.

use tracing::{debug, warn};

use firebase_admin_core::{ApiRequest, DynTransport};

use crate::batch;
use crate::errors::{MessagingError, Result};
use crate::models::{BatchResponse, Message, SendOutcome, SendRequest, SendResponseBody};

/// Production FCM endpoint
const FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

/// The batch endpoint accepts at most this many messages per call
pub const MAX_BATCH_MESSAGES: usize = 100;

/// Firebase Cloud Messaging client.
///
/// Sends messages for one Firebase project through an authorized transport.
/// The client carries no per-call state and is safe for concurrent use.
pub struct MessagingClient {
    project_id: String,
    endpoint: String,
    transport: DynTransport,
}

impl MessagingClient {
    /// Create a client for the given project
    pub fn new(project_id: impl Into<String>, transport: DynTransport) -> Self {
        Self {
            project_id: project_id.into(),
            endpoint: FCM_ENDPOINT.to_string(),
            transport,
        }
    }

    /// Point the client at a different endpoint (emulator, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn send_path(&self) -> String {
        format!("/v1/projects/{}/messages:send", self.project_id)
    }

    fn send_url(&self) -> String {
        format!("{}{}", self.endpoint, self.send_path())
    }

    fn batch_url(&self) -> String {
        format!("{}/batch", self.endpoint)
    }

    /// Send one message.
    ///
    /// Returns the opaque message id (`projects/*/messages/*`) on success;
    /// any failure is the whole call's failure.
    pub async fn send(&self, message: &Message) -> Result<String> {
        self.send_message(message, false).await
    }

    /// Validate one message against the backend without delivering it
    pub async fn send_dry_run(&self, message: &Message) -> Result<String> {
        self.send_message(message, true).await
    }

    async fn send_message(&self, message: &Message, dry_run: bool) -> Result<String> {
        let envelope = SendRequest {
            message: message.clone(),
            validate_only: dry_run,
        };
        let payload = serde_json::to_vec(&envelope).map_err(|e| {
            MessagingError::internal(format!("failed to encode send request: {e}"))
        })?;

        debug!(
            "sending message to FCM project {} (dry_run={})",
            self.project_id, dry_run
        );
        let response = self
            .transport
            .execute(ApiRequest::post_json(self.send_url(), payload))
            .await?;

        if !response.is_success() {
            let error = MessagingError::from_response(response.status, &response.body_text());
            warn!("FCM send failed: {}", error);
            return Err(error);
        }

        match serde_json::from_slice::<SendResponseBody>(&response.body) {
            Ok(body) => Ok(body.name),
            Err(e) => Err(MessagingError::internal(format!(
                "failed to parse FCM response: {e}"
            ))),
        }
    }

    /// Send a batch of messages over one multipart HTTP call.
    ///
    /// Produces exactly one outcome per input message, in input order. One
    /// message's rejection never affects its siblings and is captured as
    /// data; the call as a whole fails only when the transport cannot
    /// complete the exchange or the outer response is unusable, in which
    /// case no partial result is returned.
    pub async fn send_all(&self, messages: &[Message], dry_run: bool) -> Result<BatchResponse> {
        if messages.is_empty() {
            return Ok(BatchResponse::new(Vec::new()));
        }
        if messages.len() > MAX_BATCH_MESSAGES {
            return Err(MessagingError::invalid_argument(format!(
                "batch may contain at most {MAX_BATCH_MESSAGES} messages, got {}",
                messages.len()
            )));
        }

        let envelopes: Vec<SendRequest> = messages
            .iter()
            .map(|message| SendRequest {
                message: message.clone(),
                validate_only: dry_run,
            })
            .collect();
        let encoded = batch::encode_batch(&self.send_path(), &envelopes).map_err(|e| {
            MessagingError::internal(format!("failed to encode batch request: {e}"))
        })?;

        debug!(
            "dispatching batch of {} messages to FCM project {} (dry_run={})",
            messages.len(),
            self.project_id,
            dry_run
        );
        let response = self
            .transport
            .execute(ApiRequest::post(
                self.batch_url(),
                encoded.content_type,
                encoded.body,
            ))
            .await?;

        if !response.is_success() {
            // The outer call itself was rejected; no per-message outcomes exist
            let error = MessagingError::from_response(response.status, &response.body_text());
            warn!("FCM batch send failed: {}", error);
            return Err(error);
        }

        let boundary = response
            .content_type
            .as_deref()
            .and_then(batch::boundary_from_content_type)
            .ok_or_else(|| {
                MessagingError::internal("batch response is missing a multipart boundary")
            })?;

        let parts = batch::decode_batch(&boundary, &response.body_text());

        // Each sub-response claims an input slot via its Content-ID (falling
        // back to wire position); the ordered outcome list is assembled from
        // the slots, never by appending in arrival order.
        let mut slots: Vec<Option<SendOutcome>> = vec![None; messages.len()];
        for (position, part) in parts.into_iter().enumerate() {
            let slot = part.content_id.unwrap_or(position);
            if slot >= slots.len() || slots[slot].is_some() {
                continue;
            }
            slots[slot] = Some(outcome_for(&part));
        }

        let responses: Vec<SendOutcome> = slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    SendOutcome::Failed(MessagingError::internal(
                        "batch sub-response was missing or malformed",
                    ))
                })
            })
            .collect();

        let result = BatchResponse::new(responses);
        if result.failure_count > 0 {
            warn!(
                "FCM batch completed with {} failures out of {}",
                result.failure_count,
                result.responses.len()
            );
        }
        Ok(result)
    }
}

/// Three-way split per sub-response: decodable success, classified API
/// failure, or an unclassified internal failure referencing the raw status
fn outcome_for(part: &batch::SubResponse) -> SendOutcome {
    if (200..300).contains(&part.status) {
        match serde_json::from_str::<SendResponseBody>(&part.body) {
            Ok(body) => SendOutcome::Sent {
                message_id: body.name,
            },
            Err(_) => SendOutcome::Failed(MessagingError::internal(format!(
                "unexpected batch sub-response with status: {}\n{}",
                part.status, part.body
            ))),
        }
    } else {
        SendOutcome::Failed(MessagingError::from_response(part.status, &part.body))
    }
}
