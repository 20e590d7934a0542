//! Firebase Cloud Messaging Library
//!
//! Server-side client for the FCM v1 send API.
//!
//! It handles:
//! - Single message send and dry-run validation
//! - Batched dispatch of up to 100 messages over one multipart HTTP call,
//!   with per-message success/failure outcomes in input order
//! - Classification of API failures into stable error kinds plus the
//!   messaging-specific sub-codes reported by the backend

mod batch;

pub mod client;
pub mod errors;
pub mod models;

pub use client::{MessagingClient, MAX_BATCH_MESSAGES};
pub use errors::{MessagingError, MessagingErrorCode};
pub use models::{BatchResponse, Message, Notification, SendOutcome};
