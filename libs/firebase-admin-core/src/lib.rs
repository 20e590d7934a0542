//! Firebase Admin Core Library
//!
//! Shared plumbing for the Firebase Admin SDK crates.
//!
//! It provides:
//! - The authorized-transport seam that the per-API clients send requests
//!   through (credential handling stays on the transport side)
//! - Classification of non-success HTTP responses into a closed set of
//!   error kinds, including the structured platform error envelope
//! - The common error type shared by the non-messaging API clients

pub mod error;
pub mod transport;

pub use error::{
    classify_response, classify_status, ErrorInfo, ErrorKind, FirebaseError, PlatformError,
};
pub use transport::{
    ApiRequest, ApiResponse, AuthorizedTransport, DynTransport, HttpTransport, Method,
    TransportError,
};
