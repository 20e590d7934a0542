//! Firebase Auth Library
//!
//! Server-side client for the Identity Toolkit account listing API.
//!
//! It handles:
//! - Paged user listing with an opaque page-token cursor
//! - Decoding of the account listing wire shapes into user records
//! - Classification of API failures through the shared error layer

pub mod client;
pub mod models;

pub use client::{AuthClient, MAX_LIST_USERS_RESULTS};
pub use models::{ProviderUserInfo, UserPage, UserRecord};
