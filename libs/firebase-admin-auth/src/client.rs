//! Auth client.

use tracing::{debug, warn};

use firebase_admin_core::error::Result;
use firebase_admin_core::{ApiRequest, DynTransport, FirebaseError};

use crate::models::{DownloadAccountResponse, UserPage};

/// Production Identity Toolkit endpoint
const IDENTITY_TOOLKIT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";

/// The listing endpoint returns at most this many accounts per page
pub const MAX_LIST_USERS_RESULTS: u32 = 1000;

/// Firebase Auth client.
///
/// Lists user accounts for one Firebase project through an authorized
/// transport. The client carries no per-call state and is safe for
/// concurrent use.
pub struct AuthClient {
    project_id: String,
    endpoint: String,
    transport: DynTransport,
}

impl AuthClient {
    /// Create a client for the given project
    pub fn new(project_id: impl Into<String>, transport: DynTransport) -> Self {
        Self {
            project_id: project_id.into(),
            endpoint: IDENTITY_TOOLKIT_ENDPOINT.to_string(),
            transport,
        }
    }

    /// Point the client at a different endpoint (emulator, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Fetch one page of user accounts.
    ///
    /// `max_results` defaults to the backend maximum of 1000. Pass the
    /// `next_page_token` of the previous page to continue the listing; a
    /// returned page without a token means the listing is exhausted.
    pub async fn list_users(
        &self,
        max_results: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<UserPage> {
        let max_results = max_results.unwrap_or(MAX_LIST_USERS_RESULTS);
        if max_results == 0 || max_results > MAX_LIST_USERS_RESULTS {
            return Err(FirebaseError::invalid_argument(format!(
                "max_results must be between 1 and {MAX_LIST_USERS_RESULTS}, got {max_results}"
            )));
        }

        let mut url = format!(
            "{}/v1/projects/{}/accounts:batchGet?maxResults={}",
            self.endpoint, self.project_id, max_results
        );
        if let Some(token) = page_token {
            if token.is_empty() {
                return Err(FirebaseError::invalid_argument(
                    "page_token must not be empty",
                ));
            }
            url.push_str(&format!("&nextPageToken={}", urlencoding::encode(token)));
        }

        debug!("listing users for project {}", self.project_id);
        let response = self.transport.execute(ApiRequest::get(url)).await?;

        if !response.is_success() {
            let error = FirebaseError::from_response(response.status, &response.body_text());
            warn!("user listing failed: {}", error);
            return Err(error);
        }

        match serde_json::from_slice::<DownloadAccountResponse>(&response.body) {
            Ok(page) => Ok(UserPage::from_wire(page)),
            Err(e) => Err(FirebaseError::internal(format!(
                "failed to parse account listing response: {e}"
            ))),
        }
    }
}
