//! User account models for the Identity Toolkit API.

use serde::{Deserialize, Serialize};

/// One user account as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "localId")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_user_info: Vec<ProviderUserInfo>,
    /// Creation timestamp, epoch milliseconds as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last sign-in timestamp, epoch milliseconds as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

/// One federated identity linked to a user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUserInfo {
    pub provider_id: String,
    #[serde(rename = "rawId")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Wire shape of one account listing response (input only)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DownloadAccountResponse {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One page of the user listing
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    /// Cursor for the next page; `None` once the listing is exhausted
    pub next_page_token: Option<String>,
}

impl UserPage {
    pub(crate) fn from_wire(response: DownloadAccountResponse) -> Self {
        Self {
            users: response.users,
            // The backend reports exhaustion as an absent or empty token
            next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_token.is_some()
    }
}
