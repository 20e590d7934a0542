//! Authorized HTTP transport seam.
//!
//! The API clients never touch credentials. They hand an [`ApiRequest`] to an
//! [`AuthorizedTransport`] implementation, which attaches its own
//! authorization and completes the exchange. [`HttpTransport`] is the default
//! reqwest-backed implementation carrying a bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// HTTP verbs used by the Firebase REST surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A single HTTP exchange handed to the transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a body-less GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            content_type: None,
            body: None,
        }
    }

    /// Create a POST request with a JSON payload
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self::post(url, "application/json; charset=UTF-8", body)
    }

    /// Create a POST request with an explicit content type
    pub fn post(url: impl Into<String>, content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            content_type: Some(content_type.into()),
            body: Some(body),
        }
    }
}

/// Response returned by the transport.
///
/// Carries the raw status and bytes only; interpretation happens in the
/// calling client.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response body as text, lossily decoded
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport-level failure: the exchange could not be completed at all.
///
/// Distinct from an API failure; a server that answered with any status,
/// even 5xx, did not produce a `TransportError`.
#[derive(Debug, Clone, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Trait for transports that attach their own authorization
#[async_trait]
pub trait AuthorizedTransport: Send + Sync {
    /// Executes a single HTTP exchange.
    ///
    /// Returns `Ok` for any completed exchange regardless of status code;
    /// `Err` only when the exchange could not be completed (connection
    /// failure, timeout, interrupted body).
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Shared transport handle held by the API clients
pub type DynTransport = Arc<dyn AuthorizedTransport>;

/// Bearer-token transport backed by a shared reqwest client
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    access_token: String,
}

impl HttpTransport {
    /// Create a transport with its own connection pool
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), access_token)
    }

    /// Create a transport over an existing reqwest client
    pub fn with_client(client: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            client,
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl AuthorizedTransport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        debug!(
            "executing {} {} via authorized transport",
            request.method.as_str(),
            request.url
        );

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        builder = builder.header("Authorization", format!("Bearer {}", self.access_token));
        if let Some(content_type) = &request.content_type {
            builder = builder.header("Content-Type", content_type.clone());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success_range() {
        let response = ApiResponse {
            status: 204,
            content_type: None,
            body: Vec::new(),
        };
        assert!(response.is_success());

        let response = ApiResponse {
            status: 404,
            content_type: None,
            body: Vec::new(),
        };
        assert!(!response.is_success());
    }

    #[test]
    fn test_post_json_defaults() {
        let request = ApiRequest::post_json("https://example.com/send", b"{}".to_vec());
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.content_type.as_deref(),
            Some("application/json; charset=UTF-8")
        );
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_body_text_lossy() {
        let response = ApiResponse {
            status: 500,
            content_type: None,
            body: vec![0xff, 0xfe],
        };
        // Invalid UTF-8 must still produce a diagnostic string
        assert!(!response.body_text().is_empty());
    }
}
