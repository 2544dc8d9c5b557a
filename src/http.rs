//! HTTP abstraction used by the update pipeline.
//!
//! The engine performs exactly one GET per feed check and one per installer
//! download. Hiding reqwest behind [`HttpClient`] keeps transport types out
//! of the domain API and lets tests feed canned responses.

use crate::error::{Result, UpdateError};
use bytes::Bytes;
use std::time::Duration;

/// Minimal GET-only client contract.
#[allow(async_fn_in_trait)]
pub trait HttpClient {
    /// Perform a single GET request. Transport failures are already
    /// normalized to [`UpdateError::TransportFailed`].
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// A response body that can be drained chunk by chunk.
///
/// Wraps either a live reqwest response or a canned byte buffer, so test
/// doubles share the exact streaming path production code uses.
pub struct HttpResponse {
    status: u16,
    body: Body,
}

enum Body {
    Remote(reqwest::Response),
    Canned(Option<Bytes>),
}

impl HttpResponse {
    /// Build a response from in-memory bytes.
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        HttpResponse {
            status,
            body: Body::Canned(Some(body.into())),
        }
    }

    pub fn from_reqwest(response: reqwest::Response) -> Self {
        HttpResponse {
            status: response.status().as_u16(),
            body: Body::Remote(response),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Next chunk of the body, or `None` once the stream is exhausted.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        match &mut self.body {
            Body::Remote(response) => response.chunk().await.map_err(UpdateError::transport),
            Body::Canned(bytes) => Ok(bytes.take()),
        }
    }

    /// Drain the whole body into memory.
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut buffer = Vec::new();
        while let Some(chunk) = self.chunk().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.into())
    }
}

/// Production [`HttpClient`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .user_agent(concat!("updraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpdateError::transport)?;

        Ok(ReqwestClient { client })
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UpdateError::transport)?;

        Ok(HttpResponse::from_reqwest(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_response_yields_body_once() {
        let mut response = HttpResponse::from_bytes(200, "payload");

        assert!(response.is_success());
        assert_eq!(response.status(), 200);

        let first = response.chunk().await.unwrap();
        assert_eq!(first.as_deref(), Some(b"payload".as_ref()));
        assert!(response.chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_canned_response_collects_bytes() {
        let response = HttpResponse::from_bytes(200, "payload");
        let body = response.bytes().await.unwrap();
        assert_eq!(&body[..], b"payload");
    }

    #[test]
    fn test_status_classification() {
        assert!(HttpResponse::from_bytes(204, "").is_success());
        assert!(!HttpResponse::from_bytes(404, "").is_success());
        assert!(!HttpResponse::from_bytes(500, "").is_success());
    }
}
