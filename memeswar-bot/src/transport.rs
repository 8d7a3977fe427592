use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use memeswar_core::constants::{STATUS_CONFLICT, STATUS_OK};
use memeswar_core::{HttpMethod, SessionCredential};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::headers::browser_headers;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid header `{0}`")]
    Header(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// The service's "already done" answer.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        self.status == STATUS_CONFLICT
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Sends one request and hands back status and body. Everything above this
/// seam is transport-agnostic.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
impl<T: ApiTransport + ?Sized> ApiTransport for Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request).await
    }
}

/// reqwest-backed transport for one account.
///
/// A client is built per request, so no pooled connection is shared across
/// calls, let alone across accounts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    headers: HeaderMap,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error if the cookie or user agent is not a valid header value.
    pub fn for_account(
        credential: &SessionCredential,
        user_agent: &str,
    ) -> Result<Self, TransportError> {
        let mut headers = browser_headers()?;
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|_| TransportError::Header(USER_AGENT.to_string()))?,
        );
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&credential.cookie_header())
                .map_err(|_| TransportError::Header(COOKIE.to_string()))?,
        );
        Ok(Self { headers })
    }

    #[cfg(test)]
    pub fn header(&self, name: &reqwest::header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

const fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let client = reqwest::Client::builder()
            .default_headers(self.headers.clone())
            .timeout(request.timeout)
            .build()?;
        let mut builder = client.request(to_reqwest(request.method), &request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        log::debug!("{} {} -> {status}", request.method, request.url);
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderName;

    #[test]
    fn account_transport_carries_cookie_and_agent() {
        let cred = SessionCredential::from_raw("query_id=q1&hash=abc").unwrap();
        let transport = HttpTransport::for_account(&cred, "TestAgent/1.0").unwrap();
        assert_eq!(
            transport.header(&COOKIE),
            Some("telegramInitData=query_id%3Dq1%26hash%3Dabc")
        );
        assert_eq!(transport.header(&USER_AGENT), Some("TestAgent/1.0"));
        assert_eq!(
            transport.header(&HeaderName::from_static("origin")),
            Some("https://memes-war.memecore.com")
        );
    }

    #[test]
    fn control_characters_in_agent_are_rejected() {
        let cred = SessionCredential::from_raw("a=1").unwrap();
        let err = HttpTransport::for_account(&cred, "bad\nagent").unwrap_err();
        assert_eq!(err, TransportError::Header("user-agent".to_string()));
    }

    #[test]
    fn response_helpers() {
        let ok = ApiResponse {
            status: 200,
            body: r#"{"data":{"n":1}}"#.to_string(),
        };
        assert!(ok.is_ok());
        assert!(!ok.is_conflict());
        let value: Value = ok.json().unwrap();
        assert_eq!(value["data"]["n"], 1);
        let conflict = ApiResponse {
            status: 409,
            body: String::new(),
        };
        assert!(conflict.is_conflict());
        assert!(conflict.json::<Value>().is_err());
    }
}
