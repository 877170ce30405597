//! Digest-authenticated transport built on `reqwest`.
//!
//! Atlas programmatic API keys authenticate with HTTP digest auth: the first
//! request is answered with `401` and a `WWW-Authenticate: Digest ...`
//! challenge, which is answered once with an `Authorization` header computed
//! from the key pair.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use digest_auth::AuthContext;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::{ApiResponse, Transport};
use crate::AtlasError;

const JSON: &str = "application/json";

/// Transport that authenticates with an Atlas public/private key pair.
#[derive(Clone)]
pub struct DigestTransport {
    client: Client,
    public_key: String,
    private_key: String,
}

impl DigestTransport {
    /// Create a new builder for configuring the transport.
    pub fn builder() -> DigestTransportBuilder {
        DigestTransportBuilder::default()
    }

    async fn send(
        &self,
        url: Url,
        authorization: Option<String>,
    ) -> Result<reqwest::Response, AtlasError> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON);
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }
        Ok(request.send().await?)
    }

    fn answer_challenge(&self, url: &Url, challenge: &str) -> Result<String, AtlasError> {
        let mut prompt =
            digest_auth::parse(challenge).map_err(|e| AtlasError::Auth(e.to_string()))?;
        let context = AuthContext::new(
            self.public_key.as_str(),
            self.private_key.as_str(),
            request_target(url),
        );
        let answer = prompt
            .respond(&context)
            .map_err(|e| AtlasError::Auth(e.to_string()))?;
        Ok(answer.to_header_string())
    }
}

#[async_trait]
impl Transport for DigestTransport {
    async fn get(&self, uri: &str) -> Result<ApiResponse, AtlasError> {
        let url = Url::parse(uri).map_err(|e| AtlasError::Request(e.to_string()))?;

        let response = self.send(url.clone(), None).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return read_response(response).await;
        }

        let challenge = digest_challenge(response.headers()).ok_or_else(|| {
            AtlasError::Auth("server did not offer a digest challenge".to_string())
        })?;
        let authorization = self.answer_challenge(&url, &challenge)?;

        debug!(uri = %url, "Answering digest challenge");
        let response = self.send(url, Some(authorization)).await?;
        read_response(response).await
    }
}

impl fmt::Debug for DigestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestTransport")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Builder for DigestTransport.
#[derive(Debug, Default)]
pub struct DigestTransportBuilder {
    public_key: Option<String>,
    private_key: Option<String>,
    timeout: Option<Duration>,
}

impl DigestTransportBuilder {
    /// Set the programmatic API key pair.
    pub fn credentials(
        mut self,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        self.public_key = Some(public_key.into());
        self.private_key = Some(private_key.into());
        self
    }

    /// Set the total request timeout (default: 60 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<DigestTransport, AtlasError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(60));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("atlas-advisor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(DigestTransport {
            client,
            public_key: self.public_key.unwrap_or_default(),
            private_key: self.private_key.unwrap_or_default(),
        })
    }
}

// The first `Digest` challenge among the WWW-Authenticate headers
fn digest_challenge(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| {
            value
                .trim_start()
                .get(..6)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
        })
        .map(str::to_string)
}

// Path and query, as signed in the digest response
fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

async fn read_response(response: reqwest::Response) -> Result<ApiResponse, AtlasError> {
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    Ok(ApiResponse::new(status, body.to_vec()))
}
