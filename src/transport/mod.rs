//! HTTP access to the Atlas Administration API.
//!
//! The [`Transport`] trait is the seam between the advisor logic and the
//! network: [`DigestTransport`] talks to Atlas, tests substitute a scripted
//! implementation.

mod digest;

pub use digest::{DigestTransport, DigestTransportBuilder};

use std::fmt::Debug;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::AtlasError;

/// Performs authenticated GET requests.
///
/// Implementations return every response they receive, whatever its status.
/// An `Err` means the request never produced a response (bad URI, network
/// failure, timeout, unanswerable auth challenge).
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Fetch `uri` and return the full response.
    async fn get(&self, uri: &str) -> Result<ApiResponse, AtlasError>;
}

/// A response status and its complete body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// Non-2xx responses yield [`AtlasError::Status`] without attempting to
    /// decode; Atlas error bodies would otherwise decode into empty records.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, AtlasError> {
        if !self.is_success() {
            return Err(AtlasError::Status {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            });
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}
