//! SOAP transport
//!
//! The engine only knows how to hand a finished envelope to something that
//! can deliver it and give back raw reply text; `SoapTransport` is that
//! seam. `SswClient` is the production implementation over reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;

/// Production endpoint of the quotation/collection service.
pub const DEFAULT_ENDPOINT: &str = "https://ssw.inf.br/ws/sswCotacaoColeta/index.php";

/// Upper bound on one remote call. The remote has been observed taking
/// double-digit seconds under load; past this the call is abandoned.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors reaching (or waiting on) the remote service.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
}

/// The injected "send SOAP request, get raw text back" capability.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    /// Deliver `body` with the given SOAPAction and return the raw reply
    /// text, whatever it turns out to be.
    async fn call(&self, action: &str, body: &str) -> Result<String, TransportError>;
}

/// Reqwest-backed SOAP client for the SSW endpoint.
///
/// # Example
///
/// ```ignore
/// use sswgate_http::SswClient;
///
/// let client = SswClient::default();
/// let raw = client.call(QUOTE_ACTION, &envelope).await?;
/// ```
pub struct SswClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SswClient {
    /// Create a client for the given endpoint with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(CALL_TIMEOUT)
                .build()
                .unwrap(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a client with custom reqwest settings.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Get the configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for SswClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl SoapTransport for SswClient {
    async fn call(&self, action: &str, body: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", action)
            .body(body.to_string())
            .send()
            .await
            .map_err(classify_reqwest)?;

        response.text().await.map_err(classify_reqwest)
    }
}

fn classify_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(CALL_TIMEOUT)
    } else {
        TransportError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SswClient::new("http://localhost:9000");
        assert_eq!(client.endpoint(), "http://localhost:9000");
    }

    #[test]
    fn test_default_client_points_at_production() {
        let client = SswClient::default();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_timeout_error_display() {
        let err = TransportError::Timeout(CALL_TIMEOUT);
        assert!(err.to_string().contains("timed out"));
    }
}
