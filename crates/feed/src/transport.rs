// ABOUTME: The fetch seam between the client and the network.
// ABOUTME: Transport trait, TransportResponse, and the blocking reqwest-backed HttpTransport.

use crate::error::FeedError;
use crate::options::ClientOptions;

/// Raw status and body returned by a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches a URL and hands back whatever the server answered.
///
/// Implementations report network failures as `FeedError::Transport` with no
/// status; non-success statuses are returned as-is and judged by the client.
pub trait Transport {
    fn fetch(&self, url: &str) -> Result<TransportResponse, FeedError>;
}

impl<F> Transport for F
where
    F: Fn(&str) -> Result<TransportResponse, FeedError>,
{
    fn fetch(&self, url: &str) -> Result<TransportResponse, FeedError> {
        self(url)
    }
}

/// Blocking HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(opts: &ClientOptions) -> Result<Self, FeedError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(opts.timeout)
            .user_agent(opts.user_agent.clone())
            .build()
            .map_err(|e| FeedError::transport(opts.root.clone(), None, e))?;
        Ok(Self { http })
    }

    /// Use a preconfigured reqwest client.
    pub fn from_client(http: reqwest::blocking::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<TransportResponse, FeedError> {
        tracing::debug!(url = %url, "fetching feed");
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|e| FeedError::transport(url, None, e))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .map_err(|e| FeedError::transport(url, Some(status), e))?;
        tracing::debug!(url = %url, status, bytes = body.len(), "fetched feed");
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
