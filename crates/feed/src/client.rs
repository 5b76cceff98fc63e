// ABOUTME: High-level feed client: builds a URL, fetches it through a Transport, and parses the reply.
// ABOUTME: Generic over Transport so tests and callers can swap the network layer.

use crate::error::FeedError;
use crate::models::{Response, Video};
use crate::options::{ClientBuilder, ClientOptions};
use crate::parser::{parse_feed, parse_video_entry};
use crate::request::{Paging, SearchSpecification, StandardFeed, TimeRange, UserFeedRequest};
use crate::transport::{HttpTransport, Transport};
use crate::url_builder::UrlBuilder;

/// Feed client.
///
/// Every call is one blocking round trip. The client holds no per-request
/// state, so a single instance can be shared.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    transport: T,
    options: ClientOptions,
    urls: UrlBuilder,
}

impl Client<HttpTransport> {
    /// Client with default options and the HTTP transport.
    pub fn new() -> Result<Self, FeedError> {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T, options: ClientOptions) -> Self {
        let urls = UrlBuilder::new(options.root.clone());
        Self {
            transport,
            options,
            urls,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn url_builder(&self) -> &UrlBuilder {
        &self.urls
    }

    /// The URL `search` would fetch, with configured paging applied.
    pub fn feed_url(&self, spec: &SearchSpecification) -> Result<String, FeedError> {
        self.urls.search(&spec.with_default_paging(&self.options.paging))
    }

    /// Runs a search and returns one page of results.
    pub fn search(&self, spec: &SearchSpecification) -> Result<Response, FeedError> {
        let url = self.feed_url(spec)?;
        let body = self.fetch_body(&url)?;
        parse_feed(&body)
    }

    /// Fetches one of the site-wide standard feeds.
    pub fn standard_feed(
        &self,
        feed: StandardFeed,
        time: Option<TimeRange>,
    ) -> Result<Response, FeedError> {
        let url = self.urls.standard(feed, time)?;
        let body = self.fetch_body(&url)?;
        parse_feed(&body)
    }

    /// Fetches a user's uploads or favorites.
    pub fn user_feed(&self, request: &UserFeedRequest) -> Result<Response, FeedError> {
        let request = apply_user_paging(request, &self.options.paging);
        let url = self.urls.user(&request)?;
        let body = self.fetch_body(&url)?;
        parse_feed(&body)
    }

    /// Looks up a single video by id.
    pub fn video_by(&self, id: &str) -> Result<Video, FeedError> {
        let url = self.urls.video(id)?;
        let body = self.fetch_body(&url)?;
        parse_video_entry(&body)
    }

    fn fetch_body(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let resp = self.transport.fetch(url)?;
        if !resp.is_success() {
            let snippet = String::from_utf8_lossy(&resp.body);
            let snippet = snippet.trim();
            let message = if snippet.is_empty() {
                format!("HTTP {}", resp.status)
            } else {
                format!("HTTP {}: {}", resp.status, truncate(snippet, 200))
            };
            tracing::warn!(url = %url, status = resp.status, "feed request failed");
            return Err(FeedError::transport(url, Some(resp.status), message));
        }
        tracing::debug!(url = %url, bytes = resp.body.len(), "received feed body");
        Ok(resp.body)
    }
}

fn apply_user_paging(request: &UserFeedRequest, paging: &Paging) -> UserFeedRequest {
    let service = Paging::default();
    let mut request = request.clone();
    if request.offset.is_none() && paging.offset != service.offset {
        request.offset = Some(paging.offset);
    }
    if request.max_results.is_none() && paging.max_results != service.max_results {
        request.max_results = Some(paging.max_results);
    }
    request
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
