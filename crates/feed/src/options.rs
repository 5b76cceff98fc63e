// ABOUTME: Client configuration: feed root, default paging, and HTTP settings.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::time::Duration;

use crate::client::Client;
use crate::error::FeedError;
use crate::request::Paging;
use crate::transport::{HttpTransport, Transport};
use crate::url_builder::DEFAULT_ROOT;

/// Configuration options for the feed client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Feed root, e.g. `http://gdata.youtube.com/feeds`.
    pub root: String,
    /// Paging applied to searches that leave offset or page size unset.
    /// Defaults to the service's own `{ offset: 1, max_results: 25 }`.
    pub paging: Paging,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            paging: Paging::default(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("ytg-feed/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: ClientOptions,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the feed root.
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.opts.root = root.into();
        self
    }

    /// Set the default paging window.
    pub fn paging(mut self, paging: Paging) -> Self {
        self.opts.paging = paging;
        self
    }

    /// Set the default page size.
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.opts.paging.max_results = max_results;
        self
    }

    /// Set the default 1-based offset.
    pub fn offset(mut self, offset: u32) -> Self {
        self.opts.paging.offset = offset;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.opts
    }

    /// Build a Client backed by the blocking HTTP transport.
    pub fn build(self) -> Result<Client<HttpTransport>, FeedError> {
        validate(&self.opts)?;
        let transport = HttpTransport::new(&self.opts)?;
        Ok(Client::with_transport(transport, self.opts))
    }

    /// Build a Client backed by a caller-supplied transport.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<Client<T>, FeedError> {
        validate(&self.opts)?;
        Ok(Client::with_transport(transport, self.opts))
    }
}

fn validate(opts: &ClientOptions) -> Result<(), FeedError> {
    if opts.paging.offset == 0 || opts.paging.max_results == 0 {
        return Err(FeedError::invalid_spec(
            "default paging needs offset >= 1 and max_results >= 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_defaults() {
        let opts = ClientOptions::default();
        assert_eq!(opts.root, "http://gdata.youtube.com/feeds");
        assert_eq!(opts.paging.offset, 1);
        assert_eq!(opts.paging.max_results, 25);
        assert_eq!(opts.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides() {
        let builder = ClientBuilder::new()
            .root("http://localhost/feeds")
            .max_results(10)
            .offset(11)
            .user_agent("test-agent");
        let opts = builder.options();
        assert_eq!(opts.root, "http://localhost/feeds");
        assert_eq!(opts.paging, Paging { offset: 11, max_results: 10 });
        assert_eq!(opts.user_agent, "test-agent");
    }

    #[test]
    fn zero_paging_is_rejected() {
        assert!(ClientBuilder::new().max_results(0).build().is_err());
    }
}
