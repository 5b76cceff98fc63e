// ABOUTME: Client library for the GData video feed service.
// ABOUTME: Provides search URL building, XML feed parsing into typed videos, and a pluggable fetch client.

pub mod client;
pub mod duration_parse;
pub mod error;
pub mod mappers;
pub mod models;
pub mod options;
pub mod parser;
pub mod request;
pub mod time_parse;
pub mod transport;
pub mod url_builder;
pub mod video;
pub mod xml;

pub use client::Client;
pub use duration_parse::parse_time_offset;
pub use error::FeedError;
pub use mappers::{map_author, map_category, map_content, map_rating, map_thumbnail};
pub use models::{Author, Category, Content, Format, Rating, Response, Thumbnail, Video};
pub use options::{ClientBuilder, ClientOptions};
pub use parser::{parse_feed, parse_video_entry};
pub use request::{
    OrderBy, Paging, Racy, SearchBuilder, SearchSpecification, StandardFeed, TermFilter,
    TimeRange, UserFeedKind, UserFeedRequest, SERVICE_DEFAULT_MAX_RESULTS,
    SERVICE_DEFAULT_OFFSET,
};
pub use time_parse::parse_feed_time;
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use url_builder::{
    build_feed_url, standard_feed_url, user_feed_url, video_url, UrlBuilder, DEFAULT_ROOT,
};
pub use video::build_video;
pub use xml::{parse_document, XmlElement};
