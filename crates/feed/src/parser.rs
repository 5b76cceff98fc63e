// ABOUTME: Feed parsing entry points: whole search feeds and single video entries.
// ABOUTME: Extracts openSearch paging metadata and maps every entry in document order.

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::error::FeedError;
use crate::models::{Response, Video};
use crate::time_parse::parse_feed_time;
use crate::video::build_video;
use crate::xml::{parse_document, XmlElement};

const TOTAL_RESULTS: &str = "openSearch:totalResults";
const START_INDEX: &str = "openSearch:startIndex";
const ITEMS_PER_PAGE: &str = "openSearch:itemsPerPage";

/// Parses a feed document into a Response.
///
/// # Arguments
/// * `data` - Raw XML bytes as returned by the service
///
/// # Returns
/// * `Ok(Response)` - Paging metadata plus every entry, in document order
/// * `Err(FeedError::MalformedFeed)` - Not well-formed, not a `<feed>`, or
///   missing `id`, `updated`, `openSearch:totalResults`, or `openSearch:itemsPerPage`
/// * `Err(FeedError::MalformedEntry)` - The first entry that failed to map;
///   the whole parse is abandoned rather than returning a partial page
pub fn parse_feed(data: &[u8]) -> Result<Response, FeedError> {
    let root = parse_document(data)?;
    if root.name != "feed" {
        return Err(FeedError::malformed_feed(format!(
            "expected <feed> root element, found <{}>",
            root.name
        )));
    }

    let feed_id = required_text(&root, "id")?.to_string();
    let updated_at = required_time(&root, "updated")?;
    let total_result_count: u64 = required_number(&root, TOTAL_RESULTS)?;
    let max_result_count: u32 = required_number(&root, ITEMS_PER_PAGE)?;
    let offset: u32 = match root.child_text(START_INDEX) {
        Some(raw) => parse_number(raw, START_INDEX)?,
        None => 1,
    };
    if offset == 0 {
        return Err(FeedError::malformed_feed(format!("{} must be at least 1", START_INDEX)));
    }

    let videos = root
        .children_named("entry")
        .enumerate()
        .map(|(idx, entry)| {
            build_video(entry).inspect_err(|err| {
                tracing::warn!(feed_id = %feed_id, entry = idx + 1, error = %err, "aborting feed parse");
            })
        })
        .collect::<Result<Vec<Video>, FeedError>>()?;

    if videos.len() > max_result_count as usize {
        return Err(FeedError::malformed_feed(format!(
            "feed holds {} entries but {} is {}",
            videos.len(),
            ITEMS_PER_PAGE,
            max_result_count
        )));
    }

    tracing::debug!(
        feed_id = %feed_id,
        videos = videos.len(),
        offset,
        total = total_result_count,
        "parsed feed"
    );

    Ok(Response {
        feed_id,
        max_result_count,
        offset,
        total_result_count,
        updated_at,
        videos,
    })
}

/// Parses a document whose root is a single `<entry>`, as returned for a video id lookup.
pub fn parse_video_entry(data: &[u8]) -> Result<Video, FeedError> {
    let root = parse_document(data)?;
    if root.name != "entry" {
        return Err(FeedError::malformed_feed(format!(
            "expected <entry> root element, found <{}>",
            root.name
        )));
    }
    build_video(&root)
}

fn required_text<'a>(root: &'a XmlElement, name: &str) -> Result<&'a str, FeedError> {
    root.child_text(name)
        .ok_or_else(|| FeedError::malformed_feed(format!("missing feed-level <{}>", name)))
}

fn required_time(root: &XmlElement, name: &str) -> Result<DateTime<Utc>, FeedError> {
    let raw = required_text(root, name)?;
    parse_feed_time(raw)
        .ok_or_else(|| FeedError::malformed_feed(format!("unparseable <{}> timestamp {:?}", name, raw)))
}

fn required_number<T: FromStr>(root: &XmlElement, name: &str) -> Result<T, FeedError> {
    let raw = required_text(root, name)?;
    parse_number(raw, name)
}

fn parse_number<T: FromStr>(raw: &str, name: &str) -> Result<T, FeedError> {
    raw.parse::<T>()
        .map_err(|_| FeedError::malformed_feed(format!("unparseable <{}> value {:?}", name, raw)))
}
