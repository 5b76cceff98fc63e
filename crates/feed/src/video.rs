// ABOUTME: Builds a Video from one feed <entry> element by composing the entity mappers.
// ABOUTME: Handles categories vs keywords, player URL fallback, statistics, and media group fields.

use chrono::{DateTime, Utc};

use crate::error::FeedError;
use crate::mappers::{
    map_author, map_category, map_content, map_rating, map_thumbnail, optional_attr, validate_url,
};
use crate::models::{Category, Content, Video};
use crate::time_parse::parse_feed_time;
use crate::xml::XmlElement;

const KIND_SCHEME_SUFFIX: &str = "#kind";
const KEYWORDS_SCHEME_SUFFIX: &str = "keywords.cat";

/// Maps one `<entry>` element to a Video.
///
/// Required: `id`, `title`, `published`, `updated`, `author`, and a player
/// URL (`link rel="alternate"` or `media:player`). An entry without
/// `media:content` children is valid and yields an empty list.
pub fn build_video(entry: &XmlElement) -> Result<Video, FeedError> {
    let video_id = entry
        .child_text("id")
        .ok_or_else(|| FeedError::malformed_entry("id", "missing or empty"))?
        .to_string();
    let title = entry
        .child_text("title")
        .ok_or_else(|| FeedError::malformed_entry("title", "missing or empty"))?
        .to_string();
    let published_at = entry_time(entry, "published")?;
    let updated_at = entry_time(entry, "updated")?;
    let html_content = entry
        .child("content")
        .map(|c| c.text().to_string())
        .unwrap_or_default();

    let author_element = entry
        .child("author")
        .ok_or_else(|| FeedError::malformed_entry("author", "missing"))?;
    let author = map_author(author_element)?;

    let (categories, category_keywords) = split_categories(entry)?;

    let group = entry.child("media:group");
    let keywords = match group.and_then(|g| g.child("media:keywords")) {
        Some(element) => split_keywords(element.text()),
        None => category_keywords,
    };

    let player_url = player_url(entry, group)
        .ok_or_else(|| FeedError::malformed_entry("player_url", "no alternate link or media:player"))?;
    validate_url(&player_url, "player_url")?;

    let media_content = match group {
        Some(g) => g
            .children_named("media:content")
            .map(map_content)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    warn_on_multiple_defaults(&video_id, &media_content);

    let thumbnails = match group {
        Some(g) => g
            .children_named("media:thumbnail")
            .map(map_thumbnail)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let duration = match group.and_then(|g| g.child("yt:duration")) {
        Some(element) => optional_attr::<u32>(element, "seconds", "yt:duration@seconds")?,
        None => None,
    }
    .or_else(|| media_content.iter().map(|c| c.duration).max())
    .ok_or_else(|| FeedError::malformed_entry("duration", "no yt:duration and no media:content"))?;
    if duration == 0 {
        return Err(FeedError::malformed_entry("duration", "must be positive"));
    }

    let view_count = match entry.child("yt:statistics") {
        Some(stats) => optional_attr::<u64>(stats, "viewCount", "yt:statistics@viewCount")?.unwrap_or(0),
        None => 0,
    };

    let rating = map_rating(entry.child("gd:rating"))?;
    let description = group
        .and_then(|g| g.child_text("media:description"))
        .map(String::from);
    let noembed = entry.child("yt:noembed").is_some();
    let racy = entry.child("media:rating").is_some()
        || group.and_then(|g| g.child("media:rating")).is_some();

    Ok(Video {
        video_id,
        title,
        html_content,
        description,
        duration,
        view_count,
        published_at,
        updated_at,
        keywords,
        player_url,
        author,
        categories,
        rating,
        media_content,
        thumbnails,
        noembed,
        racy,
    })
}

fn entry_time(entry: &XmlElement, name: &str) -> Result<DateTime<Utc>, FeedError> {
    let raw = entry
        .child_text(name)
        .ok_or_else(|| FeedError::malformed_entry(name, "missing or empty"))?;
    parse_feed_time(raw)
        .ok_or_else(|| FeedError::malformed_entry(name, format!("unparseable timestamp {:?}", raw)))
}

/// Splits Atom `<category>` elements into real categories and keyword terms.
/// The `#kind` marker category is skipped.
fn split_categories(entry: &XmlElement) -> Result<(Vec<Category>, Vec<String>), FeedError> {
    let mut categories = Vec::new();
    let mut keywords = Vec::new();

    for element in entry.children_named("category") {
        let scheme = element.attr("scheme").unwrap_or("");
        if scheme.ends_with(KIND_SCHEME_SUFFIX) {
            continue;
        }
        let category = map_category(element)?;
        if scheme.ends_with(KEYWORDS_SCHEME_SUFFIX) {
            keywords.push(category.term);
        } else {
            categories.push(category);
        }
    }

    Ok((categories, keywords))
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

/// `<link rel="alternate">` first, then `media:group/media:player@url`.
fn player_url(entry: &XmlElement, group: Option<&XmlElement>) -> Option<String> {
    let alternate = entry
        .children_named("link")
        .find(|link| link.attr("rel") == Some("alternate"))
        .and_then(|link| link.attr("href"));
    let player = group
        .and_then(|g| g.child("media:player"))
        .and_then(|p| p.attr("url"));

    alternate
        .or(player)
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
}

fn warn_on_multiple_defaults(video_id: &str, media_content: &[Content]) {
    let defaults = media_content.iter().filter(|c| c.is_default).count();
    if defaults > 1 {
        tracing::warn!(
            video_id = %video_id,
            defaults,
            "several media:content elements flagged isDefault; the first one is used"
        );
    }
}
