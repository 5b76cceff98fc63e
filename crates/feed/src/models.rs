// ABOUTME: Value objects produced by the feed parser.
// ABOUTME: Response, Video, and the nested Author, Category, Rating, Content, and Thumbnail records.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::duration_parse::parse_time_offset;

/// One page of search results plus the paging metadata reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub feed_id: String,
    /// Page size (`openSearch:itemsPerPage`).
    pub max_result_count: u32,
    /// 1-based index of the first video on this page (`openSearch:startIndex`).
    pub offset: u32,
    /// Total matches reported by the service (`openSearch:totalResults`).
    pub total_result_count: u64,
    pub updated_at: DateTime<Utc>,
    /// Videos in the order the service ranked them.
    pub videos: Vec<Video>,
}

/// The uploader of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub uri: String,
}

/// A category attached to a video entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Machine identifier, e.g. `Pets`.
    pub term: String,
    /// Human-readable name, e.g. `Pets & Animals`. Same as `term` when the feed omits it.
    pub label: String,
}

/// Aggregate viewer rating (`gd:rating`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: f64,
    pub min: u32,
    pub max: u32,
    pub rater_count: u64,
}

/// Rendition kind of a media content entry, keyed by the numeric `yt:format` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Code 1: RTSP stream, H.263 video with AMR audio, for mobile devices.
    Rtsp,
    /// Code 5: embeddable Flash player.
    Swf,
    /// Code 6: 3GPP file, MPEG-4 video with AAC audio, for mobile devices.
    ThreeGpp,
    /// Any code the table above does not know.
    Unknown(u32),
}

impl Format {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Format::Rtsp,
            5 => Format::Swf,
            6 => Format::ThreeGpp,
            other => Format::Unknown(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Format::Rtsp => 1,
            Format::Swf => 5,
            Format::ThreeGpp => 6,
            Format::Unknown(code) => code,
        }
    }

    /// True for the renditions meant for mobile handsets.
    pub fn is_mobile(self) -> bool {
        matches!(self, Format::Rtsp | Format::ThreeGpp)
    }

    pub fn is_embeddable(self) -> bool {
        matches!(self, Format::Swf)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Rtsp => write!(f, "rtsp"),
            Format::Swf => write!(f, "swf"),
            Format::ThreeGpp => write!(f, "three_gpp"),
            Format::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// One playable or embeddable rendition of a video (`media:content`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub url: String,
    pub duration: u32,
    pub format: Format,
    pub mime_type: String,
    pub is_default: bool,
}

/// A still frame of a video (`media:thumbnail`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Raw offset into the video, e.g. `00:00:46.500`.
    pub time: Option<String>,
}

impl Thumbnail {
    /// The frame offset as a duration, when the feed gives a parseable one.
    pub fn offset(&self) -> Option<Duration> {
        self.time.as_deref().and_then(parse_time_offset)
    }
}

/// A single video entry from a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Entry id, e.g. `http://gdata.youtube.com/feeds/videos/IHVaXG1thXM`.
    pub video_id: String,
    pub title: String,
    /// Escaped-then-decoded HTML snippet from the Atom `content` element.
    pub html_content: String,
    pub description: Option<String>,
    /// Length in seconds.
    pub duration: u32,
    pub view_count: u64,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub keywords: Vec<String>,
    pub player_url: String,
    pub author: Author,
    pub categories: Vec<Category>,
    pub rating: Option<Rating>,
    pub media_content: Vec<Content>,
    pub thumbnails: Vec<Thumbnail>,
    /// The uploader disabled embedding (`yt:noembed`).
    pub noembed: bool,
    /// The entry carries a restricted-content rating (`media:rating`).
    pub racy: bool,
}

impl Video {
    /// The first media content flagged as default, if any.
    ///
    /// Feeds are not required to flag exactly one rendition; when several are
    /// flagged the first in document order wins.
    pub fn default_media_content(&self) -> Option<&Content> {
        self.media_content.iter().find(|c| c.is_default)
    }

    /// The trailing path segment of the entry id, e.g. `IHVaXG1thXM`.
    pub fn unique_id(&self) -> &str {
        self.video_id
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.video_id)
    }

    /// Player URL rewritten into the embeddable `/v/<id>` form.
    pub fn embed_url(&self) -> Option<String> {
        let parsed = Url::parse(&self.player_url).ok()?;
        let id = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?;
        let host = parsed.host_str()?;
        Some(format!("{}://{}/v/{}", parsed.scheme(), host, id))
    }

    /// Object/embed markup for the Flash player at the given size.
    pub fn embed_html(&self, width: u32, height: u32) -> Option<String> {
        let src = self.embed_url()?;
        Some(format!(
            concat!(
                "<object width=\"{w}\" height=\"{h}\">\n",
                "  <param name=\"movie\" value=\"{src}\"></param>\n",
                "  <param name=\"wmode\" value=\"transparent\"></param>\n",
                "  <embed src=\"{src}\" type=\"application/x-shockwave-flash\" ",
                "wmode=\"transparent\" width=\"{w}\" height=\"{h}\"></embed>\n",
                "</object>\n"
            ),
            w = width,
            h = height,
            src = src
        ))
    }
}
