// ABOUTME: Entity mappers turning single XML elements into Author, Category, Rating, Content, and Thumbnail.
// ABOUTME: Each mapper is pure and reports the offending field through FeedError::MalformedEntry.

use std::str::FromStr;

use url::Url;

use crate::error::FeedError;
use crate::models::{Author, Category, Content, Format, Rating, Thumbnail};
use crate::xml::XmlElement;

/// Maps an Atom `<author>` element. Both `name` and `uri` are required.
pub fn map_author(element: &XmlElement) -> Result<Author, FeedError> {
    let name = element
        .child_text("name")
        .ok_or_else(|| FeedError::malformed_entry("author/name", "missing or empty"))?;
    let uri = element
        .child_text("uri")
        .ok_or_else(|| FeedError::malformed_entry("author/uri", "missing or empty"))?;
    validate_url(uri, "author/uri")?;

    Ok(Author {
        name: name.to_string(),
        uri: uri.to_string(),
    })
}

/// Maps an Atom `<category>` element; the label falls back to the term.
pub fn map_category(element: &XmlElement) -> Result<Category, FeedError> {
    let term = element
        .attr("term")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FeedError::malformed_entry("category@term", "missing or empty"))?;
    let label = element
        .attr("label")
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(term);

    Ok(Category {
        term: term.to_string(),
        label: label.to_string(),
    })
}

/// Maps an optional `<gd:rating>` element.
///
/// An absent element is not an error; a present element must carry every
/// numeric attribute in parseable form.
pub fn map_rating(element: Option<&XmlElement>) -> Result<Option<Rating>, FeedError> {
    let Some(element) = element else {
        return Ok(None);
    };

    let average: f64 = parse_attr(element, "average", "gd:rating@average")?;
    let min: u32 = parse_attr(element, "min", "gd:rating@min")?;
    let max: u32 = parse_attr(element, "max", "gd:rating@max")?;
    let rater_count: u64 = parse_attr(element, "numRaters", "gd:rating@numRaters")?;

    if !average.is_finite() || average < 0.0 {
        return Err(FeedError::malformed_entry(
            "gd:rating@average",
            format!("out of range: {}", average),
        ));
    }
    if min > max {
        return Err(FeedError::malformed_entry(
            "gd:rating",
            format!("min {} exceeds max {}", min, max),
        ));
    }

    Ok(Some(Rating {
        average,
        min,
        max,
        rater_count,
    }))
}

/// Maps a `<media:content>` element.
pub fn map_content(element: &XmlElement) -> Result<Content, FeedError> {
    let url = required_attr(element, "url", "media:content@url")?;
    validate_url(url, "media:content@url")?;

    let mime_type = required_attr(element, "type", "media:content@type")?;
    if !is_mime_type(mime_type) {
        return Err(FeedError::malformed_entry(
            "media:content@type",
            format!("not a type/subtype mime type: {:?}", mime_type),
        ));
    }

    let duration: u32 = parse_attr(element, "duration", "media:content@duration")?;
    if duration == 0 {
        return Err(FeedError::malformed_entry("media:content@duration", "must be positive"));
    }
    let code: u32 = parse_attr(element, "yt:format", "media:content@yt:format")?;
    let is_default = element
        .attr("isDefault")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    Ok(Content {
        url: url.to_string(),
        duration,
        format: Format::from_code(code),
        mime_type: mime_type.to_string(),
        is_default,
    })
}

/// Maps a `<media:thumbnail>` element; width and height default to 0.
pub fn map_thumbnail(element: &XmlElement) -> Result<Thumbnail, FeedError> {
    let url = required_attr(element, "url", "media:thumbnail@url")?;
    validate_url(url, "media:thumbnail@url")?;

    let width = optional_attr(element, "width", "media:thumbnail@width")?.unwrap_or(0);
    let height = optional_attr(element, "height", "media:thumbnail@height")?.unwrap_or(0);
    let time = element
        .attr("time")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    Ok(Thumbnail {
        url: url.to_string(),
        width,
        height,
        time,
    })
}

/// Returns a trimmed, non-empty attribute or a MalformedEntry naming `field`.
pub(crate) fn required_attr<'a>(
    element: &'a XmlElement,
    name: &str,
    field: &str,
) -> Result<&'a str, FeedError> {
    element
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| FeedError::malformed_entry(field, "missing or empty"))
}

/// Parses a required attribute.
pub(crate) fn parse_attr<T: FromStr>(element: &XmlElement, name: &str, field: &str) -> Result<T, FeedError> {
    let raw = required_attr(element, name, field)?;
    parse_value(raw, field)
}

/// Parses an attribute that may be absent; present-but-unparseable is still an error.
pub(crate) fn optional_attr<T: FromStr>(
    element: &XmlElement,
    name: &str,
    field: &str,
) -> Result<Option<T>, FeedError> {
    match element.attr(name).map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => parse_value(raw, field).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn parse_value<T: FromStr>(raw: &str, field: &str) -> Result<T, FeedError> {
    raw.parse::<T>()
        .map_err(|_| FeedError::malformed_entry(field, format!("unparseable value {:?}", raw)))
}

pub(crate) fn validate_url(value: &str, field: &str) -> Result<(), FeedError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| FeedError::malformed_entry(field, format!("invalid URL {:?}: {}", value, e)))
}

/// `type/subtype`, each side non-empty, no extra slash, no whitespace.
fn is_mime_type(value: &str) -> bool {
    match value.split_once('/') {
        Some((kind, subtype)) => {
            !kind.is_empty()
                && !subtype.is_empty()
                && !subtype.contains('/')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
