// ABOUTME: Maps typed requests to feed URLs with encoded path filters and query parameters.
// ABOUTME: Pure functions; nothing here touches the network.

use url::form_urlencoded;

use crate::error::FeedError;
use crate::request::{
    validate_paging, SearchSpecification, StandardFeed, TermFilter, TimeRange, UserFeedKind,
    UserFeedRequest,
};

/// Root every feed path hangs off.
pub const DEFAULT_ROOT: &str = "http://gdata.youtube.com/feeds";

/// Builds the video search URL under [`DEFAULT_ROOT`].
pub fn build_feed_url(spec: &SearchSpecification) -> Result<String, FeedError> {
    UrlBuilder::default().search(spec)
}

/// Builds a standard feed URL under [`DEFAULT_ROOT`].
pub fn standard_feed_url(feed: StandardFeed, time: Option<TimeRange>) -> Result<String, FeedError> {
    UrlBuilder::default().standard(feed, time)
}

/// Builds a user uploads or favorites URL under [`DEFAULT_ROOT`].
pub fn user_feed_url(request: &UserFeedRequest) -> Result<String, FeedError> {
    UrlBuilder::default().user(request)
}

/// Builds a single video URL under [`DEFAULT_ROOT`].
pub fn video_url(id: &str) -> Result<String, FeedError> {
    UrlBuilder::default().video(id)
}

/// Feed URL construction against a configurable root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    root: String,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl UrlBuilder {
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// `{root}/videos[/-/<categories>/<tags>][?<params>]`
    ///
    /// Category and tag filters are ANDed together as path segments; the
    /// remaining options become query parameters sorted by key, so the same
    /// request always yields the same URL.
    pub fn search(&self, spec: &SearchSpecification) -> Result<String, FeedError> {
        spec.validate()?;

        let mut url = format!("{}/videos", self.root);

        let mut segments = filter_segments(spec.categories(), |c| encode_segment(&capitalize(c)));
        segments.extend(filter_segments(spec.tags(), encode_segment));
        if !segments.is_empty() {
            url.push_str("/-/");
            url.push_str(&segments.join("/"));
        }

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(query) = spec.query() {
            params.push(("vq", query.to_string()));
        }
        push_paging(&mut params, spec.offset(), spec.max_results());
        if let Some(order_by) = spec.order_by() {
            params.push(("orderby", order_by.as_str().to_string()));
        }
        if let Some(author) = spec.author() {
            params.push(("author", author.to_string()));
        }
        if let Some(racy) = spec.racy() {
            params.push(("racy", racy.as_str().to_string()));
        }
        if spec.only_embeddable() {
            params.push(("format", "5".to_string()));
        }

        url.push_str(&query_string(params));
        tracing::debug!(url = %url, "built search feed url");
        Ok(url)
    }

    /// `{root}/standardfeeds/<feed>[?time=<range>]`
    pub fn standard(&self, feed: StandardFeed, time: Option<TimeRange>) -> Result<String, FeedError> {
        let mut url = format!("{}/standardfeeds/{}", self.root, feed.as_str());
        if let Some(range) = time {
            if !feed.accepts_time_range() {
                return Err(FeedError::invalid_spec(format!(
                    "{} does not accept a time range",
                    feed.as_str()
                )));
            }
            url.push_str(&query_string(vec![("time", range.as_str().to_string())]));
        }
        Ok(url)
    }

    /// `{root}/users/<user>/uploads` or `/favorites`, with optional paging.
    pub fn user(&self, request: &UserFeedRequest) -> Result<String, FeedError> {
        if request.user.trim().is_empty() {
            return Err(FeedError::invalid_spec("user name must not be blank"));
        }
        validate_paging(request.offset, request.max_results)?;

        let listing = match request.kind {
            UserFeedKind::Uploads => "uploads",
            UserFeedKind::Favorites => "favorites",
        };
        let mut url = format!(
            "{}/users/{}/{}",
            self.root,
            encode_segment(request.user.trim()),
            listing
        );
        let mut params = Vec::new();
        push_paging(&mut params, request.offset, request.max_results);
        url.push_str(&query_string(params));
        Ok(url)
    }

    /// `{root}/videos/<id>` for a single entry.
    pub fn video(&self, id: &str) -> Result<String, FeedError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(FeedError::invalid_spec("video id must not be blank"));
        }
        Ok(format!("{}/videos/{}", self.root, encode_segment(id)))
    }
}

fn push_paging(params: &mut Vec<(&str, String)>, offset: Option<u32>, max_results: Option<u32>) {
    if let Some(offset) = offset {
        params.push(("start-index", offset.to_string()));
    }
    if let Some(max_results) = max_results {
        params.push(("max-results", max_results.to_string()));
    }
}

/// Either-group first (`a%7Cb`), then excludes (`-a`), then includes.
fn filter_segments(filter: &TermFilter, encode: impl Fn(&str) -> String) -> Vec<String> {
    let mut segments = Vec::new();
    if !filter.alternatives().is_empty() {
        let group: Vec<String> = filter.alternatives().iter().map(|t| encode(t.as_str())).collect();
        segments.push(group.join("%7C"));
    }
    segments.extend(filter.excludes().iter().map(|t| format!("-{}", encode(t.as_str()))));
    segments.extend(filter.includes().iter().map(|t| encode(t.as_str())));
    segments
}

fn query_string(mut params: Vec<(&str, String)>) -> String {
    if params.is_empty() {
        return String::new();
    }
    params.sort_by(|a, b| a.0.cmp(b.0));
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &params {
        serializer.append_pair(key, value);
    }
    format!("?{}", serializer.finish())
}

fn encode_segment(term: &str) -> String {
    urlencoding::encode(term.trim()).into_owned()
}

/// Category path segments are capitalised: `news` -> `News`, `HOWTO` -> `Howto`.
fn capitalize(term: &str) -> String {
    let lower = term.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{OrderBy, Racy};
    use pretty_assertions::assert_eq;

    fn search() -> crate::request::SearchBuilder {
        SearchSpecification::builder()
    }

    #[test]
    fn query_only_has_no_path_filters() {
        let spec = search().query("penguin").build().unwrap();
        assert_eq!(
            build_feed_url(&spec).unwrap(),
            "http://gdata.youtube.com/feeds/videos?vq=penguin"
        );
    }

    #[test]
    fn multiword_query_is_form_encoded() {
        let spec = search().query("christina ricci").build().unwrap();
        assert_eq!(
            build_feed_url(&spec).unwrap(),
            "http://gdata.youtube.com/feeds/videos?vq=christina+ricci"
        );

        let spec = search().query("rock & roll/2?").build().unwrap();
        assert_eq!(
            build_feed_url(&spec).unwrap(),
            "http://gdata.youtube.com/feeds/videos?vq=rock+%26+roll%2F2%3F"
        );
    }

    #[test]
    fn tags_are_conjunctive_path_segments() {
        let spec = search().tags(["tiger", "leopard"]).build().unwrap();
        let first = build_feed_url(&spec).unwrap();
        assert_eq!(first, "http://gdata.youtube.com/feeds/videos/-/tiger/leopard");
        assert_eq!(build_feed_url(&spec).unwrap(), first);
    }

    #[test]
    fn categories_are_capitalised_before_tags() {
        let spec = search()
            .categories(["news", "sports"])
            .tags(["soccer", "football"])
            .build()
            .unwrap();
        assert_eq!(
            build_feed_url(&spec).unwrap(),
            "http://gdata.youtube.com/feeds/videos/-/News/Sports/soccer/football"
        );
    }

    #[test]
    fn either_and_exclude_terms() {
        let tags = TermFilter::new()
            .either("polo")
            .either("tennis")
            .exclude("soccer")
            .include("football");
        let spec = search().tag_filter(tags).exclude_category("music").build().unwrap();
        assert_eq!(
            build_feed_url(&spec).unwrap(),
            "http://gdata.youtube.com/feeds/videos/-/-Music/polo%7Ctennis/-soccer/football"
        );
    }

    #[test]
    fn tag_with_space_is_percent_encoded() {
        let spec = search().tags(["ice cream"]).build().unwrap();
        assert_eq!(
            build_feed_url(&spec).unwrap(),
            "http://gdata.youtube.com/feeds/videos/-/ice%20cream"
        );
    }

    #[test]
    fn parameters_are_sorted() {
        let spec = search()
            .query("penguin")
            .offset(26)
            .max_results(10)
            .order_by(OrderBy::ViewCount)
            .racy(Racy::Exclude)
            .only_embeddable(true)
            .author("zoo")
            .build()
            .unwrap();
        assert_eq!(
            build_feed_url(&spec).unwrap(),
            "http://gdata.youtube.com/feeds/videos?author=zoo&format=5&max-results=10&orderby=viewCount&racy=exclude&start-index=26&vq=penguin"
        );
    }

    #[test]
    fn custom_root_without_trailing_slash() {
        let builder = UrlBuilder::new("http://localhost:8080/feeds/");
        let spec = search().query("penguin").build().unwrap();
        assert_eq!(
            builder.search(&spec).unwrap(),
            "http://localhost:8080/feeds/videos?vq=penguin"
        );
    }

    #[test]
    fn standard_feeds() {
        let builder = UrlBuilder::default();
        assert_eq!(
            builder.standard(StandardFeed::TopRated, Some(TimeRange::Today)).unwrap(),
            "http://gdata.youtube.com/feeds/standardfeeds/top_rated?time=today"
        );
        assert_eq!(
            builder.standard(StandardFeed::MostRecent, None).unwrap(),
            "http://gdata.youtube.com/feeds/standardfeeds/most_recent"
        );
        let err = builder
            .standard(StandardFeed::MostRecent, Some(TimeRange::ThisWeek))
            .unwrap_err();
        assert!(err.is_invalid_spec());
    }

    #[test]
    fn user_feeds() {
        let builder = UrlBuilder::default();
        assert_eq!(
            builder.user(&UserFeedRequest::uploads("johnny")).unwrap(),
            "http://gdata.youtube.com/feeds/users/johnny/uploads"
        );
        assert_eq!(
            builder
                .user(&UserFeedRequest::favorites("johnny").offset(11).max_results(5))
                .unwrap(),
            "http://gdata.youtube.com/feeds/users/johnny/favorites?max-results=5&start-index=11"
        );
        assert!(builder.user(&UserFeedRequest::uploads(" ")).is_err());
        assert!(builder.user(&UserFeedRequest::uploads("johnny").offset(0)).is_err());
    }

    #[test]
    fn single_video() {
        let builder = UrlBuilder::default();
        assert_eq!(
            builder.video("IHVaXG1thXM").unwrap(),
            "http://gdata.youtube.com/feeds/videos/IHVaXG1thXM"
        );
        assert!(builder.video("").is_err());
        assert_eq!(
            video_url("IHVaXG1thXM").unwrap(),
            builder.video("IHVaXG1thXM").unwrap()
        );
    }

    #[test]
    fn default_root_helpers() {
        assert_eq!(
            standard_feed_url(StandardFeed::WatchOnMobile, None).unwrap(),
            "http://gdata.youtube.com/feeds/standardfeeds/watch_on_mobile"
        );
        assert_eq!(
            user_feed_url(&UserFeedRequest::uploads("zoo").max_results(50)).unwrap(),
            "http://gdata.youtube.com/feeds/users/zoo/uploads?max-results=50"
        );
    }

    #[test]
    fn capitalize_matches_category_terms() {
        assert_eq!(capitalize("news"), "News");
        assert_eq!(capitalize("HOWTO"), "Howto");
        assert_eq!(capitalize(""), "");
    }
}
