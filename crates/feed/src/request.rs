// ABOUTME: Typed search requests: SearchSpecification, term filters, paging, and feed selectors.
// ABOUTME: SearchBuilder validates a request once so URL building never sees an empty search.

use std::fmt;

use crate::error::FeedError;

/// Start index the service uses when none is requested.
pub const SERVICE_DEFAULT_OFFSET: u32 = 1;
/// Page size the service uses when none is requested.
pub const SERVICE_DEFAULT_MAX_RESULTS: u32 = 25;

/// Paging window: 1-based offset plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub offset: u32,
    pub max_results: u32,
}

impl Default for Paging {
    /// The service defaults: offset 1, 25 results per page.
    fn default() -> Self {
        Self {
            offset: SERVICE_DEFAULT_OFFSET,
            max_results: SERVICE_DEFAULT_MAX_RESULTS,
        }
    }
}

/// Tag or category terms.
///
/// `include` terms must all match, `exclude` terms must not match, and at
/// least one `either` term must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    either: Vec<String>,
}

impl TermFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conjunctive filter over every given term.
    pub fn all<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: terms.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn include(mut self, term: impl Into<String>) -> Self {
        self.include.push(term.into());
        self
    }

    pub fn exclude(mut self, term: impl Into<String>) -> Self {
        self.exclude.push(term.into());
        self
    }

    pub fn either(mut self, term: impl Into<String>) -> Self {
        self.either.push(term.into());
        self
    }

    pub fn includes(&self) -> &[String] {
        &self.include
    }

    pub fn excludes(&self) -> &[String] {
        &self.exclude
    }

    pub fn alternatives(&self) -> &[String] {
        &self.either
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty() && self.either.is_empty()
    }

    fn validate(&self, kind: &str) -> Result<(), FeedError> {
        let all = self.include.iter().chain(&self.exclude).chain(&self.either);
        for term in all {
            if term.trim().is_empty() {
                return Err(FeedError::invalid_spec(format!("{} terms must not be blank", kind)));
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for TermFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TermFilter::all(iter)
    }
}

/// Result ordering accepted by the `orderby` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Relevance,
    Published,
    ViewCount,
    Rating,
}

impl OrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::Relevance => "relevance",
            OrderBy::Published => "published",
            OrderBy::ViewCount => "viewCount",
            OrderBy::Rating => "rating",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderBy {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "relevance" => Ok(OrderBy::Relevance),
            "published" => Ok(OrderBy::Published),
            "viewcount" | "view_count" | "views" => Ok(OrderBy::ViewCount),
            "rating" => Ok(OrderBy::Rating),
            other => Err(FeedError::invalid_spec(format!("unknown ordering: {}", other))),
        }
    }
}

/// Whether restricted content may appear in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Racy {
    Include,
    Exclude,
}

impl Racy {
    pub fn as_str(self) -> &'static str {
        match self {
            Racy::Include => "include",
            Racy::Exclude => "exclude",
        }
    }
}

impl std::str::FromStr for Racy {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "include" => Ok(Racy::Include),
            "exclude" => Ok(Racy::Exclude),
            other => Err(FeedError::invalid_spec(format!("unknown racy setting: {}", other))),
        }
    }
}

/// A validated video search. Build one with [`SearchSpecification::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpecification {
    query: Option<String>,
    tags: TermFilter,
    categories: TermFilter,
    offset: Option<u32>,
    max_results: Option<u32>,
    order_by: Option<OrderBy>,
    author: Option<String>,
    racy: Option<Racy>,
    only_embeddable: bool,
}

impl SearchSpecification {
    pub fn builder() -> SearchBuilder {
        SearchBuilder::default()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn tags(&self) -> &TermFilter {
        &self.tags
    }

    pub fn categories(&self) -> &TermFilter {
        &self.categories
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn max_results(&self) -> Option<u32> {
        self.max_results
    }

    pub fn order_by(&self) -> Option<OrderBy> {
        self.order_by
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn racy(&self) -> Option<Racy> {
        self.racy
    }

    pub fn only_embeddable(&self) -> bool {
        self.only_embeddable
    }

    /// Fills unset paging from configured defaults.
    ///
    /// A default is only written when it differs from the service's own
    /// default, so URLs stay minimal under the stock configuration.
    pub fn with_default_paging(&self, paging: &Paging) -> SearchSpecification {
        let service = Paging::default();
        let mut spec = self.clone();
        if spec.offset.is_none() && paging.offset != service.offset {
            spec.offset = Some(paging.offset);
        }
        if spec.max_results.is_none() && paging.max_results != service.max_results {
            spec.max_results = Some(paging.max_results);
        }
        spec
    }

    /// Checks the request has something to search by and sane values.
    ///
    /// There is no "list everything" search: a request without query, tag
    /// terms, category terms, or author is rejected. Standard feeds cover the
    /// unfiltered listings.
    pub fn validate(&self) -> Result<(), FeedError> {
        if let Some(query) = &self.query {
            if query.trim().is_empty() {
                return Err(FeedError::invalid_spec("query must not be blank"));
            }
        }
        if let Some(author) = &self.author {
            if author.trim().is_empty() {
                return Err(FeedError::invalid_spec("author must not be blank"));
            }
        }
        self.tags.validate("tag")?;
        self.categories.validate("category")?;
        validate_paging(self.offset, self.max_results)?;

        if self.query.is_none()
            && self.author.is_none()
            && self.tags.is_empty()
            && self.categories.is_empty()
        {
            return Err(FeedError::invalid_spec(
                "nothing to search by: set a query, tags, categories, or author",
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_paging(offset: Option<u32>, max_results: Option<u32>) -> Result<(), FeedError> {
    if offset == Some(0) {
        return Err(FeedError::invalid_spec("offset is 1-based and must be at least 1"));
    }
    if max_results == Some(0) {
        return Err(FeedError::invalid_spec("max_results must be at least 1"));
    }
    Ok(())
}

/// Fluent builder for [`SearchSpecification`].
#[derive(Debug, Clone, Default)]
pub struct SearchBuilder {
    query: Option<String>,
    tags: TermFilter,
    categories: TermFilter,
    offset: Option<u32>,
    max_results: Option<u32>,
    order_by: Option<OrderBy>,
    author: Option<String>,
    racy: Option<Racy>,
    only_embeddable: bool,
}

impl SearchBuilder {
    /// Free-text query.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Replaces the tag filter.
    pub fn tag_filter(mut self, filter: TermFilter) -> Self {
        self.tags = filter;
        self
    }

    /// Adds tags that must all match.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.tags = self.tags.include(tag);
        }
        self
    }

    pub fn exclude_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags = self.tags.exclude(tag);
        self
    }

    /// Replaces the category filter.
    pub fn category_filter(mut self, filter: TermFilter) -> Self {
        self.categories = filter;
        self
    }

    /// Adds categories that must all match, e.g. `news`, `sports`.
    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for category in categories {
            self.categories = self.categories.include(category);
        }
        self
    }

    pub fn exclude_category(mut self, category: impl Into<String>) -> Self {
        self.categories = self.categories.exclude(category);
        self
    }

    /// 1-based index of the first result.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Restrict to videos uploaded by this user.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn racy(mut self, racy: Racy) -> Self {
        self.racy = Some(racy);
        self
    }

    /// Restrict to videos that can be embedded.
    pub fn only_embeddable(mut self, only: bool) -> Self {
        self.only_embeddable = only;
        self
    }

    /// Validates and freezes the request.
    pub fn build(self) -> Result<SearchSpecification, FeedError> {
        let spec = SearchSpecification {
            query: self.query,
            tags: self.tags,
            categories: self.categories,
            offset: self.offset,
            max_results: self.max_results,
            order_by: self.order_by,
            author: self.author,
            racy: self.racy,
            only_embeddable: self.only_embeddable,
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Service-curated listings under `standardfeeds/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFeed {
    TopRated,
    TopFavorites,
    MostViewed,
    MostRecent,
    MostDiscussed,
    MostLinked,
    MostResponded,
    RecentlyFeatured,
    WatchOnMobile,
}

impl StandardFeed {
    pub fn as_str(self) -> &'static str {
        match self {
            StandardFeed::TopRated => "top_rated",
            StandardFeed::TopFavorites => "top_favorites",
            StandardFeed::MostViewed => "most_viewed",
            StandardFeed::MostRecent => "most_recent",
            StandardFeed::MostDiscussed => "most_discussed",
            StandardFeed::MostLinked => "most_linked",
            StandardFeed::MostResponded => "most_responded",
            StandardFeed::RecentlyFeatured => "recently_featured",
            StandardFeed::WatchOnMobile => "watch_on_mobile",
        }
    }

    /// Whether the feed accepts a `time` window.
    pub fn accepts_time_range(self) -> bool {
        matches!(
            self,
            StandardFeed::TopRated
                | StandardFeed::TopFavorites
                | StandardFeed::MostViewed
                | StandardFeed::MostDiscussed
                | StandardFeed::MostLinked
                | StandardFeed::MostResponded
        )
    }
}

impl std::str::FromStr for StandardFeed {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let feed = match s.to_lowercase().replace('-', "_").as_str() {
            "top_rated" => StandardFeed::TopRated,
            "top_favorites" => StandardFeed::TopFavorites,
            "most_viewed" => StandardFeed::MostViewed,
            "most_recent" => StandardFeed::MostRecent,
            "most_discussed" => StandardFeed::MostDiscussed,
            "most_linked" => StandardFeed::MostLinked,
            "most_responded" => StandardFeed::MostResponded,
            "recently_featured" => StandardFeed::RecentlyFeatured,
            "watch_on_mobile" => StandardFeed::WatchOnMobile,
            other => {
                return Err(FeedError::invalid_spec(format!("unknown standard feed: {}", other)))
            }
        };
        Ok(feed)
    }
}

/// Time window for standard feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Today,
    ThisWeek,
    ThisMonth,
    AllTime,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Today => "today",
            TimeRange::ThisWeek => "this_week",
            TimeRange::ThisMonth => "this_month",
            TimeRange::AllTime => "all_time",
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "today" => Ok(TimeRange::Today),
            "this_week" => Ok(TimeRange::ThisWeek),
            "this_month" => Ok(TimeRange::ThisMonth),
            "all_time" => Ok(TimeRange::AllTime),
            other => Err(FeedError::invalid_spec(format!("unknown time range: {}", other))),
        }
    }
}

/// Which per-user listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFeedKind {
    Uploads,
    Favorites,
}

/// Uploads or favorites of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFeedRequest {
    pub user: String,
    pub kind: UserFeedKind,
    pub offset: Option<u32>,
    pub max_results: Option<u32>,
}

impl UserFeedRequest {
    pub fn uploads(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            kind: UserFeedKind::Uploads,
            offset: None,
            max_results: None,
        }
    }

    pub fn favorites(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            kind: UserFeedKind::Favorites,
            offset: None,
            max_results: None,
        }
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_is_rejected() {
        let err = SearchSpecification::builder().build().unwrap_err();
        assert!(err.is_invalid_spec());

        let err = SearchSpecification::builder().offset(3).build().unwrap_err();
        assert!(err.is_invalid_spec());
    }

    #[test]
    fn blank_values_are_rejected() {
        assert!(SearchSpecification::builder().query("  ").build().is_err());
        assert!(SearchSpecification::builder().tags(["tiger", ""]).build().is_err());
        assert!(SearchSpecification::builder()
            .query("penguin")
            .max_results(0)
            .build()
            .is_err());
        assert!(SearchSpecification::builder()
            .query("penguin")
            .offset(0)
            .build()
            .is_err());
    }

    #[test]
    fn any_single_filter_is_enough() {
        assert!(SearchSpecification::builder().query("penguin").build().is_ok());
        assert!(SearchSpecification::builder().tags(["panther"]).build().is_ok());
        assert!(SearchSpecification::builder().categories(["news"]).build().is_ok());
        assert!(SearchSpecification::builder().author("someone").build().is_ok());
        assert!(SearchSpecification::builder()
            .tag_filter(TermFilter::new().exclude("soccer"))
            .build()
            .is_ok());
    }

    #[test]
    fn default_paging_only_fills_non_service_values() {
        let spec = SearchSpecification::builder().query("penguin").build().unwrap();

        let stock = spec.with_default_paging(&Paging::default());
        assert_eq!(stock.offset(), None);
        assert_eq!(stock.max_results(), None);

        let custom = spec.with_default_paging(&Paging {
            offset: 1,
            max_results: 10,
        });
        assert_eq!(custom.offset(), None);
        assert_eq!(custom.max_results(), Some(10));

        let explicit = SearchSpecification::builder()
            .query("penguin")
            .max_results(5)
            .build()
            .unwrap()
            .with_default_paging(&Paging {
                offset: 1,
                max_results: 10,
            });
        assert_eq!(explicit.max_results(), Some(5));
    }

    #[test]
    fn parses_feed_names() {
        assert_eq!("top_rated".parse::<StandardFeed>().unwrap(), StandardFeed::TopRated);
        assert_eq!("most-viewed".parse::<StandardFeed>().unwrap(), StandardFeed::MostViewed);
        assert!("hottest".parse::<StandardFeed>().is_err());
        assert_eq!("this_week".parse::<TimeRange>().unwrap(), TimeRange::ThisWeek);
    }

    #[test]
    fn parses_order_and_racy() {
        assert_eq!("viewCount".parse::<OrderBy>().unwrap(), OrderBy::ViewCount);
        assert_eq!("view-count".parse::<OrderBy>().unwrap(), OrderBy::ViewCount);
        assert_eq!("relevance".parse::<OrderBy>().unwrap(), OrderBy::Relevance);
        assert!("viewcont".parse::<OrderBy>().unwrap_err().is_invalid_spec());
        assert!("".parse::<OrderBy>().is_err());

        assert_eq!("exclude".parse::<Racy>().unwrap(), Racy::Exclude);
        assert_eq!("Include".parse::<Racy>().unwrap(), Racy::Include);
        assert!("maybe".parse::<Racy>().unwrap_err().is_invalid_spec());
    }
}
