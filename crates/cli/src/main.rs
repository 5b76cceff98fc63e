// ABOUTME: CLI for querying and parsing video feeds with ytg-feed.
// ABOUTME: Builds feed URLs, fetches them or reads local XML, and prints the parsed result as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use ytg_feed::{
    parse_feed, parse_video_entry, Client, OrderBy, Racy, SearchSpecification, StandardFeed,
    TimeRange, UserFeedRequest, DEFAULT_ROOT,
};

/// Search and fetch video feeds and print JSON.
#[derive(Parser, Debug)]
#[command(name = "ytg")]
#[command(about = "Query video feeds and print parsed results as JSON", long_about = None)]
struct Args {
    /// Feed root to build URLs against.
    #[arg(long, global = true, default_value = DEFAULT_ROOT)]
    root: String,

    /// Print the feed URL instead of fetching it.
    #[arg(long, global = true, default_value_t = false)]
    url_only: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search videos by query, tags, categories, or author.
    Search(SearchArgs),

    /// Fetch a site-wide standard feed such as top_rated.
    Standard {
        feed: StandardFeed,
        /// today, this_week, this_month, or all_time
        #[arg(long)]
        time: Option<TimeRange>,
    },

    /// Fetch a user's uploads, or favorites with --favorites.
    User {
        name: String,
        #[arg(long, default_value_t = false)]
        favorites: bool,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        max_results: Option<u32>,
    },

    /// Look up a single video by id.
    Video { id: String },

    /// Parse a feed or entry document from a file, or "-" for stdin.
    Parse {
        target: String,
        /// The document is a single <entry> rather than a <feed>.
        #[arg(long, default_value_t = false)]
        entry: bool,
    },
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Free-text query.
    #[arg(short, long)]
    query: Option<String>,

    /// Tag every result must carry (repeatable).
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Tag no result may carry (repeatable).
    #[arg(long = "exclude-tag")]
    exclude_tags: Vec<String>,

    /// Category every result must be in (repeatable).
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Category no result may be in (repeatable).
    #[arg(long = "exclude-category")]
    exclude_categories: Vec<String>,

    #[arg(long)]
    offset: Option<u32>,

    #[arg(long)]
    max_results: Option<u32>,

    /// relevance, published, viewCount, or rating
    #[arg(long)]
    order_by: Option<OrderBy>,

    #[arg(long)]
    author: Option<String>,

    /// include or exclude restricted content
    #[arg(long)]
    racy: Option<Racy>,

    /// Only return videos that may be embedded.
    #[arg(long, default_value_t = false)]
    only_embeddable: bool,
}

impl SearchArgs {
    fn to_spec(&self) -> Result<SearchSpecification> {
        let mut builder = SearchSpecification::builder()
            .tags(self.tags.iter().cloned())
            .categories(self.categories.iter().cloned())
            .only_embeddable(self.only_embeddable);
        if let Some(query) = &self.query {
            builder = builder.query(query.clone());
        }
        for tag in &self.exclude_tags {
            builder = builder.exclude_tag(tag.clone());
        }
        for category in &self.exclude_categories {
            builder = builder.exclude_category(category.clone());
        }
        if let Some(offset) = self.offset {
            builder = builder.offset(offset);
        }
        if let Some(max_results) = self.max_results {
            builder = builder.max_results(max_results);
        }
        if let Some(order_by) = self.order_by {
            builder = builder.order_by(order_by);
        }
        if let Some(author) = &self.author {
            builder = builder.author(author.clone());
        }
        if let Some(racy) = self.racy {
            builder = builder.racy(racy);
        }
        Ok(builder.build()?)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    tracing::debug!(command = ?args.command, root = %args.root, "starting");

    if let Command::Parse { target, entry } = &args.command {
        let bytes = load_bytes(target)?;
        return if *entry {
            emit(&parse_video_entry(&bytes)?, args.compact)
        } else {
            emit(&parse_feed(&bytes)?, args.compact)
        };
    }

    let client = Client::builder()
        .root(args.root.clone())
        .build()
        .context("failed to build feed client")?;
    let urls = client.url_builder();

    if args.url_only {
        let url = match &args.command {
            Command::Search(search) => client.feed_url(&search.to_spec()?)?,
            Command::Standard { feed, time } => urls.standard(*feed, *time)?,
            Command::User {
                name,
                favorites,
                offset,
                max_results,
            } => urls.user(&user_request(name, *favorites, *offset, *max_results))?,
            Command::Video { id } => urls.video(id)?,
            Command::Parse { .. } => return Err(anyhow!("--url-only does not apply to parse")),
        };
        println!("{}", url);
        return Ok(());
    }

    match &args.command {
        Command::Search(search) => emit(&client.search(&search.to_spec()?)?, args.compact),
        Command::Standard { feed, time } => emit(&client.standard_feed(*feed, *time)?, args.compact),
        Command::User {
            name,
            favorites,
            offset,
            max_results,
        } => emit(
            &client.user_feed(&user_request(name, *favorites, *offset, *max_results))?,
            args.compact,
        ),
        Command::Video { id } => emit(&client.video_by(id)?, args.compact),
        Command::Parse { .. } => Ok(()),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn user_request(
    name: &str,
    favorites: bool,
    offset: Option<u32>,
    max_results: Option<u32>,
) -> UserFeedRequest {
    let mut request = if favorites {
        UserFeedRequest::favorites(name)
    } else {
        UserFeedRequest::uploads(name)
    };
    request.offset = offset;
    request.max_results = max_results;
    request
}

fn emit<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    if compact {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
