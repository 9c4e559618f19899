//! Client core for a sectioned home content feed and keyword search.
//!
//! Two independent orchestrators sit on top of a single fetch port
//! ([`ContentSource`]): [`HomeFeed`] pages through the backend's home
//! sections and merges each page into a position-stable feed, and [`Search`]
//! turns raw query edits into debounced, de-duplicated fetches. Both publish
//! their state through `tokio::sync::watch` snapshots for whatever
//! presentation layer sits on top.

pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod merge;
pub mod search;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{FeedError, Result};
pub use feed::{HomeFeed, HomeFeedState};
pub use http::HttpContentSource;
pub use merge::merge_sections;
pub use search::{Search, SearchState, DEFAULT_DEBOUNCE};
pub use source::ContentSource;
pub use types::{
    ContentItem, HomeSectionsResponse, Pagination, Remote, SearchResponse, SearchResult, Section,
};
