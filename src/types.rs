use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// One page of the home feed as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeSectionsResponse {
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// A named, ordered shelf of content items. `order` is the merge join key:
/// later pages deliver more items for the same `order` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "name")]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(rename = "content")]
    pub items: Vec<ContentItem>,
}

/// A single content unit inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, rename = "audiobook_id")]
    pub id: Option<String>,
    #[serde(default, rename = "name")]
    pub title: Option<String>,
    #[serde(default, rename = "author_name")]
    pub subtitle: Option<String>,
    #[serde(default, rename = "avatar_url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, rename = "score")]
    pub episode_number: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub next_page: String,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_count: u32,
    pub query: String,
}

/// Search hit. Same shape as [`ContentItem`] but with the search endpoint's
/// own field names and a relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub episode_number: Option<f64>,
    #[serde(default)]
    pub relevance_score: Option<f32>,
}

/// Tri-state outcome of an asynchronous fetch, consumed by observers as a
/// discriminated value rather than a thrown error.
#[derive(Debug)]
pub enum Remote<T> {
    Loading,
    Success(T),
    Error(FeedError),
}
