use async_trait::async_trait;

use crate::error::Result;
use crate::types::{HomeSectionsResponse, SearchResponse};

/// The fetch port the orchestrators talk through: one page of home sections,
/// or one keyword search. Implemented by the HTTP layer, stubbed in tests.
#[async_trait]
pub trait ContentSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn home_sections(&self, page: u32) -> Result<HomeSectionsResponse>;
    async fn search(&self, query: &str) -> Result<SearchResponse>;
}
