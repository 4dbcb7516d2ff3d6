use crate::api::HackerNewsApi;
use futures::future::try_join_all;
use heronews_core::{CoreError, FeedCategory, Item, Page, PAGE_SIZE};
use std::sync::Arc;
use tracing::{debug, error};

/// Resolves one page of a feed category into full records.
#[derive(Clone)]
pub struct StoryListFetcher {
    api: Arc<dyn HackerNewsApi>,
    page_size: usize,
}

impl StoryListFetcher {
    pub fn new(api: Arc<dyn HackerNewsApi>) -> Self {
        Self::with_page_size(api, PAGE_SIZE)
    }

    pub fn with_page_size(api: Arc<dyn HackerNewsApi>, page_size: usize) -> Self {
        Self { api, page_size }
    }

    /// Fetches page `page` of `category`, failing soft: any upstream error is
    /// logged and yields an empty page.
    pub async fn fetch_page(&self, category: FeedCategory, page: usize) -> Page {
        match self.try_fetch_page(category, page).await {
            Ok(page) => page,
            Err(e) => {
                error!("Error fetching {} page {}: {}", category, page, e);
                Page::empty()
            }
        }
    }

    pub async fn try_fetch_page(
        &self,
        category: FeedCategory,
        page: usize,
    ) -> Result<Page, CoreError> {
        let ids = self.api.fetch_story_ids(category.story_list()).await?;

        let start = page.saturating_mul(self.page_size).min(ids.len());
        let end = start.saturating_add(self.page_size).min(ids.len());
        let slice = &ids[start..end];

        // Resolved concurrently; try_join_all keeps slice order.
        let resolved = try_join_all(slice.iter().map(|&id| self.api.fetch_item(id))).await?;

        let fetched = slice.len();
        let items: Vec<Item> = resolved
            .into_iter()
            .flatten()
            .filter(|item| !category.filters_polls() || item.is_poll())
            .collect();

        debug!(
            "Resolved {} of {} ids for {} page {}",
            items.len(),
            fetched,
            category,
            page
        );

        Ok(Page {
            items,
            fetched,
            has_more: fetched == self.page_size,
        })
    }
}
