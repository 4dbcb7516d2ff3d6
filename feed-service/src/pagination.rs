use crate::render::FeedRenderer;
use heronews_core::{FeedCategory, ItemId, Page};
use hn_client::{StoryListFetcher, Throttle, ThrottleError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Category and next page index of the feed being browsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSession {
    category: FeedCategory,
    page: usize,
}

impl FeedSession {
    pub fn new(category: FeedCategory) -> Self {
        Self { category, page: 0 }
    }

    pub fn category(&self) -> FeedCategory {
        self.category
    }

    /// Index of the page the next load will fetch.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn reset(&mut self, category: FeedCategory) {
        self.category = category;
        self.page = 0;
    }

    /// Claims the next page index for `category`, starting over at 0 when the
    /// category differs from the current one.
    pub fn advance(&mut self, category: FeedCategory) -> usize {
        if category != self.category {
            self.reset(category);
        }
        let page = self.page;
        self.page += 1;
        page
    }
}

/// Id of the newest story the user has been shown. Shared with the
/// freshness check.
#[derive(Debug, Clone, Default)]
pub struct LastSeen(Arc<RwLock<Option<ItemId>>>);

impl LastSeen {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<ItemId> {
        *self.0.read().await
    }

    pub async fn set(&self, id: ItemId) {
        *self.0.write().await = Some(id);
    }
}

/// Outcome of one executed page load.
#[derive(Debug, Clone)]
pub struct PageLoad {
    pub category: FeedCategory,
    pub page_index: usize,
    pub page: Page,
}

/// Drives page loads for the active category through a throttle, so bursts
/// of requests collapse into at most one load per window.
pub struct PaginationController {
    throttle: Throttle<FeedCategory, PageLoad>,
    session: Arc<Mutex<FeedSession>>,
    last_seen: LastSeen,
    renderer: Arc<dyn FeedRenderer>,
}

impl PaginationController {
    pub fn new(
        fetcher: StoryListFetcher,
        renderer: Arc<dyn FeedRenderer>,
        window: Duration,
    ) -> Self {
        Self::with_last_seen(fetcher, renderer, window, LastSeen::new())
    }

    pub fn with_last_seen(
        fetcher: StoryListFetcher,
        renderer: Arc<dyn FeedRenderer>,
        window: Duration,
        last_seen: LastSeen,
    ) -> Self {
        let session = Arc::new(Mutex::new(FeedSession::default()));

        let throttle = {
            let session = Arc::clone(&session);
            Throttle::new(window, move |category: FeedCategory| {
                let session = Arc::clone(&session);
                let fetcher = fetcher.clone();
                async move {
                    // The index is claimed when the load runs, not when it was requested
                    let page_index = session.lock().await.advance(category);
                    debug!("Loading {} page {}", category, page_index);
                    let page = fetcher.fetch_page(category, page_index).await;
                    PageLoad {
                        category,
                        page_index,
                        page,
                    }
                }
            })
        };

        Self {
            throttle,
            session,
            last_seen,
            renderer,
        }
    }

    /// Requests the next page of `category` and renders it.
    ///
    /// Returns `None` when a later request superseded this one inside the
    /// throttle window; nothing is rendered in that case.
    pub async fn load_page(&self, category: FeedCategory) -> Option<PageLoad> {
        let load = match self.throttle.call(category).await {
            Ok(load) => load,
            Err(ThrottleError::Superseded) => {
                debug!("Page request for {} superseded", category);
                return None;
            }
        };

        self.renderer
            .show_feed(load.category, &load.page.items, load.page_index == 0);

        if let Some(first) = load.page.items.first() {
            self.last_seen.set(first.id).await;
        }

        self.renderer.set_more_available(load.page.has_more);

        info!(
            "Rendered {} page {} ({} items, more: {})",
            load.category,
            load.page_index,
            load.page.items.len(),
            load.page.has_more
        );

        Some(load)
    }

    /// Switches to `category` and loads its first page.
    pub async fn select_category(&self, category: FeedCategory) -> Option<PageLoad> {
        self.session.lock().await.reset(category);
        self.load_page(category).await
    }

    /// Loads the next page of the current category.
    pub async fn load_more(&self) -> Option<PageLoad> {
        let category = self.session.lock().await.category();
        self.load_page(category).await
    }

    pub async fn session(&self) -> FeedSession {
        *self.session.lock().await
    }

    pub fn last_seen(&self) -> LastSeen {
        self.last_seen.clone()
    }
}
