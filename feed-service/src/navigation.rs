use crate::comments::CommentTreeLoader;
use crate::pagination::PaginationController;
use crate::render::FeedRenderer;
use heronews_core::{ErrorReporter, FeedCategory, ItemId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    CategoryChanged(FeedCategory),
    LoadMore,
    OpenThread(ItemId),
}

/// Routes user navigation to the pagination controller and comment loader.
pub struct Navigator {
    pagination: Arc<PaginationController>,
    comments: CommentTreeLoader,
    renderer: Arc<dyn FeedRenderer>,
    reporter: ErrorReporter,
}

impl Navigator {
    pub fn new(
        pagination: Arc<PaginationController>,
        comments: CommentTreeLoader,
        renderer: Arc<dyn FeedRenderer>,
    ) -> Self {
        Self {
            pagination,
            comments,
            renderer,
            reporter: ErrorReporter::new(),
        }
    }

    pub async fn handle(&self, event: NavigationEvent) {
        match event {
            NavigationEvent::CategoryChanged(category) => {
                info!("Switching to {}", category);
                self.pagination.select_category(category).await;
            }
            NavigationEvent::LoadMore => {
                self.pagination.load_more().await;
            }
            NavigationEvent::OpenThread(post_id) => {
                match self.comments.load_thread(post_id).await {
                    Ok(thread) => self.renderer.show_thread(&thread),
                    Err(e) => self.reporter.report_error(&e),
                }
            }
        }
    }

    /// Consumes events until every sender is dropped. Each event is handled on
    /// its own task, so page requests arriving in a burst reach the throttle
    /// together.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<NavigationEvent>) {
        let mut in_flight = Vec::new();

        while let Some(event) = events.recv().await {
            debug!("Navigation event: {:?}", event);
            let navigator = Arc::clone(&self);
            in_flight.push(tokio::spawn(async move { navigator.handle(event).await }));
            in_flight.retain(|task: &tokio::task::JoinHandle<()>| !task.is_finished());
        }

        for task in in_flight {
            let _ = task.await;
        }
        debug!("Navigation channel closed");
    }
}
