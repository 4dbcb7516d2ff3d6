use crate::pagination::LastSeen;
use crate::render::FeedRenderer;
use heronews_core::{CoreError, ErrorReporter, FreshStory, HnApiError, ItemId, StoryList};
use hn_client::{HackerNewsApi, Throttle, ThrottleError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Compares the head of the new-stories list against the last story shown.
pub struct FreshnessCheck {
    api: Arc<dyn HackerNewsApi>,
    last_seen: LastSeen,
    last_notified: Mutex<Option<ItemId>>,
}

impl FreshnessCheck {
    pub fn new(api: Arc<dyn HackerNewsApi>, last_seen: LastSeen) -> Self {
        Self {
            api,
            last_seen,
            last_notified: Mutex::new(None),
        }
    }

    /// Returns a notice when the newest story differs from the last one shown
    /// and has not already been announced.
    pub async fn check(&self) -> Result<Option<FreshStory>, CoreError> {
        let ids = self.api.fetch_story_ids(StoryList::New).await?;
        let Some(&newest_id) = ids.first() else {
            debug!("New stories list is empty");
            return Ok(None);
        };

        let newest = self
            .api
            .fetch_item(newest_id)
            .await?
            .ok_or(HnApiError::ItemNotFound { id: newest_id })?;

        if self.last_seen.get().await == Some(newest.id) {
            return Ok(None);
        }

        let mut last_notified = self.last_notified.lock().await;
        if *last_notified == Some(newest.id) {
            return Ok(None);
        }
        *last_notified = Some(newest.id);

        Ok(Some(FreshStory::from(&newest)))
    }
}

/// Runs [`FreshnessCheck`] on a fixed period in a background task.
pub struct FreshnessPoller;

impl FreshnessPoller {
    /// Starts polling. The first check runs one `period` after spawning.
    pub fn spawn(
        check: FreshnessCheck,
        renderer: Arc<dyn FeedRenderer>,
        period: Duration,
    ) -> PollerHandle {
        let check = Arc::new(check);
        let throttle = Throttle::new(period, move |()| {
            let check = Arc::clone(&check);
            async move { check.check().await }
        });

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let reporter = ErrorReporter::new();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!("Freshness poller started, checking every {:?}", period);

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {}
                }

                let outcome = tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    outcome = throttle.call(()) => outcome,
                };

                match outcome {
                    Ok(Ok(Some(story))) => {
                        info!("New story {} available: {}", story.id, story.title);
                        renderer.notify_fresh(&story);
                    }
                    Ok(Ok(None)) => debug!("No new stories"),
                    Ok(Err(e)) => reporter.report_warning(&e),
                    Err(ThrottleError::Superseded) => debug!("Freshness check superseded"),
                }
            }

            info!("Freshness poller stopped");
        });

        PollerHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

/// Owns the poller task. Dropping the handle aborts the task.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Stops the poller and waits for its task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
