use crate::render::FeedRenderer;
use heronews_core::{FeedCategory, FreshStory, Item, Thread};
use notify_rust::Notification;
use tracing::warn;

const APP_NAME: &str = "HeroNews";

/// Wraps a renderer and also raises a desktop notification for fresh stories.
pub struct DesktopNotifier<R> {
    inner: R,
}

impl<R: FeedRenderer> DesktopNotifier<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: FeedRenderer> FeedRenderer for DesktopNotifier<R> {
    fn show_feed(&self, category: FeedCategory, items: &[Item], replace: bool) {
        self.inner.show_feed(category, items, replace);
    }

    fn set_more_available(&self, more: bool) {
        self.inner.set_more_available(more);
    }

    fn show_thread(&self, thread: &Thread) {
        self.inner.show_thread(thread);
    }

    fn notify_fresh(&self, story: &FreshStory) {
        self.inner.notify_fresh(story);

        let result = Notification::new()
            .appname(APP_NAME)
            .summary("New story")
            .body(&format!("{} by {}", story.title, story.author))
            .show();

        if let Err(e) = result {
            warn!("Failed to show desktop notification: {}", e);
        }
    }
}
