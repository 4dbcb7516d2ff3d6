use heronews_core::{FeedCategory, FreshStory, Item, Thread};

/// Presentation surface driven by the feed service.
pub trait FeedRenderer: Send + Sync {
    /// Shows a feed page. `replace` is set for the first page of a category.
    fn show_feed(&self, category: FeedCategory, items: &[Item], replace: bool);

    /// Toggles the "load more" affordance.
    fn set_more_available(&self, more: bool);

    fn show_thread(&self, thread: &Thread);

    /// Surfaces an advisory notice. It stays up until the next notice replaces it.
    fn notify_fresh(&self, story: &FreshStory);
}
