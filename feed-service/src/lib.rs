pub mod comments;
pub mod freshness;
pub mod navigation;
#[cfg(feature = "desktop")]
pub mod notify;
pub mod pagination;
pub mod render;

pub use comments::CommentTreeLoader;
pub use freshness::{FreshnessCheck, FreshnessPoller, PollerHandle};
pub use navigation::{NavigationEvent, Navigator};
#[cfg(feature = "desktop")]
pub use notify::DesktopNotifier;
pub use pagination::{FeedSession, LastSeen, PageLoad, PaginationController};
pub use render::FeedRenderer;
