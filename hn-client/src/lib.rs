pub mod api;
pub mod metrics;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod stories;
pub mod throttle;

#[cfg(test)]
mod tests;

pub use api::{HackerNewsApi, HackerNewsClient};
pub use stories::StoryListFetcher;
pub use throttle::{Throttle, ThrottleError, ThrottleState};
