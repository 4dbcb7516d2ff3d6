use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of identifiers consumed from an upstream list per page.
pub const PAGE_SIZE: usize = 20;

pub type ItemId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Job,
    Poll,
    Comment,
    #[serde(other)]
    Other,
}

/// A single record from the upstream API. Every field except `id` may be
/// absent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
    pub by: Option<String>,
    pub time: Option<i64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub score: Option<i64>,
    pub descendants: Option<u64>,
    #[serde(default)]
    pub kids: Vec<ItemId>,
    pub text: Option<String>,
    pub parent: Option<ItemId>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
}

impl Item {
    pub fn is_poll(&self) -> bool {
        self.kind == Some(ItemKind::Poll)
    }

    pub fn author(&self) -> &str {
        self.by.as_deref().unwrap_or("[unknown]")
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("[untitled]")
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.time.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

/// Upstream identifier lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoryList {
    New,
    Top,
    Job,
}

impl StoryList {
    pub fn endpoint(&self) -> &'static str {
        match self {
            StoryList::New => "newstories",
            StoryList::Top => "topstories",
            StoryList::Job => "jobstories",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedCategory {
    #[default]
    Stories,
    Jobs,
    Polls,
}

impl FeedCategory {
    pub fn story_list(&self) -> StoryList {
        match self {
            FeedCategory::Stories => StoryList::New,
            FeedCategory::Jobs => StoryList::Job,
            // topstories is the only list that carries polls
            FeedCategory::Polls => StoryList::Top,
        }
    }

    /// Whether resolved items are filtered down to polls after fetching.
    pub fn filters_polls(&self) -> bool {
        matches!(self, FeedCategory::Polls)
    }
}

impl fmt::Display for FeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedCategory::Stories => "stories",
            FeedCategory::Jobs => "jobs",
            FeedCategory::Polls => "polls",
        };
        f.write_str(name)
    }
}

impl FromStr for FeedCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stories" => Ok(FeedCategory::Stories),
            "jobs" => Ok(FeedCategory::Jobs),
            "polls" => Ok(FeedCategory::Polls),
            other => Err(CoreError::InvalidInput {
                message: format!("unknown feed category '{}'", other),
            }),
        }
    }
}

/// One page of a feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records left after null items and the category filter were dropped.
    pub items: Vec<Item>,
    /// Identifiers consumed from the upstream list for this page.
    pub fetched: usize,
    pub has_more: bool,
}

impl Page {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub comment: Item,
    pub children: Vec<CommentNode>,
    /// True when the parent is another comment rather than the thread root.
    pub nested: bool,
}

impl CommentNode {
    /// Number of comments in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(CommentNode::subtree_len).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub root: Item,
    pub comments: Vec<CommentNode>,
}

impl Thread {
    pub fn comment_count(&self) -> usize {
        self.comments.iter().map(CommentNode::subtree_len).sum()
    }
}

/// Advisory "new story available" notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshStory {
    pub id: ItemId,
    pub title: String,
    pub author: String,
}

impl From<&Item> for FreshStory {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title().to_string(),
            author: item.author().to_string(),
        }
    }
}
