//! In-memory [`HackerNewsApi`] for tests and offline runs.

use crate::api::HackerNewsApi;
use async_trait::async_trait;
use heronews_core::{CoreError, HnApiError, Item, ItemId, ItemKind, StoryList};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockHackerNewsApi {
    lists: Mutex<HashMap<StoryList, Vec<ItemId>>>,
    items: Mutex<HashMap<ItemId, Item>>,
    failing_lists: Mutex<HashMap<StoryList, u16>>,
    failing_items: Mutex<HashSet<ItemId>>,
    item_requests: Mutex<Vec<ItemId>>,
    list_requests: Mutex<Vec<StoryList>>,
}

impl MockHackerNewsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, list: StoryList, ids: Vec<ItemId>) -> Self {
        self.set_list(list, ids);
        self
    }

    pub fn with_items(self, items: impl IntoIterator<Item = Item>) -> Self {
        for item in items {
            self.insert_item(item);
        }
        self
    }

    pub fn set_list(&self, list: StoryList, ids: Vec<ItemId>) {
        lock(&self.lists).insert(list, ids);
    }

    pub fn insert_item(&self, item: Item) {
        lock(&self.items).insert(item.id, item);
    }

    /// Makes every request for `list` answer with HTTP `status`.
    pub fn fail_list(&self, list: StoryList, status: u16) {
        lock(&self.failing_lists).insert(list, status);
    }

    pub fn fail_item(&self, id: ItemId) {
        lock(&self.failing_items).insert(id);
    }

    pub fn clear_failures(&self) {
        lock(&self.failing_lists).clear();
        lock(&self.failing_items).clear();
    }

    /// Item ids requested so far, in request order.
    pub fn item_requests(&self) -> Vec<ItemId> {
        lock(&self.item_requests).clone()
    }

    pub fn list_requests(&self) -> Vec<StoryList> {
        lock(&self.list_requests).clone()
    }
}

#[async_trait]
impl HackerNewsApi for MockHackerNewsApi {
    async fn fetch_item(&self, id: ItemId) -> Result<Option<Item>, CoreError> {
        lock(&self.item_requests).push(id);

        if lock(&self.failing_items).contains(&id) {
            return Err(CoreError::HnApi(HnApiError::Remote {
                status: 500,
                endpoint: format!("/item/{}.json", id),
            }));
        }
        Ok(lock(&self.items).get(&id).cloned())
    }

    async fn fetch_story_ids(&self, list: StoryList) -> Result<Vec<ItemId>, CoreError> {
        lock(&self.list_requests).push(list);

        if let Some(status) = lock(&self.failing_lists).get(&list).copied() {
            return Err(CoreError::HnApi(HnApiError::Remote {
                status,
                endpoint: format!("/{}.json", list.endpoint()),
            }));
        }
        Ok(lock(&self.lists).get(&list).cloned().unwrap_or_default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Bare item of the given kind.
pub fn item(id: ItemId, kind: ItemKind) -> Item {
    Item {
        id,
        kind: Some(kind),
        by: Some(format!("user{}", id)),
        time: Some(1_700_000_000 + id as i64),
        title: None,
        url: None,
        score: None,
        descendants: None,
        kids: Vec::new(),
        text: None,
        parent: None,
        deleted: false,
        dead: false,
    }
}

pub fn story(id: ItemId, title: &str) -> Item {
    Item {
        title: Some(title.to_string()),
        score: Some(1),
        descendants: Some(0),
        ..item(id, ItemKind::Story)
    }
}

pub fn poll(id: ItemId, title: &str) -> Item {
    Item {
        title: Some(title.to_string()),
        ..item(id, ItemKind::Poll)
    }
}

pub fn comment(id: ItemId, kids: Vec<ItemId>) -> Item {
    Item {
        text: Some(format!("comment {}", id)),
        kids,
        ..item(id, ItemKind::Comment)
    }
}

pub fn deleted_comment(id: ItemId, kids: Vec<ItemId>) -> Item {
    Item {
        by: None,
        text: None,
        deleted: true,
        ..comment(id, kids)
    }
}
