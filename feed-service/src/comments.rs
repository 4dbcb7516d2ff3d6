use futures::future::{BoxFuture, FutureExt};
use heronews_core::{CommentNode, CoreError, HnApiError, ItemId, Thread};
use hn_client::HackerNewsApi;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Loads a post and its full comment tree.
///
/// Comments are fetched one at a time, depth first, so the tree comes back in
/// the same order the remote lists `kids`. Deleted comments are pruned along
/// with their replies, which are never requested.
#[derive(Clone)]
pub struct CommentTreeLoader {
    api: Arc<dyn HackerNewsApi>,
}

impl CommentTreeLoader {
    pub fn new(api: Arc<dyn HackerNewsApi>) -> Self {
        Self { api }
    }

    pub async fn load_thread(&self, post_id: ItemId) -> Result<Thread, CoreError> {
        let root = self
            .api
            .fetch_item(post_id)
            .await?
            .ok_or(HnApiError::ItemNotFound { id: post_id })?;

        let mut comments = Vec::with_capacity(root.kids.len());
        for &kid in &root.kids {
            if let Some(node) = self.load_comment(kid, false).await {
                comments.push(node);
            }
        }

        let thread = Thread { root, comments };
        info!(
            "Loaded thread {} with {} comments",
            post_id,
            thread.comment_count()
        );
        Ok(thread)
    }

    fn load_comment(&self, id: ItemId, nested: bool) -> BoxFuture<'_, Option<CommentNode>> {
        async move {
            let comment = match self.api.fetch_item(id).await {
                Ok(Some(comment)) => comment,
                Ok(None) => {
                    debug!("Comment {} is null, skipping", id);
                    return None;
                }
                Err(e) => {
                    warn!("Failed to fetch comment {}: {}", id, e);
                    return None;
                }
            };

            if comment.deleted {
                debug!(
                    "Pruning deleted comment {} and {} direct replies",
                    id,
                    comment.kids.len()
                );
                return None;
            }

            let mut children = Vec::with_capacity(comment.kids.len());
            for &kid in &comment.kids {
                if let Some(child) = self.load_comment(kid, true).await {
                    children.push(child);
                }
            }

            Some(CommentNode {
                comment,
                children,
                nested,
            })
        }
        .boxed()
    }
}
