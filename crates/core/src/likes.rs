//! Per-visitor likes on blog posts.
//!
//! A like is a `(post, visitor)` pair, so one browser counts once per post.

use std::future::Future;

use serde::Serialize;
use tracing::instrument;

use crate::error::ContentError;
use crate::types::{PostId, VisitorId};

/// Like count for a post, from one visitor's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LikeTally {
    pub count: i64,
    pub liked: bool,
}

pub trait LikeStore: Send + Sync {
    fn tally(
        &self,
        post_id: PostId,
        visitor: Option<VisitorId>,
    ) -> impl Future<Output = Result<LikeTally, ContentError>> + Send;

    /// Record a like. Returns `false` if it already existed.
    fn add_like(
        &self,
        post_id: PostId,
        visitor: VisitorId,
    ) -> impl Future<Output = Result<bool, ContentError>> + Send;

    /// Remove a like. Returns `false` if there was none.
    fn remove_like(
        &self,
        post_id: PostId,
        visitor: VisitorId,
    ) -> impl Future<Output = Result<bool, ContentError>> + Send;
}

pub struct LikeCounter<'a, S> {
    store: &'a S,
}

impl<'a, S: LikeStore> LikeCounter<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns the store error.
    pub async fn tally(
        &self,
        post_id: PostId,
        visitor: Option<VisitorId>,
    ) -> Result<LikeTally, ContentError> {
        self.store.tally(post_id, visitor).await
    }

    /// Like the post, or take the like back if the visitor already liked it.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    #[instrument(skip(self))]
    pub async fn toggle(
        &self,
        post_id: PostId,
        visitor: VisitorId,
    ) -> Result<LikeTally, ContentError> {
        let current = self.store.tally(post_id, Some(visitor)).await?;
        if current.liked {
            self.store.remove_like(post_id, visitor).await?;
        } else {
            self.store.add_like(post_id, visitor).await?;
        }
        self.store.tally(post_id, Some(visitor)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_toggle_likes_then_unlikes() {
        let store = MemoryStore::new();
        let likes = LikeCounter::new(&store);
        let post = PostId::generate();
        let visitor = VisitorId::generate();

        let liked = likes.toggle(post, visitor).await.unwrap();
        assert_eq!(liked, LikeTally { count: 1, liked: true });

        let unliked = likes.toggle(post, visitor).await.unwrap();
        assert_eq!(unliked, LikeTally { count: 0, liked: false });
    }

    #[tokio::test]
    async fn test_counts_distinct_visitors() {
        let store = MemoryStore::new();
        let likes = LikeCounter::new(&store);
        let post = PostId::generate();
        let (ana, ben) = (VisitorId::generate(), VisitorId::generate());

        likes.toggle(post, ana).await.unwrap();
        let tally = likes.toggle(post, ben).await.unwrap();
        assert_eq!(tally.count, 2);

        let anonymous = likes.tally(post, None).await.unwrap();
        assert_eq!(anonymous, LikeTally { count: 2, liked: false });

        let other_post = likes.tally(PostId::generate(), Some(ana)).await.unwrap();
        assert_eq!(other_post, LikeTally::default());
    }
}
