//! Reader comments on published blog posts.
//!
//! Comments are append-only for visitors. Only the admin panel removes them.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ContentError, ValidationError};
use crate::types::{CommentId, PostId};

pub const AUTHOR_MAX: usize = 80;
pub const BODY_MAX: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A validated, trimmed comment ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    post_id: PostId,
    author_name: String,
    body: String,
}

impl NewComment {
    /// # Errors
    ///
    /// `Required` for a blank author or body, `TooLong` past the limits.
    pub fn parse(post_id: PostId, author_name: &str, body: &str) -> Result<Self, ValidationError> {
        ValidationError::check_text("name", author_name, AUTHOR_MAX)?;
        ValidationError::check_text("comment", body, BODY_MAX)?;
        Ok(Self {
            post_id,
            author_name: author_name.trim().to_owned(),
            body: body.trim().to_owned(),
        })
    }

    #[must_use]
    pub const fn post_id(&self) -> PostId {
        self.post_id
    }

    #[must_use]
    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

pub trait CommentStore: Send + Sync {
    /// Comments on a post, newest first.
    fn comments_for(
        &self,
        post_id: PostId,
    ) -> impl Future<Output = Result<Vec<Comment>, ContentError>> + Send;

    fn insert_comment(
        &self,
        comment: &NewComment,
    ) -> impl Future<Output = Result<Comment, ContentError>> + Send;

    /// Delete a comment of `post_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` when that post has no comment with this id.
    fn delete_comment(
        &self,
        post_id: PostId,
        id: CommentId,
    ) -> impl Future<Output = Result<(), ContentError>> + Send;
}

/// Comment submission and moderation.
pub struct CommentBoard<'a, S> {
    store: &'a S,
}

impl<'a, S: CommentStore> CommentBoard<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Submit a comment for a post the caller already resolved as published.
    ///
    /// # Errors
    ///
    /// `Validation` without touching the store, or the store error.
    #[instrument(skip(self, author_name, body))]
    pub async fn submit(
        &self,
        post_id: PostId,
        author_name: &str,
        body: &str,
    ) -> Result<Comment, ContentError> {
        let comment = NewComment::parse(post_id, author_name, body)?;
        let stored = self.store.insert_comment(&comment).await?;
        tracing::info!(comment_id = %stored.id, "Comment submitted");
        Ok(stored)
    }

    /// # Errors
    ///
    /// Returns the store error.
    pub async fn list(&self, post_id: PostId) -> Result<Vec<Comment>, ContentError> {
        self.store.comments_for(post_id).await
    }

    /// Remove a comment from a post.
    ///
    /// # Errors
    ///
    /// `NotFound` when the comment does not belong to `post_id`, or the
    /// store error.
    #[instrument(skip(self))]
    pub async fn remove(&self, post_id: PostId, id: CommentId) -> Result<(), ContentError> {
        self.store.delete_comment(post_id, id).await?;
        tracing::info!(comment_id = %id, "Comment removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_empty_author_is_rejected_without_write() {
        let store = MemoryStore::new();
        let board = CommentBoard::new(&store);
        let post = PostId::generate();

        let err = board.submit(post, "   ", "Great read!").await.unwrap_err();
        assert!(matches!(
            err,
            ContentError::Validation(ValidationError::Required { field: "name" })
        ));
        assert_eq!(store.calls(), 0);
        assert!(board.list(post).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_is_rejected() {
        let store = MemoryStore::new();
        let board = CommentBoard::new(&store);
        let err = board
            .submit(PostId::generate(), "Ana", "\n\t")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_trims_and_lists_newest_first() {
        let store = MemoryStore::new();
        let board = CommentBoard::new(&store);
        let post = PostId::generate();

        board.submit(post, " Ana ", " First! ").await.unwrap();
        board.submit(post, "Ben", "Second").await.unwrap();
        board.submit(PostId::generate(), "Cy", "Elsewhere").await.unwrap();

        let comments = board.list(post).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author_name, "Ben");
        assert_eq!(comments[1].author_name, "Ana");
        assert_eq!(comments[1].body, "First!");
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryStore::new();
        let board = CommentBoard::new(&store);
        let post = PostId::generate();
        let comment = board.submit(post, "Ana", "Hi").await.unwrap();

        board.remove(post, comment.id).await.unwrap();
        assert!(board.list(post).await.unwrap().is_empty());
        assert!(matches!(
            board.remove(post, comment.id).await,
            Err(ContentError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_remove_under_another_post_is_not_found() {
        let store = MemoryStore::new();
        let board = CommentBoard::new(&store);
        let post = PostId::generate();
        let other = PostId::generate();
        let comment = board.submit(post, "Ana", "Hi").await.unwrap();

        assert!(matches!(
            board.remove(other, comment.id).await,
            Err(ContentError::NotFound)
        ));
        assert_eq!(board.list(post).await.unwrap().len(), 1);
    }

    #[test]
    fn test_limits() {
        let post = PostId::generate();
        assert!(NewComment::parse(post, &"a".repeat(AUTHOR_MAX), "ok").is_ok());
        assert!(NewComment::parse(post, &"a".repeat(AUTHOR_MAX + 1), "ok").is_err());
        assert!(NewComment::parse(post, "Ana", &"b".repeat(BODY_MAX + 1)).is_err());
    }
}
