use chrono::{DateTime, Utc};

use super::PgStore;
use crate::comments::{Comment, CommentStore, NewComment};
use crate::error::ContentError;
use crate::types::{CommentId, PostId};

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: CommentId,
    post_id: PostId,
    author_name: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            author_name: row.author_name,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

impl CommentStore for PgStore {
    async fn comments_for(&self, post_id: PostId) -> Result<Vec<Comment>, ContentError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, author_name, body, created_at \
             FROM blog_comment WHERE post_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(post_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, ContentError> {
        let row = sqlx::query_as::<_, CommentRow>(
            "INSERT INTO blog_comment (post_id, author_name, body) \
             VALUES ($1, $2, $3) \
             RETURNING id, post_id, author_name, body, created_at",
        )
        .bind(comment.post_id())
        .bind(comment.author_name())
        .bind(comment.body())
        .fetch_one(self.pool())
        .await
        .map_err(|e| match e {
            // The post was deleted between the page render and the submit.
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => ContentError::NotFound,
            other => other.into(),
        })?;

        Ok(row.into())
    }

    async fn delete_comment(&self, post_id: PostId, id: CommentId) -> Result<(), ContentError> {
        let result = sqlx::query("DELETE FROM blog_comment WHERE id = $1 AND post_id = $2")
            .bind(id)
            .bind(post_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(ContentError::NotFound);
        }
        Ok(())
    }
}
