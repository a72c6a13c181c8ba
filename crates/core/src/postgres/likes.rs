use super::PgStore;
use crate::error::ContentError;
use crate::likes::{LikeStore, LikeTally};
use crate::types::{PostId, VisitorId};

#[derive(Debug, sqlx::FromRow)]
struct TallyRow {
    count: i64,
    liked: bool,
}

impl LikeStore for PgStore {
    async fn tally(
        &self,
        post_id: PostId,
        visitor: Option<VisitorId>,
    ) -> Result<LikeTally, ContentError> {
        let row = sqlx::query_as::<_, TallyRow>(
            "SELECT COUNT(*) AS count, \
                    COALESCE(BOOL_OR(visitor_id = $2), false) AS liked \
             FROM post_like WHERE post_id = $1",
        )
        .bind(post_id)
        .bind(visitor)
        .fetch_one(self.pool())
        .await?;

        Ok(LikeTally {
            count: row.count,
            liked: row.liked,
        })
    }

    async fn add_like(&self, post_id: PostId, visitor: VisitorId) -> Result<bool, ContentError> {
        let result = sqlx::query(
            "INSERT INTO post_like (post_id, visitor_id) VALUES ($1, $2) \
             ON CONFLICT (post_id, visitor_id) DO NOTHING",
        )
        .bind(post_id)
        .bind(visitor)
        .execute(self.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => ContentError::NotFound,
            other => other.into(),
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_like(&self, post_id: PostId, visitor: VisitorId) -> Result<bool, ContentError> {
        let result = sqlx::query("DELETE FROM post_like WHERE post_id = $1 AND visitor_id = $2")
            .bind(post_id)
            .bind(visitor)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
