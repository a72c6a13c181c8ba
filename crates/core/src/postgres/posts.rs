use chrono::{DateTime, Utc};

use super::PgStore;
use crate::content::{Audience, BlogPost, PostDraft, PostPatch};
use crate::error::{ContentError, ValidationError};
use crate::store::ContentStore;
use crate::types::{AccountId, PostId, PublicationState, Slug};

const COLUMNS: &str = "id, title, slug, excerpt, body, featured_image, published, \
                       published_at, author_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: PostId,
    title: String,
    slug: String,
    excerpt: Option<String>,
    body: Option<String>,
    featured_image: Option<String>,
    published: bool,
    published_at: Option<DateTime<Utc>>,
    author_id: Option<AccountId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for BlogPost {
    type Error = ContentError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            ContentError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            slug,
            excerpt: row.excerpt,
            body: row.body,
            featured_image: row.featured_image,
            publication: PublicationState::from_flag(row.published),
            published_at: row.published_at,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl ContentStore<BlogPost> for PgStore {
    async fn select(&self, audience: Audience) -> Result<Vec<BlogPost>, ContentError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {COLUMNS} FROM blog_post \
             WHERE ($1 OR published) \
             ORDER BY COALESCE(published_at, created_at) DESC"
        ))
        .bind(audience == Audience::Admin)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get(&self, id: PostId) -> Result<BlogPost, ContentError> {
        sqlx::query_as::<_, PostRow>(&format!("SELECT {COLUMNS} FROM blog_post WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(ContentError::NotFound)?
            .try_into()
    }

    async fn find_by_key(
        &self,
        key: &str,
        audience: Audience,
    ) -> Result<Option<BlogPost>, ContentError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {COLUMNS} FROM blog_post WHERE slug = $1 AND ($2 OR published)"
        ))
        .bind(key)
        .bind(audience == Audience::Admin)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn insert(&self, draft: &PostDraft) -> Result<BlogPost, ContentError> {
        let slug = draft.slug()?;
        sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO blog_post \
                 (title, slug, excerpt, body, featured_image, published, published_at, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $6 THEN now() END, $7) \
             RETURNING {COLUMNS}"
        ))
        .bind(draft.title.trim())
        .bind(slug.as_str())
        .bind(draft.excerpt.as_deref())
        .bind(draft.body.as_deref())
        .bind(draft.featured_image.as_deref())
        .bind(draft.publication.is_published())
        .bind(draft.author_id)
        .fetch_one(self.pool())
        .await?
        .try_into()
    }

    async fn update(&self, id: PostId, patch: &PostPatch) -> Result<BlogPost, ContentError> {
        let slug = patch.slug()?;
        sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE blog_post SET \
                 title = COALESCE($2, title), \
                 slug = COALESCE($3, slug), \
                 excerpt = CASE WHEN $4 THEN $5 ELSE excerpt END, \
                 body = CASE WHEN $6 THEN $7 ELSE body END, \
                 featured_image = CASE WHEN $8 THEN $9 ELSE featured_image END, \
                 published = COALESCE($10, published), \
                 published_at = CASE \
                     WHEN COALESCE($10, published) AND published_at IS NULL THEN now() \
                     ELSE published_at END, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title.as_deref().map(str::trim))
        .bind(slug.as_ref().map(Slug::as_str))
        .bind(patch.excerpt.is_some())
        .bind(patch.excerpt.as_ref().and_then(Option::as_deref))
        .bind(patch.body.is_some())
        .bind(patch.body.as_ref().and_then(Option::as_deref))
        .bind(patch.featured_image.is_some())
        .bind(patch.featured_image.as_ref().and_then(Option::as_deref))
        .bind(patch.publication.map(PublicationState::is_published))
        .fetch_optional(self.pool())
        .await?
        .ok_or(ContentError::NotFound)?
        .try_into()
    }

    async fn delete(&self, id: PostId) -> Result<(), ContentError> {
        let result = sqlx::query("DELETE FROM blog_post WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(ContentError::NotFound);
        }
        Ok(())
    }

    async fn set_publication(
        &self,
        id: PostId,
        state: PublicationState,
    ) -> Result<BlogPost, ContentError> {
        sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE blog_post SET \
                 published = $2, \
                 published_at = CASE WHEN $2 AND published_at IS NULL THEN now() \
                                     ELSE published_at END, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(state.is_published())
        .fetch_optional(self.pool())
        .await?
        .ok_or(ContentError::NotFound)?
        .try_into()
    }

    async fn set_position(&self, _id: PostId, _position: i32) -> Result<(), ContentError> {
        Err(ValidationError::Invalid("posts are ordered by publication date".to_owned()).into())
    }

    async fn count(&self) -> Result<i64, ContentError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM blog_post")
            .fetch_one(self.pool())
            .await?)
    }
}
