use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{PgStore, reorder_table};
use crate::content::{Audience, Project, ProjectDraft, ProjectPatch};
use crate::error::ContentError;
use crate::store::ContentStore;
use crate::types::{ProjectId, PublicationState, Slug};

const COLUMNS: &str = "id, title, slug, description, technologies, live_url, image_url, \
                       published, display_order, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: ProjectId,
    title: String,
    slug: String,
    description: Option<String>,
    technologies: Vec<String>,
    live_url: Option<String>,
    image_url: Option<String>,
    published: bool,
    display_order: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = ContentError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            ContentError::DataCorruption(format!("invalid project slug in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            slug,
            description: row.description,
            technologies: row.technologies,
            live_url: row.live_url,
            image_url: row.image_url,
            publication: PublicationState::from_flag(row.published),
            display_order: row.display_order,
            created_at: row.created_at,
        })
    }
}

impl ContentStore<Project> for PgStore {
    async fn select(&self, audience: Audience) -> Result<Vec<Project>, ContentError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM portfolio_project \
             WHERE ($1 OR published) \
             ORDER BY display_order, created_at DESC"
        ))
        .bind(audience == Audience::Admin)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get(&self, id: ProjectId) -> Result<Project, ContentError> {
        sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM portfolio_project WHERE id = $1"
        ))
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
    ) -> Result<Option<Project>, ContentError> {
        sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM portfolio_project WHERE slug = $1 AND ($2 OR published)"
        ))
        .bind(key)
        .bind(audience == Audience::Admin)
        .fetch_optional(self.pool())
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, ContentError> {
        let slug = draft.slug()?;
        sqlx::query_as::<_, ProjectRow>(&format!(
            "INSERT INTO portfolio_project \
                 (title, slug, description, technologies, live_url, image_url, published, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, \
                 COALESCE($8, (SELECT COALESCE(MAX(display_order) + 1, 0) FROM portfolio_project))) \
             RETURNING {COLUMNS}"
        ))
        .bind(draft.title.trim())
        .bind(slug.as_str())
        .bind(draft.description.as_deref())
        .bind(&draft.technologies)
        .bind(draft.live_url.as_deref())
        .bind(draft.image_url.as_deref())
        .bind(draft.publication.is_published())
        .bind(draft.display_order)
        .fetch_one(self.pool())
        .await?
        .try_into()
    }

    async fn update(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project, ContentError> {
        let slug = patch.slug()?;
        sqlx::query_as::<_, ProjectRow>(&format!(
            "UPDATE portfolio_project SET \
                 title = COALESCE($2, title), \
                 slug = COALESCE($3, slug), \
                 description = CASE WHEN $4 THEN $5 ELSE description END, \
                 technologies = COALESCE($6, technologies), \
                 live_url = CASE WHEN $7 THEN $8 ELSE live_url END, \
                 image_url = CASE WHEN $9 THEN $10 ELSE image_url END, \
                 published = COALESCE($11, published), \
                 display_order = COALESCE($12, display_order) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title.as_deref().map(str::trim))
        .bind(slug.as_ref().map(Slug::as_str))
        .bind(patch.description.is_some())
        .bind(patch.description.as_ref().and_then(Option::as_deref))
        .bind(patch.technologies.as_ref())
        .bind(patch.live_url.is_some())
        .bind(patch.live_url.as_ref().and_then(Option::as_deref))
        .bind(patch.image_url.is_some())
        .bind(patch.image_url.as_ref().and_then(Option::as_deref))
        .bind(patch.publication.map(PublicationState::is_published))
        .bind(patch.display_order)
        .fetch_optional(self.pool())
        .await?
        .ok_or(ContentError::NotFound)?
        .try_into()
    }

    async fn delete(&self, id: ProjectId) -> Result<(), ContentError> {
        let result = sqlx::query("DELETE FROM portfolio_project WHERE id = $1")
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
        id: ProjectId,
        state: PublicationState,
    ) -> Result<Project, ContentError> {
        sqlx::query_as::<_, ProjectRow>(&format!(
            "UPDATE portfolio_project SET published = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(state.is_published())
        .fetch_optional(self.pool())
        .await?
        .ok_or(ContentError::NotFound)?
        .try_into()
    }

    async fn set_position(&self, id: ProjectId, position: i32) -> Result<(), ContentError> {
        let result = sqlx::query("UPDATE portfolio_project SET display_order = $2 WHERE id = $1")
            .bind(id)
            .bind(position)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(ContentError::NotFound);
        }
        Ok(())
    }

    async fn reorder(&self, ordered: &[ProjectId]) -> Result<(), ContentError> {
        let ids = ordered.iter().copied().map(Uuid::from).collect();
        reorder_table(self.pool(), "portfolio_project", ids).await
    }

    async fn count(&self) -> Result<i64, ContentError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM portfolio_project")
            .fetch_one(self.pool())
            .await?)
    }
}
