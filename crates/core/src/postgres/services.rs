use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{PgStore, reorder_table};
use crate::content::{Audience, Service, ServiceDraft, ServicePatch};
use crate::error::ContentError;
use crate::store::ContentStore;
use crate::types::{PublicationState, ServiceIcon, ServiceId};

const COLUMNS: &str = "id, title, description, icon, features, published, display_order, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: ServiceId,
    title: String,
    description: Option<String>,
    icon: Option<String>,
    features: Vec<String>,
    published: bool,
    display_order: i32,
    created_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        // Rows written before the icon set was closed may name icons we no
        // longer ship; those render without one.
        let icon = row.icon.as_deref().and_then(|name| {
            name.parse::<ServiceIcon>()
                .inspect_err(|e| tracing::warn!(service_id = %row.id, "{e}"))
                .ok()
        });

        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            icon,
            features: row.features,
            publication: PublicationState::from_flag(row.published),
            display_order: row.display_order,
            created_at: row.created_at,
        }
    }
}

impl ContentStore<Service> for PgStore {
    async fn select(&self, audience: Audience) -> Result<Vec<Service>, ContentError> {
        let rows = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {COLUMNS} FROM service \
             WHERE ($1 OR published) \
             ORDER BY display_order, created_at DESC"
        ))
        .bind(audience == Audience::Admin)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: ServiceId) -> Result<Service, ContentError> {
        sqlx::query_as::<_, ServiceRow>(&format!("SELECT {COLUMNS} FROM service WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .map(Into::into)
            .ok_or(ContentError::NotFound)
    }

    async fn find_by_key(
        &self,
        key: &str,
        audience: Audience,
    ) -> Result<Option<Service>, ContentError> {
        Ok(sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {COLUMNS} FROM service WHERE title = $1 AND ($2 OR published)"
        ))
        .bind(key)
        .bind(audience == Audience::Admin)
        .fetch_optional(self.pool())
        .await?
        .map(Into::into))
    }

    async fn insert(&self, draft: &ServiceDraft) -> Result<Service, ContentError> {
        Ok(sqlx::query_as::<_, ServiceRow>(&format!(
            "INSERT INTO service (title, description, icon, features, published, display_order) \
             VALUES ($1, $2, $3, $4, $5, \
                 COALESCE($6, (SELECT COALESCE(MAX(display_order) + 1, 0) FROM service))) \
             RETURNING {COLUMNS}"
        ))
        .bind(draft.title.trim())
        .bind(draft.description.as_deref())
        .bind(draft.icon.map(ServiceIcon::as_str))
        .bind(&draft.features)
        .bind(draft.publication.is_published())
        .bind(draft.display_order)
        .fetch_one(self.pool())
        .await?
        .into())
    }

    async fn update(&self, id: ServiceId, patch: &ServicePatch) -> Result<Service, ContentError> {
        sqlx::query_as::<_, ServiceRow>(&format!(
            "UPDATE service SET \
                 title = COALESCE($2, title), \
                 description = CASE WHEN $3 THEN $4 ELSE description END, \
                 icon = CASE WHEN $5 THEN $6 ELSE icon END, \
                 features = COALESCE($7, features), \
                 published = COALESCE($8, published), \
                 display_order = COALESCE($9, display_order) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title.as_deref().map(str::trim))
        .bind(patch.description.is_some())
        .bind(patch.description.as_ref().and_then(Option::as_deref))
        .bind(patch.icon.is_some())
        .bind(patch.icon.flatten().map(ServiceIcon::as_str))
        .bind(patch.features.as_ref())
        .bind(patch.publication.map(PublicationState::is_published))
        .bind(patch.display_order)
        .fetch_optional(self.pool())
        .await?
        .map(Into::into)
        .ok_or(ContentError::NotFound)
    }

    async fn delete(&self, id: ServiceId) -> Result<(), ContentError> {
        let result = sqlx::query("DELETE FROM service WHERE id = $1")
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
        id: ServiceId,
        state: PublicationState,
    ) -> Result<Service, ContentError> {
        sqlx::query_as::<_, ServiceRow>(&format!(
            "UPDATE service SET published = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(state.is_published())
        .fetch_optional(self.pool())
        .await?
        .map(Into::into)
        .ok_or(ContentError::NotFound)
    }

    async fn set_position(&self, id: ServiceId, position: i32) -> Result<(), ContentError> {
        let result = sqlx::query("UPDATE service SET display_order = $2 WHERE id = $1")
            .bind(id)
            .bind(position)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(ContentError::NotFound);
        }
        Ok(())
    }

    async fn reorder(&self, ordered: &[ServiceId]) -> Result<(), ContentError> {
        let ids = ordered.iter().copied().map(Uuid::from).collect();
        reorder_table(self.pool(), "service", ids).await
    }

    async fn count(&self) -> Result<i64, ContentError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM service")
            .fetch_one(self.pool())
            .await?)
    }
}
