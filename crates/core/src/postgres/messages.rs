use chrono::{DateTime, Utc};

use super::PgStore;
use crate::error::ContentError;
use crate::messages::{ContactMessage, InboxCounts, MessageStore, NewMessage};
use crate::types::{Email, MessageId};

const COLUMNS: &str = "id, name, email, message, read, created_at";

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: MessageId,
    name: String,
    email: String,
    message: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for ContactMessage {
    type Error = ContentError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            ContentError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            message: row.message,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CountsRow {
    total: i64,
    unread: i64,
}

impl MessageStore for PgStore {
    async fn insert_message(&self, message: &NewMessage) -> Result<ContactMessage, ContentError> {
        sqlx::query_as::<_, MessageRow>(&format!(
            "INSERT INTO contact_message (name, email, message) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(&message.name)
        .bind(message.email.as_str())
        .bind(&message.message)
        .fetch_one(self.pool())
        .await?
        .try_into()
    }

    async fn messages(&self) -> Result<Vec<ContactMessage>, ContentError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {COLUMNS} FROM contact_message ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn open_message(&self, id: MessageId) -> Result<ContactMessage, ContentError> {
        sqlx::query_as::<_, MessageRow>(&format!(
            "UPDATE contact_message SET read = true WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or(ContentError::NotFound)?
        .try_into()
    }

    async fn delete_message(&self, id: MessageId) -> Result<(), ContentError> {
        let result = sqlx::query("DELETE FROM contact_message WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(ContentError::NotFound);
        }
        Ok(())
    }

    async fn message_counts(&self) -> Result<InboxCounts, ContentError> {
        let row = sqlx::query_as::<_, CountsRow>(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE NOT read) AS unread \
             FROM contact_message",
        )
        .fetch_one(self.pool())
        .await?;

        Ok(InboxCounts {
            total: row.total,
            unread: row.unread,
        })
    }
}
