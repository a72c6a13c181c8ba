use chrono::{DateTime, Utc};

use super::PgStore;
use crate::accounts::{Account, AccountStore};
use crate::error::ContentError;
use crate::types::{AccountId, AccountRole, Email};

const COLUMNS: &str = "id, email, role, sessions_valid_after, created_at";

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: AccountId,
    email: String,
    role: AccountRole,
    sessions_valid_after: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = ContentError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            ContentError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            role: row.role,
            sessions_valid_after: row.sessions_valid_after,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password_hash: String,
}

impl AccountStore for PgStore {
    async fn create_account(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<Account, ContentError> {
        sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO account (email, password_hash) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool())
        .await?
        .try_into()
    }

    async fn credentials(&self, email: &Email) -> Result<Option<(Account, String)>, ContentError> {
        let Some(row) = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {COLUMNS}, password_hash FROM account WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?
        else {
            return Ok(None);
        };

        Ok(Some((row.account.try_into()?, row.password_hash)))
    }

    async fn account(&self, id: AccountId) -> Result<Option<Account>, ContentError> {
        sqlx::query_as::<_, AccountRow>(&format!("SELECT {COLUMNS} FROM account WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn set_role(&self, email: &Email, role: AccountRole) -> Result<Account, ContentError> {
        // Demoting an account also cuts its live sessions.
        sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE account SET \
                 role = $2, \
                 sessions_valid_after = CASE WHEN $2 = 'member'::account_role AND role <> $2 \
                                             THEN now() ELSE sessions_valid_after END, \
                 updated_at = now() \
             WHERE email = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(role)
        .fetch_optional(self.pool())
        .await?
        .ok_or(ContentError::NotFound)?
        .try_into()
    }

    async fn revoke_sessions(&self, email: &Email) -> Result<Account, ContentError> {
        sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE account SET sessions_valid_after = now(), updated_at = now() \
             WHERE email = $1 RETURNING {COLUMNS}"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?
        .ok_or(ContentError::NotFound)?
        .try_into()
    }

    async fn accounts(&self) -> Result<Vec<Account>, ContentError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {COLUMNS} FROM account ORDER BY created_at"
        ))
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
