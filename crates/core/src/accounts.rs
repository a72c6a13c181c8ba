//! Accounts and the store that issues their role claims.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Claims, Session};
use crate::error::ContentError;
use crate::types::{AccountId, AccountRole, Email};

/// A person who can sign in. Only `Admin` accounts get past the admin guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: Email,
    pub role: AccountRole,
    /// Sessions issued before this instant are treated as signed out.
    pub sessions_valid_after: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    #[must_use]
    pub const fn claims(&self) -> Claims {
        Claims { role: self.role }
    }

    /// Whether `session` belongs to this account and has not been revoked.
    #[must_use]
    pub fn accepts(&self, session: &Session) -> bool {
        session.subject_id == self.id && !session.is_revoked_by(self.sessions_valid_after)
    }
}

/// Account persistence. The password hash never leaves this seam except
/// through [`AccountStore::credentials`].
pub trait AccountStore: Send + Sync {
    /// Create a `Member` account.
    ///
    /// # Errors
    ///
    /// `Conflict` when the email is taken.
    fn create_account(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> impl Future<Output = Result<Account, ContentError>> + Send;

    /// The account and its password hash, for sign-in.
    fn credentials(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<(Account, String)>, ContentError>> + Send;

    fn account(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Account>, ContentError>> + Send;

    /// Change an account's role. Demoting an admin also revokes its
    /// sessions.
    ///
    /// # Errors
    ///
    /// `NotFound` when no account has this email.
    fn set_role(
        &self,
        email: &Email,
        role: AccountRole,
    ) -> impl Future<Output = Result<Account, ContentError>> + Send;

    /// Invalidate every session issued so far for this account.
    ///
    /// # Errors
    ///
    /// `NotFound` when no account has this email.
    fn revoke_sessions(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Account, ContentError>> + Send;

    fn accounts(&self) -> impl Future<Output = Result<Vec<Account>, ContentError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_new_accounts_are_members() {
        let store = MemoryStore::new();
        let email = Email::parse("new@lumen.studio").unwrap();
        let account = store.create_account(&email, "hash").await.unwrap();
        assert_eq!(account.role, AccountRole::Member);
        assert!(matches!(
            store.create_account(&email, "hash").await,
            Err(ContentError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_revoke_sessions_rejects_older_sessions() {
        let store = MemoryStore::new();
        let email = Email::parse("ed@lumen.studio").unwrap();
        let account = store.create_account(&email, "hash").await.unwrap();
        let session = Session::issue(account.id, email.clone());
        assert!(account.accepts(&session));

        let revoked = store.revoke_sessions(&email).await.unwrap();
        assert!(!revoked.accepts(&session));

        let fresh = Session::issue(account.id, email);
        assert!(revoked.accepts(&fresh));
    }

    #[tokio::test]
    async fn test_session_for_other_account_is_rejected() {
        let store = MemoryStore::new();
        let email = Email::parse("a@lumen.studio").unwrap();
        let account = store.create_account(&email, "hash").await.unwrap();
        let foreign = Session::issue(AccountId::generate(), email);
        assert!(!account.accepts(&foreign));
    }

    #[tokio::test]
    async fn test_demotion_revokes_sessions() {
        let store = MemoryStore::new();
        let email = Email::parse("boss@lumen.studio").unwrap();
        let account = store.create_account(&email, "hash").await.unwrap();
        let promoted = store.set_role(&email, AccountRole::Admin).await.unwrap();
        assert!(promoted.sessions_valid_after.is_none());

        let session = Session::issue(account.id, email.clone());
        let demoted = store.set_role(&email, AccountRole::Member).await.unwrap();
        assert!(demoted.sessions_valid_after.is_some());
        assert!(!demoted.accepts(&Session {
            issued_at: session.issued_at - chrono::Duration::seconds(1),
            ..session
        }));
    }

    #[tokio::test]
    async fn test_set_role_unknown_email() {
        let store = MemoryStore::new();
        let email = Email::parse("ghost@lumen.studio").unwrap();
        assert!(matches!(
            store.set_role(&email, AccountRole::Admin).await,
            Err(ContentError::NotFound)
        ));
    }
}
