//! Sessions, role claims and the authorization decision derived from them.
//!
//! Admin access is decided only from the role claim issued by the account
//! store. Nothing here looks at email addresses, and the decision is never
//! cached in the session: it is recomputed from fresh claims on each request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, AccountRole, Email};

/// An authenticated session as stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub subject_id: AccountId,
    pub email: Email,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Issue a session for an account that just proved its credentials.
    #[must_use]
    pub fn issue(subject_id: AccountId, email: Email) -> Self {
        Self {
            subject_id,
            email,
            issued_at: Utc::now(),
        }
    }

    /// Whether the account revoked every session issued before `cutoff`.
    #[must_use]
    pub fn is_revoked_by(&self, cutoff: Option<DateTime<Utc>>) -> bool {
        cutoff.is_some_and(|cutoff| self.issued_at < cutoff)
    }
}

/// Role claim loaded from the account store for a session's subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub role: AccountRole,
}

/// What a request is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Unauthenticated,
    AuthenticatedNonAdmin,
    AuthenticatedAdmin,
}

impl AuthorizationDecision {
    /// Decide from the claims of the current session, if any.
    ///
    /// Pure: the same claims always give the same decision.
    #[must_use]
    pub const fn from_claims(claims: Option<&Claims>) -> Self {
        match claims {
            None => Self::Unauthenticated,
            Some(Claims {
                role: AccountRole::Admin,
            }) => Self::AuthenticatedAdmin,
            Some(Claims {
                role: AccountRole::Member,
            }) => Self::AuthenticatedNonAdmin,
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::AuthenticatedAdmin)
    }

    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }
}
