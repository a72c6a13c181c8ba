//! Route guard for the admin area.
//!
//! The guard is a pure function over the resolved auth state. The admin
//! extractor feeds it what it learned about the request and acts on the
//! outcome (render, redirect to login, or redirect to the public site).

use crate::auth::{AuthorizationDecision, Claims, Session};

/// Result of looking up claims for a signed-in session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimsLookup {
    Found(Claims),
    /// The store could not answer. The guard fails closed on this.
    Failed,
}

/// What is known about the requester when the guard runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Session resolution has not finished yet.
    Pending,
    Resolved {
        session: Option<Session>,
        claims: Option<ClaimsLookup>,
    },
}

impl GuardState {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self::Resolved {
            session: None,
            claims: None,
        }
    }
}

/// What the guarded route should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Show a loading indicator; never the protected content.
    Pending,
    /// Send the visitor to the login page.
    Unauthenticated,
    /// Send the visitor to the public site root.
    Forbidden,
    /// Render the protected content.
    Allowed,
}

/// Decide what a guarded route does for the given state.
#[must_use]
pub fn evaluate(state: &GuardState) -> GuardOutcome {
    match state {
        GuardState::Pending => GuardOutcome::Pending,
        GuardState::Resolved { session: None, .. } => GuardOutcome::Unauthenticated,
        GuardState::Resolved {
            session: Some(_),
            claims: None | Some(ClaimsLookup::Failed),
        } => GuardOutcome::Forbidden,
        GuardState::Resolved {
            session: Some(_),
            claims: Some(ClaimsLookup::Found(claims)),
        } => {
            if AuthorizationDecision::from_claims(Some(claims)).is_admin() {
                GuardOutcome::Allowed
            } else {
                GuardOutcome::Forbidden
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{AccountId, AccountRole, Email};

    fn session() -> Session {
        Session::issue(
            AccountId::generate(),
            Email::parse("someone@lumen.studio").unwrap(),
        )
    }

    fn signed_in(claims: Option<ClaimsLookup>) -> GuardState {
        GuardState::Resolved {
            session: Some(session()),
            claims,
        }
    }

    #[test]
    fn test_pending_never_allows() {
        assert_eq!(evaluate(&GuardState::Pending), GuardOutcome::Pending);
    }

    #[test]
    fn test_no_session_is_unauthenticated() {
        assert_eq!(
            evaluate(&GuardState::anonymous()),
            GuardOutcome::Unauthenticated
        );
        // Stale claims without a session still mean "log in".
        let state = GuardState::Resolved {
            session: None,
            claims: Some(ClaimsLookup::Found(Claims {
                role: AccountRole::Admin,
            })),
        };
        assert_eq!(evaluate(&state), GuardOutcome::Unauthenticated);
    }

    #[test]
    fn test_member_is_forbidden() {
        let state = signed_in(Some(ClaimsLookup::Found(Claims {
            role: AccountRole::Member,
        })));
        assert_eq!(evaluate(&state), GuardOutcome::Forbidden);
    }

    #[test]
    fn test_claims_failure_fails_closed() {
        assert_eq!(
            evaluate(&signed_in(Some(ClaimsLookup::Failed))),
            GuardOutcome::Forbidden
        );
        assert_eq!(evaluate(&signed_in(None)), GuardOutcome::Forbidden);
    }

    #[test]
    fn test_admin_is_allowed() {
        let state = signed_in(Some(ClaimsLookup::Found(Claims {
            role: AccountRole::Admin,
        })));
        assert_eq!(evaluate(&state), GuardOutcome::Allowed);
    }

    #[test]
    fn test_only_admin_claims_reach_allowed() {
        let states = [
            GuardState::Pending,
            GuardState::anonymous(),
            signed_in(None),
            signed_in(Some(ClaimsLookup::Failed)),
            signed_in(Some(ClaimsLookup::Found(Claims {
                role: AccountRole::Member,
            }))),
        ];
        for state in &states {
            assert_ne!(evaluate(state), GuardOutcome::Allowed, "{state:?}");
        }
    }
}
