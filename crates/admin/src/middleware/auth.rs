//! Authentication context and the admin route guard extractor.
//!
//! Each request resolves authentication once: the stored session is loaded,
//! checked against its account (deleted accounts and revoked sessions count
//! as signed out), and the account's role claim feeds the guard.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use lumen_core::accounts::AccountStore;
use lumen_core::auth::{AuthorizationDecision, Session};
use lumen_core::guard::{self, ClaimsLookup, GuardOutcome, GuardState};

use crate::error::set_sentry_user;
use crate::state::AppState;

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for the signed-in [`Session`](lumen_core::auth::Session).
    pub const AUTH_SESSION: &str = "auth_session";
}

/// Where unauthenticated editors are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Path prefix of the JSON endpoints, which answer with status codes.
const API_PREFIX: &str = "/admin/api/";

/// The authentication state of one request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    state: GuardState,
}

impl AuthContext {
    /// Resolve the request's session against the account store.
    ///
    /// A session whose account is gone or that was issued before the
    /// account's revocation cutoff is flushed and treated as signed out. A
    /// failed account lookup keeps the session but fails the claims check.
    pub async fn resolve<A: AccountStore>(
        session: &tower_sessions::Session,
        accounts: &A,
    ) -> Self {
        let stored = match session.get::<Session>(keys::AUTH_SESSION).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable auth session, treating as signed out");
                None
            }
        };

        let Some(stored) = stored else {
            return Self {
                state: GuardState::anonymous(),
            };
        };

        let claims = match accounts.account(stored.subject_id).await {
            Ok(Some(account)) if account.accepts(&stored) => ClaimsLookup::Found(account.claims()),
            Ok(_) => {
                tracing::info!(account_id = %stored.subject_id, "Session revoked, signing out");
                sign_out(session).await;
                return Self {
                    state: GuardState::anonymous(),
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, account_id = %stored.subject_id, "Claims lookup failed");
                ClaimsLookup::Failed
            }
        };

        Self {
            state: GuardState::Resolved {
                session: Some(stored),
                claims: Some(claims),
            },
        }
    }

    /// The signed-in session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match &self.state {
            GuardState::Resolved { session, .. } => session.as_ref(),
            GuardState::Pending => None,
        }
    }

    /// Role-based decision for this request.
    #[must_use]
    pub const fn decision(&self) -> AuthorizationDecision {
        match &self.state {
            GuardState::Resolved {
                session: Some(_),
                claims: Some(ClaimsLookup::Found(claims)),
            } => AuthorizationDecision::from_claims(Some(claims)),
            GuardState::Resolved {
                session: Some(_), ..
            } => AuthorizationDecision::AuthenticatedNonAdmin,
            _ => AuthorizationDecision::Unauthenticated,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> GuardOutcome {
        guard::evaluate(&self.state)
    }
}

/// Store a freshly issued session, rotating the session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(
    session: &tower_sessions::Session,
    auth: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::AUTH_SESSION, auth).await
}

/// Drop the server-side session record.
///
/// Best-effort: a store failure is logged and the local session is still
/// cleared, so signing out always succeeds from the editor's point of view.
pub async fn sign_out(session: &tower_sessions::Session) {
    if let Err(e) = session.flush().await {
        tracing::warn!(error = %e, "Failed to delete session record on sign-out");
    }
}

/// Extractor that requires a signed-in admin.
///
/// Runs the guard for every protected route. HTML routes redirect (to the
/// login page, or to the public site for signed-in non-admins); API routes
/// answer 401 or 403.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
#[derive(Debug)]
pub struct RequireAdmin(pub Session);

/// Why the guard turned a request away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Redirect to the public site root (signed in, not an admin).
    RedirectToSite(String),
    /// 401 (for API requests).
    Unauthorized,
    /// 403 (for API requests).
    Forbidden,
}

impl AdminAuthRejection {
    fn from_outcome(outcome: GuardOutcome, is_api: bool, site_root: &str) -> Self {
        match (outcome, is_api) {
            (GuardOutcome::Forbidden, true) => Self::Forbidden,
            (GuardOutcome::Forbidden, false) => Self::RedirectToSite(format!("{site_root}/")),
            (_, true) => Self::Unauthorized,
            (_, false) => Self::RedirectToLogin,
        }
    }
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::RedirectToSite(root) => Redirect::to(&root).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped path; the original has the prefix.
        let is_api = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |uri| uri.0.path())
            .starts_with(API_PREFIX);
        let site_root = &state.config().public_site_url;

        let Some(session) = parts.extensions.get::<tower_sessions::Session>() else {
            return Err(AdminAuthRejection::from_outcome(
                GuardOutcome::Unauthenticated,
                is_api,
                site_root,
            ));
        };

        let context = AuthContext::resolve(session, state.store()).await;
        match (context.outcome(), context.session()) {
            (GuardOutcome::Allowed, Some(admin)) => {
                set_sentry_user(admin);
                Ok(Self(admin.clone()))
            }
            (outcome, _) => {
                tracing::debug!(?outcome, "Admin guard rejected request");
                Err(AdminAuthRejection::from_outcome(outcome, is_api, site_root))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use lumen_core::memory::MemoryStore;
    use lumen_core::{AccountRole, Email};
    use tower_sessions::MemoryStore as SessionMemoryStore;

    use super::*;

    fn web_session() -> tower_sessions::Session {
        tower_sessions::Session::new(None, Arc::new(SessionMemoryStore::default()), None)
    }

    async fn account(store: &MemoryStore, email: &str, role: AccountRole) -> Session {
        let email = Email::parse(email).unwrap();
        let account = store.create_account(&email, "hash").await.unwrap();
        store.set_role(&email, role).await.unwrap();
        Session::issue(account.id, email)
    }

    #[tokio::test]
    async fn test_no_session_is_unauthenticated() {
        let store = MemoryStore::new();
        let context = AuthContext::resolve(&web_session(), &store).await;
        assert_eq!(context.outcome(), GuardOutcome::Unauthenticated);
        assert_eq!(context.decision(), AuthorizationDecision::Unauthenticated);
        assert!(context.session().is_none());
    }

    #[tokio::test]
    async fn test_admin_is_allowed() {
        let store = MemoryStore::new();
        let web = web_session();
        sign_in(&web, &account(&store, "admin@lumen.studio", AccountRole::Admin).await)
            .await
            .unwrap();

        let context = AuthContext::resolve(&web, &store).await;
        assert_eq!(context.outcome(), GuardOutcome::Allowed);
        assert!(context.decision().is_admin());
    }

    #[tokio::test]
    async fn test_member_is_forbidden() {
        let store = MemoryStore::new();
        let web = web_session();
        sign_in(&web, &account(&store, "member@lumen.studio", AccountRole::Member).await)
            .await
            .unwrap();

        let context = AuthContext::resolve(&web, &store).await;
        assert_eq!(context.outcome(), GuardOutcome::Forbidden);
        assert_eq!(context.decision(), AuthorizationDecision::AuthenticatedNonAdmin);
    }

    #[tokio::test]
    async fn test_claims_lookup_failure_fails_closed() {
        let store = MemoryStore::new();
        let web = web_session();
        sign_in(&web, &account(&store, "admin@lumen.studio", AccountRole::Admin).await)
            .await
            .unwrap();

        store.set_unavailable(true);
        let context = AuthContext::resolve(&web, &store).await;
        assert_eq!(context.outcome(), GuardOutcome::Forbidden);
        assert!(context.session().is_some());
    }

    #[tokio::test]
    async fn test_revoked_session_is_signed_out() {
        let store = MemoryStore::new();
        let web = web_session();
        let admin = account(&store, "admin@lumen.studio", AccountRole::Admin).await;
        let stale = Session {
            issued_at: admin.issued_at - chrono::Duration::seconds(5),
            ..admin
        };
        sign_in(&web, &stale).await.unwrap();
        store.revoke_sessions(&stale.email).await.unwrap();

        let context = AuthContext::resolve(&web, &store).await;
        assert_eq!(context.outcome(), GuardOutcome::Unauthenticated);
        assert!(web.get::<Session>(keys::AUTH_SESSION).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let store = MemoryStore::new();
        let web = web_session();
        sign_in(&web, &account(&store, "admin@lumen.studio", AccountRole::Admin).await)
            .await
            .unwrap();
        sign_out(&web).await;

        let context = AuthContext::resolve(&web, &store).await;
        assert_eq!(context.outcome(), GuardOutcome::Unauthenticated);
    }

    #[test]
    fn test_rejections() {
        let root = "https://lumen.studio";
        assert_eq!(
            AdminAuthRejection::from_outcome(GuardOutcome::Unauthenticated, false, root),
            AdminAuthRejection::RedirectToLogin
        );
        assert_eq!(
            AdminAuthRejection::from_outcome(GuardOutcome::Unauthenticated, true, root),
            AdminAuthRejection::Unauthorized
        );
        assert_eq!(
            AdminAuthRejection::from_outcome(GuardOutcome::Forbidden, false, root),
            AdminAuthRejection::RedirectToSite("https://lumen.studio/".to_owned())
        );
        assert_eq!(
            AdminAuthRejection::from_outcome(GuardOutcome::Forbidden, true, root),
            AdminAuthRejection::Forbidden
        );
        assert_eq!(
            AdminAuthRejection::from_outcome(GuardOutcome::Pending, false, root),
            AdminAuthRejection::RedirectToLogin
        );
    }
}
