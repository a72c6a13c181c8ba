//! Authentication route handlers for admin.
//!
//! Sign-in and sign-up share one page. Sign-up only creates a member
//! account; an operator grants the admin role with `lumen account grant`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use lumen_core::guard::GuardOutcome;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user};
use crate::filters;
use crate::flash::{self, Flash};
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{AuthContext, sign_in, sign_out};
use crate::services::AuthError;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub flash: Flash,
    pub min_password_length: usize,
}

/// Email and password, as posted by both forms.
#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
}

/// Render the login page, or skip it for a signed-in admin.
///
/// GET /admin/login
#[instrument(skip_all)]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    Query(flash): Query<Flash>,
) -> Response {
    let context = AuthContext::resolve(&session, state.store()).await;
    if context.outcome() == GuardOutcome::Allowed {
        return Redirect::to("/admin").into_response();
    }

    LoginTemplate {
        flash,
        min_password_length: crate::services::auth::MIN_PASSWORD_LENGTH,
    }
    .into_response()
}

/// Check credentials and start a session.
///
/// POST /admin/login
///
/// # Errors
///
/// Returns store and session failures; wrong credentials redirect back.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    match state.auth().sign_in(&form.email, &form.password).await {
        Ok(auth) => {
            sign_in(&session, &auth).await?;
            Ok(Redirect::to("/admin").into_response())
        }
        Err(
            e @ (AuthError::UnknownAccount
            | AuthError::InvalidCredentials
            | AuthError::InvalidEmail(_)),
        ) => {
            tracing::info!(reason = %e, "Sign-in rejected");
            Ok(flash::error(LOGIN_PATH, &e.user_message()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Create a member account.
///
/// POST /admin/signup
///
/// # Errors
///
/// Returns store and hashing failures; invalid input redirects back.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    signup_response(state.auth().sign_up(&form.email, &form.password).await)
}

/// Notice for a completed sign-up. A taken email gets the same answer.
const SIGNUP_NOTICE: &str =
    "Account created. You can sign in once an administrator grants you access.";

fn signup_response<T>(result: std::result::Result<T, AuthError>) -> Result<Response> {
    match result {
        Ok(_) => Ok(flash::notice(LOGIN_PATH, SIGNUP_NOTICE).into_response()),
        Err(AuthError::AccountExists) => {
            tracing::info!("Sign-up for an existing account");
            Ok(flash::notice(LOGIN_PATH, SIGNUP_NOTICE).into_response())
        }
        Err(e @ (AuthError::InvalidEmail(_) | AuthError::WeakPassword(_))) => {
            Ok(flash::error(LOGIN_PATH, &e.user_message()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Sign out. Always succeeds for the editor.
///
/// POST /admin/logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Redirect {
    sign_out(&session).await;
    clear_sentry_user();
    flash::notice(LOGIN_PATH, "Signed out")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{StatusCode, header};

    use super::*;

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn test_taken_email_looks_like_a_new_account() {
        let created = signup_response(Ok(())).unwrap();
        let taken = signup_response::<()>(Err(AuthError::AccountExists)).unwrap();
        assert_eq!(created.status(), StatusCode::SEE_OTHER);
        assert_eq!(taken.status(), created.status());
        assert_eq!(location(&taken), location(&created));
        assert!(location(&taken).contains("notice="));
    }

    #[test]
    fn test_weak_password_redirects_with_error() {
        let response =
            signup_response::<()>(Err(AuthError::WeakPassword("too short".to_owned()))).unwrap();
        assert!(location(&response).contains("error="));
    }
}
