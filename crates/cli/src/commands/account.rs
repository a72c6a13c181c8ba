//! Account role management.
//!
//! Sign-up in the admin only ever creates `member` accounts; these commands
//! are the one way to hand out (or take back) the admin role.

use lumen_core::accounts::{Account, AccountStore};
use lumen_core::{AccountRole, ContentError, Email};

use super::CommandError;

fn not_found(email: &Email) -> impl FnOnce(ContentError) -> CommandError + '_ {
    move |err| match err {
        ContentError::NotFound => CommandError::UnknownAccount(email.to_string()),
        other => CommandError::Store(other),
    }
}

/// Grant the admin role.
///
/// # Errors
///
/// Returns an error for an invalid email or an unknown account.
pub async fn grant<S: AccountStore>(store: &S, email: &str) -> Result<Account, CommandError> {
    let email = Email::parse(email)?;
    let account = store
        .set_role(&email, AccountRole::Admin)
        .await
        .map_err(not_found(&email))?;
    tracing::info!(email = %account.email, "Admin role granted");
    Ok(account)
}

/// Demote to member. The store also revokes the account's sessions, so an
/// open admin tab is signed out on its next request.
///
/// # Errors
///
/// Returns an error for an invalid email or an unknown account.
pub async fn revoke<S: AccountStore>(store: &S, email: &str) -> Result<Account, CommandError> {
    let email = Email::parse(email)?;
    let account = store
        .set_role(&email, AccountRole::Member)
        .await
        .map_err(not_found(&email))?;
    tracing::info!(email = %account.email, "Admin role revoked, sessions ended");
    Ok(account)
}

/// End every session issued so far, keeping the role.
///
/// # Errors
///
/// Returns an error for an invalid email or an unknown account.
pub async fn sign_out<S: AccountStore>(store: &S, email: &str) -> Result<Account, CommandError> {
    let email = Email::parse(email)?;
    let account = store
        .revoke_sessions(&email)
        .await
        .map_err(not_found(&email))?;
    tracing::info!(email = %account.email, "All sessions ended");
    Ok(account)
}

/// Log every account with its role.
///
/// # Errors
///
/// Returns the store error.
pub async fn list<S: AccountStore>(store: &S) -> Result<Vec<Account>, CommandError> {
    let accounts = store.accounts().await.map_err(CommandError::Store)?;
    if accounts.is_empty() {
        tracing::info!("No accounts");
    }
    for account in &accounts {
        tracing::info!(
            "{:<40} {:<8} created {}",
            account.email.as_str(),
            account.role,
            account.created_at.format("%Y-%m-%d"),
        );
    }
    Ok(accounts)
}
