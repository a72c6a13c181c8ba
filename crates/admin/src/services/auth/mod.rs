//! Authentication service.
//!
//! Email and password sign-in over the shared account store. Passwords are
//! hashed with Argon2id; new accounts are members until an operator grants
//! the admin role.

mod error;

use std::sync::LazyLock;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use lumen_core::accounts::{Account, AccountStore};
use lumen_core::auth::Session;
use lumen_core::{ContentError, Email};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Longest password accepted, to bound hashing work.
const MAX_PASSWORD_LENGTH: usize = 256;

/// Hash checked when no account matches, so an unknown email costs the
/// same Argon2 work as a wrong password.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("lumen-unknown-account").ok());

/// Authentication service.
pub struct AuthService<'a, S> {
    accounts: &'a S,
}

impl<'a, S: AccountStore> AuthService<'a, S> {
    #[must_use]
    pub const fn new(accounts: &'a S) -> Self {
        Self { accounts }
    }

    /// Check an email and password and issue a session for the account.
    ///
    /// The caller stores the session; this does not touch cookies.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownAccount` when no account has this email and
    /// `AuthError::InvalidCredentials` when the password is wrong.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;

        let Some((account, password_hash)) = self.accounts.credentials(&email).await? else {
            if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_deref() {
                let _ = verify_password(password, hash);
            }
            return Err(AuthError::UnknownAccount);
        };

        verify_password(password, &password_hash)?;

        tracing::info!(account_id = %account.id, role = %account.role, "Signed in");
        Ok(Session::issue(account.id, account.email))
    }

    /// Create a member account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AccountExists` if the email is already registered.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let account = self
            .accounts
            .create_account(&email, &password_hash)
            .await
            .map_err(|e| match e {
                ContentError::Conflict(_) => AuthError::AccountExists,
                other => AuthError::Store(other),
            })?;

        tracing::info!(account_id = %account.id, "Account created");
        Ok(account)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lumen_core::AccountRole;
    use lumen_core::memory::MemoryStore;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_account_hash_does_full_verification() {
        let hash = UNKNOWN_ACCOUNT_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordHash::new(hash).is_ok());
        assert!(verify_password("long enough", hash).is_err());
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_password_length_rules() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("eightchr").is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        let account = auth.sign_up("Editor@Lumen.Studio", "long enough").await.unwrap();
        assert_eq!(account.role, AccountRole::Member);

        let session = auth.sign_in("editor@lumen.studio", "long enough").await.unwrap();
        assert_eq!(session.subject_id, account.id);
        assert_eq!(session.email.as_str(), "editor@lumen.studio");
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.sign_up("dup@lumen.studio", "long enough").await.unwrap();
        assert!(matches!(
            auth.sign_up("dup@lumen.studio", "another one").await,
            Err(AuthError::AccountExists)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_weak_password_without_write() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        assert!(matches!(
            auth.sign_up("weak@lumen.studio", "1234").await,
            Err(AuthError::WeakPassword(_))
        ));
        assert!(store.accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_failures() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.sign_up("known@lumen.studio", "long enough").await.unwrap();

        assert!(matches!(
            auth.sign_in("unknown@lumen.studio", "long enough").await,
            Err(AuthError::UnknownAccount)
        ));
        assert!(matches!(
            auth.sign_in("known@lumen.studio", "wrong password").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.sign_in("not an email", "long enough").await,
            Err(AuthError::InvalidEmail(_))
        ));
    }
}
