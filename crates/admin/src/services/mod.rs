//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Email and password sign-in with Argon2id hashes
//! - `media` - Image uploads written to the shared media directory

pub mod auth;
pub mod media;

pub use auth::{AuthError, AuthService};
pub use media::{LocalMediaStore, MediaError, MediaStore, StoredMedia};
