//! Core types for Lumen.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod icon;
pub mod id;
pub mod slug;
pub mod status;

pub use email::{Email, EmailError};
pub use icon::ServiceIcon;
pub use id::*;
pub use slug::{Slug, SlugError};
pub use status::*;
