//! Lumen Core - domain types and content workflow.
//!
//! This crate is shared by every Lumen component:
//! - `site` - Public marketing site and blog
//! - `admin` - Content management panel
//! - `cli` - Migrations and account role management
//!
//! # Architecture
//!
//! The domain modules are pure: types, validation, the authorization
//! decision, the route guard and the generic [`manager::ContentManager`].
//! Storage sits behind the traits in [`store`], [`comments`], [`likes`],
//! [`messages`] and [`accounts`], with two implementations:
//!
//! - `postgres` (feature `postgres`) - the production store
//! - `memory` (feature `testing`) - an in-memory store for tests
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, slugs, statuses and service icons
//! - [`auth`] / [`guard`] - Sessions, claims and the admin route guard
//! - [`content`] / [`manager`] - Publishable content and its workflow

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod auth;
pub mod comments;
pub mod content;
pub mod env;
pub mod error;
pub mod guard;
pub mod likes;
pub mod manager;
pub mod markdown;
pub mod messages;
pub mod store;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use error::{ContentError, ValidationError};
pub use types::*;
