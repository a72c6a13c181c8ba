//! Publishable content: blog posts, portfolio projects and service listings.
//!
//! The three collections share one workflow ([`crate::manager::ContentManager`])
//! through the [`Content`] trait. Each type brings its own draft (for create)
//! and patch (for update) with field rules checked by [`Validate`].

mod post;
mod project;
mod service;

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, Utc};

pub use post::{BlogPost, PostDraft, PostPatch};
pub use project::{Project, ProjectDraft, ProjectPatch};
pub use service::{Service, ServiceDraft, ServicePatch};

use crate::error::ValidationError;
use crate::types::PublicationState;

/// Maximum characters in a title.
pub const TITLE_MAX: usize = 200;

/// Field rules for a draft or patch, checked before any store call.
pub trait Validate {
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Which collection a content type lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Projects,
    Services,
}

impl Collection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Projects => "projects",
            Self::Services => "services",
        }
    }

    /// Singular label used in flash messages ("Post created").
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Posts => "Post",
            Self::Projects => "Project",
            Self::Services => "Service",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    /// Every item regardless of publication state.
    Admin,
    /// Published items only.
    Public,
}

/// A publishable item managed through the generic content workflow.
pub trait Content: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static;
    type Draft: Validate + Debug + Send + Sync;
    type Patch: Validate + Debug + Send + Sync;

    const COLLECTION: Collection;

    fn id(&self) -> Self::Id;

    /// Public identifier: the slug for posts and projects, the title for
    /// services. Unique within the collection.
    fn human_key(&self) -> &str;

    fn publication(&self) -> PublicationState;

    fn created_at(&self) -> DateTime<Utc>;

    /// Manual display position, for collections an editor can reorder.
    fn ordering_key(&self) -> Option<i32> {
        None
    }

    /// When the item was first published, for collections that track it.
    fn published_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Listing order for a collection.
///
/// Items with a display position come first, ascending, ties broken by
/// newest first. Otherwise newest first, where public listings count from
/// the publication date.
pub fn compare<T: Content>(a: &T, b: &T, audience: Audience) -> Ordering {
    let newest_first = |a: &T, b: &T| {
        let key = |item: &T| match audience {
            Audience::Public => item.published_at().unwrap_or_else(|| item.created_at()),
            Audience::Admin => item.created_at(),
        };
        key(b).cmp(&key(a))
    };

    match (a.ordering_key(), b.ordering_key()) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| newest_first(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => newest_first(a, b),
    }
}

/// Sort a listing in place (stable).
pub fn sort_for<T: Content>(items: &mut [T], audience: Audience) {
    items.sort_by(|a, b| compare(a, b, audience));
}

/// Trim an optional form field, mapping blank to `None`.
#[must_use]
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

/// Split a comma or newline separated form field into trimmed entries.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub(crate) fn check_list(
    field: &'static str,
    items: &[String],
    max_items: usize,
    max_len: usize,
) -> Result<(), ValidationError> {
    if items.len() > max_items {
        return Err(ValidationError::Invalid(format!(
            "{field} can have at most {max_items} entries"
        )));
    }
    for item in items {
        ValidationError::check_text(field, item, max_len)?;
    }
    Ok(())
}

pub(crate) fn check_optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::types::{ServiceId, Slug};

    fn service(title: &str, order: i32, age_days: i64) -> Service {
        Service {
            id: ServiceId::generate(),
            title: title.to_owned(),
            description: None,
            icon: None,
            features: vec![],
            publication: PublicationState::Published,
            display_order: order,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    fn post(title: &str, created_days_ago: i64, published_days_ago: Option<i64>) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: crate::types::PostId::generate(),
            title: title.to_owned(),
            slug: Slug::from_title(title).unwrap(),
            excerpt: None,
            body: None,
            featured_image: None,
            publication: PublicationState::from_flag(published_days_ago.is_some()),
            published_at: published_days_ago.map(|d| now - Duration::days(d)),
            author_id: None,
            created_at: now - Duration::days(created_days_ago),
            updated_at: now,
        }
    }

    #[test]
    fn test_ordering_key_ascending_then_newest() {
        let mut items = vec![
            service("c", 2, 0),
            service("a-old", 0, 5),
            service("b", 1, 0),
            service("a-new", 0, 1),
        ];
        sort_for(&mut items, Audience::Public);
        let titles: Vec<_> = items.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["a-new", "a-old", "b", "c"]);
    }

    #[test]
    fn test_public_posts_sort_by_published_at() {
        // Written long ago but published yesterday beats written and
        // published three days ago.
        let mut items = vec![post("fresh", 3, Some(3)), post("late", 30, Some(1))];
        sort_for(&mut items, Audience::Public);
        assert_eq!(items[0].title, "late");

        sort_for(&mut items, Audience::Admin);
        assert_eq!(items[0].title, "fresh");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("Rust, axum ,\n, Postgres\nHTMX"),
            ["Rust", "axum", "Postgres", "HTMX"]
        );
        assert!(split_list(" , \n").is_empty());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" x ")), Some("x".to_owned()));
        assert_eq!(non_empty(None), None);
    }
}
