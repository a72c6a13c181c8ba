use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Content, TITLE_MAX, Validate, check_optional_text};
use crate::error::ValidationError;
use crate::types::{AccountId, PostId, PublicationState, Slug};

const EXCERPT_MAX: usize = 500;
const BODY_MAX: usize = 200_000;

/// A blog post. The body is Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub slug: Slug,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub featured_image: Option<String>,
    pub publication: PublicationState,
    /// Stamped the first time the post is published; kept when unpublished.
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: Option<AccountId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Content for BlogPost {
    type Id = PostId;
    type Draft = PostDraft;
    type Patch = PostPatch;

    const COLLECTION: Collection = Collection::Posts;

    fn id(&self) -> PostId {
        self.id
    }

    fn human_key(&self) -> &str {
        self.slug.as_str()
    }

    fn publication(&self) -> PublicationState {
        self.publication
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }
}

/// Fields for a new post.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    /// Editor override; blank means "derive from the title".
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub featured_image: Option<String>,
    pub publication: PublicationState,
    pub author_id: Option<AccountId>,
}

impl PostDraft {
    /// The slug this draft will be stored under.
    ///
    /// # Errors
    ///
    /// Returns a slug validation error.
    pub fn slug(&self) -> Result<Slug, ValidationError> {
        resolve_slug(&self.title, self.slug.as_deref())
    }
}

impl Validate for PostDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_text("title", &self.title, TITLE_MAX)?;
        self.slug()?;
        check_optional_text("excerpt", self.excerpt.as_deref(), EXCERPT_MAX)?;
        check_optional_text("content", self.body.as_deref(), BODY_MAX)?;
        ValidationError::check_url("featured_image", self.featured_image.as_deref())?;
        Ok(())
    }
}

/// Changes to an existing post. `None` leaves a field untouched; for the
/// optional fields `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub body: Option<Option<String>>,
    pub featured_image: Option<Option<String>>,
    pub publication: Option<PublicationState>,
}

impl PostPatch {
    /// The new slug, if the patch changes it.
    ///
    /// A blank slug alongside a new title re-derives from that title.
    ///
    /// # Errors
    ///
    /// Returns a slug validation error.
    pub fn slug(&self) -> Result<Option<Slug>, ValidationError> {
        patch_slug(self.title.as_deref(), self.slug.as_deref())
    }
}

impl Validate for PostPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            ValidationError::check_text("title", title, TITLE_MAX)?;
        }
        self.slug()?;
        check_optional_text("excerpt", self.excerpt.as_ref().and_then(Option::as_deref), EXCERPT_MAX)?;
        check_optional_text("content", self.body.as_ref().and_then(Option::as_deref), BODY_MAX)?;
        ValidationError::check_url(
            "featured_image",
            self.featured_image.as_ref().and_then(Option::as_deref),
        )?;
        Ok(())
    }
}

pub(super) fn resolve_slug(title: &str, slug: Option<&str>) -> Result<Slug, ValidationError> {
    match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => Ok(Slug::parse(explicit)?),
        None => Ok(Slug::from_title(title)?),
    }
}

pub(super) fn patch_slug(
    title: Option<&str>,
    slug: Option<&str>,
) -> Result<Option<Slug>, ValidationError> {
    match (slug.map(str::trim), title) {
        (None, _) => Ok(None),
        (Some(""), Some(title)) => Ok(Some(Slug::from_title(title)?)),
        (Some(""), None) => Err(ValidationError::Required { field: "slug" }),
        (Some(explicit), _) => Ok(Some(Slug::parse(explicit)?)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::SlugError;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_owned(),
            ..PostDraft::default()
        }
    }

    #[test]
    fn test_draft_derives_slug() {
        assert_eq!(draft("Hello World").slug().unwrap().as_str(), "hello-world");
    }

    #[test]
    fn test_draft_slug_override() {
        let d = PostDraft {
            slug: Some("launch-notes".into()),
            ..draft("Hello World")
        };
        assert_eq!(d.slug().unwrap().as_str(), "launch-notes");
    }

    #[test]
    fn test_draft_blank_override_derives() {
        let d = PostDraft {
            slug: Some("   ".into()),
            ..draft("Hello World")
        };
        assert_eq!(d.slug().unwrap().as_str(), "hello-world");
    }

    #[test]
    fn test_draft_requires_title() {
        assert_eq!(
            draft("  ").validate(),
            Err(ValidationError::Required { field: "title" })
        );
    }

    #[test]
    fn test_draft_title_without_slug_chars() {
        assert_eq!(
            draft("???").validate(),
            Err(ValidationError::Slug(SlugError::Empty))
        );
    }

    #[test]
    fn test_draft_rejects_bad_image_url() {
        let d = PostDraft {
            featured_image: Some("ftp://x/y.png".into()),
            ..draft("Hi")
        };
        assert!(matches!(
            d.validate(),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_patch_slug_rules() {
        assert_eq!(PostPatch::default().slug().unwrap(), None);

        let rederive = PostPatch {
            title: Some("New Title".into()),
            slug: Some(String::new()),
            ..PostPatch::default()
        };
        assert_eq!(rederive.slug().unwrap().unwrap().as_str(), "new-title");

        let blank = PostPatch {
            slug: Some(" ".into()),
            ..PostPatch::default()
        };
        assert_eq!(
            blank.validate(),
            Err(ValidationError::Required { field: "slug" })
        );
    }

    #[test]
    fn test_patch_blank_title_rejected() {
        let patch = PostPatch {
            title: Some(String::new()),
            ..PostPatch::default()
        };
        assert!(patch.validate().is_err());
    }
}
