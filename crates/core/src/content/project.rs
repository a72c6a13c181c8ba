use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::{patch_slug, resolve_slug};
use super::{Collection, Content, TITLE_MAX, Validate, check_list, check_optional_text};
use crate::error::ValidationError;
use crate::types::{ProjectId, PublicationState, Slug};

const DESCRIPTION_MAX: usize = 5000;
const TECHNOLOGIES_MAX: usize = 20;
const TECHNOLOGY_LEN_MAX: usize = 40;

/// A portfolio case study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub publication: PublicationState,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Content for Project {
    type Id = ProjectId;
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> ProjectId {
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

    fn ordering_key(&self) -> Option<i32> {
        Some(self.display_order)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub publication: PublicationState,
    /// `None` appends after the last project.
    pub display_order: Option<i32>,
}

impl ProjectDraft {
    /// # Errors
    ///
    /// Returns a slug validation error.
    pub fn slug(&self) -> Result<Slug, ValidationError> {
        resolve_slug(&self.title, self.slug.as_deref())
    }
}

impl Validate for ProjectDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_text("title", &self.title, TITLE_MAX)?;
        self.slug()?;
        check_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX)?;
        check_list("technologies", &self.technologies, TECHNOLOGIES_MAX, TECHNOLOGY_LEN_MAX)?;
        ValidationError::check_url("live_url", self.live_url.as_deref())?;
        ValidationError::check_url("image_url", self.image_url.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub technologies: Option<Vec<String>>,
    pub live_url: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub publication: Option<PublicationState>,
    pub display_order: Option<i32>,
}

impl ProjectPatch {
    /// # Errors
    ///
    /// Returns a slug validation error.
    pub fn slug(&self) -> Result<Option<Slug>, ValidationError> {
        patch_slug(self.title.as_deref(), self.slug.as_deref())
    }
}

impl Validate for ProjectPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            ValidationError::check_text("title", title, TITLE_MAX)?;
        }
        self.slug()?;
        check_optional_text(
            "description",
            self.description.as_ref().and_then(Option::as_deref),
            DESCRIPTION_MAX,
        )?;
        if let Some(technologies) = &self.technologies {
            check_list("technologies", technologies, TECHNOLOGIES_MAX, TECHNOLOGY_LEN_MAX)?;
        }
        ValidationError::check_url("live_url", self.live_url.as_ref().and_then(Option::as_deref))?;
        ValidationError::check_url("image_url", self.image_url.as_ref().and_then(Option::as_deref))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_many_technologies() {
        let draft = ProjectDraft {
            title: "Atlas".into(),
            technologies: (0..21).map(|i| format!("tech-{i}")).collect(),
            ..ProjectDraft::default()
        };
        assert!(matches!(draft.validate(), Err(ValidationError::Invalid(_))));
    }

    #[test]
    fn test_live_url_must_be_http() {
        let draft = ProjectDraft {
            title: "Atlas".into(),
            live_url: Some("mailto:hi@atlas.io".into()),
            ..ProjectDraft::default()
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::InvalidUrl { field: "live_url" })
        );
    }

    #[test]
    fn test_valid_draft() {
        let draft = ProjectDraft {
            title: "Atlas Rebrand".into(),
            technologies: vec!["Figma".into(), "Rust".into()],
            live_url: Some("https://atlas.example".into()),
            ..ProjectDraft::default()
        };
        assert_eq!(draft.validate(), Ok(()));
    }
}
