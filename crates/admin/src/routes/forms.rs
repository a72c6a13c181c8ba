//! HTML form payloads and their mapping onto drafts and patches.
//!
//! Browsers post every field as text: blank means "not set", checkboxes are
//! present only when ticked, and list fields are comma or newline separated.

use std::str::FromStr;

use lumen_core::content::{
    PostDraft, PostPatch, ProjectDraft, ProjectPatch, ServiceDraft, ServicePatch, non_empty,
    split_list,
};
use lumen_core::{AccountId, PublicationState, ServiceIcon, ValidationError};
use serde::Deserialize;

fn text(value: &str) -> Option<String> {
    non_empty(Some(value))
}

fn publication(checkbox: Option<&String>) -> PublicationState {
    PublicationState::from_flag(checkbox.is_some())
}

fn display_order(value: &str) -> Result<Option<i32>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::Invalid("display order must be a whole number".to_owned()))
}

fn icon(value: &str) -> Result<Option<ServiceIcon>, ValidationError> {
    text(value)
        .map(|name| name.parse::<ServiceIcon>().map_err(ValidationError::Invalid))
        .transpose()
}

/// Blog editor fields.
#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub featured_image: String,
    #[serde(default)]
    pub published: Option<String>,
}

impl PostForm {
    #[must_use]
    pub fn into_draft(self, author: AccountId) -> PostDraft {
        PostDraft {
            slug: text(&self.slug),
            excerpt: text(&self.excerpt),
            body: text(&self.content),
            featured_image: text(&self.featured_image),
            publication: publication(self.published.as_ref()),
            author_id: Some(author),
            title: self.title,
        }
    }

    /// Every field is written; a blank slug is re-derived from the title.
    #[must_use]
    pub fn into_patch(self) -> PostPatch {
        PostPatch {
            slug: Some(self.slug.trim().to_owned()),
            excerpt: Some(text(&self.excerpt)),
            body: Some(text(&self.content)),
            featured_image: Some(text(&self.featured_image)),
            publication: Some(publication(self.published.as_ref())),
            title: Some(self.title),
        }
    }
}

/// Portfolio editor fields.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub live_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub display_order: String,
    #[serde(default)]
    pub published: Option<String>,
}

impl ProjectForm {
    /// # Errors
    ///
    /// Returns `ValidationError::Invalid` for a non-numeric display order.
    pub fn into_draft(self) -> Result<ProjectDraft, ValidationError> {
        Ok(ProjectDraft {
            slug: text(&self.slug),
            description: text(&self.description),
            technologies: split_list(&self.technologies),
            live_url: text(&self.live_url),
            image_url: text(&self.image_url),
            publication: publication(self.published.as_ref()),
            display_order: display_order(&self.display_order)?,
            title: self.title,
        })
    }

    /// # Errors
    ///
    /// Returns `ValidationError::Invalid` for a non-numeric display order.
    pub fn into_patch(self) -> Result<ProjectPatch, ValidationError> {
        Ok(ProjectPatch {
            slug: Some(self.slug.trim().to_owned()),
            description: Some(text(&self.description)),
            technologies: Some(split_list(&self.technologies)),
            live_url: Some(text(&self.live_url)),
            image_url: Some(text(&self.image_url)),
            publication: Some(publication(self.published.as_ref())),
            display_order: display_order(&self.display_order)?,
            title: Some(self.title),
        })
    }
}

/// Service editor fields.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub display_order: String,
    #[serde(default)]
    pub published: Option<String>,
}

impl ServiceForm {
    /// # Errors
    ///
    /// Returns `ValidationError::Invalid` for an unknown icon or a
    /// non-numeric display order.
    pub fn into_draft(self) -> Result<ServiceDraft, ValidationError> {
        Ok(ServiceDraft {
            description: text(&self.description),
            icon: icon(&self.icon)?,
            features: split_list(&self.features),
            publication: publication(self.published.as_ref()),
            display_order: display_order(&self.display_order)?,
            title: self.title,
        })
    }

    /// # Errors
    ///
    /// Returns `ValidationError::Invalid` for an unknown icon or a
    /// non-numeric display order.
    pub fn into_patch(self) -> Result<ServicePatch, ValidationError> {
        Ok(ServicePatch {
            description: Some(text(&self.description)),
            icon: Some(icon(&self.icon)?),
            features: Some(split_list(&self.features)),
            publication: Some(publication(self.published.as_ref())),
            display_order: display_order(&self.display_order)?,
            title: Some(self.title),
        })
    }
}

/// Delete buttons post `confirm=yes` once the editor has confirmed.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: String,
}

impl DeleteForm {
    #[must_use]
    pub fn confirmed(&self) -> bool {
        self.confirm == "yes"
    }
}

/// The complete new order, as comma separated ids.
#[derive(Debug, Default, Deserialize)]
pub struct ReorderForm {
    #[serde(default)]
    pub order: String,
}

impl ReorderForm {
    /// # Errors
    ///
    /// Returns `ValidationError::Invalid` if any entry is not an id.
    pub fn ids<I: FromStr>(&self) -> Result<Vec<I>, ValidationError> {
        self.order
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| {
                id.parse()
                    .map_err(|_| ValidationError::Invalid(format!("unknown id in order: {id}")))
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lumen_core::content::Validate;
    use lumen_core::{ProjectId, ServiceId};

    use super::*;

    #[test]
    fn test_post_form_blank_fields_are_unset() {
        let form = PostForm {
            title: "Hello World".to_owned(),
            excerpt: "   ".to_owned(),
            published: Some("on".to_owned()),
            ..PostForm::default()
        };
        let author = AccountId::generate();
        let draft = form.into_draft(author);
        assert_eq!(draft.slug, None);
        assert_eq!(draft.excerpt, None);
        assert_eq!(draft.author_id, Some(author));
        assert!(draft.publication.is_published());
        assert_eq!(draft.slug().unwrap().as_str(), "hello-world");
    }

    #[test]
    fn test_post_patch_clears_optional_fields() {
        let patch = PostForm {
            title: "Renamed".to_owned(),
            ..PostForm::default()
        }
        .into_patch();
        assert_eq!(patch.excerpt, Some(None));
        assert_eq!(patch.publication, Some(PublicationState::Draft));
        assert_eq!(patch.slug().unwrap().unwrap().as_str(), "renamed");
    }

    #[test]
    fn test_project_form_lists_and_order() {
        let draft = ProjectForm {
            title: "Shop".to_owned(),
            technologies: "Rust, Axum\nPostgreSQL".to_owned(),
            display_order: " 3 ".to_owned(),
            ..ProjectForm::default()
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.technologies, ["Rust", "Axum", "PostgreSQL"]);
        assert_eq!(draft.display_order, Some(3));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_bad_display_order() {
        let result = ProjectForm {
            title: "Shop".to_owned(),
            display_order: "first".to_owned(),
            ..ProjectForm::default()
        }
        .into_draft();
        assert!(matches!(result, Err(ValidationError::Invalid(_))));
    }

    #[test]
    fn test_service_icon_parsing() {
        let draft = ServiceForm {
            title: "Web".to_owned(),
            icon: "code".to_owned(),
            ..ServiceForm::default()
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.icon, Some(ServiceIcon::Code));

        let no_icon = ServiceForm {
            title: "Web".to_owned(),
            ..ServiceForm::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(no_icon.icon, Some(None));

        assert!(
            ServiceForm {
                title: "Web".to_owned(),
                icon: "rocket".to_owned(),
                ..ServiceForm::default()
            }
            .into_draft()
            .is_err()
        );
    }

    #[test]
    fn test_delete_requires_yes() {
        assert!(DeleteForm { confirm: "yes".to_owned() }.confirmed());
        assert!(!DeleteForm::default().confirmed());
        assert!(!DeleteForm { confirm: "YES please".to_owned() }.confirmed());
    }

    #[test]
    fn test_reorder_ids() {
        let (a, b) = (ServiceId::generate(), ServiceId::generate());
        let form = ReorderForm {
            order: format!("{b}, {a},"),
        };
        assert_eq!(form.ids::<ServiceId>().unwrap(), vec![b, a]);

        let bad = ReorderForm {
            order: "not-an-id".to_owned(),
        };
        assert!(bad.ids::<ProjectId>().is_err());
    }
}
