use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Content, TITLE_MAX, Validate, check_list, check_optional_text};
use crate::error::ValidationError;
use crate::types::{PublicationState, ServiceIcon, ServiceId};

const DESCRIPTION_MAX: usize = 2000;
const FEATURES_MAX: usize = 20;
const FEATURE_LEN_MAX: usize = 120;

/// An agency service listing. Its title is its public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<ServiceIcon>,
    pub features: Vec<String>,
    pub publication: PublicationState,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Content for Service {
    type Id = ServiceId;
    type Draft = ServiceDraft;
    type Patch = ServicePatch;

    const COLLECTION: Collection = Collection::Services;

    fn id(&self) -> ServiceId {
        self.id
    }

    fn human_key(&self) -> &str {
        &self.title
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

#[derive(Debug, Clone)]
pub struct ServiceDraft {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<ServiceIcon>,
    pub features: Vec<String>,
    pub publication: PublicationState,
    pub display_order: Option<i32>,
}

impl Default for ServiceDraft {
    /// Services go live as soon as they are created unless unchecked.
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            icon: None,
            features: Vec::new(),
            publication: PublicationState::Published,
            display_order: None,
        }
    }
}

impl Validate for ServiceDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_text("title", &self.title, TITLE_MAX)?;
        check_optional_text("description", self.description.as_deref(), DESCRIPTION_MAX)?;
        check_list("features", &self.features, FEATURES_MAX, FEATURE_LEN_MAX)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub icon: Option<Option<ServiceIcon>>,
    pub features: Option<Vec<String>>,
    pub publication: Option<PublicationState>,
    pub display_order: Option<i32>,
}

impl Validate for ServicePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            ValidationError::check_text("title", title, TITLE_MAX)?;
        }
        check_optional_text(
            "description",
            self.description.as_ref().and_then(Option::as_deref),
            DESCRIPTION_MAX,
        )?;
        if let Some(features) = &self.features {
            check_list("features", features, FEATURES_MAX, FEATURE_LEN_MAX)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft_is_published() {
        assert!(ServiceDraft::default().publication.is_published());
    }

    #[test]
    fn test_empty_title_is_invalid() {
        assert_eq!(
            ServiceDraft::default().validate(),
            Err(ValidationError::Required { field: "title" })
        );
    }

    #[test]
    fn test_blank_feature_is_invalid() {
        let draft = ServiceDraft {
            title: "Web Development".into(),
            features: vec!["Fast".into(), "  ".into()],
            ..ServiceDraft::default()
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Required { field: "features" })
        );
    }
}
