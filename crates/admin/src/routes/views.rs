//! Template view models for the admin tables and editors.

use chrono::{DateTime, Utc};
use lumen_core::comments::Comment;
use lumen_core::content::{BlogPost, Project, Service};
use lumen_core::messages::ContactMessage;
use lumen_core::{PublicationState, ServiceIcon};

/// Characters of a message shown in the inbox list.
const MESSAGE_PREVIEW_CHARS: usize = 80;

/// Short date with time, e.g. "2025-03-04 14:05".
#[must_use]
pub fn short_datetime(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let mut preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        preview.push('…');
    }
    preview
}

/// Publication badge shown in every table.
#[derive(Debug, Clone, Copy)]
pub struct Status {
    pub label: &'static str,
    pub published: bool,
}

impl From<PublicationState> for Status {
    fn from(state: PublicationState) -> Self {
        Self {
            label: state.label(),
            published: state.is_published(),
        }
    }
}

/// The full order after moving the item at `index` one step, for the
/// up and down buttons.
fn moved_order(ids: &[String], index: usize, up: bool) -> Option<String> {
    let target = if up { index.checked_sub(1)? } else { index + 1 };
    if target >= ids.len() {
        return None;
    }
    let mut order = ids.to_vec();
    order.swap(index, target);
    Some(order.join(","))
}

/// Up and down reorder targets for each row, in list order.
#[must_use]
pub fn move_targets(ids: &[String]) -> Vec<(Option<String>, Option<String>)> {
    (0..ids.len())
        .map(|i| (moved_order(ids, i, true), moved_order(ids, i, false)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: Status,
    pub published_on: Option<String>,
    pub updated_on: String,
}

impl From<&BlogPost> for PostRow {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            slug: post.slug.to_string(),
            status: post.publication.into(),
            published_on: post.published_at.map(short_datetime),
            updated_on: short_datetime(post.updated_at),
        }
    }
}

/// Blog editor contents; empty for a new post.
#[derive(Debug, Clone, Default)]
pub struct PostEditor {
    pub id: Option<String>,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: String,
    pub published: bool,
}

impl From<&BlogPost> for PostEditor {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: Some(post.id.to_string()),
            title: post.title.clone(),
            slug: post.slug.to_string(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            content: post.body.clone().unwrap_or_default(),
            featured_image: post.featured_image.clone().unwrap_or_default(),
            published: post.publication.is_published(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub technologies: String,
    pub status: Status,
    pub display_order: i32,
    pub move_up: Option<String>,
    pub move_down: Option<String>,
}

impl ProjectRow {
    /// Rows in list order with their reorder targets.
    #[must_use]
    pub fn list(projects: &[Project]) -> Vec<Self> {
        let ids: Vec<String> = projects.iter().map(|p| p.id.to_string()).collect();
        projects
            .iter()
            .zip(move_targets(&ids))
            .map(|(project, (move_up, move_down))| Self {
                id: project.id.to_string(),
                title: project.title.clone(),
                slug: project.slug.to_string(),
                technologies: project.technologies.join(", "),
                status: project.publication.into(),
                display_order: project.display_order,
                move_up,
                move_down,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectEditor {
    pub id: Option<String>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub technologies: String,
    pub live_url: String,
    pub image_url: String,
    pub display_order: String,
    pub published: bool,
}

impl From<&Project> for ProjectEditor {
    fn from(project: &Project) -> Self {
        Self {
            id: Some(project.id.to_string()),
            title: project.title.clone(),
            slug: project.slug.to_string(),
            description: project.description.clone().unwrap_or_default(),
            technologies: project.technologies.join(", "),
            live_url: project.live_url.clone().unwrap_or_default(),
            image_url: project.image_url.clone().unwrap_or_default(),
            display_order: project.display_order.to_string(),
            published: project.publication.is_published(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceRow {
    pub id: String,
    pub title: String,
    pub icon_svg: Option<&'static str>,
    pub feature_count: usize,
    pub status: Status,
    pub display_order: i32,
    pub move_up: Option<String>,
    pub move_down: Option<String>,
}

impl ServiceRow {
    /// Rows in list order with their reorder targets.
    #[must_use]
    pub fn list(services: &[Service]) -> Vec<Self> {
        let ids: Vec<String> = services.iter().map(|s| s.id.to_string()).collect();
        services
            .iter()
            .zip(move_targets(&ids))
            .map(|(service, (move_up, move_down))| Self {
                id: service.id.to_string(),
                title: service.title.clone(),
                icon_svg: service.icon.map(ServiceIcon::svg),
                feature_count: service.features.len(),
                status: service.publication.into(),
                display_order: service.display_order,
                move_up,
                move_down,
            })
            .collect()
    }
}

/// One entry in the icon picker.
#[derive(Debug, Clone, Copy)]
pub struct IconOption {
    pub name: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct ServiceEditor {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub icons: Vec<IconOption>,
    pub features: String,
    pub display_order: String,
    pub published: bool,
}

impl ServiceEditor {
    /// Whether any icon is picked; "None" is checked otherwise.
    #[must_use]
    pub fn has_icon(&self) -> bool {
        self.icons.iter().any(|icon| icon.selected)
    }

    fn icons(selected: Option<ServiceIcon>) -> Vec<IconOption> {
        ServiceIcon::ALL
            .into_iter()
            .map(|icon| IconOption {
                name: icon.as_str(),
                label: icon.label(),
                selected: selected == Some(icon),
            })
            .collect()
    }
}

impl Default for ServiceEditor {
    /// New services are published unless unticked.
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            icons: Self::icons(None),
            features: String::new(),
            display_order: String::new(),
            published: true,
        }
    }
}

impl From<&Service> for ServiceEditor {
    fn from(service: &Service) -> Self {
        Self {
            id: Some(service.id.to_string()),
            title: service.title.clone(),
            description: service.description.clone().unwrap_or_default(),
            icons: Self::icons(service.icon),
            features: service.features.join("\n"),
            display_order: service.display_order.to_string(),
            published: service.publication.is_published(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: String,
    pub author_name: String,
    pub body: String,
    pub posted_on: String,
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            author_name: comment.author_name.clone(),
            body: comment.body.clone(),
            posted_on: short_datetime(comment.created_at),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub preview: String,
    pub read: bool,
    pub received_on: String,
}

impl From<&ContactMessage> for MessageRow {
    fn from(message: &ContactMessage) -> Self {
        Self {
            id: message.id.to_string(),
            name: message.name.clone(),
            email: message.email.to_string(),
            preview: preview(&message.message, MESSAGE_PREVIEW_CHARS),
            read: message.read,
            received_on: short_datetime(message.created_at),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_chars() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("héllo wörld", 5), "héllo…");
    }

    #[test]
    fn test_move_targets() {
        let ids = ["a", "b", "c"].map(str::to_owned);
        let order = |s: &str| Some(s.to_owned());
        assert_eq!(
            move_targets(&ids),
            vec![
                (None, order("b,a,c")),
                (order("b,a,c"), order("a,c,b")),
                (order("a,c,b"), None),
            ]
        );
    }

    #[test]
    fn test_move_targets_single_item() {
        assert_eq!(move_targets(&["only".to_owned()]), vec![(None, None)]);
    }

    #[test]
    fn test_new_service_defaults_to_published() {
        let editor = ServiceEditor::default();
        assert!(editor.published);
        assert_eq!(editor.icons.len(), ServiceIcon::ALL.len());
        assert!(!editor.has_icon());
    }
}
