//! Template view models built from domain types.

use chrono::{DateTime, Utc};
use lumen_core::comments::Comment;
use lumen_core::content::{BlogPost, Project, Service};
use lumen_core::markdown;

/// Characters kept when a post has no excerpt.
const TEASER_CHARS: usize = 220;

/// Long-form date, e.g. "March 4, 2025".
#[must_use]
pub fn long_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// A post in a listing.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub published_on: String,
    pub reading_time_minutes: u32,
}

impl From<&BlogPost> for PostSummary {
    fn from(post: &BlogPost) -> Self {
        let body = post.body.as_deref().unwrap_or_default();
        Self {
            slug: post.slug.to_string(),
            title: post.title.clone(),
            excerpt: post
                .excerpt
                .clone()
                .unwrap_or_else(|| markdown::teaser(body, TEASER_CHARS)),
            featured_image: post.featured_image.clone(),
            published_on: long_date(post.published_at.unwrap_or(post.created_at)),
            reading_time_minutes: markdown::reading_time_minutes(body),
        }
    }
}

/// A full post page.
#[derive(Debug, Clone)]
pub struct PostView {
    pub summary: PostSummary,
    pub content_html: String,
}

impl From<&BlogPost> for PostView {
    fn from(post: &BlogPost) -> Self {
        Self {
            summary: PostSummary::from(post),
            content_html: markdown::render(post.body.as_deref().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub author_name: String,
    pub body: String,
    pub posted_on: String,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            author_name: comment.author_name.clone(),
            body: comment.body.clone(),
            posted_on: long_date(comment.created_at),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceCard {
    pub title: String,
    pub description: String,
    /// Inline SVG markup, trusted (compiled into the binary).
    pub icon_svg: Option<&'static str>,
    pub features: Vec<String>,
}

impl From<&Service> for ServiceCard {
    fn from(service: &Service) -> Self {
        Self {
            title: service.title.clone(),
            description: service.description.clone().unwrap_or_default(),
            icon_svg: service.icon.map(lumen_core::ServiceIcon::svg),
            features: service.features.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectCard {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Project> for ProjectCard {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone().unwrap_or_default(),
            technologies: project.technologies.clone(),
            live_url: project.live_url.clone(),
            image_url: project.image_url.clone(),
        }
    }
}
