//! Application state shared across handlers.

use std::sync::Arc;

use lumen_core::comments::CommentBoard;
use lumen_core::content::{BlogPost, Project, Service};
use lumen_core::likes::LikeCounter;
use lumen_core::manager::ContentManager;
use lumen_core::messages::Inbox;
use lumen_core::postgres::PgStore;

use crate::config::SiteConfig;
use crate::content::PageLibrary;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    store: PgStore,
    pages: PageLibrary,
}

impl AppState {
    #[must_use]
    pub fn new(config: SiteConfig, store: PgStore, pages: PageLibrary) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                pages,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// The content store. Every read made through it by this binary uses
    /// the public audience.
    #[must_use]
    pub fn store(&self) -> &PgStore {
        &self.inner.store
    }

    #[must_use]
    pub fn pages(&self) -> &PageLibrary {
        &self.inner.pages
    }

    #[must_use]
    pub fn posts(&self) -> ContentManager<'_, BlogPost, PgStore> {
        ContentManager::new(self.store())
    }

    #[must_use]
    pub fn projects(&self) -> ContentManager<'_, Project, PgStore> {
        ContentManager::new(self.store())
    }

    #[must_use]
    pub fn services(&self) -> ContentManager<'_, Service, PgStore> {
        ContentManager::new(self.store())
    }

    #[must_use]
    pub fn comments(&self) -> CommentBoard<'_, PgStore> {
        CommentBoard::new(self.store())
    }

    #[must_use]
    pub fn likes(&self) -> LikeCounter<'_, PgStore> {
        LikeCounter::new(self.store())
    }

    #[must_use]
    pub fn inbox(&self) -> Inbox<'_, PgStore> {
        Inbox::new(self.store())
    }
}
