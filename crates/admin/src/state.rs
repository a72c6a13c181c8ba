//! Application state shared across handlers.

use std::sync::Arc;

use lumen_core::comments::CommentBoard;
use lumen_core::content::{BlogPost, Project, Service};
use lumen_core::manager::ContentManager;
use lumen_core::messages::Inbox;
use lumen_core::postgres::PgStore;

use crate::config::AdminConfig;
use crate::services::{AuthService, LocalMediaStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: PgStore,
    media: LocalMediaStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, store: PgStore) -> Self {
        let media = LocalMediaStore::new(&config.media);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                media,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The content and account store. Every content read made through it
    /// by this binary uses the admin audience.
    #[must_use]
    pub fn store(&self) -> &PgStore {
        &self.inner.store
    }

    #[must_use]
    pub fn media(&self) -> &LocalMediaStore {
        &self.inner.media
    }

    #[must_use]
    pub fn auth(&self) -> AuthService<'_, PgStore> {
        AuthService::new(self.store())
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
    pub fn inbox(&self) -> Inbox<'_, PgStore> {
        Inbox::new(self.store())
    }
}
