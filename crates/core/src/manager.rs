//! Generic create/read/update/delete workflow for content collections.

use std::collections::HashSet;
use std::marker::PhantomData;

use tracing::instrument;

use crate::content::{Audience, Content, Validate, sort_for};
use crate::error::{ContentError, ValidationError};
use crate::store::ContentStore;

/// The content workflow for one collection, over any [`ContentStore`].
///
/// Validation always runs before the store is touched, so a rejected draft
/// costs no round trip. Errors are returned as-is and never retried.
pub struct ContentManager<'a, T, S> {
    store: &'a S,
    _content: PhantomData<fn() -> T>,
}

impl<'a, T, S> ContentManager<'a, T, S>
where
    T: Content,
    S: ContentStore<T>,
{
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            _content: PhantomData,
        }
    }

    /// List the collection for an audience.
    ///
    /// Public listings never contain a draft, even if the store returns one.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    #[instrument(skip(self), fields(collection = %T::COLLECTION))]
    pub async fn list(&self, audience: Audience) -> Result<Vec<T>, ContentError> {
        let mut items = self.store.select(audience).await?;
        if audience == Audience::Public {
            items.retain(|item| item.publication().is_published());
        }
        sort_for(&mut items, audience);
        Ok(items)
    }

    /// # Errors
    ///
    /// `NotFound` or the store error.
    pub async fn get(&self, id: T::Id) -> Result<T, ContentError> {
        self.store.get(id).await
    }

    /// Resolve a public URL key to a published item.
    ///
    /// # Errors
    ///
    /// Returns the store error. A draft or unknown key is `Ok(None)`.
    #[instrument(skip(self), fields(collection = %T::COLLECTION))]
    pub async fn find_published(&self, key: &str) -> Result<Option<T>, ContentError> {
        Ok(self
            .store
            .find_by_key(key, Audience::Public)
            .await?
            .filter(|item| item.publication().is_published()))
    }

    /// # Errors
    ///
    /// `Validation` (no store call made), `Conflict` for a taken key, or the
    /// store error.
    #[instrument(skip(self, draft), fields(collection = %T::COLLECTION))]
    pub async fn create(&self, draft: &T::Draft) -> Result<T, ContentError> {
        draft.validate()?;
        let item = self.store.insert(draft).await?;
        tracing::info!(id = %item.id(), key = item.human_key(), "Content created");
        Ok(item)
    }

    /// # Errors
    ///
    /// `Validation` (no store call made), `NotFound`, `Conflict`, or the store
    /// error.
    #[instrument(skip(self, patch), fields(collection = %T::COLLECTION))]
    pub async fn update(&self, id: T::Id, patch: &T::Patch) -> Result<T, ContentError> {
        patch.validate()?;
        let item = self.store.update(id, patch).await?;
        tracing::info!(id = %item.id(), "Content updated");
        Ok(item)
    }

    /// # Errors
    ///
    /// `NotFound` or the store error.
    #[instrument(skip(self), fields(collection = %T::COLLECTION))]
    pub async fn delete(&self, id: T::Id) -> Result<(), ContentError> {
        self.store.delete(id).await?;
        tracing::info!(%id, "Content deleted");
        Ok(())
    }

    /// Flip between draft and published, returning the updated item.
    ///
    /// # Errors
    ///
    /// `NotFound` or the store error.
    #[instrument(skip(self), fields(collection = %T::COLLECTION))]
    pub async fn toggle_publication(&self, id: T::Id) -> Result<T, ContentError> {
        let current = self.store.get(id).await?;
        let next = current.publication().toggled();
        let item = self.store.set_publication(id, next).await?;
        tracing::info!(%id, state = next.label(), "Publication toggled");
        Ok(item)
    }

    /// Persist a new display order: the item at index `i` gets position `i`.
    ///
    /// # Errors
    ///
    /// `Validation` for duplicate ids (no store call made), otherwise the
    /// store error. Whether a failure leaves a partial order depends on the
    /// store's [`ContentStore::reorder`].
    #[instrument(skip(self, ordered), fields(collection = %T::COLLECTION, count = ordered.len()))]
    pub async fn reorder(&self, ordered: &[T::Id]) -> Result<(), ContentError> {
        let mut seen = HashSet::with_capacity(ordered.len());
        if !ordered.iter().all(|id| seen.insert(*id)) {
            return Err(ValidationError::Invalid("order lists an item twice".to_owned()).into());
        }
        self.store.reorder(ordered).await
    }

    /// # Errors
    ///
    /// Returns the store error.
    pub async fn count(&self) -> Result<i64, ContentError> {
        self.store.count().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::content::{
        BlogPost, PostDraft, PostPatch, Project, ProjectDraft, Service, ServiceDraft,
    };
    use crate::memory::MemoryStore;
    use crate::types::{PostId, PublicationState};

    fn post_draft(title: &str, publication: PublicationState) -> PostDraft {
        PostDraft {
            title: title.to_owned(),
            body: Some(format!("# {title}")),
            publication,
            ..PostDraft::default()
        }
    }

    fn service_draft(title: &str) -> ServiceDraft {
        ServiceDraft {
            title: title.to_owned(),
            ..ServiceDraft::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_empty_key_never_reaches_store() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);
        let services = ContentManager::<Service, _>::new(&store);

        let err = posts
            .create(&post_draft("", PublicationState::Draft))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));

        let err = services.create(&service_draft("   ")).await.unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));

        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_rejects_duplicates() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);

        let first = posts
            .create(&post_draft("Hello World", PublicationState::Draft))
            .await
            .unwrap();
        assert_eq!(first.slug.as_str(), "hello-world");

        let err = posts
            .create(&post_draft("Hello World", PublicationState::Draft))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_service_titles_are_unique() {
        let store = MemoryStore::new();
        let services = ContentManager::<Service, _>::new(&store);
        services.create(&service_draft("Branding")).await.unwrap();
        let err = services.create(&service_draft("Branding")).await.unwrap_err();
        assert!(matches!(err, ContentError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_public_list_never_contains_drafts() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);
        for (title, state) in [
            ("One", PublicationState::Published),
            ("Two", PublicationState::Draft),
            ("Three", PublicationState::Published),
            ("Four", PublicationState::Draft),
        ] {
            posts.create(&post_draft(title, state)).await.unwrap();
        }

        let public = posts.list(Audience::Public).await.unwrap();
        assert_eq!(public.len(), 2);
        assert!(public.iter().all(|p| p.publication.is_published()));

        let admin = posts.list(Audience::Admin).await.unwrap();
        assert_eq!(admin.len(), 4);
    }

    #[tokio::test]
    async fn test_find_published_hides_drafts() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);
        posts
            .create(&post_draft("Secret", PublicationState::Draft))
            .await
            .unwrap();
        posts
            .create(&post_draft("Open", PublicationState::Published))
            .await
            .unwrap();

        assert!(posts.find_published("secret").await.unwrap().is_none());
        assert!(posts.find_published("missing").await.unwrap().is_none());
        assert_eq!(
            posts.find_published("open").await.unwrap().unwrap().title,
            "Open"
        );
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);
        let post = posts
            .create(&post_draft("Toggle", PublicationState::Draft))
            .await
            .unwrap();

        let once = posts.toggle_publication(post.id).await.unwrap();
        assert_eq!(once.publication, PublicationState::Published);
        let twice = posts.toggle_publication(post.id).await.unwrap();
        assert_eq!(twice.publication, post.publication);
    }

    #[tokio::test]
    async fn test_publishing_stamps_published_at_once() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);
        let post = posts
            .create(&post_draft("Stamp", PublicationState::Draft))
            .await
            .unwrap();
        assert!(post.published_at.is_none());

        let published = posts.toggle_publication(post.id).await.unwrap();
        let stamped = published.published_at.unwrap();

        let unpublished = posts.toggle_publication(post.id).await.unwrap();
        assert_eq!(unpublished.published_at, Some(stamped));

        let republished = posts.toggle_publication(post.id).await.unwrap();
        assert_eq!(republished.published_at, Some(stamped));
    }

    #[tokio::test]
    async fn test_update_validates_before_store() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);
        let post = posts
            .create(&post_draft("Original", PublicationState::Draft))
            .await
            .unwrap();
        let calls = store.calls();

        let bad = PostPatch {
            title: Some("  ".into()),
            ..PostPatch::default()
        };
        assert!(matches!(
            posts.update(post.id, &bad).await,
            Err(ContentError::Validation(_))
        ));
        assert_eq!(store.calls(), calls);

        let good = PostPatch {
            title: Some("Renamed".into()),
            excerpt: Some(Some("Short".into())),
            ..PostPatch::default()
        };
        let updated = posts.update(post.id, &good).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.slug.as_str(), "original");
        assert_eq!(updated.excerpt.as_deref(), Some("Short"));
    }

    #[tokio::test]
    async fn test_update_to_taken_slug_conflicts() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);
        posts
            .create(&post_draft("First", PublicationState::Draft))
            .await
            .unwrap();
        let second = posts
            .create(&post_draft("Second", PublicationState::Draft))
            .await
            .unwrap();
        let patch = PostPatch {
            slug: Some("first".into()),
            ..PostPatch::default()
        };
        assert!(matches!(
            posts.update(second.id, &patch).await,
            Err(ContentError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);
        let id = PostId::generate();
        assert!(matches!(posts.get(id).await, Err(ContentError::NotFound)));
        assert!(matches!(posts.delete(id).await, Err(ContentError::NotFound)));
        assert!(matches!(
            posts.toggle_publication(id).await,
            Err(ContentError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_item() {
        let store = MemoryStore::new();
        let posts = ContentManager::<BlogPost, _>::new(&store);
        let post = posts
            .create(&post_draft("Doomed", PublicationState::Published))
            .await
            .unwrap();
        posts.delete(post.id).await.unwrap();
        assert_eq!(posts.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reorder_then_list_follows_order() {
        let store = MemoryStore::new();
        let services = ContentManager::<Service, _>::new(&store);
        let s1 = services.create(&service_draft("Design")).await.unwrap();
        let s2 = services.create(&service_draft("Build")).await.unwrap();
        let s3 = services.create(&service_draft("Grow")).await.unwrap();

        services.reorder(&[s3.id, s1.id, s2.id]).await.unwrap();

        let listed: Vec<_> = services
            .list(Audience::Admin)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(listed, [s3.id, s1.id, s2.id]);
    }

    #[tokio::test]
    async fn test_reorder_partial_failure_keeps_earlier_writes() {
        let store = MemoryStore::new();
        let projects = ContentManager::<Project, _>::new(&store);
        let mut ids = Vec::new();
        for title in ["Alpha", "Beta", "Gamma"] {
            let draft = ProjectDraft {
                title: title.to_owned(),
                ..ProjectDraft::default()
            };
            ids.push(projects.create(&draft).await.unwrap().id);
        }
        let (p1, p2, p3) = (ids[0], ids[1], ids[2]);

        // Two writes succeed, the third fails.
        store.fail_writes_after(2);
        let err = projects.reorder(&[p3, p1, p2]).await.unwrap_err();
        assert!(matches!(err, ContentError::Unavailable(_)));

        store.clear_failures();
        let positions: Vec<_> = projects
            .list(Audience::Admin)
            .await
            .unwrap()
            .into_iter()
            .map(|p| (p.id, p.display_order))
            .collect();
        // p3 -> 0 and p1 -> 1 were written; p2 kept its original position 1.
        assert!(positions.contains(&(p3, 0)));
        assert!(positions.contains(&(p1, 1)));
        assert!(positions.contains(&(p2, 1)));
    }

    #[tokio::test]
    async fn test_reorder_rejects_duplicates() {
        let store = MemoryStore::new();
        let services = ContentManager::<Service, _>::new(&store);
        let s1 = services.create(&service_draft("Only")).await.unwrap();
        let calls = store.calls();
        assert!(matches!(
            services.reorder(&[s1.id, s1.id]).await,
            Err(ContentError::Validation(_))
        ));
        assert_eq!(store.calls(), calls);
    }
}
