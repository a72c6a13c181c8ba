//! Persistence seam for content collections.

use std::future::Future;

use crate::content::{Audience, Content};
use crate::error::ContentError;
use crate::types::PublicationState;

/// Storage for one content collection.
///
/// Implementations enforce uniqueness of the human key and report it as
/// [`ContentError::Conflict`]. Callers are expected to have validated drafts
/// and patches already.
pub trait ContentStore<T: Content>: Send + Sync {
    /// Every item visible to `audience`, in any order.
    fn select(&self, audience: Audience) -> impl Future<Output = Result<Vec<T>, ContentError>> + Send;

    /// # Errors
    ///
    /// [`ContentError::NotFound`] when no item has this id.
    fn get(&self, id: T::Id) -> impl Future<Output = Result<T, ContentError>> + Send;

    /// Look up an item by its human key, restricted to `audience`.
    fn find_by_key(
        &self,
        key: &str,
        audience: Audience,
    ) -> impl Future<Output = Result<Option<T>, ContentError>> + Send;

    fn insert(&self, draft: &T::Draft) -> impl Future<Output = Result<T, ContentError>> + Send;

    fn update(
        &self,
        id: T::Id,
        patch: &T::Patch,
    ) -> impl Future<Output = Result<T, ContentError>> + Send;

    fn delete(&self, id: T::Id) -> impl Future<Output = Result<(), ContentError>> + Send;

    /// Write the publication state. Publishing stamps the first publication
    /// time for collections that track one.
    fn set_publication(
        &self,
        id: T::Id,
        state: PublicationState,
    ) -> impl Future<Output = Result<T, ContentError>> + Send;

    fn set_position(
        &self,
        id: T::Id,
        position: i32,
    ) -> impl Future<Output = Result<(), ContentError>> + Send;

    /// Give each id its index in `ordered` as display position.
    ///
    /// The default issues one [`set_position`](Self::set_position) per item
    /// and stops at the first failure, leaving earlier writes in place.
    /// Stores that can write the whole order atomically should override it.
    fn reorder(&self, ordered: &[T::Id]) -> impl Future<Output = Result<(), ContentError>> + Send {
        async move {
            for (index, id) in ordered.iter().enumerate() {
                let position = i32::try_from(index).unwrap_or(i32::MAX);
                self.set_position(*id, position).await?;
            }
            Ok(())
        }
    }

    fn count(&self) -> impl Future<Output = Result<i64, ContentError>> + Send;
}
