//! In-memory implementation of every store trait, for tests.
//!
//! Counts every store call and can be told to fail writes after a number of
//! successful ones, which is how partial-failure behavior is exercised.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::accounts::{Account, AccountStore};
use crate::comments::{Comment, CommentStore, NewComment};
use crate::content::{Audience, BlogPost, Content, Project, Service};
use crate::error::{ContentError, ValidationError};
use crate::likes::{LikeStore, LikeTally};
use crate::messages::{ContactMessage, InboxCounts, MessageStore, NewMessage};
use crate::store::ContentStore;
use crate::types::{
    AccountId, AccountRole, CommentId, Email, MessageId, PostId, ProjectId, PublicationState,
    ServiceId, VisitorId,
};

#[derive(Default)]
struct Tables {
    posts: Vec<BlogPost>,
    projects: Vec<Project>,
    services: Vec<Service>,
    comments: Vec<Comment>,
    likes: HashSet<(PostId, VisitorId)>,
    messages: Vec<ContactMessage>,
    accounts: Vec<(Account, String)>,
}

#[derive(Default)]
struct State {
    tables: Tables,
    calls: usize,
    writes_left: Option<usize>,
    unavailable: bool,
}

/// Store backed by vectors behind a mutex.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls made so far, reads and writes.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    /// Let `writes` more writes succeed, then fail every write after that.
    pub fn fail_writes_after(&self, writes: usize) {
        self.lock().writes_left = Some(writes);
    }

    /// Make every call fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.writes_left = None;
        state.unavailable = false;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> Result<R, ContentError> {
        let mut state = self.lock();
        state.calls += 1;
        if state.unavailable {
            return Err(ContentError::Unavailable("memory store offline".to_owned()));
        }
        Ok(f(&state.tables))
    }

    fn write<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<R, ContentError>,
    ) -> Result<R, ContentError> {
        let mut state = self.lock();
        state.calls += 1;
        if state.unavailable {
            return Err(ContentError::Unavailable("memory store offline".to_owned()));
        }
        match &mut state.writes_left {
            Some(0) => {
                return Err(ContentError::Unavailable(
                    "injected write failure".to_owned(),
                ));
            }
            Some(left) => *left -= 1,
            None => {}
        }
        f(&mut state.tables)
    }
}

/// How each content type sits in the memory tables.
trait Record: Content {
    fn rows(tables: &Tables) -> &Vec<Self>;
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self>;
    fn build(draft: &Self::Draft, next_position: i32, now: DateTime<Utc>) -> Result<Self, ContentError>;
    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) -> Result<(), ContentError>;
    fn publish(&mut self, state: PublicationState, now: DateTime<Utc>);
    fn place(&mut self, position: i32) -> Result<(), ContentError>;
}

fn key_taken<T: Content>(rows: &[T], key: &str, except: Option<T::Id>) -> bool {
    rows.iter()
        .any(|row| row.human_key() == key && Some(row.id()) != except)
}

fn conflict<T: Content>(key: &str) -> ContentError {
    ContentError::Conflict(format!("{} \"{key}\"", T::COLLECTION.noun().to_lowercase()))
}

impl MemoryStore {
    fn select_rows<T: Record>(&self, audience: Audience) -> Result<Vec<T>, ContentError> {
        self.read(|tables| {
            T::rows(tables)
                .iter()
                .filter(|row| audience == Audience::Admin || row.publication().is_published())
                .cloned()
                .collect()
        })
    }

    fn get_row<T: Record>(&self, id: T::Id) -> Result<T, ContentError> {
        self.read(|tables| T::rows(tables).iter().find(|row| row.id() == id).cloned())?
            .ok_or(ContentError::NotFound)
    }

    fn find_row<T: Record>(&self, key: &str, audience: Audience) -> Result<Option<T>, ContentError> {
        self.read(|tables| {
            T::rows(tables)
                .iter()
                .find(|row| {
                    row.human_key() == key
                        && (audience == Audience::Admin || row.publication().is_published())
                })
                .cloned()
        })
    }

    fn insert_row<T: Record>(&self, draft: &T::Draft) -> Result<T, ContentError> {
        self.write(|tables| {
            let rows = T::rows_mut(tables);
            let next = rows
                .iter()
                .filter_map(|row| row.ordering_key())
                .max()
                .map_or(0, |max| max + 1);
            let row = T::build(draft, next, Utc::now())?;
            if key_taken(rows, row.human_key(), None) {
                return Err(conflict::<T>(row.human_key()));
            }
            rows.push(row.clone());
            Ok(row)
        })
    }

    fn update_row<T: Record>(&self, id: T::Id, patch: &T::Patch) -> Result<T, ContentError> {
        self.write(|tables| {
            let rows = T::rows_mut(tables);
            let index = rows
                .iter()
                .position(|row| row.id() == id)
                .ok_or(ContentError::NotFound)?;
            let mut updated = rows.get(index).cloned().ok_or(ContentError::NotFound)?;
            updated.apply(patch, Utc::now())?;
            if key_taken(rows, updated.human_key(), Some(id)) {
                return Err(conflict::<T>(updated.human_key()));
            }
            if let Some(slot) = rows.get_mut(index) {
                *slot = updated.clone();
            }
            Ok(updated)
        })
    }

    fn delete_row<T: Record>(&self, id: T::Id) -> Result<(), ContentError> {
        self.write(|tables| {
            let rows = T::rows_mut(tables);
            let before = rows.len();
            rows.retain(|row| row.id() != id);
            if rows.len() == before {
                return Err(ContentError::NotFound);
            }
            Ok(())
        })
    }

    fn with_row<T: Record>(
        &self,
        id: T::Id,
        f: impl FnOnce(&mut T) -> Result<(), ContentError>,
    ) -> Result<T, ContentError> {
        self.write(|tables| {
            let row = T::rows_mut(tables)
                .iter_mut()
                .find(|row| row.id() == id)
                .ok_or(ContentError::NotFound)?;
            f(row)?;
            Ok(row.clone())
        })
    }

    fn count_rows<T: Record>(&self) -> Result<i64, ContentError> {
        self.read(|tables| i64::try_from(T::rows(tables).len()).unwrap_or(i64::MAX))
    }
}

macro_rules! memory_content_store {
    ($ty:ty) => {
        impl ContentStore<$ty> for MemoryStore {
            async fn select(&self, audience: Audience) -> Result<Vec<$ty>, ContentError> {
                self.select_rows(audience)
            }

            async fn get(&self, id: <$ty as Content>::Id) -> Result<$ty, ContentError> {
                self.get_row::<$ty>(id)
            }

            async fn find_by_key(
                &self,
                key: &str,
                audience: Audience,
            ) -> Result<Option<$ty>, ContentError> {
                self.find_row(key, audience)
            }

            async fn insert(&self, draft: &<$ty as Content>::Draft) -> Result<$ty, ContentError> {
                self.insert_row::<$ty>(draft)
            }

            async fn update(
                &self,
                id: <$ty as Content>::Id,
                patch: &<$ty as Content>::Patch,
            ) -> Result<$ty, ContentError> {
                self.update_row::<$ty>(id, patch)
            }

            async fn delete(&self, id: <$ty as Content>::Id) -> Result<(), ContentError> {
                self.delete_row::<$ty>(id)
            }

            async fn set_publication(
                &self,
                id: <$ty as Content>::Id,
                state: PublicationState,
            ) -> Result<$ty, ContentError> {
                let now = Utc::now();
                self.with_row::<$ty>(id, |row| {
                    row.publish(state, now);
                    Ok(())
                })
            }

            async fn set_position(
                &self,
                id: <$ty as Content>::Id,
                position: i32,
            ) -> Result<(), ContentError> {
                self.with_row::<$ty>(id, |row| row.place(position))
                    .map(|_| ())
            }

            async fn count(&self) -> Result<i64, ContentError> {
                self.count_rows::<$ty>()
            }
        }
    };
}

memory_content_store!(BlogPost);
memory_content_store!(Project);
memory_content_store!(Service);

impl Record for BlogPost {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.posts
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.posts
    }

    fn build(draft: &Self::Draft, _next_position: i32, now: DateTime<Utc>) -> Result<Self, ContentError> {
        Ok(Self {
            id: PostId::generate(),
            title: draft.title.trim().to_owned(),
            slug: draft.slug()?,
            excerpt: draft.excerpt.clone(),
            body: draft.body.clone(),
            featured_image: draft.featured_image.clone(),
            publication: draft.publication,
            published_at: draft.publication.is_published().then_some(now),
            author_id: draft.author_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) -> Result<(), ContentError> {
        if let Some(slug) = patch.slug()? {
            self.slug = slug;
        }
        if let Some(title) = &patch.title {
            title.trim().clone_into(&mut self.title);
        }
        if let Some(excerpt) = &patch.excerpt {
            self.excerpt.clone_from(excerpt);
        }
        if let Some(body) = &patch.body {
            self.body.clone_from(body);
        }
        if let Some(image) = &patch.featured_image {
            self.featured_image.clone_from(image);
        }
        if let Some(state) = patch.publication {
            self.publish(state, now);
        }
        self.updated_at = now;
        Ok(())
    }

    fn publish(&mut self, state: PublicationState, now: DateTime<Utc>) {
        self.publication = state;
        if state.is_published() && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.updated_at = now;
    }

    fn place(&mut self, _position: i32) -> Result<(), ContentError> {
        Err(ValidationError::Invalid("posts are ordered by publication date".to_owned()).into())
    }
}

impl Record for Project {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.projects
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.projects
    }

    fn build(draft: &Self::Draft, next_position: i32, now: DateTime<Utc>) -> Result<Self, ContentError> {
        Ok(Self {
            id: ProjectId::generate(),
            title: draft.title.trim().to_owned(),
            slug: draft.slug()?,
            description: draft.description.clone(),
            technologies: draft.technologies.clone(),
            live_url: draft.live_url.clone(),
            image_url: draft.image_url.clone(),
            publication: draft.publication,
            display_order: draft.display_order.unwrap_or(next_position),
            created_at: now,
        })
    }

    fn apply(&mut self, patch: &Self::Patch, _now: DateTime<Utc>) -> Result<(), ContentError> {
        if let Some(slug) = patch.slug()? {
            self.slug = slug;
        }
        if let Some(title) = &patch.title {
            title.trim().clone_into(&mut self.title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(technologies) = &patch.technologies {
            self.technologies.clone_from(technologies);
        }
        if let Some(live_url) = &patch.live_url {
            self.live_url.clone_from(live_url);
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url.clone_from(image_url);
        }
        if let Some(state) = patch.publication {
            self.publication = state;
        }
        if let Some(position) = patch.display_order {
            self.display_order = position;
        }
        Ok(())
    }

    fn publish(&mut self, state: PublicationState, _now: DateTime<Utc>) {
        self.publication = state;
    }

    fn place(&mut self, position: i32) -> Result<(), ContentError> {
        self.display_order = position;
        Ok(())
    }
}

impl Record for Service {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.services
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.services
    }

    fn build(draft: &Self::Draft, next_position: i32, now: DateTime<Utc>) -> Result<Self, ContentError> {
        Ok(Self {
            id: ServiceId::generate(),
            title: draft.title.trim().to_owned(),
            description: draft.description.clone(),
            icon: draft.icon,
            features: draft.features.clone(),
            publication: draft.publication,
            display_order: draft.display_order.unwrap_or(next_position),
            created_at: now,
        })
    }

    fn apply(&mut self, patch: &Self::Patch, _now: DateTime<Utc>) -> Result<(), ContentError> {
        if let Some(title) = &patch.title {
            title.trim().clone_into(&mut self.title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(features) = &patch.features {
            self.features.clone_from(features);
        }
        if let Some(state) = patch.publication {
            self.publication = state;
        }
        if let Some(position) = patch.display_order {
            self.display_order = position;
        }
        Ok(())
    }

    fn publish(&mut self, state: PublicationState, _now: DateTime<Utc>) {
        self.publication = state;
    }

    fn place(&mut self, position: i32) -> Result<(), ContentError> {
        self.display_order = position;
        Ok(())
    }
}

impl CommentStore for MemoryStore {
    async fn comments_for(&self, post_id: PostId) -> Result<Vec<Comment>, ContentError> {
        self.read(|tables| {
            tables
                .comments
                .iter()
                .rev()
                .filter(|c| c.post_id == post_id)
                .cloned()
                .collect()
        })
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, ContentError> {
        self.write(|tables| {
            let stored = Comment {
                id: CommentId::generate(),
                post_id: comment.post_id(),
                author_name: comment.author_name().to_owned(),
                body: comment.body().to_owned(),
                created_at: Utc::now(),
            };
            tables.comments.push(stored.clone());
            Ok(stored)
        })
    }

    async fn delete_comment(&self, post_id: PostId, id: CommentId) -> Result<(), ContentError> {
        self.write(|tables| {
            let before = tables.comments.len();
            tables.comments.retain(|c| c.id != id || c.post_id != post_id);
            if tables.comments.len() == before {
                return Err(ContentError::NotFound);
            }
            Ok(())
        })
    }
}

impl LikeStore for MemoryStore {
    async fn tally(
        &self,
        post_id: PostId,
        visitor: Option<VisitorId>,
    ) -> Result<LikeTally, ContentError> {
        self.read(|tables| {
            let count = tables.likes.iter().filter(|(p, _)| *p == post_id).count();
            LikeTally {
                count: i64::try_from(count).unwrap_or(i64::MAX),
                liked: visitor.is_some_and(|v| tables.likes.contains(&(post_id, v))),
            }
        })
    }

    async fn add_like(&self, post_id: PostId, visitor: VisitorId) -> Result<bool, ContentError> {
        self.write(|tables| Ok(tables.likes.insert((post_id, visitor))))
    }

    async fn remove_like(&self, post_id: PostId, visitor: VisitorId) -> Result<bool, ContentError> {
        self.write(|tables| Ok(tables.likes.remove(&(post_id, visitor))))
    }
}

impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: &NewMessage) -> Result<ContactMessage, ContentError> {
        self.write(|tables| {
            let stored = ContactMessage {
                id: MessageId::generate(),
                name: message.name.clone(),
                email: message.email.clone(),
                message: message.message.clone(),
                read: false,
                created_at: Utc::now(),
            };
            tables.messages.push(stored.clone());
            Ok(stored)
        })
    }

    async fn messages(&self) -> Result<Vec<ContactMessage>, ContentError> {
        self.read(|tables| tables.messages.iter().rev().cloned().collect())
    }

    async fn open_message(&self, id: MessageId) -> Result<ContactMessage, ContentError> {
        self.write(|tables| {
            let message = tables
                .messages
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or(ContentError::NotFound)?;
            message.read = true;
            Ok(message.clone())
        })
    }

    async fn delete_message(&self, id: MessageId) -> Result<(), ContentError> {
        self.write(|tables| {
            let before = tables.messages.len();
            tables.messages.retain(|m| m.id != id);
            if tables.messages.len() == before {
                return Err(ContentError::NotFound);
            }
            Ok(())
        })
    }

    async fn message_counts(&self) -> Result<InboxCounts, ContentError> {
        self.read(|tables| {
            let unread = tables.messages.iter().filter(|m| !m.read).count();
            InboxCounts {
                total: i64::try_from(tables.messages.len()).unwrap_or(i64::MAX),
                unread: i64::try_from(unread).unwrap_or(i64::MAX),
            }
        })
    }
}

impl AccountStore for MemoryStore {
    async fn create_account(&self, email: &Email, password_hash: &str) -> Result<Account, ContentError> {
        self.write(|tables| {
            if tables.accounts.iter().any(|(a, _)| &a.email == email) {
                return Err(ContentError::Conflict("an account with this email".to_owned()));
            }
            let account = Account {
                id: AccountId::generate(),
                email: email.clone(),
                role: AccountRole::Member,
                sessions_valid_after: None,
                created_at: Utc::now(),
            };
            tables.accounts.push((account.clone(), password_hash.to_owned()));
            Ok(account)
        })
    }

    async fn credentials(&self, email: &Email) -> Result<Option<(Account, String)>, ContentError> {
        self.read(|tables| tables.accounts.iter().find(|(a, _)| &a.email == email).cloned())
    }

    async fn account(&self, id: AccountId) -> Result<Option<Account>, ContentError> {
        self.read(|tables| {
            tables
                .accounts
                .iter()
                .find(|(a, _)| a.id == id)
                .map(|(a, _)| a.clone())
        })
    }

    async fn set_role(&self, email: &Email, role: AccountRole) -> Result<Account, ContentError> {
        self.write(|tables| {
            let (account, _) = tables
                .accounts
                .iter_mut()
                .find(|(a, _)| &a.email == email)
                .ok_or(ContentError::NotFound)?;
            if role == AccountRole::Member && account.role != AccountRole::Member {
                account.sessions_valid_after = Some(Utc::now());
            }
            account.role = role;
            Ok(account.clone())
        })
    }

    async fn revoke_sessions(&self, email: &Email) -> Result<Account, ContentError> {
        self.write(|tables| {
            let (account, _) = tables
                .accounts
                .iter_mut()
                .find(|(a, _)| &a.email == email)
                .ok_or(ContentError::NotFound)?;
            account.sessions_valid_after = Some(Utc::now());
            Ok(account.clone())
        })
    }

    async fn accounts(&self) -> Result<Vec<Account>, ContentError> {
        self.read(|tables| tables.accounts.iter().map(|(a, _)| a.clone()).collect())
    }
}
