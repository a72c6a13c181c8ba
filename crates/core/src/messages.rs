//! Contact form submissions and the admin inbox.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ContentError, ValidationError};
use crate::types::{Email, MessageId};

pub const NAME_MAX: usize = 120;
pub const MESSAGE_MAX: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: MessageId,
    pub name: String,
    pub email: Email,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub name: String,
    pub email: Email,
    pub message: String,
}

impl NewMessage {
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn parse(name: &str, email: &str, message: &str) -> Result<Self, ValidationError> {
        ValidationError::check_text("name", name, NAME_MAX)?;
        let email = Email::parse(email)?;
        ValidationError::check_text("message", message, MESSAGE_MAX)?;
        Ok(Self {
            name: name.trim().to_owned(),
            email,
            message: message.trim().to_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InboxCounts {
    pub total: i64,
    pub unread: i64,
}

pub trait MessageStore: Send + Sync {
    fn insert_message(
        &self,
        message: &NewMessage,
    ) -> impl Future<Output = Result<ContactMessage, ContentError>> + Send;

    /// Every message, newest first.
    fn messages(&self) -> impl Future<Output = Result<Vec<ContactMessage>, ContentError>> + Send;

    /// Fetch a message, marking it read.
    ///
    /// # Errors
    ///
    /// `NotFound` when no message has this id.
    fn open_message(
        &self,
        id: MessageId,
    ) -> impl Future<Output = Result<ContactMessage, ContentError>> + Send;

    fn delete_message(&self, id: MessageId) -> impl Future<Output = Result<(), ContentError>> + Send;

    fn message_counts(&self) -> impl Future<Output = Result<InboxCounts, ContentError>> + Send;
}

/// Contact messages from the public form, as seen by the admin.
pub struct Inbox<'a, S> {
    store: &'a S,
}

impl<'a, S: MessageStore> Inbox<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// `Validation` without touching the store, or the store error.
    #[instrument(skip_all)]
    pub async fn submit(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<ContactMessage, ContentError> {
        let message = NewMessage::parse(name, email, message)?;
        let stored = self.store.insert_message(&message).await?;
        tracing::info!(message_id = %stored.id, "Contact message received");
        Ok(stored)
    }

    /// # Errors
    ///
    /// Returns the store error.
    pub async fn list(&self) -> Result<Vec<ContactMessage>, ContentError> {
        self.store.messages().await
    }

    /// # Errors
    ///
    /// `NotFound` or the store error.
    pub async fn open(&self, id: MessageId) -> Result<ContactMessage, ContentError> {
        self.store.open_message(id).await
    }

    /// # Errors
    ///
    /// `NotFound` or the store error.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: MessageId) -> Result<(), ContentError> {
        self.store.delete_message(id).await?;
        tracing::info!(message_id = %id, "Contact message deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the store error.
    pub async fn counts(&self) -> Result<InboxCounts, ContentError> {
        self.store.message_counts().await
    }

    /// # Errors
    ///
    /// Returns the store error.
    pub async fn unread_count(&self) -> Result<i64, ContentError> {
        Ok(self.counts().await?.unread)
    }
}
