//! Content resources and the dispatch that multiplexes them.
//!
//! Admin transports address content as `{resource}` / `{resource}/{id}`.
//! [`Resource`] names the collection and the functions here route each
//! operation to the matching query, so one set of handlers serves all of them.

pub mod gallery;
pub mod queries;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::content::{
    Announcement, AnnouncementInput, ContactInput, ContactSubmission, Event, EventInput,
    MediaInput, MediaItem,
};

/// Content errors.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// Admin-managed content collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Announcements,
    Events,
    Media,
    ContactForms,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Announcements,
        Resource::Events,
        Resource::Media,
        Resource::ContactForms,
    ];

    /// Path segment naming this resource.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Announcements => "announcements",
            Resource::Events => "events",
            Resource::Media => "media",
            Resource::ContactForms => "contact-forms",
        }
    }

    /// Contact submissions arrive through the public form only.
    pub fn admin_writable(&self) -> bool {
        !matches!(self, Resource::ContactForms)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ContentError::NotFound(format!("unknown resource '{s}'")))
    }
}

/// One record of any resource.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ContentRecord {
    Announcement(Announcement),
    Event(Event),
    Media(MediaItem),
    Contact(ContactSubmission),
}

/// A full listing of any resource.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ContentList {
    Announcements(Vec<Announcement>),
    Events(Vec<Event>),
    Media(Vec<MediaItem>),
    Contacts(Vec<ContactSubmission>),
}

/// List every record of `resource`, newest first.
pub async fn list(pool: &PgPool, resource: Resource) -> Result<ContentList, ContentError> {
    Ok(match resource {
        Resource::Announcements => ContentList::Announcements(queries::all_announcements(pool).await?),
        Resource::Events => ContentList::Events(queries::all_events(pool).await?),
        Resource::Media => ContentList::Media(queries::all_media(pool).await?),
        Resource::ContactForms => ContentList::Contacts(queries::all_contact_forms(pool).await?),
    })
}

/// Create a record from a JSON body.
pub async fn create(
    pool: &PgPool,
    resource: Resource,
    body: serde_json::Value,
) -> Result<ContentRecord, ContentError> {
    Ok(match resource {
        Resource::Announcements => {
            ContentRecord::Announcement(queries::create_announcement(pool, &parse(body)?).await?)
        }
        Resource::Events => ContentRecord::Event(queries::create_event(pool, &parse(body)?).await?),
        Resource::Media => ContentRecord::Media(queries::create_media(pool, &parse(body)?).await?),
        Resource::ContactForms => return Err(read_only(resource)),
    })
}

/// Apply the fields present in a JSON body to an existing record.
pub async fn update(
    pool: &PgPool,
    resource: Resource,
    id: Uuid,
    body: serde_json::Value,
) -> Result<ContentRecord, ContentError> {
    Ok(match resource {
        Resource::Announcements => {
            ContentRecord::Announcement(queries::update_announcement(pool, id, &parse(body)?).await?)
        }
        Resource::Events => {
            ContentRecord::Event(queries::update_event(pool, id, &parse(body)?).await?)
        }
        Resource::Media => ContentRecord::Media(queries::update_media(pool, id, &parse(body)?).await?),
        Resource::ContactForms => return Err(read_only(resource)),
    })
}

/// Delete a record.
pub async fn delete(pool: &PgPool, resource: Resource, id: Uuid) -> Result<(), ContentError> {
    if !resource.admin_writable() {
        return Err(read_only(resource));
    }
    queries::delete(pool, resource, id).await
}

fn read_only(resource: Resource) -> ContentError {
    ContentError::Unsupported(format!("{resource} cannot be modified by admins"))
}

fn parse<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ContentError> {
    serde_json::from_value(body).map_err(|e| ContentError::Validation(format!("invalid body: {e}")))
}

/// Non-blank value of a required text field.
fn required<'a>(value: &'a Option<String>, missing: &str) -> Result<&'a str, ContentError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ContentError::Validation(missing.to_string())),
    }
}

/// A required text field may be omitted from an update but not blanked.
fn not_blank(value: &Option<String>, missing: &str) -> Result<(), ContentError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ContentError::Validation(missing.to_string())),
        _ => Ok(()),
    }
}

impl AnnouncementInput {
    const MISSING: &'static str = "Title and content are required";

    /// Check the fields needed to create an announcement.
    pub fn validate_new(&self) -> Result<(), ContentError> {
        required(&self.title, Self::MISSING)?;
        required(&self.content, Self::MISSING)?;
        Ok(())
    }

    pub fn validate_update(&self) -> Result<(), ContentError> {
        not_blank(&self.title, Self::MISSING)?;
        not_blank(&self.content, Self::MISSING)?;
        not_blank(&self.icon, "Icon cannot be empty")
    }
}

impl EventInput {
    const MISSING: &'static str = "Title, description, date, time, and location are required";

    /// Check the fields needed to create an event.
    pub fn validate_new(&self) -> Result<(), ContentError> {
        required(&self.title, Self::MISSING)?;
        required(&self.description, Self::MISSING)?;
        required(&self.time, Self::MISSING)?;
        required(&self.location, Self::MISSING)?;
        if self.date.is_none() {
            return Err(ContentError::Validation(Self::MISSING.into()));
        }
        Ok(())
    }

    pub fn validate_update(&self) -> Result<(), ContentError> {
        not_blank(&self.title, Self::MISSING)?;
        not_blank(&self.description, Self::MISSING)?;
        not_blank(&self.time, Self::MISSING)?;
        not_blank(&self.location, Self::MISSING)
    }
}

impl MediaInput {
    const MISSING: &'static str = "Title, name, and date are required";

    /// Check the fields needed to create a media item.
    pub fn validate_new(&self) -> Result<(), ContentError> {
        required(&self.title, Self::MISSING)?;
        required(&self.name, Self::MISSING)?;
        if self.date.is_none() {
            return Err(ContentError::Validation(Self::MISSING.into()));
        }
        Ok(())
    }

    pub fn validate_update(&self) -> Result<(), ContentError> {
        not_blank(&self.title, Self::MISSING)?;
        not_blank(&self.name, Self::MISSING)
    }
}

impl ContactInput {
    /// Check the fields needed to accept a contact submission.
    pub fn validate_new(&self) -> Result<(), ContentError> {
        const MISSING: &'static str = "Full name, email, subject, and message are required";
        required(&self.fullname, MISSING)?;
        let email = required(&self.email, MISSING)?;
        required(&self.subject, MISSING)?;
        required(&self.message, MISSING)?;
        if !email.contains('@') {
            return Err(ContentError::Validation("Email address is not valid".into()));
        }
        Ok(())
    }
}
