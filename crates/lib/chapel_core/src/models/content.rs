//! Site content: announcements, events, sermons/media and contact submissions.
//!
//! Each resource has a stored record and an `*Input` type. Inputs carry every
//! field as optional: creation checks the required ones, updates apply only
//! the fields that are present.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Icon used for announcements created without one.
pub const DEFAULT_ANNOUNCEMENT_ICON: &str = "Megaphone";

/// Country code used for contact submissions that omit one.
pub const DEFAULT_COUNTRY_CODE: &str = "+968";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub icon: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnouncementInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub date: Option<NaiveDate>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Free-form time of day as entered by editors, e.g. `"10:00 AM"`.
    pub time: String,
    pub location: String,
    pub category: Option<String>,
    pub registration_required: bool,
    pub contact_info: Option<String>,
    pub gallery_folder_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub registration_required: Option<bool>,
    pub contact_info: Option<String>,
    pub gallery_folder_url: Option<String>,
}

/// A sermon or other recorded media item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MediaItem {
    pub id: Uuid,
    pub title: String,
    /// Speaker name.
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub scripture: Option<String>,
    pub series: Option<String>,
    pub duration: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInput {
    pub title: Option<String>,
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub scripture: Option<String>,
    pub series: Option<String>,
    pub duration: Option<String>,
}

/// A message sent through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub phone: Option<String>,
    pub countrycode: String,
    pub subject: String,
    pub message: String,
    pub contact_permission: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInput {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub countrycode: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub contact_permission: Option<bool>,
}

/// Static details shown on the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurchInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub service_time: String,
    pub description: String,
}
