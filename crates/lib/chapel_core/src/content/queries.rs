//! Content queries.
//!
//! Updates use `COALESCE` so that absent input fields keep their stored value.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ContentError, Resource};
use crate::models::content::{
    Announcement, AnnouncementInput, ContactInput, ContactSubmission, DEFAULT_ANNOUNCEMENT_ICON,
    DEFAULT_COUNTRY_CODE, Event, EventInput, MediaInput, MediaItem,
};

// ---------------------------------------------------------------------------
// Announcements
// ---------------------------------------------------------------------------

/// All announcements, newest first (admin view).
pub async fn all_announcements(pool: &PgPool) -> Result<Vec<Announcement>, ContentError> {
    let rows = sqlx::query_as::<_, Announcement>(
        "SELECT * FROM announcements ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active announcements, most recent date first (public view).
pub async fn active_announcements(pool: &PgPool) -> Result<Vec<Announcement>, ContentError> {
    let rows = sqlx::query_as::<_, Announcement>(
        "SELECT * FROM announcements WHERE is_active ORDER BY date DESC, created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_announcement(
    pool: &PgPool,
    input: &AnnouncementInput,
) -> Result<Announcement, ContentError> {
    input.validate_new()?;
    let row = sqlx::query_as::<_, Announcement>(
        "INSERT INTO announcements (id, title, content, date, icon, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(input.title.as_deref().map(str::trim))
    .bind(input.content.as_deref())
    .bind(input.date.unwrap_or_else(|| Utc::now().date_naive()))
    .bind(input.icon.as_deref().unwrap_or(DEFAULT_ANNOUNCEMENT_ICON))
    .bind(input.is_active.unwrap_or(true))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_announcement(
    pool: &PgPool,
    id: Uuid,
    input: &AnnouncementInput,
) -> Result<Announcement, ContentError> {
    input.validate_update()?;
    sqlx::query_as::<_, Announcement>(
        "UPDATE announcements SET \
           title = COALESCE($2, title), \
           content = COALESCE($3, content), \
           date = COALESCE($4, date), \
           icon = COALESCE($5, icon), \
           is_active = COALESCE($6, is_active) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(input.title.as_deref())
    .bind(input.content.as_deref())
    .bind(input.date)
    .bind(input.icon.as_deref())
    .bind(input.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(Resource::Announcements, id))
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// All events, newest first (admin view).
pub async fn all_events(pool: &PgPool) -> Result<Vec<Event>, ContentError> {
    let rows = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Events in calendar order (public view).
pub async fn upcoming_events(pool: &PgPool) -> Result<Vec<Event>, ContentError> {
    let rows = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date ASC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn event_by_id(pool: &PgPool, id: Uuid) -> Result<Event, ContentError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(Resource::Events, id))
}

pub async fn create_event(pool: &PgPool, input: &EventInput) -> Result<Event, ContentError> {
    input.validate_new()?;
    let row = sqlx::query_as::<_, Event>(
        "INSERT INTO events \
           (id, title, description, date, \"time\", location, category, \
            registration_required, contact_info, gallery_folder_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(input.title.as_deref())
    .bind(input.description.as_deref())
    .bind(input.date)
    .bind(input.time.as_deref())
    .bind(input.location.as_deref())
    .bind(input.category.as_deref())
    .bind(input.registration_required.unwrap_or(false))
    .bind(input.contact_info.as_deref())
    .bind(input.gallery_folder_url.as_deref())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_event(
    pool: &PgPool,
    id: Uuid,
    input: &EventInput,
) -> Result<Event, ContentError> {
    input.validate_update()?;
    sqlx::query_as::<_, Event>(
        "UPDATE events SET \
           title = COALESCE($2, title), \
           description = COALESCE($3, description), \
           date = COALESCE($4, date), \
           \"time\" = COALESCE($5, \"time\"), \
           location = COALESCE($6, location), \
           category = COALESCE($7, category), \
           registration_required = COALESCE($8, registration_required), \
           contact_info = COALESCE($9, contact_info), \
           gallery_folder_url = COALESCE($10, gallery_folder_url) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(input.title.as_deref())
    .bind(input.description.as_deref())
    .bind(input.date)
    .bind(input.time.as_deref())
    .bind(input.location.as_deref())
    .bind(input.category.as_deref())
    .bind(input.registration_required)
    .bind(input.contact_info.as_deref())
    .bind(input.gallery_folder_url.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(Resource::Events, id))
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// All media, newest first (admin view).
pub async fn all_media(pool: &PgPool) -> Result<Vec<MediaItem>, ContentError> {
    let rows = sqlx::query_as::<_, MediaItem>("SELECT * FROM media ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Media by preaching date, most recent first (public view).
pub async fn published_media(pool: &PgPool) -> Result<Vec<MediaItem>, ContentError> {
    let rows = sqlx::query_as::<_, MediaItem>("SELECT * FROM media ORDER BY date DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create_media(pool: &PgPool, input: &MediaInput) -> Result<MediaItem, ContentError> {
    input.validate_new()?;
    let row = sqlx::query_as::<_, MediaItem>(
        "INSERT INTO media \
           (id, title, name, date, description, video_url, audio_url, scripture, series, duration) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(input.title.as_deref())
    .bind(input.name.as_deref())
    .bind(input.date)
    .bind(input.description.as_deref().unwrap_or(""))
    .bind(input.video_url.as_deref())
    .bind(input.audio_url.as_deref())
    .bind(input.scripture.as_deref())
    .bind(input.series.as_deref())
    .bind(input.duration.as_deref())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_media(
    pool: &PgPool,
    id: Uuid,
    input: &MediaInput,
) -> Result<MediaItem, ContentError> {
    input.validate_update()?;
    sqlx::query_as::<_, MediaItem>(
        "UPDATE media SET \
           title = COALESCE($2, title), \
           name = COALESCE($3, name), \
           date = COALESCE($4, date), \
           description = COALESCE($5, description), \
           video_url = COALESCE($6, video_url), \
           audio_url = COALESCE($7, audio_url), \
           scripture = COALESCE($8, scripture), \
           series = COALESCE($9, series), \
           duration = COALESCE($10, duration) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(input.title.as_deref())
    .bind(input.name.as_deref())
    .bind(input.date)
    .bind(input.description.as_deref())
    .bind(input.video_url.as_deref())
    .bind(input.audio_url.as_deref())
    .bind(input.scripture.as_deref())
    .bind(input.series.as_deref())
    .bind(input.duration.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(Resource::Media, id))
}

// ---------------------------------------------------------------------------
// Contact forms
// ---------------------------------------------------------------------------

/// All contact submissions, newest first.
pub async fn all_contact_forms(pool: &PgPool) -> Result<Vec<ContactSubmission>, ContentError> {
    let rows = sqlx::query_as::<_, ContactSubmission>(
        "SELECT * FROM contact_forms ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_contact_form(
    pool: &PgPool,
    input: &ContactInput,
) -> Result<ContactSubmission, ContentError> {
    input.validate_new()?;
    let row = sqlx::query_as::<_, ContactSubmission>(
        "INSERT INTO contact_forms \
           (id, fullname, email, phone, countrycode, subject, message, contact_permission) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(input.fullname.as_deref().map(str::trim))
    .bind(input.email.as_deref().map(str::trim))
    .bind(input.phone.as_deref().filter(|p| !p.trim().is_empty()))
    .bind(input.countrycode.as_deref().unwrap_or(DEFAULT_COUNTRY_CODE))
    .bind(input.subject.as_deref())
    .bind(input.message.as_deref())
    .bind(input.contact_permission.unwrap_or(false))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn mark_contact_form_read(pool: &PgPool, id: Uuid) -> Result<(), ContentError> {
    let result = sqlx::query("UPDATE contact_forms SET is_read = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(Resource::ContactForms, id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// Delete a row from the table behind `resource`.
pub async fn delete(pool: &PgPool, resource: Resource, id: Uuid) -> Result<(), ContentError> {
    let sql = match resource {
        Resource::Announcements => "DELETE FROM announcements WHERE id = $1",
        Resource::Events => "DELETE FROM events WHERE id = $1",
        Resource::Media => "DELETE FROM media WHERE id = $1",
        Resource::ContactForms => "DELETE FROM contact_forms WHERE id = $1",
    };
    let result = sqlx::query(sql).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(not_found(resource, id));
    }
    Ok(())
}

fn not_found(resource: Resource, id: Uuid) -> ContentError {
    ContentError::NotFound(format!("{resource} {id}"))
}
