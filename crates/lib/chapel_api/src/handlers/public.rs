//! Public site endpoints. None of these are gated.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chapel_core::content::gallery::{EventGallery, event_gallery};
use chapel_core::content::queries;
use chapel_core::models::content::{Announcement, ChurchInfo, ContactInput, Event, MediaItem};
use chapel_core::models::wire::MessageResponse;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `GET /api/announcements`: active announcements.
pub async fn announcements_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Announcement>>> {
    Ok(Json(queries::active_announcements(&state.pool).await?))
}

/// `GET /api/events`: events in date order.
pub async fn events_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Event>>> {
    Ok(Json(queries::upcoming_events(&state.pool).await?))
}

/// `GET /api/events/{id}`.
pub async fn event_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Event>> {
    Ok(Json(queries::event_by_id(&state.pool, id).await?))
}

/// `GET /api/events/{id}/gallery`: the Drive folder behind an event's photos.
pub async fn event_gallery_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventGallery>> {
    let event = queries::event_by_id(&state.pool, id).await?;
    Ok(Json(event_gallery(&event)?))
}

/// `GET /api/media`: sermons and other recordings.
pub async fn media_handler(State(state): State<AppState>) -> AppResult<Json<Vec<MediaItem>>> {
    Ok(Json(queries::published_media(&state.pool).await?))
}

/// `GET /api/church-info`.
pub async fn church_info_handler() -> Json<ChurchInfo> {
    Json(ChurchInfo {
        name: "Living Water Church".into(),
        address: "123 Church Street, Muscat, Oman".into(),
        phone: "+968 1234 5678".into(),
        email: "info@livingwaterchurch.om".into(),
        service_time: "Friday 10:00 AM".into(),
        description: "A welcoming community of faith".into(),
    })
}

/// `POST /api/contact`: accept a contact form submission.
pub async fn contact_handler(
    State(state): State<AppState>,
    body: Result<Json<ContactInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let Json(input) = body.map_err(|_| AppError::Validation("Invalid JSON body".into()))?;
    let submission = queries::create_contact_form(&state.pool, &input).await?;
    info!(id = %submission.id, "contact form received");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Contact form submitted successfully".into(),
        }),
    ))
}
