//! Photo galleries attached to events.
//!
//! Editors paste a Google Drive folder link (or a bare folder id) into
//! `gallery_folder_url`; the public site needs only the folder id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContentError;
use crate::models::content::Event;

const MIN_FOLDER_ID_LEN: usize = 25;
const MAX_FOLDER_ID_LEN: usize = 33;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventGallery {
    pub event_id: Uuid,
    /// `None` when the event has no gallery.
    pub folder_id: Option<String>,
    pub folder_url: Option<String>,
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Drive folder id from a folder link such as
/// `https://drive.google.com/drive/u/0/folders/<id>?usp=sharing`, or from a
/// bare id.
pub fn drive_folder_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let bare = (MIN_FOLDER_ID_LEN..=MAX_FOLDER_ID_LEN).contains(&raw.len())
        && raw.chars().all(is_id_char);
    if bare {
        return Some(raw.to_string());
    }

    let (_, rest) = raw.split_once("/folders/")?;
    let run = rest.find(|c: char| !is_id_char(c)).unwrap_or(rest.len());
    if run < MIN_FOLDER_ID_LEN {
        return None;
    }
    Some(rest[..run.min(MAX_FOLDER_ID_LEN)].to_string())
}

/// Gallery for `event`. A link that names no folder is a validation error.
pub fn event_gallery(event: &Event) -> Result<EventGallery, ContentError> {
    let folder_url = event
        .gallery_folder_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    let folder_id = match folder_url {
        Some(url) => Some(drive_folder_id(url).ok_or_else(|| {
            ContentError::Validation("Invalid Google Drive folder URL".into())
        })?),
        None => None,
    };
    Ok(EventGallery {
        event_id: event.id,
        folder_id,
        folder_url: folder_url.map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    const ID: &str = "1AbCdEfGhIjKlMnOpQrStUvWxYz_-12";

    fn event(gallery: Option<&str>) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Harvest".into(),
            description: "Thanksgiving service".into(),
            date: NaiveDate::from_ymd_opt(2026, 11, 6).unwrap(),
            time: "10:00 AM".into(),
            location: "Main hall".into(),
            category: None,
            registration_required: false,
            contact_info: None,
            gallery_folder_url: gallery.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn folder_links_and_bare_ids() {
        let links = [
            ID.to_string(),
            format!("https://drive.google.com/drive/folders/{ID}"),
            format!("https://drive.google.com/drive/u/1/folders/{ID}?usp=sharing"),
        ];
        for link in links {
            assert_eq!(drive_folder_id(&link).as_deref(), Some(ID), "{link}");
        }
    }

    #[test]
    fn overlong_ids_are_cut_to_the_longest_folder_id() {
        let long = "a".repeat(40);
        let link = format!("https://drive.google.com/drive/folders/{long}");
        assert_eq!(drive_folder_id(&link).unwrap().len(), MAX_FOLDER_ID_LEN);
    }

    #[test]
    fn links_without_a_folder_are_rejected() {
        assert_eq!(drive_folder_id("https://drive.google.com/file/d/abc/view"), None);
        assert_eq!(drive_folder_id("https://drive.google.com/drive/folders/short"), None);
        assert_eq!(drive_folder_id("not a link"), None);
    }

    #[test]
    fn event_without_gallery_has_no_folder() {
        let gallery = event_gallery(&event(None)).unwrap();
        assert_eq!(gallery.folder_id, None);
        assert_eq!(event_gallery(&event(Some("  "))).unwrap().folder_url, None);
    }

    #[test]
    fn event_with_bad_link_is_a_validation_error() {
        let err = event_gallery(&event(Some("https://example.org/photos"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Invalid Google Drive folder URL"
        );
    }
}
