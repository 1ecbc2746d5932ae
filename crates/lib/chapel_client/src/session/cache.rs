//! Admin-only data held for the lifetime of a session.

use chapel_core::models::content::{Announcement, ContactSubmission, Event, MediaItem};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct AdminCache {
    pub contact_messages: Vec<ContactSubmission>,
    pub media: Vec<MediaItem>,
    pub events: Vec<Event>,
    pub announcements: Vec<Announcement>,
}

impl AdminCache {
    pub fn clear(&mut self) {
        self.contact_messages.clear();
        self.media.clear();
        self.events.clear();
        self.announcements.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.contact_messages.is_empty()
            && self.media.is_empty()
            && self.events.is_empty()
            && self.announcements.is_empty()
    }

    /// Flag a cached contact message as read. Returns `false` if it is not cached.
    pub fn mark_message_read(&mut self, id: Uuid) -> bool {
        match self.contact_messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.is_read = true;
                true
            }
            None => false,
        }
    }
}
