//! Route paths served by [`crate::router`].

pub const GET_HEALTH: &str = "/health";

pub const POST_ADMIN_LOGIN: &str = "/api/admin/login";
pub const GET_ADMIN_ME: &str = "/api/admin/me";
pub const ADMIN_RESOURCE: &str = "/api/admin/{resource}";
pub const ADMIN_RESOURCE_ID: &str = "/api/admin/{resource}/{id}";
pub const PATCH_ADMIN_CONTACT_READ: &str = "/api/admin/contact-forms/{id}/read";

pub const GET_ANNOUNCEMENTS: &str = "/api/announcements";
pub const GET_EVENTS: &str = "/api/events";
pub const GET_EVENT_ID: &str = "/api/events/{id}";
pub const GET_EVENT_GALLERY: &str = "/api/events/{id}/gallery";
pub const GET_MEDIA: &str = "/api/media";
pub const GET_CHURCH_INFO: &str = "/api/church-info";
pub const POST_CONTACT: &str = "/api/contact";
