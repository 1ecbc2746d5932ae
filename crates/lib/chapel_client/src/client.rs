//! HTTP client for the admin API.

use chapel_core::models::auth::AdminProfile;
use chapel_core::models::content::{Announcement, ContactSubmission, Event, MediaItem};
use chapel_core::models::wire::{ErrorResponse, LoginRequest, TokenResponse};
use chrono::{TimeDelta, Utc};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::ClientError;
use crate::session::cache::AdminCache;
use crate::session::claims::peek_expiry;
use crate::session::{LogoutReason, RequestTicket, SessionManager};

/// A login response whose token expires sooner than this is refused.
pub const MIN_TOKEN_VALIDITY_SECS: i64 = 60;

/// Admin API client bound to one [`SessionManager`].
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    session: SessionManager,
}

impl AdminClient {
    /// `base_url` is the server root, e.g. `http://localhost:8001`.
    pub fn new(base_url: &str, session: SessionManager) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Log in and start a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminProfile, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("api/admin/login")?)
            .json(&LoginRequest {
                username: Some(username.to_string()),
                password: Some(password.to_string()),
            })
            .send()
            .await?;

        let body: TokenResponse = match resp.status() {
            StatusCode::UNAUTHORIZED => return Err(ClientError::InvalidCredentials),
            StatusCode::TOO_MANY_REQUESTS => return Err(ClientError::RateLimited),
            status if status.is_success() => decode(resp).await?,
            _ => return Err(server_error(resp).await),
        };

        let exp = peek_expiry(&body.access_token).ok_or(ClientError::MalformedToken)?;
        if exp - Utc::now() < TimeDelta::seconds(MIN_TOKEN_VALIDITY_SECS) {
            return Err(ClientError::TokenTooShortLived);
        }

        self.session.establish(&body.access_token)?;
        info!(username = %body.user.username, %exp, "admin session started");
        Ok(body.user)
    }

    /// End the session at the admin's request. No server call is needed.
    pub fn logout(&self) {
        self.session.logout(LogoutReason::UserInitiated);
    }

    /// The principal behind the current token, as the server sees it now.
    pub async fn me(&self) -> Result<AdminProfile, ClientError> {
        let (ticket, resp) = self.send(Method::GET, "api/admin/me").await?;
        let profile = decode(resp).await?;
        if self.session.complete(&ticket, |_| {}) {
            Ok(profile)
        } else {
            Err(ClientError::Discarded)
        }
    }

    pub async fn refresh_contact_messages(&self) -> Result<usize, ClientError> {
        self.fetch_into("api/admin/contact-forms", |cache, list: Vec<ContactSubmission>| {
            cache.contact_messages = list;
        })
        .await
    }

    pub async fn refresh_media(&self) -> Result<usize, ClientError> {
        self.fetch_into("api/admin/media", |cache, list: Vec<MediaItem>| {
            cache.media = list;
        })
        .await
    }

    pub async fn refresh_events(&self) -> Result<usize, ClientError> {
        self.fetch_into("api/admin/events", |cache, list: Vec<Event>| {
            cache.events = list;
        })
        .await
    }

    pub async fn refresh_announcements(&self) -> Result<usize, ClientError> {
        self.fetch_into("api/admin/announcements", |cache, list: Vec<Announcement>| {
            cache.announcements = list;
        })
        .await
    }

    /// Reload every admin list. Stops at the first failure.
    pub async fn refresh_all(&self) -> Result<(), ClientError> {
        self.refresh_contact_messages().await?;
        self.refresh_media().await?;
        self.refresh_events().await?;
        self.refresh_announcements().await?;
        Ok(())
    }

    /// Mark a contact message as read on the server and in the cache.
    pub async fn mark_message_read(&self, id: Uuid) -> Result<(), ClientError> {
        let path = format!("api/admin/contact-forms/{id}/read");
        let (ticket, _) = self.send(Method::PATCH, &path).await?;
        if self.session.complete(&ticket, |cache| {
            cache.mark_message_read(id);
        }) {
            Ok(())
        } else {
            Err(ClientError::Discarded)
        }
    }

    async fn fetch_into<T, F>(&self, path: &str, apply: F) -> Result<usize, ClientError>
    where
        T: DeserializeOwned,
        F: FnOnce(&mut AdminCache, Vec<T>),
    {
        let (ticket, resp) = self.send(Method::GET, path).await?;
        let list: Vec<T> = decode(resp).await?;
        let count = list.len();
        if self.session.complete(&ticket, |cache| apply(cache, list)) {
            debug!(path, count, "admin data refreshed");
            Ok(count)
        } else {
            Err(ClientError::Discarded)
        }
    }

    /// Send an authorized request. A 401 ends the session that sent it.
    async fn send(
        &self,
        method: Method,
        path: &str,
    ) -> Result<(RequestTicket, Response), ClientError> {
        let ticket = self.session.begin_request()?;
        let resp = self
            .http
            .request(method, self.endpoint(path)?)
            .bearer_auth(ticket.token())
            .send()
            .await?;

        match resp.status() {
            StatusCode::UNAUTHORIZED => {
                debug!(path, "server refused the session token");
                self.session.reject(&ticket);
                Err(ClientError::SessionExpired)
            }
            status if status.is_success() => Ok((ticket, resp)),
            _ => Err(server_error(resp).await),
        }
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    resp.json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

async fn server_error(resp: Response) -> ClientError {
    let status = resp.status().as_u16();
    let message = match resp.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => "unexpected response".to_string(),
    };
    ClientError::Server { status, message }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::SessionConfig;
    use crate::session::storage::MemoryTokenStorage;

    fn session() -> SessionManager {
        SessionManager::new(Arc::new(MemoryTokenStorage::new()), SessionConfig::default())
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = AdminClient::new("http://localhost:8001/chapel", session()).unwrap();
        assert_eq!(
            client.endpoint("api/admin/me").unwrap().as_str(),
            "http://localhost:8001/chapel/api/admin/me"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            AdminClient::new("not a url", session()),
            Err(ClientError::Url(_))
        ));
    }

    #[tokio::test]
    async fn admin_calls_without_session_are_not_sent() {
        let client = AdminClient::new("http://127.0.0.1:1", session()).unwrap();
        assert!(matches!(
            client.refresh_events().await,
            Err(ClientError::NotAuthenticated)
        ));
    }
}
