//! Client-side admin session.
//!
//! A session starts from a login response (or a stored token on start-up)
//! and ends on explicit logout, on inactivity, or when the server refuses
//! the token. Every ending goes through the same cleanup: the stored token
//! is discarded, the inactivity timer is cancelled and the admin cache is
//! purged, all under one lock.
//!
//! The inactivity timer is a Tokio task; methods that start a session must
//! be called from within a Tokio runtime.

pub mod cache;
pub mod claims;
pub mod storage;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use self::cache::AdminCache;
use self::claims::peek_expiry;
use self::storage::TokenStorage;
use crate::ClientError;

/// Idle time after which the session is ended: 30 minutes.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Longest accepted inactivity timeout: 7 days.
pub const MAX_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Smallest allowed gap between "treated as expired" and the real expiry.
pub const MIN_EXPIRY_BUFFER_SECS: i64 = 30;

/// Session timing settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Idle time before an automatic logout.
    pub inactivity_timeout: Duration,
    /// Tokens closer than this to their expiry are treated as expired.
    pub expiry_buffer: TimeDelta,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            expiry_buffer: TimeDelta::seconds(MIN_EXPIRY_BUFFER_SECS),
        }
    }
}

impl SessionConfig {
    /// Build a config, raising `expiry_buffer` to the 30 second minimum and
    /// capping `inactivity_timeout` at [`MAX_INACTIVITY_TIMEOUT`].
    pub fn new(inactivity_timeout: Duration, expiry_buffer: TimeDelta) -> Self {
        Self {
            inactivity_timeout: inactivity_timeout.min(MAX_INACTIVITY_TIMEOUT),
            expiry_buffer: expiry_buffer.max(TimeDelta::seconds(MIN_EXPIRY_BUFFER_SECS)),
        }
    }

    /// Reads `ADMIN_INACTIVITY_TIMEOUT_MINUTES` (default 30).
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("ADMIN_INACTIVITY_TIMEOUT_MINUTES") {
            let timeout = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|m| *m > 0)
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .filter(|t| *t <= MAX_INACTIVITY_TIMEOUT)
                .ok_or_else(|| {
                    ClientError::Config(format!(
                        "ADMIN_INACTIVITY_TIMEOUT_MINUTES must be between 1 and {}, got '{raw}'",
                        MAX_INACTIVITY_TIMEOUT.as_secs() / 60
                    ))
                })?;
            config.inactivity_timeout = timeout;
        }
        Ok(config)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    UserInitiated,
    Inactivity,
    SessionExpired,
}

impl LogoutReason {
    /// Message shown to the admin after the logout.
    pub fn message(&self) -> &'static str {
        match self {
            LogoutReason::UserInitiated => "You have been logged out.",
            LogoutReason::Inactivity => {
                "You have been logged out due to inactivity. Please log in again."
            }
            LogoutReason::SessionExpired => "Your session has expired. Please log in again.",
        }
    }
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session has been established.
    Anonymous,
    Authenticated,
    /// A token is held but sits inside the expiry buffer.
    Expiring,
    LoggedOut(LogoutReason),
}

/// Proof that a request was started under a particular session.
///
/// Responses are applied only if the session is still the one the ticket
/// was issued for.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    token: String,
    generation: u64,
}

impl RequestTicket {
    /// Bearer token to send with the request.
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Default)]
struct Inner {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    last_activity: Option<Instant>,
    timer: Option<JoinHandle<()>>,
    timer_epoch: u64,
    /// Bumped whenever a session starts or ends.
    generation: u64,
    cache: AdminCache,
    logout_reason: Option<LogoutReason>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Owns the client's token, its inactivity timer and the admin cache.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Mutex<Inner>>,
    storage: Arc<dyn TokenStorage>,
    config: SessionConfig,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// `at + timeout`, saturating at the longest accepted timeout.
fn deadline_after(at: Instant, timeout: Duration) -> Instant {
    at.checked_add(timeout)
        .or_else(|| at.checked_add(MAX_INACTIVITY_TIMEOUT))
        .unwrap_or(at)
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared cleanup for every way a session ends.
fn end_session(inner: &mut Inner, storage: &dyn TokenStorage, reason: LogoutReason) {
    if let Some(timer) = inner.timer.take() {
        timer.abort();
    }
    inner.timer_epoch += 1;
    inner.cache.clear();
    inner.last_activity = None;
    inner.expires_at = None;
    if let Err(e) = storage.clear() {
        warn!(error = %e, "failed to remove stored token");
    }
    if inner.token.take().is_some() {
        inner.generation += 1;
        inner.logout_reason = Some(reason);
        info!(?reason, "admin session ended");
    }
}

impl SessionManager {
    pub fn new(storage: Arc<dyn TokenStorage>, config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            storage,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resume a stored session on start-up.
    ///
    /// Only the expiry claim is inspected; a stored token that is unreadable
    /// or inside the expiry buffer is discarded and the session stays
    /// anonymous.
    pub fn restore(&self) -> Result<SessionState, ClientError> {
        let Some(token) = self.storage.load()? else {
            return Ok(SessionState::Anonymous);
        };
        match peek_expiry(&token) {
            Some(exp) if !self.is_stale(exp) => {
                self.install(token, exp);
                debug!(%exp, "restored stored admin session");
                Ok(SessionState::Authenticated)
            }
            _ => {
                debug!("discarding stale stored token");
                self.storage.clear()?;
                Ok(SessionState::Anonymous)
            }
        }
    }

    /// Start a session from a freshly issued token.
    pub fn establish(&self, token: &str) -> Result<(), ClientError> {
        let exp = peek_expiry(token).ok_or(ClientError::MalformedToken)?;
        if self.is_stale(exp) {
            return Err(ClientError::TokenTooShortLived);
        }
        self.storage.save(token)?;
        self.install(token.to_string(), exp);
        Ok(())
    }

    fn install(&self, token: String, exp: DateTime<Utc>) {
        let mut inner = lock(&self.inner);
        inner.token = Some(token);
        inner.expires_at = Some(exp);
        inner.last_activity = Some(Instant::now());
        inner.generation += 1;
        inner.logout_reason = None;
        inner.cache.clear();
        self.arm_timer(&mut inner);
    }

    /// Start the inactivity watchdog, replacing any previous one.
    fn arm_timer(&self, inner: &mut Inner) {
        if let Some(old) = inner.timer.take() {
            old.abort();
        }
        inner.timer_epoch += 1;
        let epoch = inner.timer_epoch;
        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        let storage = Arc::clone(&self.storage);
        let timeout = self.config.inactivity_timeout;
        let mut deadline = deadline_after(Instant::now(), timeout);

        inner.timer = Some(tokio::spawn(async move {
            loop {
                sleep_until(deadline).await;
                let Some(shared) = weak.upgrade() else { return };
                let mut inner = lock(&shared);
                if inner.timer_epoch != epoch {
                    return;
                }
                let idle_until = inner.last_activity.map(|at| deadline_after(at, timeout));
                match idle_until {
                    Some(next) if next > Instant::now() => deadline = next,
                    _ => {
                        // Running inside this task; drop the handle instead of aborting.
                        inner.timer.take();
                        end_session(&mut inner, storage.as_ref(), LogoutReason::Inactivity);
                        return;
                    }
                }
            }
        }));
    }

    fn is_stale(&self, exp: DateTime<Utc>) -> bool {
        Utc::now() + self.config.expiry_buffer >= exp
    }

    /// Note user interaction. Pushes the inactivity deadline out; never
    /// touches the network or the token.
    pub fn record_activity(&self) {
        let mut inner = lock(&self.inner);
        if inner.token.is_some() {
            inner.last_activity = Some(Instant::now());
        }
    }

    /// End the session. Calling it again, or without a session, is harmless.
    pub fn logout(&self, reason: LogoutReason) {
        let mut inner = lock(&self.inner);
        end_session(&mut inner, self.storage.as_ref(), reason);
    }

    pub fn state(&self) -> SessionState {
        let inner = lock(&self.inner);
        match (&inner.token, inner.expires_at) {
            (Some(_), Some(exp)) if self.is_stale(exp) => SessionState::Expiring,
            (Some(_), _) => SessionState::Authenticated,
            (None, _) => inner
                .logout_reason
                .map_or(SessionState::Anonymous, SessionState::LoggedOut),
        }
    }

    /// Message for the most recent logout, if the session has ended.
    pub fn logout_message(&self) -> Option<&'static str> {
        match self.state() {
            SessionState::LoggedOut(reason) => Some(reason.message()),
            _ => None,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        lock(&self.inner).expires_at
    }

    /// Check freshness before an admin request and hand out a ticket.
    ///
    /// A token inside the expiry buffer ends the session with
    /// [`LogoutReason::SessionExpired`] and no request should be sent.
    pub fn begin_request(&self) -> Result<RequestTicket, ClientError> {
        let mut inner = lock(&self.inner);
        let (Some(token), Some(exp)) = (inner.token.clone(), inner.expires_at) else {
            return Err(ClientError::NotAuthenticated);
        };
        if self.is_stale(exp) {
            end_session(&mut inner, self.storage.as_ref(), LogoutReason::SessionExpired);
            return Err(ClientError::SessionExpired);
        }
        Ok(RequestTicket {
            token,
            generation: inner.generation,
        })
    }

    /// Apply a successful response to the cache.
    ///
    /// Returns `false`, leaving the cache alone, when the session ended or
    /// was replaced after `ticket` was issued.
    pub fn complete(&self, ticket: &RequestTicket, apply: impl FnOnce(&mut AdminCache)) -> bool {
        let mut inner = lock(&self.inner);
        if inner.token.is_none() || inner.generation != ticket.generation {
            debug!("discarding response from a previous session");
            return false;
        }
        apply(&mut inner.cache);
        true
    }

    /// The server refused the ticket's token: end that session.
    pub fn reject(&self, ticket: &RequestTicket) {
        let mut inner = lock(&self.inner);
        if inner.generation == ticket.generation {
            end_session(&mut inner, self.storage.as_ref(), LogoutReason::SessionExpired);
        }
    }

    /// Read the admin cache.
    pub fn with_cache<R>(&self, read: impl FnOnce(&AdminCache) -> R) -> R {
        read(&lock(&self.inner).cache)
    }

    pub fn has_pending_timer(&self) -> bool {
        lock(&self.inner)
            .timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Cancel the inactivity timer without ending the session. The stored
    /// token is kept for the next [`SessionManager::restore`].
    pub fn shutdown(&self) {
        let mut inner = lock(&self.inner);
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        inner.timer_epoch += 1;
    }
}
