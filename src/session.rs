use crate::client::trakt::api_types::{TokenResponse, UserProfile};
use crate::client::{Outcome, TrackingClient};
use crate::store::UserStore;
use crate::{Error, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Remaining token lifetime below which a refresh is triggered.
const REFRESH_THRESHOLD_HOURS: i64 = 24;

/// OAuth session with the tracking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn from_token(token: &TokenResponse) -> Self {
        let expires_at = Utc
            .timestamp_opt(token.created_at + token.expires_in, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            expires_at,
        }
    }

    pub fn expires_within(&self, hours: i64) -> bool {
        self.expires_at - Utc::now() < Duration::hours(hours)
    }
}

/// Shared read handle to the active session.
///
/// Clients read the bearer token through this; only the [`SessionManager`]
/// ever writes it. `None` is the anonymous state.
pub type SessionHandle = Arc<RwLock<Option<AuthSession>>>;

/// Read the current bearer token, if any.
pub fn bearer(handle: &SessionHandle) -> Option<String> {
    handle.read().as_ref().map(|s| s.access_token.clone())
}

/// Exclusive owner of the auth session: loads it from the durable store at
/// startup, exchanges OAuth codes, rotates tokens near expiry.
pub struct SessionManager {
    handle: SessionHandle,
    store: UserStore,
    tracking: Arc<dyn TrackingClient>,
}

impl SessionManager {
    /// Create a manager over `handle`, loading any persisted session.
    pub fn new(handle: SessionHandle, store: UserStore, tracking: Arc<dyn TrackingClient>) -> Self {
        if let Some(session) = store.session() {
            *handle.write() = Some(session);
        }
        Self {
            handle,
            store,
            tracking,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.handle.read().is_some()
    }

    /// Exchange an OAuth redirect code, persist the session and the user's
    /// profile.
    pub async fn login(&self, code: &str) -> Result<UserProfile> {
        let token = match self.tracking.exchange_code(code).await {
            Outcome::Found(token) => token,
            _ => return Err(Error::Auth("code exchange rejected".to_string())),
        };
        let session = AuthSession::from_token(&token);
        self.store.set_session(&session);
        *self.handle.write() = Some(session);

        let settings = match self.tracking.user_settings().await {
            Outcome::Found(settings) => settings,
            _ => return Err(Error::Auth("user settings unavailable".to_string())),
        };
        self.store.set_profile(&settings.user);
        info!("signed in as {}", settings.user.username);
        Ok(settings.user)
    }

    /// Rotate the token when its remaining lifetime drops below the
    /// threshold. A no-op for anonymous sessions and fresh tokens.
    pub async fn ensure_fresh(&self) -> Result<()> {
        let refresh_token = {
            let guard = self.handle.read();
            match guard.as_ref() {
                Some(s) if s.expires_within(REFRESH_THRESHOLD_HOURS) => s.refresh_token.clone(),
                _ => return Ok(()),
            }
        };

        debug!("session near expiry, refreshing token");
        let token = match self.tracking.refresh_session(&refresh_token).await {
            Outcome::Found(token) => token,
            _ => return Err(Error::Auth("token refresh rejected".to_string())),
        };
        let session = AuthSession::from_token(&token);
        self.store.set_session(&session);
        *self.handle.write() = Some(session);
        Ok(())
    }

    /// Drop the session from memory and durable storage.
    pub fn logout(&self) {
        *self.handle.write() = None;
        self.store.clear_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in_hours: i64) -> AuthSession {
        AuthSession {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() + Duration::hours(expires_in_hours),
        }
    }

    #[test]
    fn test_expires_within_threshold() {
        assert!(session(12).expires_within(REFRESH_THRESHOLD_HOURS));
        assert!(!session(48).expires_within(REFRESH_THRESHOLD_HOURS));
    }

    #[test]
    fn test_from_token_expiry() {
        let token = TokenResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 7200,
            created_at: 1_700_000_000,
            token_type: None,
            scope: None,
        };
        let session = AuthSession::from_token(&token);
        assert_eq!(session.expires_at.timestamp(), 1_700_007_200);
    }
}
