mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::client::trakt::api_types::UserProfile;
use crate::session::AuthSession;
use crate::types::{LikedComment, MediaKind, RatingSet, WatchedMovie, WatchedProgress};
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Key-value persistence port behind the user store.
///
/// Values are JSON strings; the backend never interprets them. In-memory
/// for tests and session-scoped use, file-backed for durable state.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Fixed `<app>-<entity>` key naming, kept stable for durable-storage
/// compatibility across sessions.
pub mod keys {
    use crate::types::MediaKind;

    pub const APP: &str = "showdeck";
    pub const LIKES: &str = "showdeck-likes";
    pub const WATCHED_MOVIES: &str = "showdeck-watched-movies";
    pub const WATCHED_SHOWS: &str = "showdeck-watched-episodes";
    pub const SESSION: &str = "showdeck-session";
    pub const USER: &str = "showdeck-user";

    pub fn ratings(kind: MediaKind) -> String {
        format!("{APP}-{kind}-ratings")
    }
}

/// Typed facade over the storage backend, owning every durable entity:
/// per-kind rating sets, likes, watched lists, the auth session and the
/// user profile.
///
/// Reads degrade to `None` on missing or corrupt entries; writes log and
/// swallow failures so a broken disk never blocks navigation.
#[derive(Clone)]
pub struct UserStore {
    backend: Arc<dyn StorageBackend>,
}

impl UserStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("store read {key} failed: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("store entry {key} is corrupt: {e}");
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("store serialize {key} failed: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.set(key, &raw) {
            warn!("store write {key} failed: {e}");
        }
    }

    // Rating sets

    pub fn ratings(&self, kind: MediaKind) -> Option<RatingSet> {
        self.get_json(&keys::ratings(kind))
    }

    pub fn set_ratings(&self, kind: MediaKind, set: &RatingSet) {
        self.set_json(&keys::ratings(kind), set);
    }

    /// The signed-in user's rating for one item, from the stored set only;
    /// never a network call.
    pub fn my_rating(&self, kind: MediaKind, trakt_id: u64) -> Option<u8> {
        self.ratings(kind)?.find(kind, trakt_id)
    }

    // Likes

    pub fn likes(&self) -> Option<Vec<LikedComment>> {
        self.get_json(keys::LIKES)
    }

    pub fn set_likes(&self, likes: &[LikedComment]) {
        self.set_json(keys::LIKES, &likes);
    }

    // Watched state

    pub fn watched_movies(&self) -> Option<Vec<WatchedMovie>> {
        self.get_json(keys::WATCHED_MOVIES)
    }

    pub fn set_watched_movies(&self, watched: &[WatchedMovie]) {
        self.set_json(keys::WATCHED_MOVIES, &watched);
    }

    pub fn watched_show(&self, slug: &str) -> Option<WatchedProgress> {
        let map: HashMap<String, WatchedProgress> = self.get_json(keys::WATCHED_SHOWS)?;
        map.get(slug).cloned()
    }

    pub fn set_watched_show(&self, slug: &str, progress: &WatchedProgress) {
        let mut map: HashMap<String, WatchedProgress> =
            self.get_json(keys::WATCHED_SHOWS).unwrap_or_default();
        map.insert(slug.to_string(), progress.clone());
        self.set_json(keys::WATCHED_SHOWS, &map);
    }

    // Session and profile

    pub fn session(&self) -> Option<AuthSession> {
        self.get_json(keys::SESSION)
    }

    pub fn set_session(&self, session: &AuthSession) {
        self.set_json(keys::SESSION, session);
    }

    pub fn clear_session(&self) {
        if let Err(e) = self.backend.remove(keys::SESSION) {
            warn!("store remove {} failed: {e}", keys::SESSION);
        }
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.get_json(keys::USER)
    }

    pub fn set_profile(&self, profile: &UserProfile) {
        self.set_json(keys::USER, profile);
    }

    /// Wipe every durable entity (app reset).
    pub fn clear_all(&self) {
        if let Err(e) = self.backend.clear() {
            warn!("store clear failed: {e}");
        }
    }
}
