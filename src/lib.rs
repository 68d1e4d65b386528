//! Aggregation-and-cache core of a media-browsing client.
//!
//! Composes four upstream services (a tracking service, a movie/TV catalog,
//! a fan-art image service and a ratings lookup) into card and detail view
//! models. Partial upstream failure degrades to empty fields, never to a
//! failed aggregation; results are cached until explicit reset, and the
//! user's rating/like collections are reconciled on navigation.

pub mod aggregator;
pub mod cache;
pub mod client;
pub mod config;
pub mod session;
pub mod store;
pub mod sync;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggregator::Aggregator;
pub use cache::{AggregateCache, CacheConfig};
pub use client::{
    ArtworkClient, CatalogClient, FanartClient, OmdbClient, Outcome, RatingsClient, TmdbClient,
    TrackingClient, TraktClient,
};
pub use config::AppConfig;
pub use session::{AuthSession, SessionHandle, SessionManager};
pub use store::{JsonFileStore, MemoryStore, StorageBackend, UserStore};
pub use sync::{RatingSync, Section, SyncOutcome};

use std::sync::Arc;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Crate error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Upstream said the thing does not exist (as opposed to failing).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// The wired-up default stack: real service clients behind the aggregator,
/// rating sync and session manager, sharing one store and session handle.
pub struct MediaStack {
    pub aggregator: Aggregator,
    pub sync: Arc<RatingSync>,
    pub sessions: SessionManager,
}

/// Wire the default client stack over a storage backend.
#[must_use]
pub fn create_default_stack(config: &AppConfig, backend: Arc<dyn StorageBackend>) -> MediaStack {
    let store = UserStore::new(backend);
    let handle = SessionHandle::default();

    let tracking: Arc<dyn TrackingClient> =
        Arc::new(TraktClient::new(&config.tracking, handle.clone()));
    let catalog: Arc<dyn CatalogClient> = Arc::new(TmdbClient::new(config.catalog.api_key.clone()));
    let artwork: Arc<dyn ArtworkClient> =
        Arc::new(FanartClient::new(config.artwork.api_key.clone()));
    let ratings: Arc<dyn RatingsClient> = Arc::new(OmdbClient::new(config.ratings.api_key.clone()));

    let sessions = SessionManager::new(handle, store.clone(), tracking.clone());
    let aggregator = Aggregator::with_settings(
        tracking.clone(),
        catalog,
        artwork,
        ratings,
        AggregateCache::with_config(config.cache.clone()),
        store.clone(),
        config.aggregator.clone(),
    );
    let sync = Arc::new(RatingSync::new(tracking, store));

    MediaStack {
        aggregator,
        sync,
        sessions,
    }
}
