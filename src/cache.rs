use crate::types::{DetailRecord, MediaCard, MediaKind};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;

/// Cache key for an aggregated record: the canonical slug plus season and
/// episode numbers where the kind needs them.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    pub kind: MediaKind,
    pub slug: String,
    pub season: Option<u32>,
    pub number: Option<u32>,
}

impl CacheKey {
    pub fn show(slug: &str) -> Self {
        Self {
            kind: MediaKind::Show,
            slug: slug.to_string(),
            season: None,
            number: None,
        }
    }

    pub fn movie(slug: &str) -> Self {
        Self {
            kind: MediaKind::Movie,
            slug: slug.to_string(),
            season: None,
            number: None,
        }
    }

    pub fn season(slug: &str, season: u32) -> Self {
        Self {
            kind: MediaKind::Season,
            slug: slug.to_string(),
            season: Some(season),
            number: None,
        }
    }

    pub fn episode(slug: &str, season: u32, number: u32) -> Self {
        Self {
            kind: MediaKind::Episode,
            slug: slug.to_string(),
            season: Some(season),
            number: Some(number),
        }
    }
}

/// Cache for aggregated cards and detail records.
///
/// Deliberately has no TTL: a record is valid until explicit eviction via
/// [`AggregateCache::clear`] (app reset). Capacity bounds are the only
/// automatic eviction.
#[derive(Clone)]
pub struct AggregateCache {
    cards: Cache<CacheKey, Arc<MediaCard>>,
    details: Cache<CacheKey, Arc<DetailRecord>>,
}

impl AggregateCache {
    /// Create a new cache with default settings
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a new cache with custom configuration
    pub fn with_config(config: CacheConfig) -> Self {
        let cards = Cache::builder()
            .max_capacity(config.card_max_entries)
            .build();
        let details = Cache::builder()
            .max_capacity(config.detail_max_entries)
            .build();

        Self { cards, details }
    }

    /// Get a cached card
    pub async fn card(&self, key: &CacheKey) -> Option<MediaCard> {
        self.cards.get(key).await.map(|arc| (*arc).clone())
    }

    /// Cache a card
    pub async fn set_card(&self, key: CacheKey, card: MediaCard) {
        self.cards.insert(key, Arc::new(card)).await;
    }

    /// Get a cached detail record
    pub async fn detail(&self, key: &CacheKey) -> Option<DetailRecord> {
        self.details.get(key).await.map(|arc| (*arc).clone())
    }

    /// Cache a detail record
    pub async fn set_detail(&self, key: CacheKey, record: DetailRecord) {
        self.details.insert(key, Arc::new(record)).await;
    }

    /// Drop every cached record (app reset)
    pub fn clear(&self) {
        self.cards.invalidate_all();
        self.details.invalidate_all();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            card_entries: self.cards.entry_count(),
            detail_entries: self.details.entry_count(),
        }
    }
}

impl Default for AggregateCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached cards
    #[serde(default = "CacheConfig::default_card_max")]
    pub card_max_entries: u64,
    /// Maximum number of cached detail records
    #[serde(default = "CacheConfig::default_detail_max")]
    pub detail_max_entries: u64,
}

impl CacheConfig {
    const fn default_card_max() -> u64 {
        2000
    }

    const fn default_detail_max() -> u64 {
        500
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            card_max_entries: Self::default_card_max(),
            detail_max_entries: Self::default_detail_max(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub card_entries: u64,
    pub detail_entries: u64,
}
