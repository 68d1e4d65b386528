use crate::cache::CacheConfig;
use crate::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Crate configuration: one key block per upstream service plus cache and
/// aggregator tuning.
///
/// Loaded from an optional TOML file layered under `SHOWDECK_*` environment
/// variables (`SHOWDECK_CATALOG__API_KEY=...`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub artwork: ArtworkConfig,
    #[serde(default)]
    pub ratings: RatingsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub aggregator: AggregatorSettings,
}

/// Tracking service OAuth application credentials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkConfig {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingsConfig {
    #[serde(default)]
    pub api_key: String,
}

/// Aggregator tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorSettings {
    /// Serve aggregated records from the cache (disabled in some tests)
    #[serde(default = "AggregatorSettings::default_use_cache")]
    pub use_cache: bool,
    /// Placeholder used when no service has an image
    #[serde(default = "AggregatorSettings::default_fallback_image")]
    pub fallback_image: String,
}

impl AggregatorSettings {
    const fn default_use_cache() -> bool {
        true
    }

    fn default_fallback_image() -> String {
        crate::types::FALLBACK_IMAGE.to_string()
    }
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            use_cache: Self::default_use_cache(),
            fallback_image: Self::default_fallback_image(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (optional file) layered under
    /// `SHOWDECK_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix("SHOWDECK").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Default config file location (`<config dir>/showdeck/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::store::keys::APP).join("config.toml"))
    }
}
