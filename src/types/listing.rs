use super::{EpisodeSummary, MediaIds, MediaKind, MovieSummary, ShowSummary};
use serde::{Deserialize, Serialize};

/// One page of a paginated upstream listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub pages_total: u32,
}

/// One row of a discovery listing (trending, anticipated, history, ...).
///
/// The tracking service wraps every listing row differently; this collects
/// the wrappers into one shape with the payload summaries by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListedMedia {
    #[serde(default)]
    pub watchers: Option<u64>,
    #[serde(default)]
    pub list_count: Option<u64>,
    #[serde(default)]
    pub user_count: Option<u64>,
    #[serde(default)]
    pub watched_at: Option<String>,
    #[serde(default)]
    pub show: Option<ShowSummary>,
    #[serde(default)]
    pub movie: Option<MovieSummary>,
    #[serde(default)]
    pub episode: Option<EpisodeSummary>,
}

/// One multi-search result from the catalog service, enriched with
/// tracking ids where the cross-reference lookup succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub tmdb_id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub poster: Option<String>,
    pub popularity: f64,
    pub ids: Option<MediaIds>,
}
