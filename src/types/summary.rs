use super::MediaIds;
use serde::{Deserialize, Serialize};

/// Weekly airing slot of a show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airs {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Show summary as returned by the tracking service.
///
/// Reused verbatim as embedded view data: cards and detail records carry the
/// summary of the item they were built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowSummary {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub ids: MediaIds,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub first_aired: Option<String>,
    #[serde(default)]
    pub airs: Option<Airs>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub votes: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub aired_episodes: Option<u32>,
}

/// Movie summary as returned by the tracking service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub ids: MediaIds,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub votes: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub certification: Option<String>,
}

/// Season summary from the tracking service's season listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub number: u32,
    #[serde(default)]
    pub ids: MediaIds,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub votes: Option<u64>,
    #[serde(default)]
    pub episode_count: Option<u32>,
    #[serde(default)]
    pub aired_episodes: Option<u32>,
    #[serde(default)]
    pub first_aired: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

/// Episode summary from the tracking service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub season: u32,
    pub number: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ids: MediaIds,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub votes: Option<u64>,
    #[serde(default)]
    pub first_aired: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
}
