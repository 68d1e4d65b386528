use super::MovieSummary;
use serde::{Deserialize, Serialize};

/// Per-show watched progress from the tracking service: aggregate counts
/// plus a season/episode completion tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchedProgress {
    #[serde(default)]
    pub aired: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub last_watched_at: Option<String>,
    #[serde(default)]
    pub seasons: Vec<SeasonProgress>,
}

impl WatchedProgress {
    /// Completion flag for one episode, if the tree covers it.
    pub fn episode(&self, season: u32, number: u32) -> Option<&EpisodeProgress> {
        self.seasons
            .iter()
            .find(|s| s.number == season)?
            .episodes
            .iter()
            .find(|e| e.number == number)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonProgress {
    pub number: u32,
    #[serde(default)]
    pub aired: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub episodes: Vec<EpisodeProgress>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeProgress {
    pub number: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub last_watched_at: Option<String>,
}

/// Watched marker for a single episode, derived from [`WatchedProgress`]
/// when building episode details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeWatched {
    pub last_watched_at: Option<String>,
}

/// One entry of the user's watched-movies list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedMovie {
    #[serde(default)]
    pub plays: u32,
    #[serde(default)]
    pub last_watched_at: Option<String>,
    pub movie: MovieSummary,
}
