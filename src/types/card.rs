use super::{Backdrop, EpisodeSummary, MediaIds, MediaKind, MovieSummary, ShowSummary};
use serde::{Deserialize, Serialize};

/// Lightweight view model for list/grid display.
///
/// Built fresh by one aggregation pass, cached by
/// `(kind, slug[, season, number])` and never mutated afterwards; a newer
/// aggregation supersedes the cached record wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaCard {
    pub kind: MediaKind,
    pub title: String,
    pub ids: MediaIds,
    pub backdrop: Backdrop,
    /// Clear-logo image from the fan-art service
    pub clear_logo: Option<String>,
    /// External (IMDb) rating, one decimal. `None` means unknown, never `0`.
    pub imdb_rating: Option<String>,
    /// Tracking service community rating, one decimal
    pub trakt_rating: Option<String>,
    /// Catalog service rating, one decimal
    pub tmdb_rating: Option<String>,
    /// The signed-in user's own rating, merged from the local rating store
    pub my_rating: Option<u8>,
    pub genres: Vec<String>,
    /// Summary the card was built from, by kind
    pub show: Option<ShowSummary>,
    pub movie: Option<MovieSummary>,
    pub episode: Option<EpisodeSummary>,
}
