use super::{Comment, EpisodeSummary, MediaKind, MovieSummary, SeasonSummary, ShowSummary};
use serde::{Deserialize, Serialize};

/// The user's rating collection for one media kind.
///
/// `entries.len()` may be less than `total` when only a probe fetch has
/// happened; the sync layer triggers a full fetch whenever the upstream
/// `last_modified` marker moves or `total` outgrows the stored entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSet {
    pub last_modified: Option<String>,
    pub total: u64,
    pub entries: Vec<RatedEntry>,
}

impl RatingSet {
    /// Find the user's rating for an item of `kind` by tracking id.
    pub fn find(&self, kind: MediaKind, trakt_id: u64) -> Option<u8> {
        self.entries
            .iter()
            .find(|e| e.trakt_id(kind) == Some(trakt_id))
            .map(|e| e.rating)
    }
}

/// One rated item; exactly one of the embedded summaries is set, matching
/// the collection's kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatedEntry {
    #[serde(default)]
    pub rated_at: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub show: Option<ShowSummary>,
    #[serde(default)]
    pub season: Option<SeasonSummary>,
    #[serde(default)]
    pub episode: Option<EpisodeSummary>,
    #[serde(default)]
    pub movie: Option<MovieSummary>,
}

impl RatedEntry {
    fn trakt_id(&self, kind: MediaKind) -> Option<u64> {
        match kind {
            MediaKind::Show => self.show.as_ref()?.ids.trakt,
            MediaKind::Season => self.season.as_ref()?.ids.trakt,
            MediaKind::Episode => self.episode.as_ref()?.ids.trakt,
            MediaKind::Movie => self.movie.as_ref()?.ids.trakt,
        }
    }
}

/// One entry of the user's liked-comments list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikedComment {
    #[serde(default)]
    pub liked_at: Option<String>,
    pub comment: Comment,
}
