use crate::client::{Outcome, PageRequest, TrackingClient};
use crate::store::UserStore;
use crate::types::MediaKind;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One page of the likes list; the refetch heuristic compares against this.
const LIKES_PAGE_SIZE: usize = 100;

/// App section whose navigation triggers a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Shows,
    Movies,
}

/// Terminal state of one sync pass over one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No signed-in user; nothing to reconcile
    Anonymous,
    /// The stored copy matches the upstream marker
    UpToDate,
    /// The durable copy was replaced with a fresh upstream fetch
    Refreshed,
    /// An upstream call failed; the stale stored copy was retained
    Stale,
}

/// Reconciles the user's rating and like collections against their durable
/// copies on navigation, using last-modified markers to avoid refetching
/// unchanged data.
///
/// Every failure degrades silently to the stored copy; a sync pass never
/// blocks navigation.
pub struct RatingSync {
    tracking: Arc<dyn TrackingClient>,
    store: UserStore,
}

impl RatingSync {
    pub fn new(tracking: Arc<dyn TrackingClient>, store: UserStore) -> Self {
        Self { tracking, store }
    }

    /// Run the sync pass for a section and wait for it to finish. UI code
    /// normally goes through [`RatingSync::spawn`] instead.
    pub async fn on_navigate(&self, section: Section) {
        if self.store.profile().is_none() {
            debug!("sync skipped: anonymous");
            return;
        }
        match section {
            Section::Movies => {
                let (ratings, likes, watched) = tokio::join!(
                    self.sync_ratings(MediaKind::Movie),
                    self.sync_likes(),
                    self.refresh_watched_movies(),
                );
                debug!("movie sync: ratings {ratings:?}, likes {likes:?}, watched {watched:?}");
            }
            Section::Shows => {
                let (shows, seasons, episodes, likes) = tokio::join!(
                    self.sync_ratings(MediaKind::Show),
                    self.sync_ratings(MediaKind::Season),
                    self.sync_ratings(MediaKind::Episode),
                    self.sync_likes(),
                );
                debug!(
                    "show sync: shows {shows:?}, seasons {seasons:?}, episodes {episodes:?}, likes {likes:?}"
                );
            }
        }
    }

    /// Fire-and-forget sync relative to the page transition.
    pub fn spawn(self: &Arc<Self>, section: Section) {
        let sync = Arc::clone(self);
        tokio::spawn(async move {
            sync.on_navigate(section).await;
        });
    }

    /// Probe -> UpToDate | Refreshing for one rating kind.
    ///
    /// The probe is a 1-item page carrying the collection's marker and
    /// total. A full fetch replaces the durable copy wholesale, so upstream
    /// deletions propagate.
    pub async fn sync_ratings(&self, kind: MediaKind) -> SyncOutcome {
        let Some(profile) = self.store.profile() else {
            return SyncOutcome::Anonymous;
        };

        let probe = match self
            .tracking
            .my_ratings(&profile.username, kind, Some(PageRequest::probe()))
            .await
        {
            Outcome::Found(probe) => probe,
            Outcome::Unauthenticated => return SyncOutcome::Anonymous,
            _ => {
                warn!("{kind} ratings probe failed, keeping stored copy");
                return SyncOutcome::Stale;
            }
        };

        let stored = self.store.ratings(kind);
        let needs_full = match &stored {
            Some(stored) => {
                stored.last_modified != probe.last_modified
                    || probe.total > stored.entries.len() as u64
            }
            None => {
                // Store the probe immediately so the UI has something to
                // show while the full fetch runs.
                self.store.set_ratings(kind, &probe);
                true
            }
        };
        if !needs_full {
            debug!("{kind} ratings up to date");
            return SyncOutcome::UpToDate;
        }

        info!("refreshing {kind} ratings ({} upstream)", probe.total);
        match self.tracking.my_ratings(&profile.username, kind, None).await {
            Outcome::Found(full) => {
                self.store.set_ratings(kind, &full);
                SyncOutcome::Refreshed
            }
            _ => {
                warn!("{kind} ratings fetch failed, keeping stored copy");
                SyncOutcome::Stale
            }
        }
    }

    /// Likes use a head-comparison heuristic instead of a marker: when the
    /// fresh first page starts with a different comment than the stored
    /// list, the list is replaced (wholesale refetch if the stored copy
    /// spans more than one page, first page verbatim otherwise).
    /// Head comparison cannot see deletions at the head of the list; the
    /// upstream API exposes no modification marker to do better.
    pub async fn sync_likes(&self) -> SyncOutcome {
        let Some(profile) = self.store.profile() else {
            return SyncOutcome::Anonymous;
        };

        let first = match self.tracking.my_likes(&profile.username, Some(1)).await {
            Outcome::Found(first) => first,
            Outcome::Unauthenticated => return SyncOutcome::Anonymous,
            _ => {
                warn!("likes fetch failed, keeping stored copy");
                return SyncOutcome::Stale;
            }
        };

        let Some(stored) = self.store.likes() else {
            self.store.set_likes(&first);
            return SyncOutcome::Refreshed;
        };

        let head_changed =
            stored.first().map(|l| l.comment.id) != first.first().map(|l| l.comment.id);
        if !head_changed {
            return SyncOutcome::UpToDate;
        }

        if stored.len() >= LIKES_PAGE_SIZE {
            // The stored list spans several pages; one fresh page cannot
            // replace it, so refetch everything.
            match self.tracking.my_likes(&profile.username, None).await {
                Outcome::Found(all) => {
                    self.store.set_likes(&all);
                    SyncOutcome::Refreshed
                }
                _ => {
                    warn!("likes full fetch failed, keeping stored copy");
                    SyncOutcome::Stale
                }
            }
        } else {
            self.store.set_likes(&first);
            SyncOutcome::Refreshed
        }
    }

    /// Replace the durable watched-movies list with the upstream copy.
    pub async fn refresh_watched_movies(&self) -> SyncOutcome {
        match self.tracking.watched_movies().await {
            Outcome::Found(watched) => {
                self.store.set_watched_movies(&watched);
                SyncOutcome::Refreshed
            }
            Outcome::Unauthenticated => SyncOutcome::Anonymous,
            _ => {
                warn!("watched movies fetch failed, keeping stored copy");
                SyncOutcome::Stale
            }
        }
    }
}
