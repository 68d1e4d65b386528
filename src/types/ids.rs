use serde::{Deserialize, Serialize};

/// Cross-service identifier set for one media item.
///
/// `slug` is the canonical cache key; every other field is populated by
/// whichever service happens to know the item and may be absent. The set is
/// created once at first resolution and never patched afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaIds {
    /// Tracking service numeric id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trakt: Option<u64>,
    /// Tracking service slug, the canonical identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// TheTVDB id, used by the fan-art service for shows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u64>,
    /// IMDb id, used by the ratings-lookup service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    /// Catalog service id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u64>,
}

impl MediaIds {
    /// Check if any id is set
    pub fn has_any(&self) -> bool {
        self.trakt.is_some()
            || self.slug.is_some()
            || self.tvdb.is_some()
            || self.imdb.is_some()
            || self.tmdb.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_any() {
        assert!(!MediaIds::default().has_any());

        let with_slug = MediaIds {
            slug: Some("breaking-bad".to_string()),
            ..Default::default()
        };
        assert!(with_slug.has_any());
    }

    #[test]
    fn test_deserialize_partial() {
        let ids: MediaIds =
            serde_json::from_str(r#"{"trakt":1388,"slug":"breaking-bad"}"#).unwrap();
        assert_eq!(ids.trakt, Some(1388));
        assert_eq!(ids.slug.as_deref(), Some("breaking-bad"));
        assert!(ids.tmdb.is_none());
    }
}
