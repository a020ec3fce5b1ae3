//! Core data models for the catalog backend
//!
//! This module contains the caller-facing `AppSummary` type and the client
//! that fetches the upstream application feed.

pub mod feed;

pub use feed::{FeedClient, FeedError, FeedSource, DEFAULT_FEED_URL};

use serde::{Deserialize, Serialize};

/// Caller-facing summary of one catalog application
///
/// Serialized with lowercase keys. `icon` is omitted entirely when the
/// upstream entry has no icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSummary {
    /// Display name of the application
    pub name: String,
    /// Short description (upstream `Overview`)
    pub description: String,
    /// Source repository identifier or URL
    pub repository: String,
    /// Icon URL, if the upstream entry has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(icon: Option<&str>) -> AppSummary {
        AppSummary {
            name: "Plex".to_string(),
            description: "Media server".to_string(),
            repository: "plexinc/pms-docker".to_string(),
            icon: icon.map(str::to_string),
        }
    }

    #[test]
    fn test_serialize_uses_lowercase_keys() {
        let json = serde_json::to_value(summary(Some("https://example.com/plex.png"))).unwrap();

        assert_eq!(json["name"], "Plex");
        assert_eq!(json["description"], "Media server");
        assert_eq!(json["repository"], "plexinc/pms-docker");
        assert_eq!(json["icon"], "https://example.com/plex.png");
    }

    #[test]
    fn test_serialize_omits_absent_icon() {
        let json = serde_json::to_string(&summary(None)).unwrap();

        assert!(!json.contains("icon"), "icon key should be omitted: {}", json);
    }
}
