use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A social network a channel can publish to.
///
/// Serialized as the lowercase wire name used in the `channel_platforms`
/// and `posts.platforms` columns (`"facebook"`, `"gbp"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    Tiktok,
    Youtube,
    Linkedin,
    Pinterest,
    Gbp,
    Bluesky,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl Platform {
    /// All supported platforms, in display order.
    pub const ALL: [Platform; 8] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Youtube,
        Platform::Linkedin,
        Platform::Pinterest,
        Platform::Gbp,
        Platform::Bluesky,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::Linkedin => "linkedin",
            Platform::Pinterest => "pinterest",
            Platform::Gbp => "gbp",
            Platform::Bluesky => "bluesky",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            "youtube" => Ok(Platform::Youtube),
            "linkedin" => Ok(Platform::Linkedin),
            "pinterest" => Ok(Platform::Pinterest),
            "gbp" => Ok(Platform::Gbp),
            "bluesky" => Ok(Platform::Bluesky),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}
