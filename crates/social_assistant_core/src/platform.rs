//! crates/social_assistant_core/src/platform.rs
//!
//! The fixed catalog of supported platforms and their generation constraints.

use crate::domain::PlatformProfile;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

const PLATFORMS: [PlatformProfile; 5] = [
    PlatformProfile { name: "Twitter/X", max_length: 280, tone: "concise" },
    PlatformProfile { name: "Facebook", max_length: 800, tone: "friendly" },
    PlatformProfile { name: "LinkedIn", max_length: 1200, tone: "professional" },
    PlatformProfile { name: "Instagram", max_length: 300, tone: "creative" },
    PlatformProfile { name: "General", max_length: 500, tone: "neutral" },
];

pub const DEFAULT_PLATFORM: &str = "General";

/// Looks up a platform by its exact, case-sensitive name.
pub fn lookup(platform_name: &str) -> Result<PlatformProfile, CatalogError> {
    PLATFORMS
        .iter()
        .find(|p| p.name == platform_name)
        .copied()
        .ok_or_else(|| CatalogError::UnknownPlatform(platform_name.to_string()))
}

/// All platforms, in the order they are offered to the user.
pub fn all() -> &'static [PlatformProfile] {
    &PLATFORMS
}

pub fn default_platform() -> PlatformProfile {
    PLATFORMS[PLATFORMS.len() - 1]
}
