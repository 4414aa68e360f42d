//! Resolution tiers and the pixel-count classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel-count resolution category, ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResolutionTier {
    #[serde(rename = "240p")]
    Tier240p,
    #[serde(rename = "480p")]
    Tier480p,
    #[serde(rename = "720p")]
    Tier720p,
    #[serde(rename = "1080p")]
    Tier1080p,
    #[serde(rename = "4K")]
    Tier4K,
}

impl ResolutionTier {
    /// All tiers in ascending order.
    pub const ALL: [ResolutionTier; 5] = [
        Self::Tier240p,
        Self::Tier480p,
        Self::Tier720p,
        Self::Tier1080p,
        Self::Tier4K,
    ];

    /// Inclusive pixel-count upper bound, `None` for the open-ended top tier.
    pub const fn upper_bound(self) -> Option<u64> {
        match self {
            Self::Tier240p => Some(320 * 240),
            Self::Tier480p => Some(854 * 480),
            Self::Tier720p => Some(1280 * 720),
            Self::Tier1080p => Some(1920 * 1080),
            Self::Tier4K => None,
        }
    }

    /// Smallest tier whose inclusive upper bound is >= `pixel_count`.
    pub fn from_pixel_count(pixel_count: u64) -> Self {
        Self::ALL
            .into_iter()
            .find(|tier| tier.upper_bound().map_or(true, |bound| pixel_count <= bound))
            .unwrap_or(Self::Tier4K)
    }

    /// Classify decoded image dimensions.
    pub fn classify(width: u32, height: u32) -> Self {
        Self::from_pixel_count(pixel_count(width, height))
    }

    /// Short label used in reports ("240p", "4K", ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Tier240p => "240p",
            Self::Tier480p => "480p",
            Self::Tier720p => "720p",
            Self::Tier1080p => "1080p",
            Self::Tier4K => "4K",
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `width * height` widened so 65535x65535 cannot overflow.
pub fn pixel_count(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_resolutions() {
        assert_eq!(ResolutionTier::classify(320, 240), ResolutionTier::Tier240p);
        assert_eq!(ResolutionTier::classify(854, 480), ResolutionTier::Tier480p);
        assert_eq!(ResolutionTier::classify(1280, 720), ResolutionTier::Tier720p);
        assert_eq!(ResolutionTier::classify(1920, 1080), ResolutionTier::Tier1080p);
        assert_eq!(ResolutionTier::classify(3840, 2160), ResolutionTier::Tier4K);
        assert_eq!(ResolutionTier::classify(4000, 3000), ResolutionTier::Tier4K);
    }

    #[test]
    fn test_boundaries_belong_to_lower_tier() {
        let cases = [
            (76_800, ResolutionTier::Tier240p, ResolutionTier::Tier480p),
            (409_920, ResolutionTier::Tier480p, ResolutionTier::Tier720p),
            (921_600, ResolutionTier::Tier720p, ResolutionTier::Tier1080p),
            (2_073_600, ResolutionTier::Tier1080p, ResolutionTier::Tier4K),
        ];
        for (bound, at, above) in cases {
            assert_eq!(ResolutionTier::from_pixel_count(bound), at, "at {bound}");
            assert_eq!(ResolutionTier::from_pixel_count(bound + 1), above, "above {bound}");
        }
    }

    #[test]
    fn test_degenerate_and_huge_dimensions() {
        assert_eq!(ResolutionTier::classify(0, 0), ResolutionTier::Tier240p);
        assert_eq!(ResolutionTier::classify(1, 1), ResolutionTier::Tier240p);
        assert_eq!(pixel_count(u32::MAX, u32::MAX), 18_446_744_065_119_617_025);
        assert_eq!(ResolutionTier::classify(u32::MAX, u32::MAX), ResolutionTier::Tier4K);
    }

    #[test]
    fn test_aspect_ratio_does_not_matter() {
        // Same pixel count as 1280x720, different shape
        assert_eq!(ResolutionTier::classify(720, 1280), ResolutionTier::Tier720p);
        assert_eq!(ResolutionTier::classify(921_600, 1), ResolutionTier::Tier720p);
    }

    #[test]
    fn test_tiers_are_ordered() {
        let mut sorted = ResolutionTier::ALL;
        sorted.sort();
        assert_eq!(sorted, ResolutionTier::ALL);
        assert!(ResolutionTier::Tier240p < ResolutionTier::Tier4K);
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&ResolutionTier::Tier4K).unwrap();
        assert_eq!(json, "\"4K\"");
        let parsed: ResolutionTier = serde_json::from_str("\"1080p\"").unwrap();
        assert_eq!(parsed, ResolutionTier::Tier1080p);
        assert_eq!(ResolutionTier::Tier720p.to_string(), "720p");
    }
}
