//! Per-platform progress derivation.
//!
//! Everything here is a pure function of the current character count
//! and the fixed platform limits. Callers recompute on every count
//! change; there is no caching or debouncing because the publish
//! control's enabled state depends on these values being current.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Platform;

/// Progress of the draft against one platform's limit.
///
/// `percentage` is stored unclamped. A draft over the limit reads
/// over 100; clamping is the display layer's business.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressView {
    pub count: usize,
    pub limit: usize,
    pub percentage: f64,
}

/// Derives `{count, limit, percentage}` for each requested platform.
pub fn derive_progress(count: usize, platforms: &[Platform]) -> BTreeMap<Platform, ProgressView> {
    platforms
        .iter()
        .map(|platform| {
            let limit = platform.character_limit();
            let view = ProgressView {
                count,
                limit,
                percentage: count as f64 * 100.0 / limit as f64,
            };
            (*platform, view)
        })
        .collect()
}

/// The largest limit among the given platforms.
pub fn overall_limit(platforms: &[Platform]) -> usize {
    platforms
        .iter()
        .map(|p| p.character_limit())
        .max()
        .unwrap_or(0)
}

/// True iff the count exceeds the largest limit. Equality is not over:
/// a draft exactly at the limit still publishes.
pub fn is_over_limit(count: usize, platforms: &[Platform]) -> bool {
    count > overall_limit(platforms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_is_exact_unrounded() {
        for count in [0usize, 1, 7, 140, 279, 280, 281, 499, 500, 501, 1000] {
            let progress = derive_progress(count, &Platform::ALL);
            for platform in Platform::ALL {
                let view = &progress[&platform];
                let limit = platform.character_limit();
                assert_eq!(view.count, count);
                assert_eq!(view.limit, limit);
                assert_eq!(view.percentage, count as f64 * 100.0 / limit as f64);
            }
        }
    }

    #[test]
    fn test_percentage_not_clamped_over_limit() {
        let progress = derive_progress(560, &[Platform::Twitter]);
        assert_eq!(progress[&Platform::Twitter].percentage, 200.0);
    }

    #[test]
    fn test_zero_count_is_zero_percent() {
        let progress = derive_progress(0, &Platform::ALL);
        for platform in Platform::ALL {
            assert_eq!(progress[&platform].percentage, 0.0);
        }
    }

    #[test]
    fn test_overall_limit_is_max() {
        assert_eq!(overall_limit(&Platform::ALL), 500);
        assert_eq!(overall_limit(&[Platform::Twitter, Platform::Bluesky]), 300);
        assert_eq!(overall_limit(&[Platform::Twitter]), 280);
        assert_eq!(overall_limit(&[]), 0);
    }

    #[test]
    fn test_over_limit_boundary_is_not_over() {
        assert!(!is_over_limit(500, &Platform::ALL));
        assert!(is_over_limit(501, &Platform::ALL));
    }

    #[test]
    fn test_over_limit_uses_largest_limit() {
        // 300 chars exceed Twitter but not the overall largest limit.
        assert!(!is_over_limit(300, &Platform::ALL));
        assert!(is_over_limit(300, &[Platform::Twitter]));
    }

    #[test]
    fn test_derive_progress_covers_requested_platforms_only() {
        let progress = derive_progress(10, &[Platform::Bluesky]);
        assert_eq!(progress.len(), 1);
        assert!(progress.contains_key(&Platform::Bluesky));
    }
}
