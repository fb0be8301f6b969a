//! Platform selection state.

use std::collections::BTreeMap;

use crate::types::Platform;

/// Which platforms the next publish fans out to. Defaults to every
/// supported platform enabled; the orchestrator, not this type,
/// enforces "at least one selected".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSelection {
    enabled: BTreeMap<Platform, bool>,
}

impl Default for PlatformSelection {
    fn default() -> Self {
        PlatformSelection {
            enabled: Platform::ALL.iter().map(|p| (*p, true)).collect(),
        }
    }
}

impl PlatformSelection {
    /// Selection with exactly the given platforms enabled.
    pub fn only(platforms: &[Platform]) -> Self {
        let mut selection = PlatformSelection {
            enabled: Platform::ALL.iter().map(|p| (*p, false)).collect(),
        };
        for platform in platforms {
            selection.enabled.insert(*platform, true);
        }
        selection
    }

    pub fn toggle(&mut self, platform: Platform) {
        let flag = self.enabled.entry(platform).or_insert(false);
        *flag = !*flag;
    }

    pub fn is_enabled(&self, platform: Platform) -> bool {
        self.enabled.get(&platform).copied().unwrap_or(false)
    }

    /// The fan-out set, in deterministic platform order.
    pub fn selected(&self) -> Vec<Platform> {
        self.enabled
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(platform, _)| *platform)
            .collect()
    }

    pub fn any_selected(&self) -> bool {
        self.enabled.values().any(|enabled| *enabled)
    }
}
