//! Per-scene darkness levels for the loaded seed.
//!
//! Darkness is fixed for a run's lifetime; darkness conditions evaluate
//! against this table once, at graph build time, and are never watched for
//! change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Scene name → darkness level. Missing scenes are fully lit (level 0).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DarknessOverrides {
    levels: HashMap<String, i32>,
}

impl DarknessOverrides {
    pub fn empty() -> DarknessOverrides {
        DarknessOverrides::default()
    }

    pub fn new(levels: impl IntoIterator<Item = (String, i32)>) -> DarknessOverrides {
        DarknessOverrides {
            levels: levels.into_iter().collect(),
        }
    }

    pub fn darkness_level(&self, scene: &str) -> i32 {
        self.levels.get(scene).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_scene_is_lit() {
        let overrides = DarknessOverrides::empty();
        assert_eq!(overrides.darkness_level("Crossroads_01"), 0);
    }

    #[test]
    fn known_scene_levels() {
        let overrides = DarknessOverrides::new([("Cliffs_01".to_string(), 2)]);
        assert_eq!(overrides.darkness_level("Cliffs_01"), 2);
    }
}
