//! Garage configuration
//!
//! Dimensions and behaviour switches fixed at construction time. Nothing here
//! is read from or written to disk.

use crate::error::{GarageError, Result};
use crate::vehicle::CategoryFallback;
use serde::{Deserialize, Serialize};

/// Default number of journal entries kept in memory
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarageConfig {
    /// Number of levels (floors)
    pub levels: usize,

    /// Number of slots on every level
    pub slots_per_level: usize,

    /// Handling of unrecognized machine types on the command surface
    #[serde(default)]
    pub category_fallback: CategoryFallback,

    /// Journal capacity (0 disables history)
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl GarageConfig {
    pub fn new(levels: usize, slots_per_level: usize) -> Self {
        GarageConfig {
            levels,
            slots_per_level,
            category_fallback: CategoryFallback::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Check the configuration describes a usable garage
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either dimension is zero.
    pub fn validate(&self) -> Result<()> {
        if self.levels == 0 || self.slots_per_level == 0 {
            return Err(GarageError::InvalidDimensions {
                levels: self.levels,
                slots_per_level: self.slots_per_level,
            });
        }
        Ok(())
    }

    pub fn total_slots(&self) -> usize {
        self.levels * self.slots_per_level
    }
}
