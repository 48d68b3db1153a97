//! # Garage - Multi-Level Parking Garage Tracker
//!
//! `garage-rs` keeps an in-memory inventory of a parking garage with a fixed
//! number of levels, each holding a fixed number of slots:
//!
//! - **First-fit placement**: lowest level first, lowest slot(s) within a level
//! - **Two-slot machines**: trucks need two adjacent free slots on one level
//! - **Single lock**: every garage operation is serialized behind one mutex
//! - **Command shell**: the line-oriented `garage` binary drives a [`Garage`]
//!
//! ## Quick Start
//!
//! ```rust
//! use garage_rs::{Garage, Vehicle, VehicleCategory, Result};
//!
//! # fn main() -> Result<()> {
//! let garage = Garage::new(2, 1)?;
//!
//! garage.park(Vehicle::try_new("X", VehicleCategory::Compact)?)?;
//! let y = garage.park(Vehicle::try_new("Y", VehicleCategory::Compact)?)?;
//! assert_eq!(y.level, 1); // level 0 is full
//!
//! assert!(garage.park(Vehicle::try_new("Z", VehicleCategory::Compact)?).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Configuration
//!
//! ```rust
//! use garage_rs::{CategoryFallback, GarageBuilder, Result};
//!
//! # fn main() -> Result<()> {
//! let garage = GarageBuilder::new()
//!     .levels(3)
//!     .slots_per_level(20)
//!     .category_fallback(CategoryFallback::Large)
//!     .history_capacity(1000)
//!     .build()?;
//!
//! assert_eq!(garage.total_slots(), 60);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod core;
pub mod error;
pub mod shell;

// Flat crate:: paths for the core modules
pub(crate) use crate::core::{config, garage, journal, level, location, slot, validation, vehicle};

pub use crate::command::Command;
pub use crate::core::{
    config::{GarageConfig, DEFAULT_HISTORY_CAPACITY},
    garage::{Garage, GarageSnapshot, ParkedVehicle},
    journal::{GarageEvent, JournalEntry},
    level::LevelReport,
    location::Location,
    validation::VehicleId,
    vehicle::{CategoryFallback, Vehicle, VehicleCategory},
};
pub use crate::error::{GarageError, Result};
pub use crate::shell::Shell;

use tracing::debug;

/// Builder for customizing Garage creation
///
/// Dimensions are required; everything else falls back to [`GarageConfig`] defaults.
///
/// # Examples
///
/// ```rust
/// use garage_rs::GarageBuilder;
///
/// # fn main() -> garage_rs::Result<()> {
/// let garage = GarageBuilder::new().levels(2).slots_per_level(5).build()?;
/// assert_eq!(garage.dimensions(), (2, 5));
/// # Ok(())
/// # }
/// ```
pub struct GarageBuilder {
    levels: Option<usize>,
    slots_per_level: Option<usize>,
    category_fallback: CategoryFallback,
    history_capacity: usize,
}

impl GarageBuilder {
    /// Create a new GarageBuilder with default settings
    pub fn new() -> Self {
        GarageBuilder {
            levels: None,
            slots_per_level: None,
            category_fallback: CategoryFallback::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Set the number of levels
    pub fn levels(mut self, levels: usize) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Set the number of slots on each level
    pub fn slots_per_level(mut self, slots: usize) -> Self {
        self.slots_per_level = Some(slots);
        self
    }

    /// Choose how unrecognized machine types are handled
    pub fn category_fallback(mut self, fallback: CategoryFallback) -> Self {
        self.category_fallback = fallback;
        self
    }

    /// Set how many journal entries are kept (0 disables history)
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// The configuration this builder describes
    ///
    /// Unset dimensions are reported as zero and fail validation.
    pub fn config(&self) -> GarageConfig {
        GarageConfig {
            levels: self.levels.unwrap_or(0),
            slots_per_level: self.slots_per_level.unwrap_or(0),
            category_fallback: self.category_fallback,
            history_capacity: self.history_capacity,
        }
    }

    /// Build the Garage instance
    pub fn build(self) -> Result<Garage> {
        let config = self.config();
        debug!("Building garage from {:?}", config);
        Garage::with_config(config)
    }
}

impl Default for GarageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_dimensions() {
        let result = GarageBuilder::new().levels(2).build();
        assert!(matches!(
            result,
            Err(GarageError::InvalidDimensions {
                levels: 2,
                slots_per_level: 0
            })
        ));
    }

    #[test]
    fn test_builder_applies_settings() {
        let garage = GarageBuilder::new()
            .levels(1)
            .slots_per_level(3)
            .category_fallback(CategoryFallback::Large)
            .history_capacity(0)
            .build()
            .unwrap();

        assert_eq!(garage.category_fallback(), CategoryFallback::Large);
        assert_eq!(garage.config().history_capacity, 0);

        garage
            .park(Vehicle::try_new("A", VehicleCategory::Standard).unwrap())
            .unwrap();
        assert!(garage.history(10).is_empty());
    }
}
