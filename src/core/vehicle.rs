//! Machines that can be parked and the space they need

use crate::error::{GarageError, Result};
use crate::validation::VehicleId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Machine category, determining how many contiguous slots a machine occupies
///
/// On the command surface the categories are spelled `Bike`, `Car` and `Truck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleCategory {
    /// `Bike`: one slot
    Compact,
    /// `Car`: one slot
    Standard,
    /// `Truck`: two adjacent slots on the same level
    Large,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 3] = [
        VehicleCategory::Compact,
        VehicleCategory::Standard,
        VehicleCategory::Large,
    ];

    /// Number of contiguous slots a machine of this category needs
    pub fn slots_needed(self) -> usize {
        match self {
            VehicleCategory::Compact | VehicleCategory::Standard => 1,
            VehicleCategory::Large => 2,
        }
    }

    /// Command-surface name of the category
    pub fn label(self) -> &'static str {
        match self {
            VehicleCategory::Compact => "Bike",
            VehicleCategory::Standard => "Car",
            VehicleCategory::Large => "Truck",
        }
    }

    /// Parse a command-surface type name, applying `fallback` to unrecognized text
    pub fn parse_with(text: &str, fallback: CategoryFallback) -> Result<Self> {
        match (text.parse::<VehicleCategory>(), fallback) {
            (Ok(category), _) => Ok(category),
            (Err(_), CategoryFallback::Large) => {
                tracing::debug!("Unrecognized machine type '{}' parked as Truck", text);
                Ok(VehicleCategory::Large)
            }
            (Err(e), CategoryFallback::Reject) => Err(e),
        }
    }
}

impl FromStr for VehicleCategory {
    type Err = GarageError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Bike" => Ok(VehicleCategory::Compact),
            "Car" => Ok(VehicleCategory::Standard),
            "Truck" => Ok(VehicleCategory::Large),
            other => Err(GarageError::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What to do with a machine type that is not `Bike`, `Car` or `Truck`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFallback {
    /// Refuse the park request
    #[default]
    Reject,
    /// Treat the machine as a `Truck` (legacy behaviour)
    Large,
}

/// A machine to be parked
///
/// Immutable once created; the garage keeps a copy for as long as the machine is parked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub category: VehicleCategory,
}

impl Vehicle {
    pub fn new(id: VehicleId, category: VehicleCategory) -> Self {
        Vehicle { id, category }
    }

    /// Convenience constructor validating a raw identifier
    pub fn try_new(id: &str, category: VehicleCategory) -> Result<Self> {
        Ok(Vehicle::new(VehicleId::new(id)?, category))
    }

    pub fn slots_needed(&self) -> usize {
        self.category.slots_needed()
    }
}
