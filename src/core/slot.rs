//! A single parking slot

use crate::validation::VehicleId;
use serde::Serialize;

/// One unit of parking capacity, identified by (level, index)
///
/// A slot is either free or occupied by exactly one machine. Slots are created
/// with their level and never destroyed.
#[derive(Debug, Clone, Serialize)]
pub struct Slot {
    level: usize,
    index: usize,
    occupant: Option<VehicleId>,
}

impl Slot {
    pub fn new(level: usize, index: usize) -> Self {
        Slot {
            level,
            index,
            occupant: None,
        }
    }

    /// Mark the slot as occupied by `id`
    ///
    /// Returns false without touching the slot if it is already occupied.
    pub fn occupy(&mut self, id: &VehicleId) -> bool {
        if self.occupant.is_some() {
            return false;
        }
        self.occupant = Some(id.clone());
        true
    }

    /// Free the slot
    ///
    /// Returns false if the slot was already free.
    pub fn vacate(&mut self) -> bool {
        self.occupant.take().is_some()
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn occupant(&self) -> Option<&VehicleId> {
        self.occupant.as_ref()
    }

    /// Whether the slot is occupied by the machine `id`
    pub fn is_held_by(&self, id: &str) -> bool {
        self.occupant.as_ref().is_some_and(|o| o.as_str() == id)
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
