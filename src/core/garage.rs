//! Garage: owns every level and the index of parked machines
//!
//! All state sits behind one `parking_lot::Mutex`. Every public operation,
//! including read-only queries, takes the lock for its whole duration, so no
//! two garage operations ever interleave. The lock guard is dropped on every
//! return path.

use crate::config::GarageConfig;
use crate::error::{GarageError, Result};
use crate::journal::{GarageEvent, Journal, JournalEntry};
use crate::level::{Level, LevelReport};
use crate::location::Location;
use crate::validation::VehicleId;
use crate::vehicle::{CategoryFallback, Vehicle, VehicleCategory};
use ahash::AHashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

/// A machine currently in the garage, with where it is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParkedVehicle {
    pub id: VehicleId,
    pub category: VehicleCategory,
    pub location: Location,
}

/// Point-in-time view of the whole garage
#[derive(Debug, Clone, Serialize)]
pub struct GarageSnapshot {
    pub total_slots: usize,
    pub free_slots: usize,
    pub levels: Vec<LevelReport>,
    pub vehicles: Vec<ParkedVehicle>,
}

/// Everything guarded by the garage lock
#[derive(Debug)]
struct GarageState {
    levels: Vec<Level>,
    /// Location records, keyed by machine ID
    locations: AHashMap<VehicleId, Location>,
    /// Machines currently parked, keyed by machine ID
    catalog: AHashMap<VehicleId, Vehicle>,
    journal: Journal,
}

impl GarageState {
    fn new(config: &GarageConfig) -> Self {
        GarageState {
            levels: (0..config.levels)
                .map(|i| Level::new(i, config.slots_per_level))
                .collect(),
            locations: AHashMap::new(),
            catalog: AHashMap::new(),
            journal: Journal::new(config.history_capacity),
        }
    }

    fn reject(&mut self, id: &str, err: GarageError) -> GarageError {
        warn!("Rejected request for machine {}: {}", id, err);
        self.journal.record(GarageEvent::Rejected {
            id: id.to_string(),
            reason: err.to_string(),
        });
        err
    }

    fn park(&mut self, vehicle: Vehicle) -> Result<Location> {
        if self.locations.contains_key(&vehicle.id) {
            let err = GarageError::AlreadyParked(vehicle.id.to_string());
            return Err(self.reject(vehicle.id.as_str(), err));
        }

        for level in self.levels.iter_mut() {
            let Some(slots) = level.find_available_slots(&vehicle) else {
                debug!(
                    "Level {} has no room for {} ({} slot(s))",
                    level.index(),
                    vehicle.id,
                    vehicle.slots_needed()
                );
                continue;
            };

            if !level.assign(&vehicle, &slots) {
                continue;
            }

            let location = Location::new(level.index(), slots);
            info!(
                "Parked {} ({}) on level {} in slot(s) {}",
                vehicle.id,
                vehicle.category,
                location.level,
                location.slot_list()
            );

            self.journal.record(GarageEvent::Parked {
                id: vehicle.id.clone(),
                category: vehicle.category,
                location: location.clone(),
            });
            self.locations.insert(vehicle.id.clone(), location.clone());
            self.catalog.insert(vehicle.id.clone(), vehicle);
            return Ok(location);
        }

        let err = GarageError::NoSuitableSpace {
            id: vehicle.id.to_string(),
            slots_needed: vehicle.slots_needed(),
        };
        Err(self.reject(vehicle.id.as_str(), err))
    }

    fn unpark(&mut self, id: &str) -> Result<Location> {
        let Some(location) = self.locations.get(id).cloned() else {
            return Err(self.reject(id, GarageError::NotFound(id.to_string())));
        };

        let released = self
            .levels
            .get_mut(location.level)
            .is_some_and(|level| level.release(id));

        if !released {
            let err = GarageError::InconsistentRelease {
                id: id.to_string(),
                level: location.level,
            };
            return Err(self.reject(id, err));
        }

        // Entry existence was checked above; both maps share their key set.
        let (vehicle_id, _) = self
            .locations
            .remove_entry(id)
            .ok_or_else(|| GarageError::Invariant(format!("location record for {} vanished", id)))?;
        self.catalog.remove(id);

        info!("Unparked {} from level {}", vehicle_id, location.level);
        self.journal.record(GarageEvent::Unparked {
            id: vehicle_id,
            location: location.clone(),
        });

        Ok(location)
    }

    fn locate(&self, id: &str) -> Result<ParkedVehicle> {
        match (self.catalog.get(id), self.locations.get(id)) {
            (Some(vehicle), Some(location)) => Ok(ParkedVehicle {
                id: vehicle.id.clone(),
                category: vehicle.category,
                location: location.clone(),
            }),
            _ => Err(GarageError::NotFound(id.to_string())),
        }
    }

    fn parked(&self) -> Vec<ParkedVehicle> {
        let mut parked: Vec<ParkedVehicle> = self
            .catalog
            .values()
            .filter_map(|vehicle| {
                self.locations.get(&vehicle.id).map(|location| ParkedVehicle {
                    id: vehicle.id.clone(),
                    category: vehicle.category,
                    location: location.clone(),
                })
            })
            .collect();
        parked.sort_by_key(|p| (p.location.level, p.location.first_slot()));
        parked
    }

    fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(GarageError::Invariant(msg));

        if self.locations.len() != self.catalog.len() {
            return violation(format!(
                "{} location record(s) but {} catalog entr(ies)",
                self.locations.len(),
                self.catalog.len()
            ));
        }

        for (id, location) in self.locations.iter() {
            let Some(vehicle) = self.catalog.get(id) else {
                return violation(format!("{} has a location but no catalog entry", id));
            };
            let Some(level) = self.levels.get(location.level) else {
                return violation(format!("{} recorded on missing level {}", id, location.level));
            };
            if location.slots.len() != vehicle.slots_needed() {
                return violation(format!(
                    "{} holds {} slot(s) but needs {}",
                    id,
                    location.slots.len(),
                    vehicle.slots_needed()
                ));
            }
            if !location.is_contiguous() {
                return violation(format!("{} holds non-contiguous slots {}", id, location));
            }
            if level.slots_held_by(id.as_str()) != location.slots {
                return violation(format!(
                    "{} recorded at {} but level {} shows slot(s) {:?}",
                    id,
                    location,
                    level.index(),
                    level.slots_held_by(id.as_str())
                ));
            }
        }

        // Every occupied slot must belong to a record on the same level
        for level in &self.levels {
            for (slot, occupant) in level.occupied() {
                match self.locations.get(occupant) {
                    Some(loc) if loc.level == level.index() && loc.slots.contains(&slot) => {}
                    _ => {
                        return violation(format!(
                            "level {} slot {} occupied by {} without a matching record",
                            level.index(),
                            slot,
                            occupant
                        ))
                    }
                }
            }
        }

        Ok(())
    }
}

/// Multi-level parking garage
///
/// # Examples
///
/// ```
/// use garage_rs::{Garage, Vehicle, VehicleCategory};
///
/// # fn main() -> garage_rs::Result<()> {
/// let garage = Garage::new(1, 2)?;
///
/// let car = Vehicle::try_new("A1", VehicleCategory::Standard)?;
/// let location = garage.park(car)?;
/// assert_eq!((location.level, location.slots), (0, vec![0]));
///
/// // Only one slot left, a truck needs two adjacent ones
/// let truck = Vehicle::try_new("B1", VehicleCategory::Large)?;
/// assert!(garage.park(truck.clone()).is_err());
///
/// garage.unpark("A1")?;
/// garage.park(truck)?;
/// assert!(garage.is_full());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Garage {
    config: GarageConfig,
    state: Mutex<GarageState>,
}

impl Garage {
    /// Create a garage with default settings
    pub fn new(levels: usize, slots_per_level: usize) -> Result<Self> {
        Self::with_config(GarageConfig::new(levels, slots_per_level))
    }

    /// Create a garage from a full configuration
    pub fn with_config(config: GarageConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Creating garage with {} level(s) x {} slot(s)",
            config.levels, config.slots_per_level
        );

        Ok(Garage {
            state: Mutex::new(GarageState::new(&config)),
            config,
        })
    }

    pub fn config(&self) -> &GarageConfig {
        &self.config
    }

    /// (levels, slots per level)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.config.levels, self.config.slots_per_level)
    }

    pub fn total_slots(&self) -> usize {
        self.config.total_slots()
    }

    /// Parse a command-surface machine type using this garage's fallback rule
    pub fn parse_category(&self, text: &str) -> Result<VehicleCategory> {
        VehicleCategory::parse_with(text, self.category_fallback())
    }

    pub fn category_fallback(&self) -> CategoryFallback {
        self.config.category_fallback
    }

    /// Park a machine on the lowest level that has room for it
    ///
    /// Within a level the lowest free slot (or lowest free adjacent pair) is used.
    ///
    /// # Errors
    ///
    /// - `AlreadyParked` if the ID already has a location record
    /// - `NoSuitableSpace` if no level can take the machine
    pub fn park(&self, vehicle: Vehicle) -> Result<Location> {
        let mut state = self.state.lock();
        debug!("park {}: lock acquired", vehicle.id);
        state.park(vehicle)
    }

    /// Remove a parked machine
    ///
    /// # Errors
    ///
    /// - `NotFound` if the ID is not parked
    /// - `InconsistentRelease` if the recorded level held none of its slots;
    ///   the index is left untouched in that case
    pub fn unpark(&self, id: &str) -> Result<Location> {
        let mut state = self.state.lock();
        debug!("unpark {}: lock acquired", id);
        state.unpark(id)
    }

    /// Free-space summary per level, in level order
    pub fn availability(&self) -> Vec<LevelReport> {
        let state = self.state.lock();
        state.levels.iter().map(Level::report).collect()
    }

    /// True iff no level has a free slot
    pub fn is_full(&self) -> bool {
        let state = self.state.lock();
        state.levels.iter().all(|level| level.free_count() == 0)
    }

    /// Look up a parked machine
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the ID is not parked.
    pub fn locate(&self, id: &str) -> Result<ParkedVehicle> {
        let state = self.state.lock();
        state.locate(id)
    }

    /// Every parked machine, ordered by level and then slot
    pub fn parked(&self) -> Vec<ParkedVehicle> {
        let state = self.state.lock();
        state.parked()
    }

    /// Number of machines currently parked
    pub fn parked_count(&self) -> usize {
        self.state.lock().locations.len()
    }

    /// Journal a request refused before it reached the garage
    ///
    /// Used by the command layer for invalid identifiers and unknown machine
    /// types. Returns `err` unchanged.
    pub fn record_rejection(&self, id: &str, err: GarageError) -> GarageError {
        self.state.lock().reject(id, err)
    }

    /// The `limit` most recent journal entries, oldest first
    pub fn history(&self, limit: usize) -> Vec<JournalEntry> {
        self.state.lock().journal.recent(limit)
    }

    pub fn snapshot(&self) -> GarageSnapshot {
        let state = self.state.lock();
        let levels: Vec<LevelReport> = state.levels.iter().map(Level::report).collect();
        GarageSnapshot {
            total_slots: self.total_slots(),
            free_slots: levels.iter().map(|l| l.free).sum(),
            levels,
            vehicles: state.parked(),
        }
    }

    /// Verify the location index, the catalog and the slot grid agree
    ///
    /// # Errors
    ///
    /// Returns `Invariant` describing the first mismatch found.
    pub fn check_invariants(&self) -> Result<()> {
        self.state.lock().check_invariants()
    }

    #[cfg(test)]
    fn with_state<T>(&self, f: impl FnOnce(&mut GarageState) -> T) -> T {
        f(&mut *self.state.lock())
    }
}
