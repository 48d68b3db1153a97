//! A single floor of the garage
//!
//! Slots are scanned first-fit in index order: a one-slot machine takes the
//! lowest free slot, a two-slot machine takes the lowest pair `(i, i + 1)` of
//! adjacent free slots. Runs never wrap across levels.

use crate::slot::Slot;
use crate::validation::VehicleId;
use crate::vehicle::Vehicle;
use serde::Serialize;

/// Fixed-size, ordered collection of slots
#[derive(Debug, Clone)]
pub struct Level {
    index: usize,
    slots: Vec<Slot>,
}

/// Free-space summary of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelReport {
    pub level: usize,
    pub total: usize,
    pub free: usize,
    /// Longest run of adjacent free slots
    pub largest_free_run: usize,
}

impl Level {
    pub fn new(index: usize, total_slots: usize) -> Self {
        Level {
            index,
            slots: (0..total_slots).map(|i| Slot::new(index, i)).collect(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Find slot indices for `vehicle`, or `None` if the level cannot take it
    ///
    /// The returned indices are contiguous and as low as possible.
    pub fn find_available_slots(&self, vehicle: &Vehicle) -> Option<Vec<usize>> {
        let needed = vehicle.slots_needed();
        if needed == 0 || needed > self.slots.len() {
            return None;
        }

        self.slots
            .windows(needed)
            .position(|window| window.iter().all(Slot::is_free))
            .map(|start| (start..start + needed).collect())
    }

    /// Occupy `slot_indices` with `vehicle`
    ///
    /// All targets are checked first; if any is out of range, repeated or
    /// already occupied nothing is mutated and false is returned. Callers must
    /// hold the garage lock between `find_available_slots` and `assign`.
    pub fn assign(&mut self, vehicle: &Vehicle, slot_indices: &[usize]) -> bool {
        if slot_indices.is_empty() {
            return false;
        }

        for (pos, &idx) in slot_indices.iter().enumerate() {
            match self.slots.get(idx) {
                Some(slot) if slot.is_free() => {}
                _ => return false,
            }
            if slot_indices[..pos].contains(&idx) {
                return false;
            }
        }

        for &idx in slot_indices {
            self.slots[idx].occupy(&vehicle.id);
        }
        true
    }

    /// Vacate every slot held by `id`
    ///
    /// Returns whether at least one slot was freed.
    pub fn release(&mut self, id: &str) -> bool {
        let mut removed = false;
        for slot in self.slots.iter_mut().filter(|s| s.is_held_by(id)) {
            removed |= slot.vacate();
        }
        removed
    }

    /// Number of free slots on this level
    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_free()).count()
    }

    /// Length of the longest run of adjacent free slots
    pub fn largest_free_run(&self) -> usize {
        let mut best = 0;
        let mut current = 0;
        for slot in &self.slots {
            if slot.is_free() {
                current += 1;
                best = best.max(current);
            } else {
                current = 0;
            }
        }
        best
    }

    /// Indices of the slots occupied by `id`, in ascending order
    pub fn slots_held_by(&self, id: &str) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| s.is_held_by(id))
            .map(Slot::index)
            .collect()
    }

    /// Every occupied slot with its occupant
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &VehicleId)> + '_ {
        self.slots
            .iter()
            .filter_map(|s| s.occupant().map(|id| (s.index(), id)))
    }

    pub fn report(&self) -> LevelReport {
        LevelReport {
            level: self.index,
            total: self.total_slots(),
            free: self.free_count(),
            largest_free_run: self.largest_free_run(),
        }
    }
}
