//! Operation history for the garage
//!
//! Bounded, append-only record of what happened to which machine:
//! - Fixed capacity, oldest entries evicted first
//! - Monotonic sequence numbers that survive eviction
//! - UTC timestamps
//!
//! Refusals are recorded whether the garage itself refused the request or the
//! command layer did (bad identifier, unknown machine type).
//!
//! The journal is owned by the garage state and only written while the garage
//! lock is held, so entry order is operation order.

use crate::location::Location;
use crate::validation::VehicleId;
use crate::vehicle::VehicleCategory;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Something that happened to a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GarageEvent {
    Parked {
        id: VehicleId,
        category: VehicleCategory,
        location: Location,
    },
    Unparked {
        id: VehicleId,
        location: Location,
    },
    Rejected {
        id: String,
        reason: String,
    },
}

impl fmt::Display for GarageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GarageEvent::Parked {
                id,
                category,
                location,
            } => write!(f, "parked {} ({}) at {}", id, category, location),
            GarageEvent::Unparked { id, location } => {
                write!(f, "unparked {} from {}", id, location)
            }
            GarageEvent::Rejected { id, reason } => write!(f, "rejected {}: {}", id, reason),
        }
    }
}

/// Single journal entry
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: GarageEvent,
}

/// Bounded event history
#[derive(Debug)]
pub struct Journal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
    next_sequence: u64,
}

impl Journal {
    /// Create a journal holding at most `capacity` entries (0 disables recording)
    pub fn new(capacity: usize) -> Self {
        Journal {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_sequence: 0,
        }
    }

    pub fn record(&mut self, event: GarageEvent) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry {
            sequence,
            timestamp: Utc::now(),
            event,
        });
    }

    /// The `limit` most recent entries, oldest first
    pub fn recent(&self, limit: usize) -> Vec<JournalEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of events recorded, including evicted ones
    pub fn total_recorded(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(id: &str) -> GarageEvent {
        GarageEvent::Rejected {
            id: id.to_string(),
            reason: "no space".to_string(),
        }
    }

    #[test]
    fn test_record_and_recent() {
        let mut journal = Journal::new(8);
        journal.record(rejected("A"));
        journal.record(rejected("B"));
        journal.record(rejected("C"));

        let recent = journal.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].sequence, 1);
        assert_eq!(recent[1].sequence, 2);
        assert_eq!(recent[1].event, rejected("C"));
    }

    #[test]
    fn test_eviction_keeps_sequence() {
        let mut journal = Journal::new(2);
        for id in ["A", "B", "C", "D"] {
            journal.record(rejected(id));
        }

        assert_eq!(journal.len(), 2);
        assert_eq!(journal.total_recorded(), 4);

        let all = journal.recent(10);
        assert_eq!(all[0].sequence, 2);
        assert_eq!(all[1].sequence, 3);
    }

    #[test]
    fn test_zero_capacity_disables_recording() {
        let mut journal = Journal::new(0);
        journal.record(rejected("A"));
        assert!(journal.is_empty());
        assert_eq!(journal.total_recorded(), 1);
    }

    #[test]
    fn test_event_display() {
        let event = GarageEvent::Unparked {
            id: VehicleId::new("X").unwrap(),
            location: Location::new(1, vec![3, 4]),
        };
        assert_eq!(event.to_string(), "unparked X from level 1 slot(s) 3 4");
    }
}
