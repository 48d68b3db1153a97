//! Where a parked machine is

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location record: the level and slot indices a machine occupies
///
/// Slots are ascending, all on `level`, and contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub level: usize,
    pub slots: Vec<usize>,
}

impl Location {
    pub fn new(level: usize, slots: Vec<usize>) -> Self {
        Location { level, slots }
    }

    /// Lowest occupied slot index
    pub fn first_slot(&self) -> Option<usize> {
        self.slots.first().copied()
    }

    /// Slot indices joined by single spaces, e.g. `"0 1"`
    pub fn slot_list(&self) -> String {
        self.slots
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the slots form one gap-free run
    pub fn is_contiguous(&self) -> bool {
        self.slots.windows(2).all(|w| w[1] == w[0] + 1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {} slot(s) {}", self.level, self.slot_list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguity() {
        assert!(Location::new(0, vec![4]).is_contiguous());
        assert!(Location::new(0, vec![4, 5]).is_contiguous());
        assert!(!Location::new(0, vec![4, 6]).is_contiguous());
        assert!(!Location::new(0, vec![5, 4]).is_contiguous());
    }

    #[test]
    fn test_formatting() {
        let loc = Location::new(2, vec![0, 1]);
        assert_eq!(loc.slot_list(), "0 1");
        assert_eq!(loc.to_string(), "level 2 slot(s) 0 1");
        assert_eq!(loc.first_slot(), Some(0));
    }
}
