//! Error types for garage operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GarageError {
    #[error("Machine with ID {0} is already parked")]
    AlreadyParked(String),

    #[error("No suitable space found for machine ID {id} (needs {slots_needed} slot(s))")]
    NoSuitableSpace { id: String, slots_needed: usize },

    #[error("Machine with ID {0} not found in the garage")]
    NotFound(String),

    #[error("Level {level} released no slots for machine ID {id} despite an active location record")]
    InconsistentRelease { id: String, level: usize },

    #[error("Invalid machine ID: {0}")]
    InvalidVehicleId(String),

    #[error("Unknown machine type: {0} (expected Bike, Car or Truck)")]
    UnknownCategory(String),

    #[error("Invalid garage dimensions: {levels} level(s) x {slots_per_level} slot(s) (both must be at least 1)")]
    InvalidDimensions { levels: usize, slots_per_level: usize },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument <{argument}> for command {command}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Garage invariant violated: {0}")]
    Invariant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GarageError>;
