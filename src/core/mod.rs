//! Garage core: machines, slots, levels and the garage that owns them

pub mod config;
pub mod garage;
pub mod journal;
pub mod level;
pub mod location;
pub mod slot;
pub mod validation;
pub mod vehicle;
