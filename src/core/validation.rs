//! Validation for machine identifiers
//!
//! Identifiers are the unique key of the garage index (typically a license
//! plate), so they are checked once at the boundary and carried around as a
//! [`VehicleId`] afterwards.

use crate::error::{GarageError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A validated machine identifier
///
/// # Rules
/// - Non-empty
/// - At most 32 characters
/// - No whitespace or control characters (the command shell tokenizes on whitespace)
///
/// Comparison is exact and case-sensitive: "abc123" and "ABC123" are different machines.
///
/// # Examples
///
/// ```
/// use garage_rs::VehicleId;
///
/// let id = VehicleId::new("ABC123").unwrap();
/// assert_eq!(id.as_str(), "ABC123");
///
/// assert!(VehicleId::new("").is_err());
/// assert!(VehicleId::new("AB 123").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VehicleId(String);

impl VehicleId {
    /// Maximum identifier length in characters
    pub const MAX_LENGTH: usize = 256;

    /// Create a new validated identifier
    ///
    /// # Errors
    ///
    /// Returns `InvalidVehicleId` if the identifier doesn't meet validation rules.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(VehicleId(id))
    }

    fn validate(id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(GarageError::InvalidVehicleId(
                "identifier cannot be empty".to_string(),
            ));
        }

        if id.chars().count() > Self::MAX_LENGTH {
            return Err(GarageError::InvalidVehicleId(format!(
                "identifier too long (max {} characters)",
                Self::MAX_LENGTH
            )));
        }

        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(GarageError::InvalidVehicleId(format!(
                "identifier '{}' must not contain whitespace or control characters",
                id.escape_debug()
            )));
        }

        Ok(())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for VehicleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets the garage index be queried with a plain `&str`.
impl Borrow<str> for VehicleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VehicleId {
    type Error = GarageError;

    fn try_from(value: String) -> Result<Self> {
        VehicleId::new(value)
    }
}

impl TryFrom<&str> for VehicleId {
    type Error = GarageError;

    fn try_from(value: &str) -> Result<Self> {
        VehicleId::new(value)
    }
}

impl From<VehicleId> for String {
    fn from(id: VehicleId) -> Self {
        id.0
    }
}
