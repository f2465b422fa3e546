//! Vehicle identifier

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a vehicle in the catalog
///
/// Catalog ids are opaque strings owned by whoever maintains the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    /// Create a vehicle id from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for VehicleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_id() {
        assert_eq!(VehicleId::new("sedan-1").to_string(), "sedan-1");
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&VehicleId::from("suv")).unwrap();
        assert_eq!(json, "\"suv\"");
    }
}
