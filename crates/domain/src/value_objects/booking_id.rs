//! Booking identifier

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique booking identifier, displayed with a `BK-` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    const PREFIX: &'static str = "BK-";

    /// Create a new time-ordered booking ID
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a booking ID from an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a booking ID, with or without the `BK-` prefix
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        let raw = s.trim();
        let raw = raw.strip_prefix(Self::PREFIX).unwrap_or(raw);
        Ok(Self(Uuid::parse_str(raw)?))
    }

    /// Get the underlying UUID
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl From<Uuid> for BookingId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
