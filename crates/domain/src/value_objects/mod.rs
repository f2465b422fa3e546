//! Value Objects - Immutable, identity-less domain primitives

mod booking_id;
mod coordinate;
mod vehicle_id;

pub use booking_id::BookingId;
pub use coordinate::{Coordinate, InvalidCoordinates};
pub use vehicle_id::VehicleId;
