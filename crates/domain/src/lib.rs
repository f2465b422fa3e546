//! Domain layer for Chauffeur
//!
//! Contains the trip pricing data model, fare composition, the polyline codec
//! and the booking workflow state machine. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod polyline;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
