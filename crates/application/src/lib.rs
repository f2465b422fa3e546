//! Application layer - Use cases and orchestration
//!
//! Defines the ports for every external collaborator of the trip pricing
//! pipeline and the services that drive a booking from trip details to a
//! confirmed record.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
