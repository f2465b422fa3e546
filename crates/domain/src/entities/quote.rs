//! Pricing pass output

use serde::{Deserialize, Serialize};

use super::{FareBreakdown, RouteResult, TollQuote, Vehicle};
use crate::value_objects::{Coordinate, VehicleId};

/// Fare offered for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleFare {
    /// Priced vehicle
    pub vehicle: Vehicle,
    /// Itemized fare
    pub fare: FareBreakdown,
    /// Distance and duration summary of the route
    pub route_summary: String,
}

impl VehicleFare {
    /// Id of the priced vehicle
    #[must_use]
    pub const fn vehicle_id(&self) -> &VehicleId {
        &self.vehicle.id
    }
}

/// Result of one pricing pass: geocode, route, toll, and a fare per vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripQuote {
    /// Resolved pickup coordinate
    pub pickup: Coordinate,
    /// Resolved dropoff coordinate
    pub dropoff: Coordinate,
    /// Computed route
    pub route: RouteResult,
    /// Toll estimate shared by every fare
    pub toll: TollQuote,
    /// One entry per catalog vehicle, in catalog order
    pub fares: Vec<VehicleFare>,
}

impl TripQuote {
    /// Find the fare for a vehicle
    #[must_use]
    pub fn fare_for(&self, vehicle_id: &VehicleId) -> Option<&VehicleFare> {
        self.fares.iter().find(|f| f.vehicle_id() == vehicle_id)
    }

    /// Whether the vehicle is part of this quote
    #[must_use]
    pub fn contains(&self, vehicle_id: &VehicleId) -> bool {
        self.fare_for(vehicle_id).is_some()
    }

    /// Cheapest offered fare
    #[must_use]
    pub fn cheapest(&self) -> Option<&VehicleFare> {
        self.fares
            .iter()
            .min_by(|a, b| a.fare.total.total_cmp(&b.fare.total))
    }
}
