//! Booking workflow state machine
//!
//! A [`BookingDraft`] moves through
//! `TripDetails -> VehicleSelection -> CustomerInfo -> Review -> Confirmed`,
//! with `Cancelled` reachable from any non-terminal step. Guards live here;
//! the network work that feeds a transition (the pricing pass) is done by the
//! application layer before calling [`BookingDraft::enter_vehicle_selection`].

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Booking, BookingStatus, CustomerInfo, TripDetails, TripQuote, VehicleFare};
use crate::errors::DomainError;
use crate::value_objects::{BookingId, VehicleId};

/// Workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    /// Entering pickup, dropoff, date and passengers
    TripDetails,
    /// Choosing a priced vehicle
    VehicleSelection,
    /// Entering customer details
    CustomerInfo,
    /// Reviewing before confirmation
    Review,
    /// Booking persisted
    Confirmed,
    /// Abandoned
    Cancelled,
}

impl BookingStep {
    /// Whether no further transitions are possible
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TripDetails => "trip_details",
            Self::VehicleSelection => "vehicle_selection",
            Self::CustomerInfo => "customer_info",
            Self::Review => "review",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Errors raised by workflow guards
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The action is not allowed from the current step
    #[error("Cannot {action} from step {from}")]
    InvalidTransition {
        /// Current step
        from: BookingStep,
        /// Attempted action
        action: &'static str,
    },

    /// No vehicle has been selected
    #[error("Please select a vehicle")]
    NoVehicleSelected,

    /// The selected vehicle is not part of the computed fares
    #[error("Vehicle {0} is not available for this trip")]
    VehicleNotPriced(VehicleId),
}

/// A pricing pass and the vehicle picked from it, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PricedTrip {
    quote: TripQuote,
    selected: Option<VehicleId>,
}

/// A pricing pass with a vehicle known to be priced in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChosenFare {
    quote: TripQuote,
    fare: VehicleFare,
}

impl ChosenFare {
    fn new(quote: TripQuote, vehicle_id: &VehicleId) -> Result<Self, WorkflowError> {
        let fare = quote
            .fare_for(vehicle_id)
            .cloned()
            .ok_or_else(|| WorkflowError::VehicleNotPriced(vehicle_id.clone()))?;
        Ok(Self { quote, fare })
    }

    fn into_priced(self) -> PricedTrip {
        PricedTrip {
            selected: Some(self.fare.vehicle.id),
            quote: self.quote,
        }
    }
}

/// Step together with the data that step guarantees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum DraftState {
    TripDetails { previous: Option<PricedTrip> },
    VehicleSelection(PricedTrip),
    CustomerInfo(ChosenFare),
    Review(ChosenFare),
    Confirmed(ChosenFare),
    Cancelled,
}

impl DraftState {
    const fn step(&self) -> BookingStep {
        match self {
            Self::TripDetails { .. } => BookingStep::TripDetails,
            Self::VehicleSelection(_) => BookingStep::VehicleSelection,
            Self::CustomerInfo(_) => BookingStep::CustomerInfo,
            Self::Review(_) => BookingStep::Review,
            Self::Confirmed(_) => BookingStep::Confirmed,
            Self::Cancelled => BookingStep::Cancelled,
        }
    }
}

const fn invalid(from: BookingStep, action: &'static str) -> WorkflowError {
    WorkflowError::InvalidTransition { from, action }
}

/// In-progress booking
///
/// Owned by exactly one workflow instance. Each step carries the data it
/// needs, so a draft in review always has a priced vehicle. Going back never
/// discards data entered in earlier steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    state: DraftState,
    /// Trip details
    pub trip: TripDetails,
    /// Customer details
    pub customer: CustomerInfo,
}

impl BookingDraft {
    /// Start a draft at the trip details step
    #[must_use]
    pub fn new(trip: TripDetails) -> Self {
        Self {
            state: DraftState::TripDetails { previous: None },
            trip,
            customer: CustomerInfo::default(),
        }
    }

    /// Empty draft for the given date with default trip values
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self::new(TripDetails::new("", "", date, ""))
    }

    /// Current step
    #[must_use]
    pub const fn step(&self) -> BookingStep {
        self.state.step()
    }

    /// Most recent pricing pass, if any
    #[must_use]
    pub const fn quote(&self) -> Option<&TripQuote> {
        match &self.state {
            DraftState::TripDetails { previous: Some(priced) } | DraftState::VehicleSelection(priced) => {
                Some(&priced.quote)
            },
            DraftState::CustomerInfo(chosen) | DraftState::Review(chosen) | DraftState::Confirmed(chosen) => {
                Some(&chosen.quote)
            },
            DraftState::TripDetails { previous: None } | DraftState::Cancelled => None,
        }
    }

    /// Selected vehicle, if any
    #[must_use]
    pub const fn selected_vehicle_id(&self) -> Option<&VehicleId> {
        match &self.state {
            DraftState::TripDetails { previous: Some(priced) } | DraftState::VehicleSelection(priced) => {
                priced.selected.as_ref()
            },
            DraftState::CustomerInfo(chosen) | DraftState::Review(chosen) | DraftState::Confirmed(chosen) => {
                Some(&chosen.fare.vehicle.id)
            },
            DraftState::TripDetails { previous: None } | DraftState::Cancelled => None,
        }
    }

    /// Fare of the selected vehicle
    #[must_use]
    pub fn selected_fare(&self) -> Option<&VehicleFare> {
        match &self.state {
            DraftState::CustomerInfo(chosen) | DraftState::Review(chosen) | DraftState::Confirmed(chosen) => {
                Some(&chosen.fare)
            },
            _ => {
                let id = self.selected_vehicle_id()?;
                self.quote()?.fare_for(id)
            },
        }
    }

    fn require(&self, step: BookingStep, action: &'static str) -> Result<(), WorkflowError> {
        if self.step() == step {
            Ok(())
        } else {
            Err(invalid(self.step(), action))
        }
    }

    /// Check the trip details guard without changing state
    ///
    /// # Errors
    ///
    /// Returns a workflow error outside the trip details step, or a
    /// validation error for the first invalid field.
    pub fn check_trip(&self) -> Result<(), DomainError> {
        self.require(BookingStep::TripDetails, "price the trip")?;
        self.trip.validate()
    }

    /// Replace trip details; only allowed while editing them
    ///
    /// # Errors
    ///
    /// Returns a workflow error outside the trip details step.
    pub fn update_trip(&mut self, trip: TripDetails) -> Result<(), WorkflowError> {
        self.require(BookingStep::TripDetails, "edit trip details")?;
        self.trip = trip;
        Ok(())
    }

    /// Move to vehicle selection with a freshly computed quote
    ///
    /// Keeps the previous selection when it is still priced, otherwise
    /// pre-selects the first vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error when the trip guard fails.
    pub fn enter_vehicle_selection(&mut self, quote: TripQuote) -> Result<(), DomainError> {
        self.check_trip()?;

        let selected = self
            .selected_vehicle_id()
            .filter(|id| quote.contains(id))
            .cloned()
            .or_else(|| quote.fares.first().map(|f| f.vehicle_id().clone()));

        self.state = DraftState::VehicleSelection(PricedTrip { quote, selected });
        Ok(())
    }

    /// Choose a vehicle from the computed fares
    ///
    /// # Errors
    ///
    /// Returns an error outside vehicle selection or for an unpriced vehicle.
    pub fn select_vehicle(&mut self, vehicle_id: VehicleId) -> Result<(), WorkflowError> {
        let from = self.step();
        let DraftState::VehicleSelection(priced) = &mut self.state else {
            return Err(invalid(from, "select a vehicle"));
        };
        if !priced.quote.contains(&vehicle_id) {
            return Err(WorkflowError::VehicleNotPriced(vehicle_id));
        }
        priced.selected = Some(vehicle_id);
        Ok(())
    }

    /// Move to customer info
    ///
    /// # Errors
    ///
    /// Returns an error unless the selected vehicle is in the fare list.
    pub fn advance_to_customer_info(&mut self) -> Result<(), WorkflowError> {
        let DraftState::VehicleSelection(priced) = &self.state else {
            return Err(invalid(self.step(), "continue to customer info"));
        };
        let id = priced.selected.as_ref().ok_or(WorkflowError::NoVehicleSelected)?;
        let chosen = ChosenFare::new(priced.quote.clone(), id)?;
        self.state = DraftState::CustomerInfo(chosen);
        Ok(())
    }

    /// Replace customer details; only allowed while editing them
    ///
    /// # Errors
    ///
    /// Returns a workflow error outside the customer info step.
    pub fn update_customer(&mut self, customer: CustomerInfo) -> Result<(), WorkflowError> {
        self.require(BookingStep::CustomerInfo, "edit customer details")?;
        self.customer = customer;
        Ok(())
    }

    /// Move to review
    ///
    /// # Errors
    ///
    /// Returns a validation error for the first empty customer field.
    pub fn advance_to_review(&mut self) -> Result<(), DomainError> {
        let DraftState::CustomerInfo(chosen) = &self.state else {
            return Err(invalid(self.step(), "continue to review").into());
        };
        self.customer.validate()?;
        self.state = DraftState::Review(chosen.clone());
        Ok(())
    }

    /// Confirm the booking and produce the immutable record
    ///
    /// # Errors
    ///
    /// Returns an error outside review.
    pub fn confirm(&mut self, id: BookingId, now: DateTime<Utc>) -> Result<Booking, WorkflowError> {
        let DraftState::Review(chosen) = &self.state else {
            return Err(invalid(self.step(), "confirm"));
        };
        let fare = &chosen.fare;

        let booking = Booking {
            id,
            trip: self.trip.clone(),
            vehicle_id: fare.vehicle.id.clone(),
            vehicle_name: fare.vehicle.model_name.clone(),
            vehicle_rate: fare.vehicle.per_hour_rate,
            customer: self.customer.clone(),
            distance_km: chosen.quote.route.distance_km,
            duration_min: chosen.quote.route.duration_min,
            base_fare: fare.fare.trip_fare(),
            fare: fare.fare,
            total_fare: fare.fare.total,
            status: BookingStatus::Confirmed,
            invoice_sent: false,
            created_at: now,
        };

        self.state = DraftState::Confirmed(chosen.clone());
        Ok(booking)
    }

    /// Step back without discarding anything entered
    ///
    /// # Errors
    ///
    /// Returns an error from the first step or a terminal step.
    pub fn go_back(&mut self) -> Result<BookingStep, WorkflowError> {
        let previous = match &self.state {
            DraftState::VehicleSelection(priced) => DraftState::TripDetails {
                previous: Some(priced.clone()),
            },
            DraftState::CustomerInfo(chosen) => DraftState::VehicleSelection(chosen.clone().into_priced()),
            DraftState::Review(chosen) => DraftState::CustomerInfo(chosen.clone()),
            DraftState::TripDetails { .. } | DraftState::Confirmed(_) | DraftState::Cancelled => {
                return Err(invalid(self.step(), "go back"));
            },
        };
        self.state = previous;
        Ok(self.step())
    }

    /// Abandon the draft
    ///
    /// # Errors
    ///
    /// Returns an error from a terminal step.
    pub fn cancel(&mut self) -> Result<(), WorkflowError> {
        if self.step().is_terminal() {
            return Err(invalid(self.step(), "cancel"));
        }
        self.state = DraftState::Cancelled;
        Ok(())
    }

    /// Discard everything and start over
    pub fn reset(&mut self, date: NaiveDate) {
        *self = Self::empty(date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FarePolicy, RouteResult, TollQuote, Vehicle};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn trip() -> TripDetails {
        TripDetails::new("24.86,67.00", "24.90,67.10", date(), "10:30").with_hours(2.0)
    }

    fn quote(vehicle_ids: &[&str]) -> TripQuote {
        let route = RouteResult {
            distance_km: 15.0,
            duration_min: 20,
            encoded_path: String::new(),
            decoded_path: Vec::new(),
        };
        let toll = TollQuote::priced(5.0, "");
        let fares = vehicle_ids
            .iter()
            .map(|id| {
                let vehicle = Vehicle::new(*id, format!("Model {id}"), 10.0)
                    .with_per_km_rate(1.0)
                    .with_base_fee(100.0);
                let fare = FarePolicy::default().compose(&vehicle.rate_card(), &route, &toll, 2.0);
                VehicleFare {
                    vehicle,
                    fare,
                    route_summary: route.summary(),
                }
            })
            .collect();
        TripQuote {
            pickup: crate::Coordinate::new_unchecked(24.86, 67.0),
            dropoff: crate::Coordinate::new_unchecked(24.9, 67.1),
            route,
            toll,
            fares,
        }
    }

    fn customer() -> CustomerInfo {
        CustomerInfo::new("Ada", "ada@example.com", "+1 555", "Main St")
    }

    fn draft_at_review() -> BookingDraft {
        let mut draft = BookingDraft::new(trip());
        draft.enter_vehicle_selection(quote(&["sedan", "van"])).unwrap();
        draft.advance_to_customer_info().unwrap();
        draft.update_customer(customer()).unwrap();
        draft.advance_to_review().unwrap();
        draft
    }

    #[test]
    fn zero_passengers_blocks_vehicle_selection() {
        let mut draft = BookingDraft::new(trip().with_passengers(0));
        let err = draft.enter_vehicle_selection(quote(&["sedan"])).unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed { ref field, .. } if field == "passengers"));
        assert_eq!(draft.step(), BookingStep::TripDetails);
        assert!(draft.quote().is_none());
    }

    #[test]
    fn first_vehicle_is_preselected() {
        let mut draft = BookingDraft::new(trip());
        draft.enter_vehicle_selection(quote(&["sedan", "van"])).unwrap();
        assert_eq!(draft.step(), BookingStep::VehicleSelection);
        assert_eq!(draft.selected_vehicle_id(), Some(&VehicleId::new("sedan")));
    }

    #[test]
    fn previous_selection_survives_repricing() {
        let mut draft = BookingDraft::new(trip());
        draft.enter_vehicle_selection(quote(&["sedan", "van"])).unwrap();
        draft.select_vehicle(VehicleId::new("van")).unwrap();
        draft.go_back().unwrap();
        draft.enter_vehicle_selection(quote(&["sedan", "van"])).unwrap();
        assert_eq!(draft.selected_vehicle_id(), Some(&VehicleId::new("van")));

        draft.go_back().unwrap();
        draft.enter_vehicle_selection(quote(&["suv"])).unwrap();
        assert_eq!(draft.selected_vehicle_id(), Some(&VehicleId::new("suv")));
    }

    #[test]
    fn unknown_vehicle_rejected() {
        let mut draft = BookingDraft::new(trip());
        draft.enter_vehicle_selection(quote(&["sedan"])).unwrap();
        let err = draft.select_vehicle(VehicleId::new("limo")).unwrap_err();
        assert_eq!(err, WorkflowError::VehicleNotPriced(VehicleId::new("limo")));
    }

    #[test]
    fn empty_fare_list_blocks_customer_info() {
        let mut draft = BookingDraft::new(trip());
        draft.enter_vehicle_selection(quote(&[])).unwrap();
        assert_eq!(
            draft.advance_to_customer_info().unwrap_err(),
            WorkflowError::NoVehicleSelected
        );
        assert_eq!(draft.step(), BookingStep::VehicleSelection);
    }

    #[test]
    fn missing_customer_field_blocks_review() {
        let mut draft = BookingDraft::new(trip());
        draft.enter_vehicle_selection(quote(&["sedan"])).unwrap();
        draft.advance_to_customer_info().unwrap();
        draft
            .update_customer(CustomerInfo::new("Ada", "", "+1 555", "Main St"))
            .unwrap();
        assert!(draft.advance_to_review().is_err());
        assert_eq!(draft.step(), BookingStep::CustomerInfo);
    }

    #[test]
    fn confirm_produces_booking() {
        let mut draft = draft_at_review();
        let id = BookingId::new();
        let now = Utc::now();
        let booking = draft.confirm(id, now).unwrap();

        assert_eq!(draft.step(), BookingStep::Confirmed);
        assert_eq!(booking.id, id);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.vehicle_name, "Model sedan");
        assert!((booking.total_fare - 140.0).abs() < f64::EPSILON);
        assert!((booking.base_fare - 35.0).abs() < f64::EPSILON);
        assert_eq!(booking.duration_min, 20);
        assert!(!booking.invoice_sent);
        assert_eq!(booking.total_cents(), 14000);
    }

    #[test]
    fn go_back_keeps_entered_data() {
        let mut draft = draft_at_review();
        assert_eq!(draft.go_back().unwrap(), BookingStep::CustomerInfo);
        assert_eq!(draft.go_back().unwrap(), BookingStep::VehicleSelection);
        assert_eq!(draft.go_back().unwrap(), BookingStep::TripDetails);
        assert_eq!(draft.customer, customer());
        assert!(draft.quote().is_some());
        assert_eq!(draft.selected_vehicle_id(), Some(&VehicleId::new("sedan")));
        assert!(draft.go_back().is_err());
    }

    #[test]
    fn chosen_vehicle_survives_stepping_back() {
        let mut draft = BookingDraft::new(trip());
        draft.enter_vehicle_selection(quote(&["sedan", "van"])).unwrap();
        draft.select_vehicle(VehicleId::new("van")).unwrap();
        draft.advance_to_customer_info().unwrap();
        assert_eq!(draft.selected_fare().unwrap().vehicle.model_name, "Model van");

        draft.go_back().unwrap();
        assert_eq!(draft.step(), BookingStep::VehicleSelection);
        assert_eq!(draft.selected_vehicle_id(), Some(&VehicleId::new("van")));
        assert!(draft.select_vehicle(VehicleId::new("sedan")).is_ok());
    }

    #[test]
    fn only_review_can_confirm() {
        let mut draft = BookingDraft::new(trip());
        draft.enter_vehicle_selection(quote(&["sedan"])).unwrap();
        let err = draft.confirm(BookingId::new(), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                from: BookingStep::VehicleSelection,
                action: "confirm",
            }
        );
    }

    #[test]
    fn confirmed_draft_keeps_quote() {
        let mut draft = draft_at_review();
        draft.confirm(BookingId::new(), Utc::now()).unwrap();
        assert!(draft.quote().is_some());
        assert_eq!(draft.selected_vehicle_id(), Some(&VehicleId::new("sedan")));
    }

    #[test]
    fn terminal_steps_reject_transitions() {
        let mut draft = draft_at_review();
        draft.confirm(BookingId::new(), Utc::now()).unwrap();
        assert!(draft.cancel().is_err());
        assert!(draft.go_back().is_err());
        assert!(draft.confirm(BookingId::new(), Utc::now()).is_err());
    }

    #[test]
    fn cancel_from_any_open_step() {
        let mut draft = BookingDraft::new(trip());
        draft.cancel().unwrap();
        assert_eq!(draft.step(), BookingStep::Cancelled);

        let mut draft = draft_at_review();
        draft.cancel().unwrap();
        assert_eq!(draft.step(), BookingStep::Cancelled);
    }

    #[test]
    fn reset_returns_fresh_draft() {
        let mut draft = draft_at_review();
        draft.reset(date());
        assert_eq!(draft.step(), BookingStep::TripDetails);
        assert!(draft.quote().is_none());
        assert!(draft.selected_vehicle_id().is_none());
        assert_eq!(draft.trip.passengers, 1);
        assert!(draft.trip.pickup.is_empty());
    }

    #[test]
    fn invalid_transition_message_names_step() {
        let err = WorkflowError::InvalidTransition {
            from: BookingStep::Review,
            action: "select a vehicle",
        };
        assert_eq!(err.to_string(), "Cannot select a vehicle from step review");
    }
}
