//! Domain entities - Objects with identity and lifecycle

mod booking;
mod booking_draft;
mod fare;
mod quote;
mod route;
mod toll_quote;
mod trip;
mod vehicle;

pub use booking::{Booking, BookingPatch, BookingStatus};
pub use booking_draft::{BookingDraft, BookingStep, WorkflowError};
pub use fare::{DEFAULT_PER_KM_RATE, FareBreakdown, FarePolicy, round2};
pub use quote::{TripQuote, VehicleFare};
pub use route::RouteResult;
pub use toll_quote::{TollClassification, TollQuote};
pub use trip::{CustomerInfo, TransferType, TripDetails};
pub use vehicle::{Vehicle, VehicleRateCard};
