//! Application services - Use case implementations

mod booking_admin_service;
mod booking_workflow;
mod catalog_service;
mod pricing_service;

pub use booking_admin_service::BookingAdminService;
pub use booking_workflow::{BookingWorkflow, ConfirmationOutcome, SideEffectStatus};
pub use catalog_service::CatalogService;
pub use pricing_service::PricingService;
