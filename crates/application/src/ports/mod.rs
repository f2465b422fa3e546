//! Port definitions - Interfaces for external dependencies

mod booking_repository_port;
mod geocoding_port;
mod invoice_port;
mod payment_port;
mod route_port;
mod toll_port;
mod vehicle_catalog_port;

pub use booking_repository_port::BookingRepositoryPort;
#[cfg(test)]
pub use booking_repository_port::MockBookingRepositoryPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use invoice_port::{InvoicePort, InvoiceReceipt};
#[cfg(test)]
pub use invoice_port::MockInvoicePort;
#[cfg(test)]
pub use payment_port::MockPaymentPort;
pub use payment_port::{PaymentIntent, PaymentMetadata, PaymentPort};
#[cfg(test)]
pub use route_port::MockRoutePort;
pub use route_port::RoutePort;
#[cfg(test)]
pub use toll_port::MockTollPort;
pub use toll_port::TollPort;
#[cfg(test)]
pub use vehicle_catalog_port::MockVehicleCatalogPort;
pub use vehicle_catalog_port::VehicleCatalogPort;
