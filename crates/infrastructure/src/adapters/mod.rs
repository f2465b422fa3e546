//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod backend_adapter;
mod geocoding_adapter;
mod route_adapter;
mod toll_adapter;

pub use backend_adapter::BackendAdapter;
pub use geocoding_adapter::GeocodingAdapter;
pub use route_adapter::RouteAdapter;
pub use toll_adapter::TollAdapter;
