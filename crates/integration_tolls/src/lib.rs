//! Toll estimation for Chauffeur
//!
//! [`TollGuruClient`] prices the tolls on a driving route. It never returns an
//! error: pre-flight gates, HTTP failures and unreadable bodies all degrade to
//! a zero-amount [`domain::TollQuote`] with a matching classification.
//!
//! # Session state
//!
//! A single [`TollSessionState`] is built at startup and shared by every
//! client. An HTTP 403 (quota exhausted) trips its breaker; afterwards every
//! estimate short-circuits without a network call until the process restarts.
//! Identical failures inside the debounce window are logged once at `warn`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use integration_tolls::{TollConfig, TollEstimator, TollGuruClient, TollRequest, TollSessionState};
//!
//! let session = Arc::new(TollSessionState::new());
//! let client = TollGuruClient::new(TollConfig::default(), session)?;
//! let quote = client.estimate(&TollRequest::new(from, to, route.encoded_path.clone())).await;
//! ```

mod client;
mod config;
mod error;
mod extraction;
mod session;

pub use client::{TollEstimator, TollGuruClient, TollRequest, mask_key};
pub use config::TollConfig;
pub use error::TollError;
pub use extraction::TollResponseShape;
pub use session::TollSessionState;
