//! Toll estimate for one route

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a toll estimate was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TollClassification {
    /// The provider answered; the amount may legitimately be zero
    Ok,
    /// Quota exhausted (HTTP 403); the estimator is off for the session
    QuotaExceeded,
    /// The API key was rejected (HTTP 401)
    AuthError,
    /// The provider answered with another non-success status
    ServiceError,
    /// Transport failure, timeout, or unreadable response
    Unknown,
    /// A pre-flight gate short-circuited the request
    Disabled,
}

impl TollClassification {
    /// Whether the estimate reflects a failure rather than a priced route
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        !matches!(self, Self::Ok)
    }
}

impl fmt::Display for TollClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::QuotaExceeded => "quota_exceeded",
            Self::AuthError => "auth_error",
            Self::ServiceError => "service_error",
            Self::Unknown => "unknown",
            Self::Disabled => "disabled",
        };
        f.write_str(label)
    }
}

/// A toll estimate, computed once per route per pricing pass
///
/// The amount is never negative. Every failure degrades to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTollQuote")]
pub struct TollQuote {
    amount: f64,
    /// How the amount was obtained
    pub classification: TollClassification,
    /// Raw provider response or a diagnostic message
    pub raw_response: String,
}

/// Wire form of [`TollQuote`] before the amount is clamped
#[derive(Deserialize)]
struct StoredTollQuote {
    amount: f64,
    classification: TollClassification,
    #[serde(default)]
    raw_response: String,
}

impl From<StoredTollQuote> for TollQuote {
    fn from(stored: StoredTollQuote) -> Self {
        Self {
            amount: non_negative(stored.amount),
            classification: stored.classification,
            raw_response: stored.raw_response,
        }
    }
}

fn non_negative(amount: f64) -> f64 {
    if amount.is_finite() { amount.max(0.0) } else { 0.0 }
}

impl TollQuote {
    /// A successful estimate; negative or non-finite amounts become zero
    pub fn priced(amount: f64, raw_response: impl Into<String>) -> Self {
        Self {
            amount: non_negative(amount),
            classification: TollClassification::Ok,
            raw_response: raw_response.into(),
        }
    }

    /// A zero-amount estimate with the given classification
    pub fn zero(classification: TollClassification, raw_response: impl Into<String>) -> Self {
        Self {
            amount: 0.0,
            classification,
            raw_response: raw_response.into(),
        }
    }

    /// A zero-amount estimate for a short-circuited request
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self::zero(TollClassification::Disabled, reason)
    }

    /// Toll amount in currency units
    #[must_use]
    pub const fn amount(&self) -> f64 {
        self.amount
    }

    /// Toll amount in cents, rounded half-up
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn amount_cents(&self) -> u64 {
        (self.amount * 100.0).round() as u64
    }
}
