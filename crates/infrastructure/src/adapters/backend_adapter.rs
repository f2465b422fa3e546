//! Backend adapter - Implements InvoicePort and PaymentPort over HTTP
//!
//! Talks to the booking backend: `POST /api/booking/send-invoice` emails the
//! invoice, `POST /api/payment/create-payment-intent` opens a card payment.

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{InvoicePort, InvoiceReceipt, PaymentIntent, PaymentMetadata, PaymentPort};
use async_trait::async_trait;
use domain::Booking;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::BackendConfig;

const INVOICE_PATH: &str = "/api/booking/send-invoice";
const PAYMENT_INTENT_PATH: &str = "/api/payment/create-payment-intent";

/// Invoice email payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceRequest<'a> {
    booking_id: String,
    customer_name: &'a str,
    customer_email: &'a str,
    customer_phone: &'a str,
    customer_address: &'a str,
    pickup: &'a str,
    dropoff: &'a str,
    date: String,
    time: &'a str,
    passengers: u32,
    transfer_type: String,
    hours: f64,
    vehicle_name: &'a str,
    distance_km: f64,
    duration_min: u32,
    base_fare: f64,
    toll_fare: f64,
    total_fare: f64,
}

impl<'a> InvoiceRequest<'a> {
    fn from_booking(booking: &'a Booking) -> Self {
        Self {
            booking_id: booking.id.to_string(),
            customer_name: &booking.customer.name,
            customer_email: &booking.customer.email,
            customer_phone: &booking.customer.phone,
            customer_address: &booking.customer.address,
            pickup: &booking.trip.pickup,
            dropoff: &booking.trip.dropoff,
            date: booking.trip.date.to_string(),
            time: &booking.trip.time,
            passengers: booking.trip.passengers,
            transfer_type: booking.trip.transfer_type.to_string(),
            hours: booking.trip.hours,
            vehicle_name: &booking.vehicle_name,
            distance_km: booking.distance_km,
            duration_min: booking.duration_min,
            base_fare: booking.base_fare,
            toll_fare: booking.fare.toll_fare,
            total_fare: booking.total_fare,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    email_message_id: Option<String>,
}

/// Payment intent payload; `amount` is in currency units
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIntentRequest<'a> {
    amount: f64,
    amount_cents: u64,
    currency: &'a str,
    customer_name: &'a str,
    customer_phone: &'a str,
    car_model: &'a str,
    distance_km: f64,
    duration_min: u32,
    pickup: &'a str,
    dropoff: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIntentResponse {
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the invoice/payment backend
#[derive(Debug, Clone)]
pub struct BackendAdapter {
    client: Client,
    base_url: String,
    currency: String,
}

impl BackendAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no base URL is set or the HTTP
    /// client cannot be built.
    pub fn new(config: &BackendConfig, currency: impl Into<String>) -> Result<Self, ApplicationError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApplicationError::Configuration("backend.base_url is not set".into()))?
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            currency: currency.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn transport_error(err: &reqwest::Error) -> ApplicationError {
        if err.is_timeout() {
            ApplicationError::ExternalService("Backend request timed out".to_string())
        } else {
            ApplicationError::ExternalService(format!("Backend unreachable: {err}"))
        }
    }

    /// Turn a non-success response into an error carrying the backend message
    async fn rejected(what: &str, response: reqwest::Response) -> ApplicationError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| status.to_string());
        warn!(status = status.as_u16(), %message, "{what} rejected by backend");
        ApplicationError::ExternalService(format!("{what} rejected (HTTP {}): {message}", status.as_u16()))
    }
}

#[async_trait]
impl InvoicePort for BackendAdapter {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn send_invoice(&self, booking: &Booking) -> Result<InvoiceReceipt, ApplicationError> {
        let response = self
            .client
            .post(self.url(INVOICE_PATH))
            .json(&InvoiceRequest::from_booking(booking))
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        if !response.status().is_success() {
            return Err(Self::rejected("Invoice", response).await);
        }

        let body: InvoiceResponse = response
            .json()
            .await
            .map_err(|e| ApplicationError::ExternalService(format!("Invalid invoice response: {e}")))?;
        if !body.success {
            return Err(ApplicationError::ExternalService(
                "Backend did not confirm the invoice".to_string(),
            ));
        }

        debug!(message_id = ?body.email_message_id, "Invoice sent");
        Ok(InvoiceReceipt {
            message_id: body.email_message_id,
        })
    }
}

#[async_trait]
impl PaymentPort for BackendAdapter {
    #[instrument(skip(self, metadata))]
    async fn create_payment_intent(
        &self,
        amount_cents: u64,
        metadata: &PaymentMetadata,
    ) -> Result<PaymentIntent, ApplicationError> {
        if amount_cents == 0 {
            return Err(ApplicationError::validation("amount", "Invalid amount"));
        }

        #[allow(clippy::cast_precision_loss)]
        let amount = amount_cents as f64 / 100.0;
        let request = PaymentIntentRequest {
            amount,
            amount_cents,
            currency: &self.currency,
            customer_name: &metadata.name,
            customer_phone: &metadata.phone,
            car_model: &metadata.car_model,
            distance_km: metadata.distance,
            duration_min: metadata.duration,
            pickup: &metadata.pickup_location,
            dropoff: &metadata.dropoff_location,
        };

        let response = self
            .client
            .post(self.url(PAYMENT_INTENT_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        if !response.status().is_success() {
            return Err(Self::rejected("Payment", response).await);
        }

        let body: PaymentIntentResponse = response
            .json()
            .await
            .map_err(|e| ApplicationError::ExternalService(format!("Invalid payment response: {e}")))?;

        if let Some(error) = body.error {
            return Err(ApplicationError::ExternalService(error));
        }
        let client_secret = body.client_secret.filter(|s| !s.is_empty()).ok_or_else(|| {
            ApplicationError::ExternalService("No client secret received from server".to_string())
        })?;

        debug!("Payment intent created");
        Ok(PaymentIntent { client_secret })
    }
}
