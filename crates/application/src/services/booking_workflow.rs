//! Booking Workflow - Drives one booking from trip details to confirmation
//!
//! Wraps a [`BookingDraft`] and performs the external work its transitions
//! need: the pricing pass when leaving trip details, and persistence, invoice
//! and payment when confirming. Side effects after confirmation never undo
//! the confirmed state; their outcome is reported per effect.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use domain::{
    Booking, BookingDraft, BookingId, BookingPatch, BookingStep, CustomerInfo, TripDetails,
    TripQuote, VehicleId,
};
use futures::future::{AbortRegistration, Abortable};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{BookingRepositoryPort, InvoicePort, PaymentMetadata, PaymentPort},
    services::PricingService,
};

/// Outcome of one confirmation side effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SideEffectStatus {
    /// Completed, with an optional reference (message id, client secret)
    Succeeded(Option<String>),
    /// Attempted and failed
    Failed(String),
    /// Not attempted
    Skipped(String),
}

impl SideEffectStatus {
    /// Whether the effect completed
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Result of confirming a booking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmationOutcome {
    /// The confirmed booking, as last known
    pub booking: Booking,
    /// Storing the booking
    pub persistence: SideEffectStatus,
    /// Emailing the invoice
    pub invoice: SideEffectStatus,
    /// Creating the payment intent
    pub payment: SideEffectStatus,
}

/// Stateful orchestrator for a single in-progress booking
pub struct BookingWorkflow {
    pricing: Arc<PricingService>,
    bookings: Arc<dyn BookingRepositoryPort>,
    invoices: Option<Arc<dyn InvoicePort>>,
    payments: Option<Arc<dyn PaymentPort>>,
    draft: BookingDraft,
}

impl std::fmt::Debug for BookingWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingWorkflow")
            .field("step", &self.draft.step())
            .finish_non_exhaustive()
    }
}

impl BookingWorkflow {
    /// Start a workflow with an empty draft dated `today`
    pub fn new(
        pricing: Arc<PricingService>,
        bookings: Arc<dyn BookingRepositoryPort>,
        today: NaiveDate,
    ) -> Self {
        Self {
            pricing,
            bookings,
            invoices: None,
            payments: None,
            draft: BookingDraft::empty(today),
        }
    }

    /// Send invoices through this port on confirmation
    #[must_use]
    pub fn with_invoices(mut self, invoices: Arc<dyn InvoicePort>) -> Self {
        self.invoices = Some(invoices);
        self
    }

    /// Create payment intents through this port on confirmation
    #[must_use]
    pub fn with_payments(mut self, payments: Arc<dyn PaymentPort>) -> Self {
        self.payments = Some(payments);
        self
    }

    /// Current draft
    pub const fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Current step
    pub const fn step(&self) -> BookingStep {
        self.draft.step()
    }

    /// Replace the trip details
    pub fn update_trip(&mut self, trip: TripDetails) -> Result<(), ApplicationError> {
        Ok(self.draft.update_trip(trip)?)
    }

    /// Validate the trip, price it, and move to vehicle selection
    ///
    /// Every call recomputes the route and fares from scratch.
    #[instrument(skip(self))]
    pub async fn submit_trip(&mut self) -> Result<&TripQuote, ApplicationError> {
        self.draft.check_trip()?;
        let quote = self.pricing.quote(&self.draft.trip).await?;
        self.enter_vehicle_selection(quote)
    }

    /// Like [`Self::submit_trip`], but abandoned when `registration` is aborted
    ///
    /// An aborted pass leaves the draft at trip details.
    #[instrument(skip(self, registration))]
    pub async fn submit_trip_abortable(
        &mut self,
        registration: AbortRegistration,
    ) -> Result<&TripQuote, ApplicationError> {
        self.draft.check_trip()?;
        let pass = Abortable::new(self.pricing.quote(&self.draft.trip), registration);
        let quote = pass.await.map_err(|_| {
            info!("Pricing pass cancelled");
            ApplicationError::Cancelled
        })??;
        self.enter_vehicle_selection(quote)
    }

    fn enter_vehicle_selection(&mut self, quote: TripQuote) -> Result<&TripQuote, ApplicationError> {
        self.draft.enter_vehicle_selection(quote)?;
        self.draft
            .quote()
            .ok_or_else(|| ApplicationError::InvalidOperation("quote missing after pricing".into()))
    }

    /// Choose a priced vehicle
    pub fn select_vehicle(&mut self, vehicle_id: VehicleId) -> Result<(), ApplicationError> {
        Ok(self.draft.select_vehicle(vehicle_id)?)
    }

    /// Move from vehicle selection to customer info
    pub fn continue_to_customer_info(&mut self) -> Result<(), ApplicationError> {
        Ok(self.draft.advance_to_customer_info()?)
    }

    /// Replace the customer details
    pub fn update_customer(&mut self, customer: CustomerInfo) -> Result<(), ApplicationError> {
        Ok(self.draft.update_customer(customer)?)
    }

    /// Move from customer info to review
    pub fn continue_to_review(&mut self) -> Result<(), ApplicationError> {
        Ok(self.draft.advance_to_review()?)
    }

    /// Step back, keeping everything entered so far
    pub fn go_back(&mut self) -> Result<BookingStep, ApplicationError> {
        Ok(self.draft.go_back()?)
    }

    /// Abandon the booking
    pub fn cancel(&mut self) -> Result<(), ApplicationError> {
        Ok(self.draft.cancel()?)
    }

    /// Start over with an empty draft
    pub fn reset(&mut self, today: NaiveDate) {
        self.draft.reset(today);
    }

    /// Confirm the booking and run the side effects
    ///
    /// Only a guard failure returns an error. Once the draft is confirmed,
    /// persistence, invoice and payment failures are reported in the outcome.
    #[instrument(skip(self))]
    pub async fn confirm(&mut self) -> Result<ConfirmationOutcome, ApplicationError> {
        let mut booking = self.draft.confirm(BookingId::new(), Utc::now())?;
        info!(booking_id = %booking.id, total = booking.total_fare, "Booking confirmed");

        let persistence = match self.bookings.create_booking(&booking).await {
            Ok(stored) => {
                booking = stored;
                SideEffectStatus::Succeeded(Some(booking.id.to_string()))
            },
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "Failed to store booking");
                SideEffectStatus::Failed(e.to_string())
            },
        };

        let (invoice, payment) =
            futures::join!(self.send_invoice(&booking), self.start_payment(&booking));

        if invoice.is_success() {
            booking.invoice_sent = true;
            if persistence.is_success() {
                match self
                    .bookings
                    .update_booking(&booking.id, BookingPatch::invoice_sent())
                    .await
                {
                    Ok(updated) => booking = updated,
                    Err(e) => {
                        warn!(booking_id = %booking.id, error = %e, "Failed to flag invoice as sent");
                    },
                }
            }
        }

        Ok(ConfirmationOutcome {
            booking,
            persistence,
            invoice,
            payment,
        })
    }

    async fn send_invoice(&self, booking: &Booking) -> SideEffectStatus {
        let Some(invoices) = &self.invoices else {
            return SideEffectStatus::Skipped("invoice delivery not configured".into());
        };
        match invoices.send_invoice(booking).await {
            Ok(receipt) => SideEffectStatus::Succeeded(receipt.message_id),
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "Failed to send invoice");
                SideEffectStatus::Failed(e.to_string())
            },
        }
    }

    async fn start_payment(&self, booking: &Booking) -> SideEffectStatus {
        let Some(payments) = &self.payments else {
            return SideEffectStatus::Skipped("payments not configured".into());
        };
        let amount_cents = booking.total_cents();
        if amount_cents == 0 {
            return SideEffectStatus::Failed(
                ApplicationError::validation("amount", "Invalid amount").to_string(),
            );
        }
        let metadata = PaymentMetadata::from_booking(booking);
        match payments.create_payment_intent(amount_cents, &metadata).await {
            Ok(intent) => SideEffectStatus::Succeeded(Some(intent.client_secret)),
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "Failed to create payment intent");
                SideEffectStatus::Failed(e.to_string())
            },
        }
    }
}
