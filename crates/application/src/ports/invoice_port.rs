//! Invoice delivery port

use async_trait::async_trait;
use domain::Booking;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Result of a delivered invoice
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceReceipt {
    /// Id of the sent email, when the mailer reports one
    pub message_id: Option<String>,
}

/// Port for emailing the booking invoice
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InvoicePort: Send + Sync {
    /// Send the invoice for a confirmed booking
    async fn send_invoice(&self, booking: &Booking) -> Result<InvoiceReceipt, ApplicationError>;
}
