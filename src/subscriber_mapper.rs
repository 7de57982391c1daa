use crate::domain::{
    AddressDefaults, DonationAmount, MailingAddress, PaymentDetails, SubscriberEmail,
    SubscriberName, SubscriberRecord,
};
use crate::list_client::SubscriberSink;
use crate::webhook::InboundEvent;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MappingError {
    #[error("Payment carries no customer email")]
    MissingEmail,
}

/// How a verified event was handled. Every variant is acknowledged to Stripe
/// with a 200; only the log tells them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    Ignored,
    SkippedNoEmail,
    Submitted,
    SubmissionFailed,
}

impl WebhookOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            WebhookOutcome::Ignored => "ignored",
            WebhookOutcome::SkippedNoEmail => "skipped",
            // Stripe re-delivery would not help, so failures are not surfaced.
            WebhookOutcome::Submitted | WebhookOutcome::SubmissionFailed => "success",
        }
    }
}

pub fn map_subscriber(
    details: PaymentDetails,
    defaults: &AddressDefaults,
) -> Result<SubscriberRecord, MappingError> {
    let customer = details.customer;
    let email = customer
        .email
        .ok_or(MappingError::MissingEmail)
        .and_then(|email| SubscriberEmail::parse(email).map_err(|_| MappingError::MissingEmail))?;

    Ok(SubscriberRecord {
        email,
        name: SubscriberName::from_full_name(customer.full_name.as_deref()),
        donation: DonationAmount::from_minor_units(details.amount_minor_units),
        address: MailingAddress::normalize(customer.address.as_ref(), defaults),
    })
}

#[tracing::instrument(
    name = "Relay payment event to the mailing list",
    skip(event, sink, defaults),
    fields(event_type = %event.kind)
)]
pub async fn process_event<S>(
    event: &InboundEvent,
    sink: &S,
    defaults: &AddressDefaults,
) -> WebhookOutcome
where
    S: SubscriberSink + ?Sized,
{
    let Some(details) = event.payment_details() else {
        tracing::info!("Ignoring event of unhandled type");
        return WebhookOutcome::Ignored;
    };

    let record = match map_subscriber(details, defaults) {
        Ok(record) => record,
        Err(e) => {
            tracing::info!("Skipping event: {}", e);
            return WebhookOutcome::SkippedNoEmail;
        }
    };

    match sink.upsert_subscriber(&record).await {
        Ok(()) => {
            tracing::info!("Added {} to the mailing list", record.email);
            WebhookOutcome::Submitted
        }
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to add {} to the mailing list", record.email);
            WebhookOutcome::SubmissionFailed
        }
    }
}
