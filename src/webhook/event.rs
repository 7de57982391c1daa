use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AddressRaw, CustomerDetails, PaymentDetails};
use crate::webhook::VerificationError;

/// A Stripe event envelope. Only the fields we route on are typed; the event
/// object itself stays opaque until a handler for its kind picks it apart.
#[derive(Debug, Deserialize)]
pub struct InboundEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: EventData,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub object: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    CheckoutSessionCompleted,
    ChargeSucceeded,
}

impl EventKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "checkout.session.completed" => Some(Self::CheckoutSessionCompleted),
            "charge.succeeded" => Some(Self::ChargeSucceeded),
            _ => None,
        }
    }
}

/// Where a payment kind keeps its customer, fallback email and amount.
struct ObjectLayout {
    customer: &'static str,
    fallback_email: &'static str,
    amount: &'static str,
}

const CHECKOUT_SESSION: ObjectLayout = ObjectLayout {
    customer: "/customer_details",
    fallback_email: "/customer_email",
    amount: "/amount_total",
};

const CHARGE: ObjectLayout = ObjectLayout {
    customer: "/billing_details",
    fallback_email: "/receipt_email",
    amount: "/amount",
};

impl InboundEvent {
    pub fn parse(payload: &[u8]) -> Result<Self, VerificationError> {
        serde_json::from_slice(payload).map_err(VerificationError::MalformedPayload)
    }

    /// `None` for event kinds we do not act on.
    pub fn accepted_kind(&self) -> Option<EventKind> {
        EventKind::parse(&self.kind)
    }

    /// Pulls the paying customer out of the event object. Never fails: each
    /// field is read on its own, and one that is missing, null or of an
    /// unexpected type comes back empty without affecting its siblings.
    pub fn payment_details(&self) -> Option<PaymentDetails> {
        let layout = match self.accepted_kind()? {
            EventKind::CheckoutSessionCompleted => &CHECKOUT_SESSION,
            EventKind::ChargeSucceeded => &CHARGE,
        };
        let object = &self.data.object;
        let customer = layout.customer;

        let address = object
            .pointer(&format!("{}/address", customer))
            .filter(|address| address.is_object())
            .map(|address| AddressRaw {
                line1: string_at(address, "/line1"),
                line2: string_at(address, "/line2"),
                city: string_at(address, "/city"),
                state: string_at(address, "/state"),
                postal_code: string_at(address, "/postal_code"),
                country: string_at(address, "/country"),
            });

        let email = non_blank(string_at(object, &format!("{}/email", customer)))
            .or_else(|| non_blank(string_at(object, layout.fallback_email)));

        Some(PaymentDetails {
            customer: CustomerDetails {
                email,
                full_name: string_at(object, &format!("{}/name", customer)),
                address,
            },
            amount_minor_units: minor_units_at(object, layout.amount),
        })
    }
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    let field = value.pointer(pointer)?;
    match field.as_str() {
        Some(text) => Some(text.to_string()),
        None => {
            if !field.is_null() {
                tracing::warn!(field = pointer, "Expected a string, ignoring the field");
            }
            None
        }
    }
}

/// Stripe sends integers; an integral float is tolerated, anything else counts as 0.
fn minor_units_at(value: &Value, pointer: &str) -> i64 {
    let Some(field) = value.pointer(pointer) else {
        return 0;
    };
    field
        .as_i64()
        .or_else(|| field.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .unwrap_or_else(|| {
            if !field.is_null() {
                tracing::warn!(field = pointer, "Expected an integer amount, using 0");
            }
            0
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
