//! Authenticating and decoding inbound Stripe webhooks.

mod event;
mod signature;

pub use event::{EventData, EventKind, InboundEvent};
pub use signature::{SIGNATURE_HEADER, WebhookVerifier, sign_payload};

#[derive(thiserror::Error, Debug)]
pub enum VerificationError {
    #[error("Invalid payload")]
    MalformedPayload(#[source] serde_json::Error),
    #[error("Invalid signature: {0}")]
    SignatureInvalid(String),
}
