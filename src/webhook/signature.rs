use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::webhook::{InboundEvent, VerificationError};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";
const SIGNATURE_SCHEME: &str = "v1";

/// Checks the `Stripe-Signature` header of incoming webhooks against the
/// endpoint's signing secret.
pub struct WebhookVerifier {
    secret: SecretString,
    tolerance_seconds: i64,
}

impl WebhookVerifier {
    pub fn new(secret: SecretString, tolerance_seconds: i64) -> Self {
        Self {
            secret,
            tolerance_seconds,
        }
    }

    /// Verifies the signature, then decodes the body into an event.
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<InboundEvent, VerificationError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    pub(crate) fn verify_at(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
        now: i64,
    ) -> Result<InboundEvent, VerificationError> {
        let header = signature_header.ok_or_else(|| {
            VerificationError::SignatureInvalid("Missing signature header".into())
        })?;
        self.verify_signature(payload, header, now)?;
        InboundEvent::parse(payload)
    }

    fn verify_signature(&self, payload: &[u8], header: &str, now: i64) -> Result<(), VerificationError> {
        let parts = SignatureHeader::parse(header)?;

        if parts.signatures.is_empty() {
            return Err(VerificationError::SignatureInvalid(
                "No signatures found with expected scheme".into(),
            ));
        }

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| VerificationError::SignatureInvalid(e.to_string()))?;
        mac.update(parts.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        // `verify_slice` compares in constant time.
        let matched = parts
            .signatures
            .iter()
            .filter_map(|signature| hex::decode(signature).ok())
            .any(|expected| mac.clone().verify_slice(&expected).is_ok());

        if !matched {
            return Err(VerificationError::SignatureInvalid(
                "No signatures found matching the expected signature for payload".into(),
            ));
        }

        if parts.timestamp < now - self.tolerance_seconds {
            return Err(VerificationError::SignatureInvalid(format!(
                "Timestamp outside the tolerance zone ({})",
                parts.timestamp
            )));
        }

        Ok(())
    }
}

/// Computes the header value Stripe would send for `payload` at `timestamp`.
pub fn sign_payload(secret: &str, payload: &[u8], timestamp: i64) -> Result<String, VerificationError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| VerificationError::SignatureInvalid(e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(format!("t={},{}={}", timestamp, SIGNATURE_SCHEME, signature))
}

struct SignatureHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

impl<'a> SignatureHeader<'a> {
    /// Parses `t=<unix time>,v1=<hex>[,v1=<hex>...]`; unknown schemes are skipped.
    /// Only the first `t=` counts, later ones are ignored.
    fn parse(header: &'a str) -> Result<Self, VerificationError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", t)) if timestamp.is_none() => timestamp = Some(t),
                Some((SIGNATURE_SCHEME, signature)) => signatures.push(signature),
                _ => {}
            }
        }

        let timestamp = timestamp.and_then(|t| t.parse::<i64>().ok()).ok_or_else(|| {
            VerificationError::SignatureInvalid(
                "Unable to extract timestamp and signatures from header".into(),
            )
        })?;

        Ok(Self {
            timestamp,
            signatures,
        })
    }
}
