use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use crate::domain::AddressDefaults;
use crate::list_client::MailchimpClient;
use crate::subscriber_mapper::process_event;
use crate::webhook::{VerificationError, WebhookVerifier, SIGNATURE_HEADER};

#[tracing::instrument(
    name = "Handle a Stripe webhook",
    skip(request, body, verifier, list_client, address_defaults),
    fields(event_id = tracing::field::Empty, event_type = tracing::field::Empty)
)]
pub async fn stripe_webhook(
    request: HttpRequest,
    body: web::Bytes,
    verifier: web::Data<WebhookVerifier>,
    list_client: web::Data<MailchimpClient>,
    address_defaults: web::Data<AddressDefaults>,
) -> Result<HttpResponse, WebhookError> {
    let signature = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let event = verifier.verify(&body, signature)?;

    let span = tracing::Span::current();
    span.record("event_type", tracing::field::display(&event.kind));
    if let Some(id) = &event.id {
        span.record("event_id", tracing::field::display(id));
    }

    let outcome = process_event(&event, list_client.get_ref(), &address_defaults).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": outcome.status() })))
}

#[derive(thiserror::Error)]
pub enum WebhookError {
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl std::fmt::Debug for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Verification(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            WebhookError::Verification(VerificationError::MalformedPayload(_)) => "Invalid payload",
            WebhookError::Verification(VerificationError::SignatureInvalid(_)) => "Invalid signature",
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
