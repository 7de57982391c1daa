mod health_check;
mod stripe_webhook;

pub use health_check::{health_check, home};
pub use stripe_webhook::{error_chain_fmt, stripe_webhook, WebhookError};
