use once_cell::sync::Lazy;
use secrecy::SecretString;
use wiremock::MockServer;
use donor_sync::configuration::{get_configuration, TelemetrySettings};
use donor_sync::startup::Application;
use donor_sync::telemetry::{get_subscriber, init_subscriber};
use donor_sync::webhook::sign_payload;

pub const WEBHOOK_SECRET: &str = "whsec_integration_test";
pub const LIST_ID: &str = "test-list";

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_layer = "info".to_string();
    let subscriber_name = "test".to_string();
    let telemetry = TelemetrySettings::default();

    if std::env::var("TEST_LOG").is_ok_and(|x| x.to_lowercase() == "true")  {
        let subscriber = get_subscriber(subscriber_name, default_filter_layer, std::io::stdout, &telemetry)
            .expect("Failed to build subscriber");
        init_subscriber(subscriber).expect("Failed to initialise subscriber");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_layer, std::io::sink, &telemetry)
            .expect("Failed to build subscriber");
        init_subscriber(subscriber).expect("Failed to initialise subscriber");
    }
});

pub struct TestApp {
    pub address: String,
    pub mailchimp_server: MockServer,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let mailchimp_server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to get configuration");
        c.application.host = "127.0.0.1".into();
        c.application.port = 0;
        c.stripe.webhook_secret = SecretString::from(WEBHOOK_SECRET);
        c.mailchimp.base_url = Some(mailchimp_server.uri());
        c.mailchimp.list_id = LIST_ID.into();
        c.mailchimp.skip_merge_validation = true;
        c
    };

    let application = Application::build(configuration).await.expect("Failed to build application");
    let port = application.port();
    tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        mailchimp_server,
    }
}

impl TestApp {
    pub async fn post_webhook(&self, body: String, signature: Option<String>) -> reqwest::Response {
        let mut request = reqwest::Client::new()
            .post(format!("{}/stripe-webhook", &self.address))
            .header("Content-Type", "application/json")
            .body(body);
        if let Some(signature) = signature {
            request = request.header("Stripe-Signature", signature);
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// Posts `event` signed with the endpoint secret, as Stripe would.
    pub async fn post_signed_event(&self, event: &serde_json::Value) -> reqwest::Response {
        let body = event.to_string();
        let signature = sign_payload(WEBHOOK_SECRET, body.as_bytes(), chrono::Utc::now().timestamp())
            .expect("Failed to sign payload");
        self.post_webhook(body, Some(signature)).await
    }
}

pub fn checkout_completed(customer_details: serde_json::Value, amount_total: i64) -> serde_json::Value {
    serde_json::json!({
        "id": "evt_test_checkout",
        "object": "event",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_123",
                "object": "checkout.session",
                "amount_total": amount_total,
                "currency": "gbp",
                "customer_details": customer_details
            }
        }
    })
}
