use std::net::TcpListener;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use crate::configuration::Settings;
use crate::domain::AddressDefaults;
use crate::list_client::MailchimpClient;
use crate::routes::{health_check, home, stripe_webhook};
use crate::webhook::WebhookVerifier;


pub fn run(
    listener: TcpListener,
    verifier: WebhookVerifier,
    list_client: MailchimpClient,
    address_defaults: AddressDefaults,
) -> std::io::Result<Server> {
    let verifier = web::Data::new(verifier);
    let list_client = web::Data::new(list_client);
    let address_defaults = web::Data::new(address_defaults);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/", web::get().to(home))
            .route("/health_check", web::get().to(health_check))
            .route("/stripe-webhook", web::post().to(stripe_webhook))
            .app_data(verifier.clone())
            .app_data(list_client.clone())
            .app_data(address_defaults.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct Application {
    port: u16,
    server: Server,
}


impl Application {
    pub async fn build(configuration: Settings) -> anyhow::Result<Application> {
        let verifier = configuration.stripe.verifier();
        let list_client = configuration
            .mailchimp
            .client()
            .context("Failed to build the Mailchimp client")?;

        let address = configuration.application.address();
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {}", address))?;
        let port = listener.local_addr()?.port();
        tracing::info!("Listening on {}:{}", configuration.application.host, port);

        let server = run(listener, verifier, list_client, configuration.address_defaults)?;
        Ok(Self {port, server})
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }

}
