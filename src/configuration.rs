use std::path::Path;
use std::time::Duration;
use config::{Config, ConfigError};
use secrecy::SecretString;
use serde_aux::field_attributes::deserialize_number_from_string;
use crate::domain::AddressDefaults;
use crate::list_client::MailchimpClient;
use crate::webhook::WebhookVerifier;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub stripe: StripeSettings,
    pub mailchimp: MailchimpSettings,
    pub address_defaults: AddressDefaults,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct StripeSettings {
    pub webhook_secret: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub tolerance_seconds: i64,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct MailchimpSettings {
    pub api_key: SecretString,
    pub list_id: String,
    /// Data centre prefix of the account, e.g. `us10`.
    pub server_prefix: String,
    /// Overrides the URL derived from `server_prefix`.
    pub base_url: Option<String>,
    pub skip_merge_validation: bool,
    pub timeout_seconds: Option<u64>,
}

#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct TelemetrySettings {
    /// OTLP/gRPC collector, e.g. `http://localhost:4317`. Export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StripeSettings {
    pub fn verifier(&self) -> WebhookVerifier {
        WebhookVerifier::new(self.webhook_secret.clone(), self.tolerance_seconds)
    }
}

impl MailchimpSettings {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.api.mailchimp.com/3.0", self.server_prefix))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    pub fn client(&self) -> Result<MailchimpClient, reqwest::Error> {
        MailchimpClient::new(
            self.base_url(),
            self.list_id.clone(),
            self.api_key.clone(),
            self.skip_merge_validation,
            self.timeout(),
        )
    }
}


pub fn get_configuration() -> Result<Settings, ConfigError> { // Initialise our configuration reader

    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    load_settings(&configuration_directory, &environment, environment_variables())
}

/// E.g. `APP_MAILCHIMP__API_KEY=...` sets `Settings.mailchimp.api_key`.
/// Without `prefix_separator` the prefix would have to be followed by `__` too.
fn environment_variables() -> config::Environment {
    config::Environment::with_prefix("app")
        .prefix_separator("_")
        .separator("__")
}

fn load_settings(
    configuration_directory: &Path,
    environment: &Environment,
    variables: config::Environment,
) -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .add_source(config::File::from(configuration_directory.join("base")).required(true))
        .add_source(config::File::from(configuration_directory.join(environment.as_str())).required(true))
        .add_source(variables)
        .build()?;

    settings.try_deserialize()
}

/// The possible runtime environment for our application.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local", Environment::Production => "production",
        } }
}
impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!("{} is not a supported environment. Use either `local` or `production`.", other )),
    } }
}
