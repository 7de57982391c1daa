use donor_sync::configuration::get_configuration;
use donor_sync::startup::Application;
use donor_sync::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let configuration = get_configuration()?;

    let subscriber = get_subscriber("donor_sync".into(), "info".to_string(), std::io::stdout, &configuration.telemetry)?;
    init_subscriber(subscriber)?;

    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
