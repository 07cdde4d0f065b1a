use recipebox::{
    configuration::get_configuration,
    startup::Application,
    telementry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration()?;

    let subscriber = get_subscriber(
        "recipebox".into(),
        "info".into(),
        configuration.telemetry.otlp_endpoint.clone(),
        std::io::stdout,
    )?;
    init_subscriber(subscriber)?;

    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;

    opentelemetry::global::shutdown_tracer_provider();
    Ok(())
}
