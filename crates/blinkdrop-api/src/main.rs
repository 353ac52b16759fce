use blinkdrop_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, storage, background tasks, routes)
    let (state, router) = blinkdrop_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    blinkdrop_api::setup::server::start_server(&config, router, &state).await?;

    Ok(())
}
