use mediabox_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Initialize the application (telemetry, database, storage, routes)
    let (_state, router) = mediabox_api::setup::initialize_app(config.clone()).await?;

    mediabox_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
