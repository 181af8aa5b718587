use subscriber_api::{config::get_config, App, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // We have a different logging mechanism for production
    #[cfg(not(debug_assertions))]
    {
        subscriber_api::init_production_tracing()
    }
    #[cfg(debug_assertions)]
    {
        subscriber_api::init_dbg_tracing();
    }

    let config = get_config()?;
    let app = App::build_from_config(&config).await?;

    subscriber_api::serve(app).await?;

    Ok(())
}
