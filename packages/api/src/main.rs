use std::env::set_var;

use api::{config::AppConfig, state::AppState};
use lambda_http::{run, Error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = AppConfig::from_env()?;
    init_tracing(config.lambda);

    let app_state = AppState::from_config(&config).await?;
    let app = api::app(app_state);

    if config.lambda {
        set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");
        return run(app).await;
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Games API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(lambda: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    // CloudWatch stamps every line already.
    if lambda {
        subscriber.without_time().init();
    } else {
        subscriber.init();
    }
}
