use anyhow::Result;
use axum::Router;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use copilot_common::EnvVars;
use copilot_service_api::{copilot_routes, setup_tracing, CopilotEnv, GlobalState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing();

    let env = CopilotEnv::load()?;
    tracing::info!("[copilot-service] Starting in {:?} mode", env.mode);

    // The corpus is fully indexed before anything is bound.
    let global_state = GlobalState::from_env(&env).await?;

    let cors = CorsLayer::very_permissive();
    let trace = TraceLayer::new_for_http();

    let app = Router::new()
        .merge(copilot_routes())
        .layer(TimeoutLayer::new(env.request_timeout))
        .layer(cors)
        .layer(trace)
        .with_state(global_state);

    let port = env.port;
    let listener = tokio::net::TcpListener::bind(format!(":::{port}")).await?;

    tracing::info!("LISTENING ON {port}");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
