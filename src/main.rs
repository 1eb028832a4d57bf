use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use chat_relay::application::ports::InferenceEngine;
use chat_relay::infrastructure::llm::{EchoInferenceEngine, create_ollama_client};
use chat_relay::infrastructure::observability::init_tracing;
use chat_relay::presentation::{AppState, Environment, InferenceProvider, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&settings.logging, environment);

    match settings.inference.provider {
        InferenceProvider::Ollama => {
            let client = create_ollama_client(&settings.inference)?;
            tracing::info!(base_url = %client.base_url(), "Using Ollama inference engine");
            serve(Arc::new(client), settings).await
        }
        InferenceProvider::Echo => {
            tracing::info!("Using echo inference engine");
            let engine =
                EchoInferenceEngine::new(Duration::from_millis(settings.inference.echo_delay_ms));
            serve(Arc::new(engine), settings).await
        }
    }
}

async fn serve<E>(engine: Arc<E>, settings: Settings) -> anyhow::Result<()>
where
    E: InferenceEngine + 'static,
{
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let router = create_router(AppState::new(engine, settings));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
