use std::sync::Arc;

use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use tts_core::{PiperSynthesizer, SpeechSynthesizer};
use tts_server::{config::ServerConfig, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    async_main().await
}

async fn async_main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // The voice must be fully loaded before the listener accepts anything.
    info!("Loading Piper voice model: {}", config.voice_model.display());
    let model_path = config.voice_model.clone();
    let voice = tokio::task::spawn_blocking(move || PiperSynthesizer::load(&model_path))
        .await
        .context("voice loading task panicked")?
        .with_context(|| format!("Could not load voice model {}", config.voice_model.display()))?;
    info!(
        model = %voice.model_path().display(),
        sample_rate = voice.sample_rate(),
        "Voice model loaded successfully"
    );

    let synth: Arc<dyn SpeechSynthesizer> = Arc::new(voice);
    let app = router(AppState::new(synth));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind {addr}: {e}. Try a different PORT.")
    })?;

    info!("Piper TTS server running on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM. In-flight requests are allowed to finish.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
