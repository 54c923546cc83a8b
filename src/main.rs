use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tryon_studio::ai::GeminiImageModel;
use tryon_studio::config::Config;
use tryon_studio::server::{build_router, AppState};
use tryon_studio::studio::TryOnStudio;

#[derive(Debug, Parser)]
#[command(name = "tryon-studio")]
#[command(about = "Serve the virtual try-on image API")]
struct CliArgs {
    /// Port to listen on (overrides PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the built frontend (overrides STATIC_DIR).
    #[arg(long, value_name = "DIR")]
    static_dir: Option<PathBuf>,

    /// Serve only the API, without the static frontend fallback.
    #[arg(long)]
    no_static: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tryon_studio=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mut config = Config::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = dir;
    }

    if config.api_key.resolve().is_err() {
        warn!("No Gemini API key set yet; requests will fail until GEMINI_API_KEY or API_KEY is provided");
    }
    info!("Image model: {} ({})", config.gemini_model, config.gemini_base_url);

    let model = GeminiImageModel::from_config(&config);
    let state = AppState::new(TryOnStudio::new(Arc::new(model)));

    let static_dir = (!args.no_static).then_some(config.static_dir.as_path());
    if let Some(dir) = static_dir {
        if !dir.exists() {
            warn!("Static directory {} does not exist", dir.display());
        }
    }
    let app = build_router(state, static_dir);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
