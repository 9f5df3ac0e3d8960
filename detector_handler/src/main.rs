pub mod handlers;

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use handlers::{detect_emotion, health_check, index_page};
use lib::env_keys::{HOST, PORT};
use lib::service::emotion_service::EmotionServiceConfig;
use lib::service::CommonService;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 5000;


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let config = EmotionServiceConfig::from_env()?;
    info!(endpoint = %config.endpoint, timeout = ?config.timeout, "emotion service configured");
    let service = CommonService::new(&config)?;

    let host = std::env::var(HOST).unwrap_or("0.0.0.0".to_owned());
    let port = std::env::var(PORT).ok();
    let address = bind_address(&host, port.as_deref())?;

    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("listening on http://{}", address);
    axum::serve(listener, app(service)).await?;

    Ok(())
}


// HOST may be IPv4 or IPv6 (`::`), without brackets
fn bind_address(host: &str, port: Option<&str>) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = host.trim().parse().with_context(|| format!("invalid {}: {}", HOST, host))?;
    let port: u16 = match port {
        Some(port) => port.trim().parse().with_context(|| format!("invalid {}: {}", PORT, port))?,
        None => DEFAULT_PORT,
    };
    Ok(SocketAddr::new(ip, port))
}

pub fn app(service: CommonService) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/emotionDetector", get(detect_emotion))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
