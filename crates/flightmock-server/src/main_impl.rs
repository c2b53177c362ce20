//! Flightmock HTTP Server
//!
//! Stand-in for a flight-data provider during payout-oracle integration tests.
//!
//! # Endpoints
//!
//! - `GET /status/{flightId}`
//!   - Returns `{"flightId", "delay_minutes", "status"}` as JSON.
//!   - Lookups are case-insensitive; unknown flights are reported on time.
//!   - The segment is percent-decoded lossily and a trailing slash is ignored,
//!     so every path under `/status/` answers 200.
//! - `GET /health`
//!   - Returns JSON liveness information and the table size.
//!
//! # Table
//!
//! The flight table is built once at startup, from the reference data or a
//! JSON file, and shared read-only between handlers.

use std::borrow::Cow;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    http::Uri,
    response::Html,
    routing::get,
    Json, Router,
};
use clap::Parser;
use flightmock_core::config::server::{DEFAULT_HOST, DEFAULT_PORT};
use flightmock_core::{FlightRecord, FlightTable};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::banner;
use crate::tunnel::{Tunnel, TunnelCommand};

/// Command-line arguments for the server.
#[derive(Parser)]
#[command(name = "flightmock-server", version, about = "Mock flight status HTTP server")]
struct Args {
    /// Address to bind.
    #[arg(long, env = "FLIGHTMOCK_HOST", default_value_t = DEFAULT_HOST)]
    host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "FLIGHTMOCK_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// JSON file with the flight table (defaults to the built-in demo table).
    #[arg(long, env = "FLIGHTMOCK_TABLE")]
    table: Option<PathBuf>,

    /// Tunnel command exposing the port publicly, e.g. "ngrok http {port}".
    #[arg(long, env = "FLIGHTMOCK_TUNNEL", value_delimiter = ' ', num_args = 1..)]
    tunnel: Option<Vec<String>>,

    /// Public URL the tunnel serves, shown in the startup listing.
    ///
    /// The tunnel program is not queried for it; copy it from the tunnel's
    /// own output or dashboard (for ngrok, http://127.0.0.1:4040).
    #[arg(long, env = "FLIGHTMOCK_PUBLIC_URL")]
    public_url: Option<String>,
}

/// Shared application state.
///
/// The table is immutable, so an `Arc` is all the synchronization it needs.
#[derive(Clone)]
struct AppState {
    table: Arc<FlightTable>,
}

const STATUS_PREFIX: &str = "/status/";

/// Handler for a flight status lookup.
///
/// Routes: `GET /status/`, `GET /status/{flight_id}`, `GET /status/{flight_id}/`
///
/// Reads the raw segment from the URI instead of a `Path` extractor, which
/// rejects percent-encoded bytes that are not UTF-8.
async fn get_status(State(state): State<AppState>, uri: Uri) -> Json<FlightRecord> {
    let flight_id = flight_id_from_path(uri.path());
    let record = state.table.get_status(&flight_id);
    debug!(
        flight_id = %record.flight_id,
        known = state.table.contains(&record.flight_id),
        delay_minutes = record.delay_minutes,
        "status lookup"
    );
    Json(record)
}

/// Extracts the flight id from a `/status/...` path.
///
/// One trailing slash is dropped before decoding; invalid UTF-8 becomes U+FFFD.
fn flight_id_from_path(path: &str) -> Cow<'_, str> {
    let raw = path.strip_prefix(STATUS_PREFIX).unwrap_or_default();
    let raw = raw.strip_suffix('/').unwrap_or(raw);
    percent_decode_str(raw).decode_utf8_lossy()
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    flights: usize,
}

/// Handler for liveness probes.
///
/// Route: `GET /health`
async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        flights: state.table.len(),
    })
}

/// Handler for the root path.
///
/// Route: `GET /`
async fn root() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

/// Creates the Axum router with all routes configured.
///
/// Separated from [`run`] so integration tests can drive the router
/// without a live server.
pub fn create_app(table: Arc<FlightTable>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/status/", get(get_status))
        .route("/status/{flight_id}", get(get_status))
        .route("/status/{flight_id}/", get(get_status))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { table })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
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
    info!("shutdown signal received");
}

/// Main server entry point.
///
/// Loads the table, binds the listener and serves until a shutdown signal
/// arrives.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    info!("Flightmock Server v{}", env!("CARGO_PKG_VERSION"));

    let table = match &args.table {
        Some(path) => FlightTable::from_path(path)
            .with_context(|| format!("failed to load flight table {}", path.display()))?,
        None => FlightTable::reference(),
    };

    let addr = SocketAddr::new(args.host, args.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    serve(
        listener,
        Arc::new(table),
        args.tunnel,
        args.public_url.as_deref(),
        shutdown_signal(),
    )
    .await
}

/// Serves `table` on an already bound listener.
///
/// The tunnel is opened after binding so `{port}` resolves to the real
/// port. A failing tunnel only degrades the service to local access.
async fn serve<F>(
    listener: TcpListener,
    table: Arc<FlightTable>,
    tunnel: Option<Vec<String>>,
    public_url: Option<&str>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr().context("failed to read bound address")?;

    let tunnel = match tunnel {
        Some(argv) => open_tunnel(argv, local_addr.port()).await,
        None => None,
    };

    banner::log_banner(&table, local_addr, public_url);

    let served = axum::serve(listener, create_app(table))
        .with_graceful_shutdown(shutdown)
        .await;

    if let Some(tunnel) = tunnel {
        tunnel.close().await;
    }

    served.context("server error")
}

async fn open_tunnel(argv: Vec<String>, port: u16) -> Option<Tunnel> {
    let opened = match TunnelCommand::from_argv(argv) {
        Ok(command) => Tunnel::open(&command, port).await,
        Err(e) => Err(e),
    };
    match opened {
        Ok(tunnel) => Some(tunnel),
        Err(e) => {
            warn!("tunnel unavailable, continuing without public exposure: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    #[test]
    fn flight_id_from_path_decodes_lossily() {
        assert_eq!(flight_id_from_path("/status/bf1234"), "bf1234");
        assert_eq!(flight_id_from_path("/status/bf1234/"), "bf1234");
        assert_eq!(flight_id_from_path("/status/"), "");
        assert_eq!(flight_id_from_path("/status/%2F"), "/");
        assert_eq!(flight_id_from_path("/status/%FF"), "\u{FFFD}");
    }

    #[test]
    fn tunnel_flag_splits_on_spaces() {
        let args =
            Args::try_parse_from(["flightmock-server", "--tunnel", "ngrok http {port}"]).unwrap();
        assert_eq!(
            args.tunnel,
            Some(vec!["ngrok".to_string(), "http".to_string(), "{port}".to_string()])
        );
    }

    #[test]
    fn tunnel_and_public_url_are_optional() {
        let args = Args::try_parse_from(["flightmock-server", "--port", "0"]).unwrap();
        assert_eq!(args.port, 0);
        assert!(args.tunnel.is_none());
    }

    #[test]
    fn public_url_help_explains_manual_step() {
        use clap::CommandFactory;

        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("--public-url"));
        assert!(help.contains("127.0.0.1:4040"));
    }

    #[tokio::test]
    async fn missing_tunnel_program_degrades_to_local() {
        assert!(open_tunnel(vec!["flightmock-no-such-binary".into()], 0)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn blank_tunnel_command_degrades_to_local() {
        assert!(open_tunnel(vec![String::new()], 0).await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exiting_tunnel_program_degrades_to_local() {
        assert!(open_tunnel(vec!["true".into()], 0).await.is_none());
    }

    #[tokio::test]
    async fn server_keeps_serving_when_tunnel_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(
            listener,
            Arc::new(FlightTable::reference()),
            Some(vec!["flightmock-no-such-binary".into()]),
            None,
            async move {
                let _ = shutdown_rx.await;
            },
        ));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /status/bf1234 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.contains(r#""flightId":"BF1234""#));
        assert!(response.contains(r#""delay_minutes":210"#));

        shutdown_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
