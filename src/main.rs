//! Marker node: publishes parking spots and surfaces, then turns clicks into goals.
//!
//! Usage: `surface-markers [config.toml]`
//!
//! Interaction feedback arrives as newline-delimited JSON on a local socket and is
//! dispatched on its own task, first to the parking registry, then to the surface
//! registry.

use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use interprocess::local_socket::LocalSocketListener;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use surface_markers::feedback::read_feedback;
use surface_markers::{
    FeedbackRouter, InteractionEvent, IpcNavigationClient, MarkerServer, MarkersConfig,
    Orchestrator, Result, UrdfFile,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("surface_markers=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {path}");
            MarkersConfig::load(Path::new(&path))?
        }
        None => MarkersConfig::default(),
    };

    let navigation = Arc::new(IpcNavigationClient::new(&config.navigation));
    let description = UrdfFile::new(&config.description_path);
    info!(
        executor = navigation.socket(),
        description = %description.path().display(),
        "waiting for navigation executor"
    );

    let orchestrator = Orchestrator::new(navigation);
    let mut parking = MarkerServer::new(&config.parking_server);
    let mut surface = MarkerServer::new(&config.surface_server);

    orchestrator
        .start(&description, &mut parking, &mut surface)
        .await?;
    info!(
        parking = parking.name(),
        surface = surface.name(),
        "marker servers live"
    );

    let router = FeedbackRouter::new(Arc::new(parking), Arc::new(surface));
    serve(&config.feedback_socket, router).await
}

async fn serve(socket: &str, router: FeedbackRouter) -> Result<()> {
    // A previous run may have left the socket path behind.
    let _ = std::fs::remove_file(socket);
    let listener = LocalSocketListener::bind(socket)?;
    info!(socket, "serving interaction feedback");

    let (tx, mut rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || accept_loop(listener, tx));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutting down");
                break;
            }
            Some(event) = rx.recv() => {
                let router = router.clone();
                tokio::spawn(async move { router.route(&event).await });
            }
        }
    }

    let _ = std::fs::remove_file(socket);
    Ok(())
}

fn accept_loop(listener: LocalSocketListener, events: mpsc::UnboundedSender<InteractionEvent>) {
    for conn in listener.incoming() {
        match conn {
            Ok(conn) => {
                let events = events.clone();
                std::thread::spawn(move || read_feedback(BufReader::new(conn), &events));
            }
            Err(e) => warn!("failed to accept feedback connection: {e}"),
        }
    }
}
