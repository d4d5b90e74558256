//! Wiring: open the archive, start the worker, serve the API, shut down.

use crate::error::{ErrorKind, Result};
use apod_archive::{Database, Repository, StoreHandle};
use apod_config::Config;
use apod_storage::BackendHandle;
use apod_storage::backend::LocalBackend;
use apod_upstream::{SourceHandle, UpstreamClient};
use apod_worker::{Ingestor, Worker};
use exn::ResultExt;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// How long in-flight requests get to finish once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

pub async fn run(config: Config) -> Result<()> {
    let database = Database::connect(&config.database).await.or_raise(|| ErrorKind::Database)?;
    let store: StoreHandle = Arc::new(Repository::from(&database));
    let storage: BackendHandle =
        Arc::new(LocalBackend::new("images", &config.storage.directory).or_raise(|| ErrorKind::Storage)?);
    let source: SourceHandle = Arc::new(UpstreamClient::new(&config.upstream).or_raise(|| ErrorKind::Upstream)?);

    let address = config.server.address();
    let listener = TcpListener::bind(&address).await.or_raise(|| ErrorKind::Bind(address.clone()))?;
    tracing::info!(%address, "listening");

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    let worker = Worker::new(Ingestor::new(source, store.clone(), storage), config.worker).spawn(shutdown.clone());

    let server = axum::serve(listener, apod_api::router(store))
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    let served = tokio::select! {
        result = server => result.or_raise(|| ErrorKind::Serve),
        () = grace_period_elapsed(&shutdown) => {
            tracing::warn!(grace = ?SHUTDOWN_GRACE, "requests still in flight, closing anyway");
            Ok(())
        }
    };
    // A server error must still stop the worker.
    shutdown.cancel();

    if let Err(err) = worker.await {
        tracing::error!(error = %err, "worker task failed");
    }
    database.close().await;
    tracing::info!("shutdown complete");
    served
}

async fn grace_period_elapsed(shutdown: &CancellationToken) {
    shutdown.cancelled().await;
    tokio::time::sleep(SHUTDOWN_GRACE).await;
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(err) => {
                tracing::error!(error = %err, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("interrupt received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
        () = shutdown.cancelled() => {},
    }
    shutdown.cancel();
}
