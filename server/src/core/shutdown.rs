//! Server lifecycle: stop signal, background task draining, database close
//!
//! A single `watch` channel carries the stop flag. The HTTP server waits on it
//! through [`ShutdownService::wait`]; background tasks such as the WAL
//! checkpointer subscribe and exit when it flips. The listings database is
//! checkpointed and closed last, after every task has finished or the drain
//! timeout has passed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use super::constants::SHUTDOWN_TIMEOUT_SECS;
use crate::data::SqliteService;

/// Task spawned at startup and joined during shutdown
struct BackgroundTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct ShutdownService {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
    tasks: Arc<Mutex<Vec<BackgroundTask>>>,
    database: Arc<SqliteService>,
    drain_timeout: Duration,
}

impl ShutdownService {
    pub fn new(database: Arc<SqliteService>) -> Self {
        Self::with_drain_timeout(database, Duration::from_secs(SHUTDOWN_TIMEOUT_SECS))
    }

    pub fn with_drain_timeout(database: Arc<SqliteService>, drain_timeout: Duration) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
            tasks: Arc::new(Mutex::new(Vec::new())),
            database,
            drain_timeout,
        }
    }

    /// Track a background task so shutdown waits for it
    pub async fn register(&self, name: &'static str, handle: JoinHandle<()>) {
        tracing::trace!(task = name, "Background task registered");
        self.tasks.lock().await.push(BackgroundTask { name, handle });
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.rx.clone()
    }

    /// Flip the stop flag; idempotent
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Stop everything and release the database
    pub async fn shutdown(&self) {
        tracing::debug!("Shutting down");
        self.trigger();
        self.drain_tasks().await;
        self.close_database().await;
        tracing::debug!("Shutdown complete");
    }

    /// Join registered tasks, aborting any still running at the timeout
    async fn drain_tasks(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        if tasks.is_empty() {
            return;
        }

        let names: Vec<&'static str> = tasks.iter().map(|t| t.name).collect();
        let aborts: Vec<_> = tasks.iter().map(|t| t.handle.abort_handle()).collect();
        tracing::debug!(tasks = ?names, "Waiting for background tasks");

        let joined = futures::future::join_all(tasks.into_iter().map(|t| t.handle));
        if tokio::time::timeout(self.drain_timeout, joined).await.is_err() {
            tracing::warn!(
                timeout_secs = self.drain_timeout.as_secs_f64(),
                tasks = ?names,
                "Background tasks did not stop in time, aborting"
            );
            for abort in aborts {
                abort.abort();
            }
        }
    }

    async fn close_database(&self) {
        if let Err(e) = self.database.checkpoint().await {
            tracing::warn!(error = %e, "Final WAL checkpoint failed");
        }
        self.database.close().await;
    }

    /// Owned future for `axum::serve(..).with_graceful_shutdown`
    pub fn wait(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.rx.clone();
        async move {
            let _ = rx.wait_for(|&stopped| stopped).await;
        }
    }

    /// Trigger on Ctrl+C or SIGTERM
    pub fn install_signal_handlers(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            let ctrl_c = async {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install Ctrl+C handler");
            };

            #[cfg(unix)]
            let terminate = async {
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("Failed to install SIGTERM handler")
                    .recv()
                    .await;
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            let signal = tokio::select! {
                _ = ctrl_c => "SIGINT",
                _ = terminate => "SIGTERM",
            };
            tracing::info!(signal, "Stopping listings server");
            service.trigger();
        });
    }
}
