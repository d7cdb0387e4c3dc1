//! Long-lived service frontend.
//!
//! Every connection carries newline-delimited JSON [`PlanningRequest`]s.
//! Each request gets one [`ServiceResponse`] line back, in order. A request
//! that fails, or even panics, only affects its own response.

use crate::core::exit_codes;
use crate::errors::DriverError;
use crate::pipeline::Driver;
use crate::request::PlanningRequest;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// Name the service is published under.
pub const SERVICE_NAME: &str = "fast_downward";

/// Reply to one service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    /// Exit code of the request.
    pub exitcode: i32,
}

impl ServiceResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(exitcode: i32) -> Self {
        Self { exitcode }
    }
}

/// Serves planning requests over TCP.
#[derive(Debug, Clone)]
pub struct ServiceFrontend {
    driver: Arc<Driver>,
    permits: Arc<Semaphore>,
}

impl ServiceFrontend {
    /// Creates a frontend running at most `max_concurrent_runs` requests at
    /// a time. A limit of zero is raised to one.
    #[must_use]
    pub fn new(driver: Driver, max_concurrent_runs: usize) -> Self {
        Self {
            driver: Arc::new(driver),
            permits: Arc::new(Semaphore::new(max_concurrent_runs.max(1))),
        }
    }

    /// Returns the driver requests are handed to.
    #[must_use]
    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Accepts connections until `shutdown` completes.
    ///
    /// Requests already running keep running on their own tasks.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the listener address cannot be read.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), DriverError>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = listener.local_addr()?;
        info!(service = SERVICE_NAME, %addr, "service started");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!(service = SERVICE_NAME, "service shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "accepted connection");
                        let frontend = self.clone();
                        tokio::spawn(async move {
                            if let Err(e) = frontend.serve_connection(stream).await {
                                warn!(%peer, error = %e, "connection failed");
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "failed to accept connection"),
                },
            }
        }
    }

    async fn serve_connection(&self, stream: TcpStream) -> std::io::Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line).await;
            let mut payload = serde_json::to_vec(&response)?;
            payload.push(b'\n');
            writer.write_all(&payload).await?;
        }
        Ok(())
    }

    /// Handles one JSON-encoded request.
    pub async fn handle_line(&self, line: &str) -> ServiceResponse {
        match PlanningRequest::from_json(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, "rejected malformed request");
                ServiceResponse::new(e.exit_code())
            }
        }
    }

    /// Handles one request on its own task, waiting for a free run slot.
    pub async fn handle(&self, request: PlanningRequest) -> ServiceResponse {
        let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
            error!("run slots are closed");
            return ServiceResponse::new(exit_codes::DRIVER_CRITICAL_ERROR);
        };
        let driver = Arc::clone(&self.driver);
        let task = tokio::spawn(async move {
            let _permit = permit;
            driver.handle(request).await
        });

        let exitcode = match task.await {
            Ok(Ok(outcome)) => outcome.exit_code(),
            Ok(Err(e)) => {
                error!(error = %e, "request failed");
                e.exit_code()
            }
            Err(e) => {
                error!(error = %e, "request task did not complete");
                exit_codes::DRIVER_CRITICAL_ERROR
            }
        };
        info!(exitcode, "request finished");
        ServiceResponse::new(exitcode)
    }
}
