//! Background polling thread.

use crate::derive::snapshot::{ViewQuery, ViewSnapshot};
use crate::service::error::ServiceResult;
use crate::service::supply_service::SupplyService;
use crate::store::Store;
use log::{debug, info, warn};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(1000);

const THREAD_NAME: &str = "supply-sync";

/// Handle to a running sync loop. Dropping it stops polling.
pub struct SyncLoop {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SyncLoop {
    /// Starts polling `service` every `interval`, handing each fresh
    /// snapshot (or load failure) to `on_refresh`.
    ///
    /// # Errors
    /// - Returns an error when the polling thread cannot be spawned.
    pub fn spawn<S, F>(
        service: Arc<SupplyService<S>>,
        query: ViewQuery,
        interval: Duration,
        mut on_refresh: F,
    ) -> std::io::Result<Self>
    where
        S: Store + Send + Sync + 'static,
        F: FnMut(ServiceResult<ViewSnapshot>) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                info!(
                    "event=sync_start module=sync status=ok interval_ms={}",
                    interval.as_millis()
                );
                let mut ticks: u64 = 0;
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    ticks += 1;
                    let snapshot = service.snapshot(&query);
                    match &snapshot {
                        Ok(_) => debug!("event=sync_tick module=sync status=ok tick={ticks}"),
                        Err(err) => warn!(
                            "event=sync_tick module=sync status=error tick={} error_code={}",
                            ticks,
                            err.code()
                        ),
                    }
                    on_refresh(snapshot);
                }
                info!("event=sync_stop module=sync status=ok ticks={ticks}");
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stops polling and waits for the thread to finish its current tick.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=sync_stop module=sync status=error error_code=thread_panicked");
            }
        }
    }
}

impl Drop for SyncLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}
