//! Per-connection dispatch workers (requires the `transport` feature).
//!
//! The transport layer owns sockets and framing; this module gives it the
//! in-process glue: one background task per connection that pulls decoded
//! frames from a channel, dispatches them in arrival order, and pushes
//! outbound frames back. Unhandled faults are converted into
//! exception-flagged frames — the default behavior expected of a
//! conforming transport adapter.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use wirecall::{spawn_connection, ConnectionHandle, Frame};
//!
//! let (in_tx, in_rx) = mpsc::channel(64);
//! let (out_tx, mut out_rx) = mpsc::channel(64);
//! let worker = spawn_connection(dispatcher.clone(), ConnectionHandle::new(1), in_rx, out_tx);
//!
//! in_tx.send(Frame::request(42, b"[]".to_vec())).await?;
//! let response = out_rx.recv().await;
//!
//! drop(in_tx); // connection closed
//! let stats = worker.join().await;
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::dispatch::{fault_frame, Dispatcher};
use crate::frame::{ConnectionHandle, Frame};

/// Statistics from a finished connection worker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkerStats {
    /// Frames that completed without a fatal fault (with or without an
    /// outbound frame).
    pub handled: usize,
    /// Frames whose fault crossed the dispatcher unhandled and was
    /// converted into an exception frame.
    pub faulted: usize,
}

/// Handle to one connection's background dispatch task.
///
/// The worker stops when the inbound channel closes (drop the sender);
/// [`join`](Self::join) then returns its stats.
pub struct ConnectionWorker {
    handle: JoinHandle<WorkerStats>,
}

impl ConnectionWorker {
    /// Wait for the worker to finish and collect its stats.
    pub async fn join(self) -> WorkerStats {
        self.handle.await.unwrap_or_default()
    }
}

/// Spawn the dispatch worker for one connection.
///
/// Frames are dispatched strictly in arrival order: the worker awaits each
/// invocation before pulling the next frame, so per-connection ordering
/// into the dispatcher is preserved while other connections' workers run
/// concurrently. A closed outbound channel means the connection was
/// severed; the now-unaddressable frame is dropped after the normal
/// completion path has run.
pub fn spawn_connection(
    dispatcher: Arc<Dispatcher>,
    connection: ConnectionHandle,
    mut inbound: mpsc::Receiver<Frame>,
    outbound: mpsc::Sender<Frame>,
) -> ConnectionWorker {
    let handle = tokio::spawn(async move {
        let mut stats = WorkerStats::default();

        while let Some(frame) = inbound.recv().await {
            let command_code = frame.command_code;
            match dispatcher.handle(frame, connection).await {
                Ok(Some(response)) => {
                    stats.handled += 1;
                    if outbound.send(response).await.is_err() {
                        tracing::debug!(
                            connection = connection.id(),
                            command_code,
                            "connection severed, dropping outbound frame"
                        );
                    }
                }
                Ok(None) => stats.handled += 1,
                Err(fault) => {
                    stats.faulted += 1;
                    let frame = fault_frame(command_code, &fault);
                    let _ = outbound.send(frame).await;
                }
            }
        }

        stats
    });

    ConnectionWorker { handle }
}
