//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, TrySendError};

use crate::config::Config;
use crate::error::{DirError, Result};
use crate::storage::Store;

use super::Connection;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for compdir
///
/// ## Threading
/// - The thread calling `run` owns the non-blocking accept loop
/// - `worker_threads` workers pull accepted streams off a bounded channel
/// - Streams that don't fit in the channel are refused
///
/// ## Shutdown
/// Once the shutdown flag is set the accept loop exits, the channel is
/// closed, and `run` joins every worker. Each worker answers the request it
/// is processing before it exits, so the store can be closed safely after
/// `run` returns.
pub struct Server {
    config: Config,
    store: Arc<Store>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

/// Cloneable handle that stops a running server
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl Server {
    /// Create a server bound to `config.listen_addr`
    pub fn new(config: Config, store: Arc<Store>) -> Result<Self> {
        if config.worker_threads == 0 {
            return Err(DirError::Config("worker_threads must be at least 1".to_string()));
        }
        if config.max_connections == 0 {
            return Err(DirError::Config("max_connections must be at least 1".to_string()));
        }
        // Idle connections only notice shutdown when a read times out
        if config.read_timeout_ms == 0 {
            return Err(DirError::Config("read_timeout_ms must be at least 1".to_string()));
        }

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            store,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Start the server (blocking until shutdown)
    pub fn run(self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr()?);

        let (tx, rx) = channel::bounded::<TcpStream>(self.config.max_connections);

        let mut workers = Vec::with_capacity(self.config.worker_threads);
        for id in 0..self.config.worker_threads {
            workers.push(self.spawn_worker(id, rx.clone())?);
        }
        drop(rx);

        while !self.shutdown.load(Ordering::Acquire) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", addr, e);
                        continue;
                    }
                    match tx.try_send(stream) {
                        Ok(()) => tracing::trace!("Queued connection from {}", addr),
                        Err(TrySendError::Full(_)) => {
                            tracing::warn!("Connection limit reached, refusing {}", addr);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            tracing::error!("All workers exited, stopping accept loop");
                            break;
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => tracing::warn!("Accept failed: {}", e),
            }
        }

        tracing::info!("Shutdown requested, waiting for {} workers", workers.len());
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    fn spawn_worker(&self, id: usize, rx: Receiver<TcpStream>) -> Result<JoinHandle<()>> {
        let store = Arc::clone(&self.store);
        let shutdown = Arc::clone(&self.shutdown);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        let handle = thread::Builder::new()
            .name(format!("compdir-worker-{}", id))
            .spawn(move || {
                for stream in rx.iter() {
                    let mut conn =
                        match Connection::new(stream, Arc::clone(&store), Arc::clone(&shutdown)) {
                            Ok(conn) => conn,
                            Err(e) => {
                                tracing::warn!("Failed to set up connection: {}", e);
                                continue;
                            }
                        };

                    if let Err(e) = conn.set_timeouts(read_ms, write_ms) {
                        tracing::warn!("Failed to set timeouts for {}: {}", conn.peer_addr(), e);
                        continue;
                    }

                    if let Err(e) = conn.handle() {
                        tracing::debug!("Connection {} ended with error: {}", conn.peer_addr(), e);
                    }
                }
            })?;

        Ok(handle)
    }
}
