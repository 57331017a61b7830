//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{DirError, Result};
use crate::protocol::{encode_payload, read_command, write_response, Command, Response};
use crate::storage::Store;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared record store
    store: Arc<Store>,

    /// Set once the server stops taking requests
    shutdown: Arc<AtomicBool>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O
    pub fn new(stream: TcpStream, store: Arc<Store>, shutdown: Arc<AtomicBool>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            store,
            shutdown,
            peer_addr,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads commands in a loop and sends responses. Returns when the client
    /// disconnects, an error occurs, or the server is shutting down. A request
    /// that has been read is always answered before the shutdown flag is
    /// checked again.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::debug!("Closing {} for shutdown", self.peer_addr);
                return Ok(());
            }

            let command = match read_command(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(DirError::Io(ref e)) => {
                    use std::io::ErrorKind::*;
                    match e.kind() {
                        UnexpectedEof | ConnectionReset | ConnectionAborted => {
                            tracing::debug!("Client {} disconnected", self.peer_addr);
                        }
                        // Windows reports read timeouts as TimedOut
                        WouldBlock | TimedOut => {
                            tracing::debug!("Read timeout for client {}", self.peer_addr);
                        }
                        _ => tracing::warn!("Error reading from {}: {}", self.peer_addr, e),
                    }
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Bad request from {}: {}", self.peer_addr, e);
                    let _ = self.send_response(Response::from_error(&e));
                    return Err(e);
                }
            };

            tracing::trace!("Received command from {}: {:?}", self.peer_addr, command);

            let response = self.execute_command(command);

            if let Err(e) = self.send_response(response) {
                if let DirError::Io(ref io_err) = e {
                    match io_err.kind() {
                        std::io::ErrorKind::ConnectionAborted
                        | std::io::ErrorKind::ConnectionReset
                        | std::io::ErrorKind::BrokenPipe => {
                            tracing::debug!(
                                "Client {} disconnected before response could be sent: {}",
                                self.peer_addr,
                                e
                            );
                            return Ok(());
                        }
                        _ => {}
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Execute a command against the store and build the response
    fn execute_command(&self, command: Command) -> Response {
        let result = match command {
            Command::List => self
                .store
                .list()
                .and_then(|companies| encode_payload(&companies))
                .map(Some),
            Command::Get(selector) => self
                .store
                .get(selector.tax_id(), selector.name())
                .and_then(|company| encode_payload(&company))
                .map(Some),
            Command::Add(company) => self.store.add(&company).map(|_| None),
            Command::Delete(selector) => self
                .store
                .delete(selector.tax_id(), selector.name())
                .map(|_| None),
            Command::Ping => Ok(Some(b"PONG".to_vec())),
        };

        match result {
            Ok(payload) => Response::ok(payload),
            Err(e) => {
                if e.is_client_error() {
                    tracing::debug!("Request from {} rejected: {}", self.peer_addr, e);
                } else {
                    tracing::error!("Request from {} failed: {}", self.peer_addr, e);
                }
                Response::from_error(&e)
            }
        }
    }

    /// Send a response to the client
    fn send_response(&mut self, response: Response) -> Result<()> {
        write_response(&mut self.writer, &response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
