//! Blocking client
//!
//! Speaks the wire protocol to a running server.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{DirError, Result};
use crate::protocol::{decode_payload, read_response, write_command, Command, KeySelector, Response, Status};
use crate::record::Company;

/// A single connection to a compdir server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        })
    }

    /// All records in file order
    pub fn list(&mut self) -> Result<Vec<Company>> {
        let payload = self.call_expecting_payload(&Command::List)?;
        decode_payload(&payload)
    }

    /// Fetch one record
    pub fn get(&mut self, selector: KeySelector) -> Result<Company> {
        let payload = self.call_expecting_payload(&Command::Get(selector))?;
        decode_payload(&payload)
    }

    /// Insert or update a record
    pub fn add(&mut self, company: Company) -> Result<()> {
        self.call(&Command::Add(company)).map(|_| ())
    }

    /// Delete one record
    pub fn delete(&mut self, selector: KeySelector) -> Result<()> {
        self.call(&Command::Delete(selector)).map(|_| ())
    }

    /// Health check
    pub fn ping(&mut self) -> Result<()> {
        match self.call(&Command::Ping)? {
            Some(payload) if payload == b"PONG" => Ok(()),
            other => Err(DirError::Protocol(format!(
                "unexpected PING reply: {:?}",
                other
            ))),
        }
    }

    /// Send a command and map the response status to a result
    fn call(&mut self, command: &Command) -> Result<Option<Vec<u8>>> {
        write_command(&mut self.writer, command)?;
        let response = read_response(&mut self.reader)?;
        Self::into_result(response)
    }

    fn call_expecting_payload(&mut self, command: &Command) -> Result<Vec<u8>> {
        self.call(command)?.ok_or_else(|| {
            DirError::Protocol(format!("{:?} reply carried no payload", command.command_type()))
        })
    }

    fn into_result(response: Response) -> Result<Option<Vec<u8>>> {
        match response.status {
            Status::Ok => Ok(response.payload),
            Status::NotFound => Err(DirError::NotFound),
            Status::BadRequest => Err(DirError::Rejected(response.message())),
            Status::Error => Err(DirError::Remote(response.message())),
        }
    }
}
