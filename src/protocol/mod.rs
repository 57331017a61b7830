//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: LIST   - Payload: empty
//! - 0x02: GET    - Payload: bincode KeySelector
//! - 0x03: ADD    - Payload: bincode Company
//! - 0x04: DELETE - Payload: bincode KeySelector
//! - 0x05: PING   - Payload: empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//! - 0x02: ERROR (server side)
//! - 0x03: BAD_REQUEST (caller side)

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType, KeySelector};
pub use response::{Response, Status};
pub use codec::{encode_command, decode_command, encode_response, decode_response};
pub use codec::{read_command, write_command, read_response, write_response};
pub use codec::{encode_payload, decode_payload, HEADER_SIZE, MAX_PAYLOAD_SIZE};
