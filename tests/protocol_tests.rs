//! Codec Tests
//!
//! Tests for command and response encoding/decoding.

use std::io::Cursor;

use compdir::protocol::{
    decode_command, decode_payload, decode_response, encode_command, encode_payload,
    encode_response, read_command, read_response, write_command, write_response, Command,
    CommandType, KeySelector, Response, Status, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
use compdir::{Company, DirError};

fn acme() -> Company {
    Company::new("123456789000", "Acme", "+7 495 000", "Moscow", "Ivan Petrov")
}

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_list() {
    let encoded = encode_command(&Command::List).unwrap();

    assert_eq!(encoded, vec![0x01, 0, 0, 0, 0]);
    assert_eq!(decode_command(&encoded).unwrap(), Command::List);
}

#[test]
fn test_encode_decode_add() {
    let cmd = Command::Add(acme());
    let encoded = encode_command(&cmd).unwrap();

    assert_eq!(encoded[0], CommandType::Add as u8);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_get_and_delete() {
    for cmd in [
        Command::Get(KeySelector::by_tax_id("123456789000")),
        Command::Delete(KeySelector::by_name("Acme")),
        Command::Delete(KeySelector::default()),
    ] {
        let encoded = encode_command(&cmd).unwrap();
        assert_eq!(decode_command(&encoded).unwrap(), cmd);
    }
}

#[test]
fn test_encode_decode_ping() {
    let encoded = encode_command(&Command::Ping).unwrap();
    assert_eq!(decode_command(&encoded).unwrap(), Command::Ping);
}

#[test]
fn test_header_length_matches_payload() {
    let encoded = encode_command(&Command::Add(acme())).unwrap();
    let payload_len = u32::from_be_bytes([encoded[1], encoded[2], encoded[3], encoded[4]]) as usize;

    assert_eq!(encoded.len(), HEADER_SIZE + payload_len);
}

#[test]
fn test_decode_incomplete_header() {
    let result = decode_command(&[0x01, 0x00]);
    assert!(matches!(result, Err(DirError::Protocol(_))));
}

#[test]
fn test_decode_incomplete_payload() {
    let encoded = encode_command(&Command::Add(acme())).unwrap();

    let result = decode_command(&encoded[..encoded.len() - 3]);
    assert!(matches!(result, Err(DirError::Protocol(_))));
}

#[test]
fn test_decode_unknown_command() {
    let result = decode_command(&[0x7F, 0, 0, 0, 0]);
    assert!(matches!(result, Err(DirError::Protocol(_))));
}

#[test]
fn test_decode_payload_too_large() {
    let len = (MAX_PAYLOAD_SIZE + 1).to_be_bytes();
    let result = decode_command(&[0x03, len[0], len[1], len[2], len[3]]);
    assert!(matches!(result, Err(DirError::Protocol(_))));
}

#[test]
fn test_decode_list_with_payload_rejected() {
    let result = decode_command(&[0x01, 0, 0, 0, 1, 0xAA]);
    assert!(matches!(result, Err(DirError::Protocol(_))));
}

#[test]
fn test_decode_malformed_add_payload() {
    let result = decode_command(&[0x03, 0, 0, 0, 2, 0xFF, 0xFF]);
    assert!(matches!(result, Err(DirError::Protocol(_))));
}

// =============================================================================
// Response Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_ok_response() {
    let response = Response::ok(Some(b"PONG".to_vec()));
    let decoded = decode_response(&encode_response(&response)).unwrap();

    assert_eq!(decoded, response);
}

#[test]
fn test_encode_decode_empty_ok_response() {
    let decoded = decode_response(&encode_response(&Response::ok(None))).unwrap();

    assert_eq!(decoded.status, Status::Ok);
    assert!(decoded.payload.is_none());
}

#[test]
fn test_encode_decode_error_statuses() {
    for response in [
        Response::not_found(),
        Response::error("disk on fire"),
        Response::bad_request("tax id must be 12 digits"),
    ] {
        let decoded = decode_response(&encode_response(&response)).unwrap();
        assert_eq!(decoded, response);
    }
}

#[test]
fn test_decode_unknown_status() {
    let result = decode_response(&[0x09, 0, 0, 0, 0]);
    assert!(matches!(result, Err(DirError::Protocol(_))));
}

#[test]
fn test_list_payload_round_trip() {
    let companies = vec![acme(), Company::new("123456789001", "Globex", "", "", "")];

    let payload = encode_payload(&companies).unwrap();
    let decoded: Vec<Company> = decode_payload(&payload).unwrap();

    assert_eq!(decoded, companies);
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[test]
fn test_response_from_error() {
    assert_eq!(Response::from_error(&DirError::NotFound).status, Status::NotFound);
    assert_eq!(Response::from_error(&DirError::MissingKey).status, Status::BadRequest);
    assert_eq!(
        Response::from_error(&DirError::Validation("bad".into())).status,
        Status::BadRequest
    );
    assert_eq!(
        Response::from_error(&DirError::DuplicateName("Acme".into())).status,
        Status::BadRequest
    );
    assert_eq!(Response::from_error(&DirError::Decode("bad".into())).status, Status::Error);
    assert_eq!(Response::from_error(&DirError::Closed).status, Status::Error);

    let response = Response::from_error(&DirError::MissingKey);
    assert_eq!(response.message(), "Missing tax id or name");
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_command_sequence() {
    let mut buffer = Vec::new();
    write_command(&mut buffer, &Command::Add(acme())).unwrap();
    write_command(&mut buffer, &Command::List).unwrap();
    write_command(&mut buffer, &Command::Delete(KeySelector::by_tax_id("123456789000"))).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_command(&mut cursor).unwrap(), Command::Add(acme()));
    assert_eq!(read_command(&mut cursor).unwrap(), Command::List);
    assert_eq!(
        read_command(&mut cursor).unwrap(),
        Command::Delete(KeySelector::by_tax_id("123456789000"))
    );

    // Stream exhausted
    assert!(matches!(read_command(&mut cursor), Err(DirError::Io(_))));
}

#[test]
fn test_stream_response() {
    let mut buffer = Vec::new();
    write_response(&mut buffer, &Response::bad_request("nope")).unwrap();

    let response = read_response(&mut Cursor::new(buffer)).unwrap();
    assert_eq!(response.status, Status::BadRequest);
    assert_eq!(response.message(), "nope");
}
