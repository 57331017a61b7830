//! Row codec
//!
//! Fixed-width encode/decode on raw byte buffers. No quoting or escaping is
//! ever applied: `Company::validate` rejects every byte that would need it.

use bytes::{BufMut, BytesMut};

use crate::error::{DirError, Result};

use super::{Company, FIELD_DELIMITER, MAX_FIELD_SIZE, RECORD_SIZE, ROW_TERMINATOR};

/// Encode a record into exactly `RECORD_SIZE` bytes
///
/// This is the only path by which record data reaches the data file.
pub fn encode_row(company: &Company) -> Result<BytesMut> {
    company.validate()?;

    let mut row = BytesMut::with_capacity(RECORD_SIZE);
    row.put_slice(company.tax_id.as_bytes());

    for (_, value) in company.padded_fields() {
        row.put_u8(FIELD_DELIMITER);
        row.put_slice(value.as_bytes());
        row.put_bytes(b' ', MAX_FIELD_SIZE - value.len());
    }
    row.put_u8(ROW_TERMINATOR);

    debug_assert_eq!(row.len(), RECORD_SIZE);
    Ok(row)
}

/// Decode one `RECORD_SIZE`-byte row
pub fn decode_row(row: &[u8]) -> Result<Company> {
    if row.len() != RECORD_SIZE {
        return Err(DirError::Decode(format!(
            "row must be {} bytes, got {}",
            RECORD_SIZE,
            row.len()
        )));
    }

    let (body, terminator) = row.split_at(RECORD_SIZE - 1);
    if terminator[0] != ROW_TERMINATOR {
        return Err(DirError::Decode(format!(
            "row terminator missing: found 0x{:02x}",
            terminator[0]
        )));
    }

    let text = std::str::from_utf8(body)
        .map_err(|e| DirError::Decode(format!("row is not valid UTF-8: {}", e)))?;

    let fields: Vec<&str> = text.split(FIELD_DELIMITER as char).collect();
    Company::from_fields(&fields)
}
