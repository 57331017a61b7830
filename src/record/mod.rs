//! Record Module
//!
//! The `Company` record and its fixed-width row layout.
//!
//! ## Row Format
//! ```text
//! ┌──────────┬───┬───────────┬───┬───────────┬───┬───────────┬───┬───────────┬────┐
//! │TaxId (12)│ , │ Name (100)│ , │Phone (100)│ , │ Addr (100)│ , │ Repr (100)│ \n │
//! └──────────┴───┴───────────┴───┴───────────┴───┴───────────┴───┴───────────┴────┘
//! ```
//!
//! Every non-key field is right-padded with spaces, so each row is exactly
//! `RECORD_SIZE` bytes and row `i` always starts at `i * RECORD_SIZE`.

mod codec;

use serde::{Deserialize, Serialize};

use crate::error::{DirError, Result};

pub use codec::{decode_row, encode_row};

/// Length of the tax id field (exact)
pub const TAX_ID_LEN: usize = 12;

/// Maximum byte length of every non-key field
pub const MAX_FIELD_SIZE: usize = 100;

/// Number of fields in a row
pub const FIELD_COUNT: usize = 5;

/// Field delimiter
pub const FIELD_DELIMITER: u8 = b',';

/// Row terminator
pub const ROW_TERMINATOR: u8 = b'\n';

/// Bytes that would break the fixed row width if a field contained them
const FORBIDDEN_BYTES: &[u8] = &[FIELD_DELIMITER, b'"', b'\r', ROW_TERMINATOR];

/// Total row length: key + 4 padded fields + 4 delimiters + terminator
pub const RECORD_SIZE: usize = TAX_ID_LEN + MAX_FIELD_SIZE * 4 + FIELD_COUNT;

/// A single directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// 12-digit taxpayer identification number (primary key)
    pub tax_id: String,

    /// Company name (unique secondary key)
    pub name: String,

    pub phone: String,

    pub address: String,

    /// Name of the company's representative
    pub representative: String,
}

impl Company {
    pub fn new(
        tax_id: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        representative: impl Into<String>,
    ) -> Self {
        Self {
            tax_id: tax_id.into(),
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
            representative: representative.into(),
        }
    }

    /// Check the size and content rules every stored row depends on
    pub fn validate(&self) -> Result<()> {
        if self.tax_id.len() != TAX_ID_LEN {
            return Err(DirError::Validation(format!(
                "tax id must be {} digits, got {} bytes",
                TAX_ID_LEN,
                self.tax_id.len()
            )));
        }
        if !self.tax_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DirError::Validation(format!(
                "tax id must be numeric: {:?}",
                self.tax_id
            )));
        }

        for (label, value) in self.padded_fields() {
            if value.len() > MAX_FIELD_SIZE {
                return Err(DirError::Validation(format!(
                    "{} exceeds {} bytes ({} bytes)",
                    label,
                    MAX_FIELD_SIZE,
                    value.len()
                )));
            }
        }

        for (label, value) in self.all_fields() {
            if let Some(b) = value.bytes().find(|b| FORBIDDEN_BYTES.contains(b)) {
                return Err(DirError::Validation(format!(
                    "{} contains forbidden character {:?}",
                    label, b as char
                )));
            }
        }

        Ok(())
    }

    /// Build a record from the five split fields of a row
    ///
    /// Padding is trimmed from the non-key fields and the result is
    /// re-validated, so a hand-edited or corrupted file cannot smuggle in
    /// an invalid record.
    pub fn from_fields(fields: &[&str]) -> Result<Self> {
        if fields.len() != FIELD_COUNT {
            return Err(DirError::Decode(format!(
                "wrong number of fields: expected {}, got {}",
                FIELD_COUNT,
                fields.len()
            )));
        }

        let company = Self {
            tax_id: fields[0].to_string(),
            name: fields[1].trim_end_matches(' ').to_string(),
            phone: fields[2].trim_end_matches(' ').to_string(),
            address: fields[3].trim_end_matches(' ').to_string(),
            representative: fields[4].trim_end_matches(' ').to_string(),
        };

        company.validate().map_err(|e| match e {
            DirError::Validation(msg) => DirError::Decode(format!("invalid stored row: {}", msg)),
            other => other,
        })?;

        Ok(company)
    }

    /// The four space-padded fields, in row order
    fn padded_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("name", self.name.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
            ("representative", self.representative.as_str()),
        ]
    }

    fn all_fields(&self) -> [(&'static str, &str); 5] {
        let [name, phone, address, representative] = self.padded_fields();
        [("tax id", self.tax_id.as_str()), name, phone, address, representative]
    }
}
