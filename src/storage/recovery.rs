//! Index rebuild
//!
//! Reconstructs the in-memory index by scanning the data file on open.

use std::io::{BufReader, Read, SeekFrom};

use crate::error::{DirError, Result};
use crate::index::Index;
use crate::record::{decode_row, Company, RECORD_SIZE};

use super::Backing;

/// Result of rebuilding the index from a data file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Number of live records found
    pub records_indexed: u64,

    /// Bytes of a partial trailing row that were cut off
    pub torn_bytes: u64,

    /// Duplicate trailing rows left by an interrupted delete that were cut off
    pub stale_rows_dropped: u64,
}

impl RecoveryReport {
    /// Whether the scan had to modify the file
    pub fn repaired(&self) -> bool {
        self.torn_bytes > 0 || self.stale_rows_dropped > 0
    }
}

/// Scan every row from offset 0 and index it at its observed offset
///
/// This will:
/// 1. Truncate a partial row at the end (interrupted append)
/// 2. Decode and index every whole row
/// 3. Truncate a last row that repeats an earlier record (a delete that
///    relocated the last row but never truncated)
///
/// Any other duplicate key, or any row that fails to decode, aborts the open.
/// With `repair` off the file is never modified and steps 1 and 3 report
/// `Corrupt` instead.
pub fn rebuild_index<B: Backing>(file: &mut B, repair: bool) -> Result<(Index, RecoveryReport)> {
    let mut report = RecoveryReport::default();
    let row_size = RECORD_SIZE as u64;

    let mut len = file.len()?;
    let torn = len % row_size;
    if torn != 0 {
        if !repair {
            return Err(DirError::Corrupt(format!(
                "file length {} is not a multiple of {}",
                len, row_size
            )));
        }
        tracing::warn!("Truncating {} bytes of a partial trailing row", torn);
        len -= torn;
        file.truncate(len)?;
        report.torn_bytes = torn;
    }

    let row_count = len / row_size;
    let mut index = Index::new();
    let mut stale: Option<(u64, Company)> = None;

    file.seek(SeekFrom::Start(0))?;
    {
        let mut reader = BufReader::new(&mut *file);
        let mut row = [0u8; RECORD_SIZE];

        for i in 0..row_count {
            let offset = i * row_size;
            reader.read_exact(&mut row)?;

            let company = decode_row(&row).map_err(|e| match e {
                DirError::Decode(msg) => {
                    DirError::Decode(format!("row at offset {}: {}", offset, msg))
                }
                other => other,
            })?;

            if let Some(earlier) = index.offset_of_tax_id(&company.tax_id) {
                if i + 1 == row_count {
                    stale = Some((earlier, company));
                    break;
                }
                return Err(DirError::Corrupt(format!(
                    "tax id {} stored at offsets {} and {}",
                    company.tax_id, earlier, offset
                )));
            }

            if let Some(earlier) = index.offset_of_name(&company.name) {
                return Err(DirError::Corrupt(format!(
                    "name {:?} stored at offsets {} and {}",
                    company.name, earlier, offset
                )));
            }

            index.put(&company.tax_id, &company.name, offset);
        }
    }

    if let Some((earlier, last)) = stale {
        let mut row = [0u8; RECORD_SIZE];
        file.seek(SeekFrom::Start(earlier))?;
        file.read_exact(&mut row)?;

        if decode_row(&row)? != last {
            return Err(DirError::Corrupt(format!(
                "tax id {} stored at offsets {} and {} with different contents",
                last.tax_id,
                earlier,
                len - row_size
            )));
        }

        if !repair {
            return Err(DirError::Corrupt(format!(
                "stale copy of {} at offset {}",
                last.tax_id,
                len - row_size
            )));
        }

        tracing::warn!(
            "Dropping stale copy of {} left at offset {} by an interrupted delete",
            last.tax_id,
            len - row_size
        );
        file.truncate(len - row_size)?;
        report.stale_rows_dropped = 1;
    }

    report.records_indexed = index.len() as u64;
    Ok((index, report))
}
