//! Record Store
//!
//! The directory itself: fixed-width rows in one backing byte store, found
//! through the in-memory index.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, SeekFrom};
use std::path::Path;

use parking_lot::Mutex;

use crate::config::{Config, SyncStrategy};
use crate::error::{DirError, Result};
use crate::index::Index;
use crate::record::{decode_row, encode_row, Company, RECORD_SIZE};

use super::recovery::{rebuild_index, RecoveryReport};
use super::Backing;

/// Row size as a file offset
const ROW: u64 = RECORD_SIZE as u64;

/// The company directory store
///
/// ## Concurrency Model: one lock, whole operations
///
/// Every public operation holds `inner` for its entire
/// seek/read/write/truncate/index-update sequence. Delete can move any other
/// record's row, so no finer-grained locking is safe.
///
/// ## Lifecycle
/// `inner` is `None` once the store is closed; every later call returns
/// `DirError::Closed`.
pub struct Store<B: Backing = File> {
    inner: Mutex<Option<Inner<B>>>,
    sync_strategy: SyncStrategy,
    recovery: RecoveryReport,
}

/// State guarded by the store lock
struct Inner<B> {
    file: B,
    index: Index,
}

impl Store<File> {
    /// Open or create a data file, syncing after every write
    pub fn open(path: impl AsRef<Path>, truncate: bool) -> Result<Self> {
        Self::open_file(path.as_ref(), truncate, SyncStrategy::EveryWrite)
    }

    /// Open the data file named by `config`
    pub fn open_with_config(config: &Config) -> Result<Self> {
        Self::open_file(&config.data_file, config.truncate_on_open, config.sync_strategy)
    }

    fn open_file(path: &Path, truncate: bool, sync_strategy: SyncStrategy) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(truncate)
            .open(path)?;

        tracing::info!("Opening data file {} (truncate={})", path.display(), truncate);
        Self::with_backing(file, truncate, sync_strategy)
    }
}

impl<B: Backing> Store<B> {
    /// Build a store over any backing byte store
    ///
    /// With `truncate` set the backing store is emptied; otherwise the index
    /// is rebuilt by scanning every row (see `rebuild_index`).
    pub fn with_backing(mut file: B, truncate: bool, sync_strategy: SyncStrategy) -> Result<Self> {
        let (index, recovery) = if truncate {
            file.truncate(0)?;
            (Index::new(), RecoveryReport::default())
        } else {
            rebuild_index(&mut file, true)?
        };

        if recovery.repaired() {
            tracing::warn!(
                "Data file repaired on open: {} torn bytes, {} stale rows dropped",
                recovery.torn_bytes,
                recovery.stale_rows_dropped
            );
        }
        tracing::info!("Store ready with {} records", index.len());

        Ok(Self {
            inner: Mutex::new(Some(Inner { file, index })),
            sync_strategy,
            recovery,
        })
    }

    /// Insert a record, or overwrite the record with the same tax id
    ///
    /// An update keeps the row at its offset; an insert appends at
    /// `RECORD_SIZE * len`. A name already owned by a different record is
    /// rejected with `DuplicateName`.
    pub fn add(&self, company: &Company) -> Result<()> {
        let row = encode_row(company)?;
        let sync_strategy = self.sync_strategy;

        self.with_inner(|inner| {
            let existing = inner.index.offset_of_tax_id(&company.tax_id);

            if let Some(owner) = inner.index.offset_of_name(&company.name) {
                if existing != Some(owner) {
                    return Err(DirError::DuplicateName(company.name.clone()));
                }
            }

            match existing {
                Some(offset) => {
                    let previous = inner.read_record(offset)?;
                    if previous.tax_id != company.tax_id {
                        return Err(DirError::Corrupt(format!(
                            "index points {} at offset {} holding {}",
                            company.tax_id, offset, previous.tax_id
                        )));
                    }

                    inner.write_row(offset, &row)?;
                    inner.index.remove(&previous.tax_id, &previous.name);
                    inner.index.put(&company.tax_id, &company.name, offset);
                    tracing::debug!("Updated {} at offset {}", company.tax_id, offset);
                }
                None => {
                    let offset = inner.end_offset();
                    inner.write_row(offset, &row)?;
                    inner.index.put(&company.tax_id, &company.name, offset);
                    tracing::debug!("Appended {} at offset {}", company.tax_id, offset);
                }
            }

            inner.finish_write(sync_strategy)
        })
    }

    /// Fetch one record by tax id, or by name when no tax id is given
    pub fn get(&self, tax_id: Option<&str>, name: Option<&str>) -> Result<Company> {
        self.with_inner(|inner| {
            let offset = inner.index.lookup(tax_id, name)?;
            inner.read_record(offset)
        })
    }

    /// Remove a record by tax id, or by name when no tax id is given
    ///
    /// Swap-with-last compaction:
    /// 1. Copy the last row over the target row (unless the target is last)
    /// 2. Truncate the file by one row
    /// 3. Repoint the moved record's index entries at the target offset
    /// 4. Drop the target's index entries
    ///
    /// The index only changes once the file has been cut. If the truncate
    /// fails the target row is written back, so both are left as they were.
    ///
    /// Returns the removed record. Record order is not preserved.
    pub fn delete(&self, tax_id: Option<&str>, name: Option<&str>) -> Result<Company> {
        let sync_strategy = self.sync_strategy;

        self.with_inner(|inner| {
            let offset = inner.index.lookup(tax_id, name)?;
            let target_row = inner.read_row(offset)?;
            let target = decode_row(&target_row)?;
            let last_offset = inner.end_offset() - ROW;

            if offset != last_offset {
                let last_row = inner.read_row(last_offset)?;
                let last = decode_row(&last_row)?;

                inner.write_row(offset, &last_row)?;
                if let Err(e) = inner.file.truncate(last_offset) {
                    tracing::warn!("Truncate failed, restoring {}: {}", target.tax_id, e);
                    inner.write_row(offset, &target_row)?;
                    return Err(e.into());
                }

                inner.index.remove(&target.tax_id, &target.name);
                inner.index.put(&last.tax_id, &last.name, offset);
                tracing::debug!(
                    "Moved {} from offset {} to {}",
                    last.tax_id,
                    last_offset,
                    offset
                );
            } else {
                inner.file.truncate(last_offset)?;
                inner.index.remove(&target.tax_id, &target.name);
            }

            inner.finish_write(sync_strategy)?;

            tracing::debug!("Deleted {} from offset {}", target.tax_id, offset);
            Ok(target)
        })
    }

    /// All records in file order
    ///
    /// After deletes, file order is swap order, not insertion order. A row
    /// that fails to decode aborts the whole listing.
    pub fn list(&self) -> Result<Vec<Company>> {
        self.with_inner(|inner| {
            let len = inner.file.len()?;
            if len % ROW != 0 {
                return Err(DirError::Decode(format!(
                    "file length {} is not a multiple of {}",
                    len, ROW
                )));
            }

            let count = (len / ROW) as usize;
            let mut companies = Vec::with_capacity(count);
            let mut row = [0u8; RECORD_SIZE];

            inner.file.seek(SeekFrom::Start(0))?;
            let mut reader = BufReader::new(&mut inner.file);
            for _ in 0..count {
                reader.read_exact(&mut row)?;
                companies.push(decode_row(&row)?);
            }

            Ok(companies)
        })
    }

    /// Flush, sync and release the backing store
    ///
    /// Waits for any in-flight operation to finish first.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        let mut inner = guard.take().ok_or(DirError::Closed)?;

        inner.file.flush()?;
        inner.file.sync()?;

        tracing::info!("Store closed with {} records", inner.index.len());
        Ok(())
    }

    /// Rescan the file and check the live index against it
    ///
    /// Never modifies the file.
    pub fn verify(&self) -> Result<()> {
        self.with_inner(|inner| {
            let (fresh, _) = rebuild_index(&mut inner.file, false)?;
            if fresh != inner.index {
                return Err(DirError::Corrupt(
                    "index out of sync with data file".to_string(),
                ));
            }
            Ok(())
        })
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of live records
    pub fn len(&self) -> Result<usize> {
        self.with_inner(|inner| Ok(inner.index.len()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.with_inner(|inner| Ok(inner.index.is_empty()))
    }

    /// Current length of the backing store in bytes
    pub fn file_len(&self) -> Result<u64> {
        self.with_inner(|inner| Ok(inner.file.len()?))
    }

    /// A copy of the live index
    pub fn index(&self) -> Result<Index> {
        self.with_inner(|inner| Ok(inner.index.clone()))
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().is_none()
    }

    /// What the open-time scan found and repaired
    pub fn recovery_report(&self) -> RecoveryReport {
        self.recovery
    }

    pub fn sync_strategy(&self) -> SyncStrategy {
        self.sync_strategy
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Run `f` under the store lock, failing if the store is closed
    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner<B>) -> Result<T>) -> Result<T> {
        let mut guard = self.inner.lock();
        let inner = guard.as_mut().ok_or(DirError::Closed)?;
        f(inner)
    }
}

impl<B: Backing> Inner<B> {
    /// Offset one past the last live row
    fn end_offset(&self) -> u64 {
        self.index.len() as u64 * ROW
    }

    fn read_row(&mut self, offset: u64) -> Result<[u8; RECORD_SIZE]> {
        let mut row = [0u8; RECORD_SIZE];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut row)?;
        Ok(row)
    }

    fn read_record(&mut self, offset: u64) -> Result<Company> {
        let row = self.read_row(offset)?;
        decode_row(&row)
    }

    fn write_row(&mut self, offset: u64, row: &[u8]) -> Result<()> {
        debug_assert_eq!(row.len(), RECORD_SIZE);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(row)?;
        self.file.flush()?;
        Ok(())
    }

    fn finish_write(&mut self, sync_strategy: SyncStrategy) -> Result<()> {
        if sync_strategy == SyncStrategy::EveryWrite {
            self.file.sync()?;
        }
        Ok(())
    }
}

impl<B: Backing> Drop for Store<B> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.get_mut().as_mut() {
            let result = inner.file.flush().and_then(|_| inner.file.sync());
            if let Err(e) = result {
                tracing::warn!("Failed to sync data file on drop: {}", e);
            }
        }
    }
}
