//! Backing byte store
//!
//! The capabilities the store needs from whatever holds its rows.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};

/// Random-access byte store that can also shrink and sync
///
/// Implemented for `File` (the real data file) and for `Cursor<Vec<u8>>`
/// (an in-memory store for tests and tools).
pub trait Backing: Read + Write + Seek + Send {
    /// Cut the store down to `len` bytes
    fn truncate(&mut self, len: u64) -> io::Result<()>;

    /// Force everything written so far to durable storage
    fn sync(&mut self) -> io::Result<()>;

    /// Current length in bytes
    fn len(&mut self) -> io::Result<u64>;

    fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Backing for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl Backing for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.get_mut().truncate(len as usize);
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn len(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }
}
