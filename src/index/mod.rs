//! Index Module
//!
//! In-memory maps from both record keys to the byte offset of the record's row.
//!
//! ## Responsibilities
//! - Resolve a tax id or, failing that, a name to a row offset
//! - Track both keys of every live record in lockstep
//!
//! The index performs no I/O. Keeping both maps pointing at the same offset
//! for every live record is the caller's job (see `Store`).

use std::collections::HashMap;

use crate::error::{DirError, Result};

/// Dual key → offset index over live rows
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Index {
    by_tax_id: HashMap<String, u64>,
    by_name: HashMap<String, u64>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a row offset
    ///
    /// A tax id takes precedence; the name is only consulted when no tax id
    /// is given. Empty strings count as "not given".
    pub fn lookup(&self, tax_id: Option<&str>, name: Option<&str>) -> Result<u64> {
        let tax_id = tax_id.filter(|k| !k.is_empty());
        let name = name.filter(|n| !n.is_empty());

        let found = match (tax_id, name) {
            (Some(tax_id), _) => self.by_tax_id.get(tax_id),
            (None, Some(name)) => self.by_name.get(name),
            (None, None) => return Err(DirError::MissingKey),
        };

        found.copied().ok_or(DirError::NotFound)
    }

    /// Point both keys at `offset`
    ///
    /// An empty name is not indexed.
    pub fn put(&mut self, tax_id: &str, name: &str, offset: u64) {
        self.by_tax_id.insert(tax_id.to_string(), offset);
        if !name.is_empty() {
            self.by_name.insert(name.to_string(), offset);
        }
    }

    /// Drop both keys of a record
    ///
    /// The name entry is only removed while it still points at the same row
    /// as the tax id entry.
    pub fn remove(&mut self, tax_id: &str, name: &str) {
        let Some(offset) = self.by_tax_id.remove(tax_id) else {
            return;
        };
        if self.by_name.get(name) == Some(&offset) {
            self.by_name.remove(name);
        }
    }

    /// Offset of the row holding `tax_id`, if any
    pub fn offset_of_tax_id(&self, tax_id: &str) -> Option<u64> {
        self.by_tax_id.get(tax_id).copied()
    }

    /// Offset of the row holding `name`, if any
    pub fn offset_of_name(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).copied()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.by_tax_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tax_id.is_empty()
    }

    /// All indexed row offsets, ascending
    pub fn offsets(&self) -> Vec<u64> {
        let mut offsets: Vec<u64> = self.by_tax_id.values().copied().collect();
        offsets.sort_unstable();
        offsets
    }

    pub fn clear(&mut self) {
        self.by_tax_id.clear();
        self.by_name.clear();
    }
}
