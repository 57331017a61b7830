//! Storage Module
//!
//! Persistent storage layer: one fixed-width row file plus its index.
//!
//! ## Responsibilities
//! - Append, overwrite and swap-compact rows by offset arithmetic
//! - Keep the index in lockstep with the file
//! - Rebuild the index (and repair torn tails) on open
//!
//! ## File Layout
//! ```text
//! offset 0           417          834               n*417
//! ┌────────────────┬────────────┬─────┬────────────┐
//! │ row 0          │ row 1      │ ... │ row n-1    │
//! └────────────────┴────────────┴─────┴────────────┘
//! ```
//! No header, no gaps: file length is always `n * RECORD_SIZE`.

mod backing;
mod recovery;
mod store;

pub use backing::Backing;
pub use recovery::{rebuild_index, RecoveryReport};
pub use store::Store;
