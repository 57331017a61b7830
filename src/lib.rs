//! # compdir
//!
//! A company directory kept in a single fixed-width flat file:
//! - Fixed 417-byte rows, addressed by offset arithmetic
//! - In-memory dual index (tax id and name → row offset)
//! - Swap-with-last compaction on delete (O(1) I/O per delete)
//! - Full-scan index rebuild and torn-tail repair on open
//! - TCP-based request protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │             (worker pool, many clients)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Arc<Store>
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Store                                   │
//! │          (one Mutex around every operation)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Index    │          │   Backing   │
//!   │ tax id/name │          │ (row file)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ Record Codec│
//!                           │ (417 bytes) │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod index;
pub mod storage;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DirError, Result};
pub use config::{Config, SyncStrategy};
pub use record::{Company, RECORD_SIZE};
pub use index::Index;
pub use storage::{Backing, RecoveryReport, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of compdir
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
