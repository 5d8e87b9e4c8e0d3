//! Unified error types for the aldus library.
//!
//! Parse-time structural problems abort the whole decode; playback-time
//! anomalies are reported per record through [`crate::playback::PlaybackWarning`]
//! and only the conditions below end a replay early.

use thiserror::Error;

/// Main error type for aldus operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended in the middle of a header or record
    #[error("Truncated input: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Structurally invalid data
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A record declared an impossible size field
    #[error("Invalid record size {size} at offset {offset}")]
    InvalidRecordSize { size: u32, offset: usize },

    /// GDI handle outside the object table
    #[error("GDI handle {handle} out of range (table size {table_size})")]
    HandleOutOfRange { handle: usize, table_size: usize },

    /// RESTOREDC played back with no matching SAVEDC
    #[error("RESTOREDC with no saved device context state")]
    StateStackUnderflow,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for aldus operations.
pub type Result<T> = std::result::Result<T, Error>;
