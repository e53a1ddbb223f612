//! Error types shared by the tables and the counting clients.

use std::collections::TryReserveError;

use thiserror::Error;

/// Process exit status for fatal conditions (`exit(-1)`).
pub const ERROR_STATUS: i32 = -1;

/// Result type alias for table and client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A table needs at least one bucket to address keys into.
    #[error("table capacity must be at least 1")]
    ZeroCapacity,

    /// Allocation of table storage failed.
    #[error("error allocating memory for {what}")]
    Alloc {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// Every slot of a probing counter is occupied and a new key arrived.
    #[error("probing counter is full: all {capacity} slots are occupied")]
    CapacityExhausted { capacity: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A token that should have been an integer was not.
    #[error("invalid integer token '{token}'")]
    InvalidInteger { token: String },
}

impl Error {
    pub(crate) fn alloc(what: &'static str, source: TryReserveError) -> Self {
        Error::Alloc { what, source }
    }
}
