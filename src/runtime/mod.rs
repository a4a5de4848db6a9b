//! ## Block Runtime
//!
//! The small part of a streaming runtime that the OpenLST blocks need: the
//! [`Kernel`] interface, stream buffers, configuration, logging and a
//! [`Mocker`](mocker::Mocker) to drive blocks without a scheduler.
use std::result;
use thiserror::Error;

pub mod buffer;
pub mod config;
mod kernel;
mod logging;
pub mod mocker;
mod tag;

pub use kernel::BlockMeta;
pub use kernel::Kernel;
pub use kernel::WorkIo;
pub use tag::ItemTag;
pub use tag::Tag;

/// Initialize runtime
///
/// Installs the logger. Calling it more than once is fine.
pub fn init() {
    logging::init();
}

/// Result type of the OpenLST pipeline
pub type Result<T, E = Error> = result::Result<T, E>;

/// OpenLST Error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or contradictory configuration, only raised at construction.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Input chunk does not fit into the length field of the header.
    #[error("Payload of {len} bytes exceeds maximum of {max} bytes")]
    OversizedPayload {
        /// Length of the rejected chunk
        len: usize,
        /// Largest representable payload
        max: usize,
    },
    /// Data reaching the FEC stage that cannot be a frame body.
    #[error("Invalid encoder input: {0}")]
    InvalidEncoderInput(String),
    /// No sync section found in received bytes.
    #[error("Sync word not found")]
    SyncNotFound,
    /// Received bytes end before the frame does.
    #[error("Truncated frame: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes required to decode the frame
        needed: usize,
        /// Bytes available
        available: usize,
    },
    /// Header and payload do not agree.
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
}
