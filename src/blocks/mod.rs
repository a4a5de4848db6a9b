//! ## Blocks
//!
//! | Block | Usage |
//! |---|---|
//! | [Framer] | Encode and frame a byte stream into OpenLST transmit units. |
mod framer;
pub use framer::Framer;
