#![warn(missing_docs)]

//! OpenLST encoder and framer.
//!
//! Turns a byte stream into radio transmit units for the OpenLST link:
//!
//! ```text
//! | preamble | sync word(s) | length | flags | seq lo | seq hi | payload |
//! ```
//!
//! The frame (header and payload) is optionally PN9 whitened and then
//! optionally protected by the CC1110 rate 1/2 convolutional code. The
//! [`Decoder`] inverts the whole chain.
//!
//! ## Example
//! ```
//! use openlst::Decoder;
//! use openlst::Encoder;
//! use openlst::FramerConfig;
//!
//! let config = FramerConfig::builder().sequence_seed(0x2269).build().unwrap();
//! let mut encoder = Encoder::new(config);
//! let unit = encoder.encode(&[0x01, 0x02, 0x03]).unwrap();
//!
//! let (frame, _) = Decoder::new(config).decode(&unit).unwrap();
//! assert_eq!(frame.payload(), &[0x01, 0x02, 0x03]);
//! assert_eq!(frame.header().sequence, 0x2269);
//! ```

/// Logging macro
#[macro_use]
pub extern crate tracing;

pub mod blocks;
pub mod runtime;

pub mod fec;
pub use fec::FecDecoder;
pub use fec::FecEncoder;

mod decoder;
pub use decoder::Decoder;

mod encoder;
pub use encoder::Encoder;

mod frame;
pub use frame::Frame;
pub use frame::FrameAssembler;
pub use frame::Header;
pub use frame::HEADER_LEN;
pub use frame::MAX_FRAME_LEN;
pub use frame::MAX_PAYLOAD_LEN;

mod framer_config;
pub use framer_config::parse_byte;
pub use framer_config::FramerConfig;
pub use framer_config::FramerConfigBuilder;

mod preamble;
pub use preamble::SyncInserter;
pub use preamble::PREAMBLE_BYTE;

mod sequence;
pub use sequence::SequenceCounter;

mod transform;
pub use transform::Transform;

mod whitening;
pub use whitening::Whitener;
