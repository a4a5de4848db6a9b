use crate::fec;
use crate::runtime::Result;
use crate::FecDecoder;
use crate::FecEncoder;
use crate::Whitener;

/// Line coding applied to a serialized frame
///
/// Whitening runs before FEC on transmit; [`revert`](Transform::revert)
/// undoes the stages in reverse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Frame bytes go out as they are
    Identity,
    /// PN9 whitening
    Whitened,
    /// Convolutional coding
    ForwardErrorCorrected,
    /// Whitening, then convolutional coding
    Both,
}

impl Transform {
    /// Pick the transform for the configured toggles
    pub fn new(fec: bool, whitening: bool) -> Self {
        match (fec, whitening) {
            (false, false) => Transform::Identity,
            (false, true) => Transform::Whitened,
            (true, false) => Transform::ForwardErrorCorrected,
            (true, true) => Transform::Both,
        }
    }

    /// Whitening enabled
    pub fn whitening(&self) -> bool {
        matches!(self, Transform::Whitened | Transform::Both)
    }

    /// FEC enabled
    pub fn fec(&self) -> bool {
        matches!(self, Transform::ForwardErrorCorrected | Transform::Both)
    }

    /// Size on air of an `n` byte frame
    pub fn encoded_len(&self, n: usize) -> usize {
        if self.fec() {
            fec::encoded_len(n)
        } else {
            n
        }
    }

    /// Encode frame bytes
    pub fn apply(&self, frame: Vec<u8>) -> Result<Vec<u8>> {
        let mut frame = frame;
        if self.whitening() {
            Whitener::new().apply(&mut frame);
        }
        if self.fec() {
            frame = FecEncoder::new().encode(&frame)?;
        }
        Ok(frame)
    }

    /// Decode received bytes
    ///
    /// With FEC the result also holds the trellis terminator; frame parsing
    /// ignores it.
    pub fn revert(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut frame = if self.fec() {
            FecDecoder::new().decode(data)?
        } else {
            data.to_vec()
        };
        if self.whitening() {
            Whitener::new().apply(&mut frame);
        }
        Ok(frame)
    }
}
