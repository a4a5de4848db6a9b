use crate::runtime::Error;
use crate::runtime::Result;
use crate::SequenceCounter;

/// Largest payload the 8-bit length field can describe
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;
/// Size of the serialized header
pub const HEADER_LEN: usize = 4;
/// Largest serialized frame (header and payload)
pub const MAX_FRAME_LEN: usize = HEADER_LEN + MAX_PAYLOAD_LEN;

/// Frame header
///
/// On air the header occupies four bytes, multi-byte fields low byte first:
///
/// ```text
/// | length (1) | flags (1) | sequence lo (1) | sequence hi (1) |
/// ```
///
/// `length` counts payload bytes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of payload bytes
    pub length: u8,
    /// Header flags
    pub flags: u8,
    /// Sequence number
    pub sequence: u16,
}

impl Header {
    /// Serialize header
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let seq = self.sequence.to_le_bytes();
        [self.length, self.flags, seq[0], seq[1]]
    }

    /// Parse header from the start of `data`
    pub fn parse(data: &[u8]) -> Result<Header> {
        if data.len() < HEADER_LEN {
            return Err(Error::Truncated {
                needed: HEADER_LEN,
                available: data.len(),
            });
        }
        Ok(Header {
            length: data[0],
            flags: data[1],
            sequence: u16::from_le_bytes([data[2], data[3]]),
        })
    }
}

/// Header and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    header: Header,
    payload: Vec<u8>,
}

impl Frame {
    /// Header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Take the payload
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Serialized length, header included
    pub fn wire_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }

    /// Serialize header and payload
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_len());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse a serialized frame
    ///
    /// Bytes after the payload are ignored.
    pub fn parse(data: &[u8]) -> Result<Frame> {
        let header = Header::parse(data)?;
        let end = HEADER_LEN + header.length as usize;
        if data.len() < end {
            return Err(Error::MalformedFrame(format!(
                "length field says {} payload bytes, only {} present",
                header.length,
                data.len() - HEADER_LEN
            )));
        }
        Ok(Frame {
            header,
            payload: data[HEADER_LEN..end].to_vec(),
        })
    }
}

/// Wraps payload chunks into frames
///
/// Owns the sequence counter of the pipeline.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    flags: u8,
    sequence: SequenceCounter,
}

impl FrameAssembler {
    /// Create assembler with header flags and initial sequence number
    pub fn new(flags: u8, sequence: SequenceCounter) -> Self {
        Self { flags, sequence }
    }

    /// Sequence number of the next frame
    pub fn sequence(&self) -> u16 {
        self.sequence.current()
    }

    /// Build the next frame
    ///
    /// Advances the sequence counter once. Oversized chunks are rejected
    /// without touching the counter.
    pub fn assemble(&mut self, payload: &[u8]) -> Result<Frame> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::OversizedPayload {
                len: payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }

        let header = Header {
            length: payload.len() as u8,
            flags: self.flags,
            sequence: self.sequence.current(),
        };
        self.sequence.advance();

        Ok(Frame {
            header,
            payload: payload.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_wire_format() {
        let h = Header {
            length: 3,
            flags: 0xc0,
            sequence: 0x2269,
        };
        assert_eq!(h.to_bytes(), [0x03, 0xc0, 0x69, 0x22]);
        assert_eq!(Header::parse(&h.to_bytes()).unwrap(), h);
    }

    #[test]
    fn assemble_increments_sequence() {
        let mut a = FrameAssembler::new(0xc0, SequenceCounter::new(0x2269));
        let f1 = a.assemble(&[1, 2, 3]).unwrap();
        let f2 = a.assemble(&[1, 2, 3]).unwrap();

        assert_eq!(f1.header().sequence, 0x2269);
        assert_eq!(f2.header().sequence, 0x226a);
        assert_eq!(f1.header().length, 3);
        assert_eq!(f1.payload(), &[1, 2, 3]);
        assert_eq!(a.sequence(), 0x226b);
    }

    #[test]
    fn oversized_payload_keeps_counter() {
        let mut a = FrameAssembler::new(0, SequenceCounter::new(7));
        let err = a.assemble(&[0; 256]).unwrap_err();
        assert_eq!(err, Error::OversizedPayload { len: 256, max: 255 });
        assert_eq!(a.sequence(), 7);

        let f = a.assemble(&[0; 255]).unwrap();
        assert_eq!(f.header().sequence, 7);
        assert_eq!(f.header().length, 255);
    }

    #[test]
    fn empty_payload() {
        let mut a = FrameAssembler::new(0x40, SequenceCounter::new(0));
        let f = a.assemble(&[]).unwrap();
        assert_eq!(f.wire_len(), HEADER_LEN);
        assert_eq!(f.to_bytes(), vec![0x00, 0x40, 0x00, 0x00]);
    }

    #[test]
    fn parse_rejects_short_payload() {
        assert!(matches!(
            Frame::parse(&[5, 0, 0, 0, 1, 2]),
            Err(Error::MalformedFrame(_))
        ));
        assert!(matches!(
            Frame::parse(&[5, 0]),
            Err(Error::Truncated { needed: 4, available: 2 })
        ));
    }

    #[test]
    fn parse_ignores_trailing_bytes() {
        let f = Frame::parse(&[2, 0xc0, 1, 0, 0xaa, 0xbb, 0x0b, 0x0b]).unwrap();
        assert_eq!(f.payload(), &[0xaa, 0xbb]);
        assert_eq!(f.header().sequence, 1);
    }
}
