use crate::runtime::Error;
use crate::runtime::Result;
use crate::Frame;
use crate::FramerConfig;
use crate::Transform;
use crate::HEADER_LEN;

// coded bytes decoded to read the length field, FEC blocks come in fours
const FEC_PROBE_LEN: usize = 16;

/// Receive side of the [`Encoder`](crate::Encoder)
///
/// Finds the sync section, reverts FEC and whitening, and parses the frame.
/// Has to be configured like the transmitter.
#[derive(Debug, Clone)]
pub struct Decoder {
    config: FramerConfig,
    transform: Transform,
    sync: Vec<u8>,
}

impl Decoder {
    /// Create decoder
    pub fn new(config: FramerConfig) -> Self {
        Self {
            config,
            transform: config.transform(),
            sync: config.sync_inserter().sync_section(),
        }
    }

    /// Decode the first transmit unit in `data`
    ///
    /// Returns the frame and the offset just past the unit, so that a stream
    /// of concatenated units can be walked.
    pub fn decode(&self, data: &[u8]) -> Result<(Frame, usize)> {
        let start = self.body_start(data)?;
        let body = &data[start..];
        let coded_len = self.coded_len(body).map_err(|e| match e {
            Error::Truncated { needed, .. } => Error::Truncated {
                needed: start + needed,
                available: data.len(),
            },
            e => e,
        })?;

        if body.len() < coded_len {
            return Err(Error::Truncated {
                needed: start + coded_len,
                available: data.len(),
            });
        }

        let decoded = self.transform.revert(&body[..coded_len])?;
        let frame = Frame::parse(&decoded)?;
        Ok((frame, start + coded_len))
    }

    /// Decode every transmit unit in `data`
    ///
    /// Stops at the first unit that fails to decode and returns the error
    /// together with the frames decoded so far.
    pub fn decode_all(&self, data: &[u8]) -> (Vec<Frame>, Option<Error>) {
        let mut frames = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            match self.decode(&data[offset..]) {
                Ok((frame, consumed)) => {
                    frames.push(frame);
                    offset += consumed;
                }
                Err(e) => return (frames, Some(e)),
            }
        }
        (frames, None)
    }

    fn body_start(&self, data: &[u8]) -> Result<usize> {
        if self.sync.is_empty() {
            let n = self.config.preamble_bytes();
            if data.len() < n {
                return Err(Error::Truncated {
                    needed: n,
                    available: data.len(),
                });
            }
            return Ok(n);
        }

        data.windows(self.sync.len())
            .position(|w| w == self.sync.as_slice())
            .map(|p| p + self.sync.len())
            .ok_or(Error::SyncNotFound)
    }

    fn coded_len(&self, body: &[u8]) -> Result<usize> {
        let probe_len = if self.transform.fec() {
            std::cmp::min(body.len() / 4 * 4, FEC_PROBE_LEN)
        } else {
            std::cmp::min(body.len(), 1)
        };
        if probe_len == 0 {
            return Err(Error::Truncated {
                needed: self.transform.encoded_len(1),
                available: body.len(),
            });
        }

        let probe = self.transform.revert(&body[..probe_len])?;
        let length = probe[0] as usize;
        Ok(self.transform.encoded_len(HEADER_LEN + length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Encoder;
    use rand::Rng;

    fn configs() -> Vec<FramerConfig> {
        let mut v = Vec::new();
        for (fec, whitening) in [(false, false), (false, true), (true, false), (true, true)] {
            v.push(
                FramerConfig::builder()
                    .fec(fec)
                    .whitening(whitening)
                    .sequence_seed(0xfffe)
                    .build()
                    .unwrap(),
            );
        }
        v
    }

    #[test]
    fn round_trip_all_transforms() {
        let mut rng = rand::rng();
        for config in configs() {
            let mut enc = Encoder::new(config);
            let dec = Decoder::new(config);
            for n in [0, 1, 2, 3, 4, 17, 128, 255] {
                let payload: Vec<u8> = (0..n).map(|_| rng.random()).collect();
                let seq = enc.sequence();
                let unit = enc.encode(&payload).unwrap();
                let (frame, consumed) = dec.decode(&unit).unwrap();
                assert_eq!(consumed, unit.len());
                assert_eq!(frame.payload(), &payload[..]);
                assert_eq!(frame.header().sequence, seq);
                assert_eq!(frame.header().flags, 0xc0);
            }
        }
    }

    #[test]
    fn walks_concatenated_units() {
        for config in configs() {
            let mut enc = Encoder::new(config);
            let mut stream = Vec::new();
            for i in 0..5u8 {
                stream.extend(enc.encode(&vec![i; i as usize * 3]).unwrap());
            }
            let (frames, err) = Decoder::new(config).decode_all(&stream);
            assert!(err.is_none());
            assert_eq!(frames.len(), 5);
            assert_eq!(frames[0].header().sequence, 0xfffe);
            assert_eq!(frames[2].header().sequence, 0x0000);
            assert_eq!(frames[4].payload(), &[4; 12]);
        }
    }

    #[test]
    fn corrects_bit_errors_with_fec() {
        let config = FramerConfig::default();
        let mut enc = Encoder::new(config);
        let payload = b"hello openlst".to_vec();
        let mut unit = enc.encode(&payload).unwrap();
        let overhead = config.sync_inserter().overhead();
        unit[overhead + 1] ^= 0x10;
        let mid = overhead + (unit.len() - overhead) / 2;
        unit[mid] ^= 0x01;

        let (frame, _) = Decoder::new(config).decode(&unit).unwrap();
        assert_eq!(frame.payload(), &payload[..]);
    }

    #[test]
    fn missing_sync() {
        let dec = Decoder::new(FramerConfig::default());
        assert_eq!(dec.decode(&[0xaa; 32]).unwrap_err(), Error::SyncNotFound);
    }

    #[test]
    fn truncated_unit() {
        let config = FramerConfig::default();
        let unit = Encoder::new(config).encode(&[1; 40]).unwrap();
        let err = Decoder::new(config).decode(&unit[..unit.len() - 3]).unwrap_err();
        assert_eq!(
            err,
            Error::Truncated {
                needed: unit.len(),
                available: unit.len() - 3
            }
        );
    }

    #[test]
    fn without_sync_words() {
        let config = FramerConfig::builder()
            .preamble_bytes(3)
            .sync_words(0)
            .fec(false)
            .build()
            .unwrap();
        let unit = Encoder::new(config).encode(&[5, 6]).unwrap();
        let (frame, consumed) = Decoder::new(config).decode(&unit).unwrap();
        assert_eq!(frame.payload(), &[5, 6]);
        assert_eq!(consumed, 3 + 6);
    }
}
