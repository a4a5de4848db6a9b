use crate::runtime::Result;
use crate::FrameAssembler;
use crate::FramerConfig;
use crate::SequenceCounter;
use crate::SyncInserter;
use crate::Transform;

/// OpenLST encoder and framer
///
/// Turns payload chunks into transmit units:
///
/// ```text
/// | preamble | sync word(s) | length | flags | seq lo | seq hi | payload |
///                           \______________ transform _______________/
/// ```
///
/// where the transform is optional PN9 whitening followed by optional FEC.
#[derive(Debug, Clone)]
pub struct Encoder {
    config: FramerConfig,
    assembler: FrameAssembler,
    transform: Transform,
    sync: SyncInserter,
}

impl Encoder {
    /// Create encoder
    pub fn new(config: FramerConfig) -> Self {
        Self {
            config,
            assembler: FrameAssembler::new(
                config.flags(),
                SequenceCounter::new(config.sequence_seed()),
            ),
            transform: config.transform(),
            sync: config.sync_inserter(),
        }
    }

    /// Configuration
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    /// Sequence number of the next frame
    pub fn sequence(&self) -> u16 {
        self.assembler.sequence()
    }

    /// Length of the transmit unit for an `n` byte payload
    pub fn unit_len(&self, n: usize) -> usize {
        self.sync.overhead() + self.transform.encoded_len(crate::HEADER_LEN + n)
    }

    /// Encode one payload chunk into a transmit unit
    ///
    /// Nothing is emitted on error. Once the frame is assembled its sequence
    /// number is used up, even if a later stage fails.
    pub fn encode(&mut self, payload: &[u8]) -> Result<Vec<u8>> {
        let frame = self.assembler.assemble(payload)?;
        let sequence = frame.header().sequence;
        let encoded = self.transform.apply(frame.to_bytes())?;
        let unit = self.sync.insert(&encoded);
        trace!(
            "encoded frame seq {:#06x}, payload {} bytes, unit {} bytes",
            sequence,
            payload.len(),
            unit.len()
        );
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Error;

    fn plain() -> FramerConfig {
        FramerConfig::builder()
            .preamble_bytes(4)
            .sync_byte0(0x91)
            .sync_byte1(0xd3)
            .sync_words(2)
            .flags(0xc0)
            .fec(false)
            .whitening(false)
            .seq_byte0(0x69)
            .seq_byte1(0x22)
            .build()
            .unwrap()
    }

    #[test]
    fn plain_unit() {
        let mut enc = Encoder::new(plain());
        let first = enc.encode(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(
            first,
            vec![
                0xaa, 0xaa, 0xaa, 0xaa, 0x91, 0xd3, 0x91, 0xd3, 0x03, 0xc0, 0x69, 0x22, 0x01,
                0x02, 0x03
            ]
        );

        let second = enc.encode(&[0x01, 0x02, 0x03]).unwrap();
        let mut expected = first.clone();
        expected[10] = 0x6a;
        assert_eq!(second, expected);
    }

    #[test]
    fn unit_len_matches_output() {
        for (fec, whitening) in [(false, false), (false, true), (true, false), (true, true)] {
            let config = FramerConfig::builder()
                .fec(fec)
                .whitening(whitening)
                .build()
                .unwrap();
            let mut enc = Encoder::new(config);
            for n in [0, 1, 2, 3, 100, 255] {
                assert_eq!(enc.encode(&vec![0x42; n]).unwrap().len(), enc.unit_len(n));
            }
        }
    }

    #[test]
    fn oversized_chunk_leaves_encoder_usable() {
        let mut enc = Encoder::new(plain());
        assert_eq!(
            enc.encode(&[0; 256]),
            Err(Error::OversizedPayload { len: 256, max: 255 })
        );
        assert_eq!(enc.sequence(), 0x2269);
        let unit = enc.encode(&[9]).unwrap();
        assert_eq!(&unit[10..12], &[0x69, 0x22]);
    }

    #[test]
    fn full_coding_vector() {
        let config = FramerConfig::builder()
            .sequence_seed(0x2269)
            .build()
            .unwrap();
        let unit = Encoder::new(config).encode(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(
            &unit[8..],
            &[
                0xd2, 0x35, 0xca, 0xfb, 0xdd, 0x09, 0x5c, 0x45, 0x71, 0xb9, 0xd6, 0x0f, 0x42, 0x0c,
                0x40, 0xc9
            ]
        );
    }
}
