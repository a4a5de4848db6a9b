/// Training byte of the preamble, alternating bits for clock recovery
pub const PREAMBLE_BYTE: u8 = 0xaa;

/// Prepends preamble and sync words to encoded frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncInserter {
    preamble_bytes: usize,
    sync_word: [u8; 2],
    sync_words: usize,
}

impl SyncInserter {
    /// Create inserter
    pub fn new(preamble_bytes: usize, sync_word: [u8; 2], sync_words: usize) -> Self {
        Self {
            preamble_bytes,
            sync_word,
            sync_words,
        }
    }

    /// Length of preamble and sync section
    pub fn overhead(&self) -> usize {
        self.preamble_bytes + 2 * self.sync_words
    }

    /// Sync section as it appears on air
    pub fn sync_section(&self) -> Vec<u8> {
        self.sync_word.repeat(self.sync_words)
    }

    /// Build a transmit unit around `frame`
    pub fn insert(&self, frame: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.overhead() + frame.len());
        out.resize(self.preamble_bytes, PREAMBLE_BYTE);
        for _ in 0..self.sync_words {
            out.extend_from_slice(&self.sync_word);
        }
        out.extend_from_slice(frame);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let s = SyncInserter::new(4, [0x91, 0xd3], 2);
        assert_eq!(
            s.insert(&[0x01, 0x02]),
            vec![0xaa, 0xaa, 0xaa, 0xaa, 0x91, 0xd3, 0x91, 0xd3, 0x01, 0x02]
        );
        assert_eq!(s.overhead(), 8);
    }

    #[test]
    fn section_lengths() {
        for preamble in 0..6 {
            for words in 0..4 {
                let s = SyncInserter::new(preamble, [0x12, 0x34], words);
                let out = s.insert(&[0xff; 3]);
                assert_eq!(out.len(), preamble + 2 * words + 3);
                assert!(out[..preamble].iter().all(|b| *b == PREAMBLE_BYTE));
                assert_eq!(&out[preamble..preamble + 2 * words], &s.sync_section()[..]);
                assert_eq!(&out[preamble + 2 * words..], &[0xff; 3]);
            }
        }
    }

    #[test]
    fn empty_sections() {
        let s = SyncInserter::new(0, [0x91, 0xd3], 0);
        assert_eq!(s.insert(&[7, 8]), vec![7, 8]);
    }
}
