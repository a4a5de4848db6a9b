/// PN9 data whitening
///
/// x^9 + x^5 + 1 LFSR seeded with all ones, as used by the CC1110 radio on
/// OpenLST boards. The register is reset for every frame, so whitening is its
/// own inverse.
#[derive(Debug, Clone, Copy, Default)]
pub struct Whitener;

impl Whitener {
    const SEED: u16 = 0x1ff;

    /// Create whitener
    pub fn new() -> Self {
        Self
    }

    /// Whiten (or de-whiten) `data` in place
    pub fn apply(&self, data: &mut [u8]) {
        let mut state = Self::SEED;
        for b in data.iter_mut() {
            *b ^= (state & 0xff) as u8;
            for _ in 0..8 {
                let feedback = (state ^ (state >> 5)) & 1;
                state = (state >> 1) | (feedback << 8);
            }
        }
    }
}
