/// 16-bit frame sequence counter
///
/// Wraps around modulo 2^16. Only the [`FrameAssembler`](crate::FrameAssembler)
/// holds one, so reads and increments of a pipeline instance are serialized
/// through its `&mut self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCounter {
    value: u16,
}

impl SequenceCounter {
    /// Counter starting at `seed`
    pub fn new(seed: u16) -> Self {
        Self { value: seed }
    }

    /// Counter seeded from the two configured seed bytes, low byte first
    pub fn from_bytes(seq_byte0: u8, seq_byte1: u8) -> Self {
        Self::new(u16::from_le_bytes([seq_byte0, seq_byte1]))
    }

    /// Value the next frame will carry
    pub fn current(&self) -> u16 {
        self.value
    }

    /// Move to the next value
    pub fn advance(&mut self) {
        self.value = self.value.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_low_byte_first() {
        assert_eq!(SequenceCounter::from_bytes(0x69, 0x22).current(), 0x2269);
    }

    #[test]
    fn wraps() {
        let mut c = SequenceCounter::new(0xffff);
        c.advance();
        assert_eq!(c.current(), 0);
    }
}
