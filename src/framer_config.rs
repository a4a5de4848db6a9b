use serde::Deserialize;
use serde::Serialize;
use std::str::FromStr;

use crate::runtime::config;
use crate::runtime::Error;
use crate::runtime::Result;
use crate::SequenceCounter;
use crate::SyncInserter;
use crate::Transform;
use crate::PREAMBLE_BYTE;

/// Validated framer configuration
///
/// Fields map one to one onto the wire: `sync_byte0` goes on air before
/// `sync_byte1`, and the first sequence number is
/// `seq_byte1 << 8 | seq_byte0`. Create it with [`FramerConfigBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramerConfig {
    preamble_bytes: usize,
    sync_byte0: u8,
    sync_byte1: u8,
    sync_words: usize,
    flags: u8,
    fec: bool,
    whitening: bool,
    seq_byte0: u8,
    seq_byte1: u8,
}

impl FramerConfig {
    /// Builder with OpenLST defaults
    pub fn builder() -> FramerConfigBuilder {
        FramerConfigBuilder::new()
    }

    /// Number of preamble bytes
    pub fn preamble_bytes(&self) -> usize {
        self.preamble_bytes
    }
    /// Sync pattern in transmit order
    pub fn sync_word(&self) -> [u8; 2] {
        [self.sync_byte0, self.sync_byte1]
    }
    /// Number of sync pattern repetitions
    pub fn sync_words(&self) -> usize {
        self.sync_words
    }
    /// Header flags
    pub fn flags(&self) -> u8 {
        self.flags
    }
    /// FEC enabled
    pub fn fec(&self) -> bool {
        self.fec
    }
    /// Whitening enabled
    pub fn whitening(&self) -> bool {
        self.whitening
    }
    /// First sequence number
    pub fn sequence_seed(&self) -> u16 {
        SequenceCounter::from_bytes(self.seq_byte0, self.seq_byte1).current()
    }

    /// Line coding selected by the toggles
    pub fn transform(&self) -> Transform {
        Transform::new(self.fec, self.whitening)
    }

    /// Preamble/sync stage for this configuration
    pub fn sync_inserter(&self) -> SyncInserter {
        SyncInserter::new(self.preamble_bytes, self.sync_word(), self.sync_words)
    }
}

impl Default for FramerConfig {
    fn default() -> Self {
        FramerConfig {
            preamble_bytes: 4,
            sync_byte0: 0x91,
            sync_byte1: 0xd3,
            sync_words: 2,
            flags: 0xc0,
            fec: true,
            whitening: true,
            seq_byte0: 0,
            seq_byte1: 0,
        }
    }
}

/// Builder for [`FramerConfig`]
#[derive(Debug, Clone)]
pub struct FramerConfigBuilder {
    config: FramerConfig,
}

impl Default for FramerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FramerConfigBuilder {
    /// Builder with OpenLST defaults
    pub fn new() -> Self {
        Self {
            config: FramerConfig::default(),
        }
    }

    /// Builder seeded from the runtime configuration
    ///
    /// Reads `preamble_bytes`, `sync_byte0`, `sync_byte1`, `sync_words`,
    /// `flags`, `fec`, `whitening`, `seq_byte0` and `seq_byte1`. Missing keys
    /// keep their defaults. Byte values may be decimal or `0x` hex.
    pub fn from_runtime_config() -> Result<Self> {
        let mut c = FramerConfig::default();

        if let Some(v) = lookup::<usize>("preamble_bytes")? {
            c.preamble_bytes = v;
        }
        if let Some(v) = lookup_byte("sync_byte0")? {
            c.sync_byte0 = v;
        }
        if let Some(v) = lookup_byte("sync_byte1")? {
            c.sync_byte1 = v;
        }
        if let Some(v) = lookup::<usize>("sync_words")? {
            c.sync_words = v;
        }
        if let Some(v) = lookup_byte("flags")? {
            c.flags = v;
        }
        if let Some(v) = lookup::<bool>("fec")? {
            c.fec = v;
        }
        if let Some(v) = lookup::<bool>("whitening")? {
            c.whitening = v;
        }
        if let Some(v) = lookup_byte("seq_byte0")? {
            c.seq_byte0 = v;
        }
        if let Some(v) = lookup_byte("seq_byte1")? {
            c.seq_byte1 = v;
        }

        Ok(Self { config: c })
    }

    /// Number of preamble bytes
    pub fn preamble_bytes(mut self, n: usize) -> Self {
        self.config.preamble_bytes = n;
        self
    }
    /// First byte of the sync pattern
    pub fn sync_byte0(mut self, b: u8) -> Self {
        self.config.sync_byte0 = b;
        self
    }
    /// Second byte of the sync pattern
    pub fn sync_byte1(mut self, b: u8) -> Self {
        self.config.sync_byte1 = b;
        self
    }
    /// Number of sync pattern repetitions
    pub fn sync_words(mut self, n: usize) -> Self {
        self.config.sync_words = n;
        self
    }
    /// Header flags
    pub fn flags(mut self, flags: u8) -> Self {
        self.config.flags = flags;
        self
    }
    /// Enable FEC
    pub fn fec(mut self, fec: bool) -> Self {
        self.config.fec = fec;
        self
    }
    /// Enable whitening
    pub fn whitening(mut self, whitening: bool) -> Self {
        self.config.whitening = whitening;
        self
    }
    /// Low byte of the first sequence number
    pub fn seq_byte0(mut self, b: u8) -> Self {
        self.config.seq_byte0 = b;
        self
    }
    /// High byte of the first sequence number
    pub fn seq_byte1(mut self, b: u8) -> Self {
        self.config.seq_byte1 = b;
        self
    }
    /// First sequence number
    pub fn sequence_seed(self, seed: u16) -> Self {
        let [lo, hi] = seed.to_le_bytes();
        self.seq_byte0(lo).seq_byte1(hi)
    }

    /// Validate and build
    pub fn build(self) -> Result<FramerConfig> {
        let c = self.config;

        if c.sync_words > 0 && c.sync_byte0 == PREAMBLE_BYTE && c.sync_byte1 == PREAMBLE_BYTE {
            return Err(Error::InvalidConfiguration(format!(
                "sync word {PREAMBLE_BYTE:#04x}{PREAMBLE_BYTE:02x} cannot be told apart from the preamble"
            )));
        }
        if c.sync_words == 0 {
            warn!("no sync words configured, receivers will not be able to align on frames");
        }

        debug!("framer config: {c:?}");
        Ok(c)
    }
}

fn raw(name: &str) -> Result<Option<String>> {
    config::get_value(name)
        .map(|v| {
            v.into_string()
                .map_err(|e| Error::InvalidConfiguration(format!("{name}: {e}")))
        })
        .transpose()
}

fn lookup<T: FromStr>(name: &str) -> Result<Option<T>> {
    raw(name)?
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|_| Error::InvalidConfiguration(format!("{name}: cannot parse {s:?}")))
        })
        .transpose()
}

fn lookup_byte(name: &str) -> Result<Option<u8>> {
    raw(name)?
        .map(|s| parse_byte(&s).map_err(|e| Error::InvalidConfiguration(format!("{name}: {e}"))))
        .transpose()
}

/// Parse a byte given in decimal or `0x` hex
pub fn parse_byte(s: &str) -> std::result::Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|_| format!("{s:?} is not a byte"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_openlst() {
        let c = FramerConfig::builder().build().unwrap();
        assert_eq!(c.preamble_bytes(), 4);
        assert_eq!(c.sync_word(), [0x91, 0xd3]);
        assert_eq!(c.sync_words(), 2);
        assert_eq!(c.flags(), 0xc0);
        assert_eq!(c.transform(), Transform::Both);
        assert_eq!(c.sequence_seed(), 0);
    }

    #[test]
    fn sequence_seed_bytes() {
        let c = FramerConfig::builder()
            .seq_byte0(0x69)
            .seq_byte1(0x22)
            .build()
            .unwrap();
        assert_eq!(c.sequence_seed(), 0x2269);

        let c = FramerConfig::builder().sequence_seed(0xbeef).build().unwrap();
        assert_eq!(c.sequence_seed(), 0xbeef);
    }

    #[test]
    fn long_sections_are_legal() {
        let c = FramerConfig::builder()
            .preamble_bytes(300)
            .sync_words(256)
            .build()
            .unwrap();
        assert_eq!(c.preamble_bytes(), 300);
        assert_eq!(c.sync_words(), 256);
        assert_eq!(c.sync_inserter().overhead(), 300 + 512);
    }

    #[test]
    fn rejects_sync_word_equal_to_preamble() {
        let b = FramerConfig::builder().sync_byte0(0xaa).sync_byte1(0xaa);
        assert!(matches!(
            b.clone().build(),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(b.sync_words(0).build().is_ok());
    }

    #[test]
    fn zero_sections_are_legal() {
        let c = FramerConfig::builder()
            .preamble_bytes(0)
            .sync_words(0)
            .build()
            .unwrap();
        assert_eq!(c.sync_inserter().overhead(), 0);
    }

    #[test]
    fn byte_notation() {
        assert_eq!(parse_byte("0xd3"), Ok(0xd3));
        assert_eq!(parse_byte(" 145 "), Ok(145));
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("0x1ff").is_err());
    }

    #[test]
    fn serializes() {
        let c = FramerConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let back: FramerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert!(json.contains("\"sync_byte0\":145"));
    }
}
