//! Forward error correction
//!
//! Rate 1/2, constraint length 4 convolutional code with 4x4 symbol
//! interleaving, bit compatible with the CC1110 FEC mode of OpenLST radios.
//! Every input bit yields a 2-bit symbol, looked up from the three previous
//! input bits and the current one. The input is terminated with one or two
//! `0x0B` bytes so that the coded block is a multiple of four bytes.
use crate::frame::MAX_FRAME_LEN;
use crate::runtime::Error;
use crate::runtime::Result;

const ENCODE_TABLE: [u8; 16] = [0, 3, 1, 2, 3, 0, 2, 1, 3, 0, 2, 1, 0, 3, 1, 2];
const TERMINATOR: u8 = 0x0b;
const N_STATES: usize = 8;

/// Number of trellis terminator bytes appended to an `n` byte input
pub fn terminator_len(n: usize) -> usize {
    2 - n % 2
}

/// Coded size of an `n` byte input
pub fn encoded_len(n: usize) -> usize {
    2 * (n + terminator_len(n))
}

fn interleave(block: &mut [u8]) {
    let mut word: u32 = 0;
    for j in 0..16 {
        word = (word << 2) | ((block[3 - (j & 3)] >> (2 * (j >> 2))) & 0x03) as u32;
    }
    block.copy_from_slice(&word.to_be_bytes());
}

fn deinterleave(block: &mut [u8]) {
    let word = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);
    let mut out = [0u8; 4];
    for j in 0..16 {
        let sym = ((word >> (2 * (15 - j))) & 0x03) as u8;
        out[3 - (j & 3)] |= sym << (2 * (j >> 2));
    }
    block.copy_from_slice(&out);
}

/// Convolutional encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct FecEncoder;

impl FecEncoder {
    /// Create encoder
    pub fn new() -> Self {
        Self
    }

    /// Encode a frame body
    ///
    /// The body must hold at least one byte and at most a full frame.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(Error::InvalidEncoderInput("empty frame body".to_string()));
        }
        if data.len() > MAX_FRAME_LEN {
            return Err(Error::InvalidEncoderInput(format!(
                "frame body of {} bytes exceeds {} bytes",
                data.len(),
                MAX_FRAME_LEN
            )));
        }

        let mut out = Vec::with_capacity(encoded_len(data.len()));
        let terminator = std::iter::repeat(&TERMINATOR).take(terminator_len(data.len()));
        // bits 10..8 hold the last three input bits, bits 7..0 the current byte
        let mut reg: u16 = 0;

        for b in data.iter().chain(terminator) {
            reg = (reg & 0x700) | *b as u16;
            let mut word: u16 = 0;
            for _ in 0..8 {
                word = (word << 2) | ENCODE_TABLE[(reg >> 7) as usize] as u16;
                reg = (reg << 1) & 0x7ff;
            }
            out.extend_from_slice(&word.to_be_bytes());
        }

        for block in out.chunks_exact_mut(4) {
            interleave(block);
        }
        Ok(out)
    }
}

/// Hard-decision Viterbi decoder for [`FecEncoder`] output
#[derive(Debug, Clone, Copy, Default)]
pub struct FecDecoder;

impl FecDecoder {
    /// Create decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode a coded block
    ///
    /// Returns every decoded byte, including the trellis terminator. Callers
    /// that know the body length truncate the result.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() || data.len() % 4 != 0 {
            return Err(Error::MalformedFrame(format!(
                "coded block of {} bytes is not a non-empty multiple of 4",
                data.len()
            )));
        }

        let mut coded = data.to_vec();
        for block in coded.chunks_exact_mut(4) {
            deinterleave(block);
        }

        let symbols = coded.chunks_exact(2).flat_map(|pair| {
            let word = u16::from_be_bytes([pair[0], pair[1]]);
            (0..8).rev().map(move |k| ((word >> (2 * k)) & 0x03) as u8)
        });

        let mut metric = [u32::MAX; N_STATES];
        metric[0] = 0;
        let mut survivors: Vec<[u8; N_STATES]> = Vec::with_capacity(coded.len() * 4);

        for sym in symbols {
            let mut next = [u32::MAX; N_STATES];
            let mut prev = [0u8; N_STATES];
            for (state, m) in metric.iter().enumerate() {
                if *m == u32::MAX {
                    continue;
                }
                for bit in 0..2 {
                    let idx = (state << 1) | bit;
                    let to = idx & (N_STATES - 1);
                    let cost = m + (ENCODE_TABLE[idx] ^ sym).count_ones();
                    if cost < next[to] {
                        next[to] = cost;
                        prev[to] = state as u8;
                    }
                }
            }
            survivors.push(prev);
            metric = next;
        }

        let mut state = metric
            .iter()
            .enumerate()
            .min_by_key(|(_, m)| **m)
            .map(|(s, _)| s)
            .unwrap_or(0);

        let mut bits = vec![0u8; survivors.len()];
        for (i, prev) in survivors.iter().enumerate().rev() {
            bits[i] = (state & 1) as u8;
            state = prev[state] as usize;
        }

        Ok(bits
            .chunks_exact(8)
            .map(|byte| byte.iter().fold(0u8, |acc, b| (acc << 1) | b))
            .collect())
    }
}
