use std::cmp;
use std::collections::VecDeque;

use crate::runtime::buffer::CpuBufferReader;
use crate::runtime::buffer::CpuBufferWriter;
use crate::runtime::config;
use crate::runtime::BlockMeta;
use crate::runtime::Error;
use crate::runtime::Kernel;
use crate::runtime::Result;
use crate::runtime::Tag;
use crate::runtime::WorkIo;
use crate::Encoder;
use crate::FramerConfig;
use crate::MAX_PAYLOAD_LEN;

/// OpenLST Encode and Frame
///
/// Reads payload bytes, frames up to `max_chunk` available bytes at a time and
/// writes the resulting transmit units. Units are queued (up to the runtime
/// `queue_size`) and copied out as output space becomes available, so a slow
/// downstream modem throttles the block instead of piling up latency. The
/// first byte of every unit carries a `burst_start` tag with the unit length.
pub struct Framer<I, O>
where
    I: CpuBufferReader<Item = u8>,
    O: CpuBufferWriter<Item = u8>,
{
    input: I,
    output: O,
    encoder: Encoder,
    max_chunk: usize,
    max_queued: usize,
    queue: VecDeque<Vec<u8>>,
    current: Vec<u8>,
    offset: usize,
}

impl<I, O> Framer<I, O>
where
    I: CpuBufferReader<Item = u8> + Default,
    O: CpuBufferWriter<Item = u8> + Default,
{
    /// Create framer that uses chunks of up to the maximum payload size
    pub fn new(config: FramerConfig) -> Self {
        Self {
            input: I::default(),
            output: O::default(),
            encoder: Encoder::new(config),
            max_chunk: MAX_PAYLOAD_LEN,
            max_queued: cmp::max(config::config().queue_size, 1),
            queue: VecDeque::new(),
            current: Vec::new(),
            offset: 0,
        }
    }

    /// Create framer with a smaller maximum chunk size
    pub fn with_chunk_size(config: FramerConfig, max_chunk: usize) -> Result<Self> {
        if max_chunk == 0 || max_chunk > MAX_PAYLOAD_LEN {
            return Err(Error::InvalidConfiguration(format!(
                "chunk size {max_chunk} not in 1..={MAX_PAYLOAD_LEN}"
            )));
        }
        let mut f = Self::new(config);
        f.max_chunk = max_chunk;
        Ok(f)
    }
}

impl<I, O> Framer<I, O>
where
    I: CpuBufferReader<Item = u8>,
    O: CpuBufferWriter<Item = u8>,
{
    /// Input buffer
    pub fn input(&mut self) -> &mut I {
        &mut self.input
    }

    /// Output buffer
    pub fn output(&mut self) -> &mut O {
        &mut self.output
    }

    /// Sequence number of the next frame
    pub fn sequence(&self) -> u16 {
        self.encoder.sequence()
    }

    /// Transmit units waiting for output space, including a partly written one
    pub fn pending(&self) -> usize {
        self.queue.len() + usize::from(self.offset < self.current.len())
    }

    fn frame_input(&mut self) -> Result<()> {
        while self.queue.len() < self.max_queued {
            let input = self.input.slice();
            if input.is_empty() {
                break;
            }
            let n = cmp::min(input.len(), self.max_chunk);
            let unit = self.encoder.encode(&input[..n])?;
            self.input.consume(n);
            self.queue.push_back(unit);
        }
        Ok(())
    }

    fn drain_output(&mut self) {
        loop {
            if self.offset == self.current.len() {
                match self.queue.pop_front() {
                    Some(unit) => {
                        self.current = unit;
                        self.offset = 0;
                    }
                    None => break,
                }
            }

            let out = self.output.slice();
            if out.is_empty() {
                break;
            }
            let n = cmp::min(out.len(), self.current.len() - self.offset);
            out[..n].copy_from_slice(&self.current[self.offset..self.offset + n]);

            if self.offset == 0 {
                self.output
                    .add_tag(0, Tag::NamedUsize("burst_start".to_string(), self.current.len()));
            }
            self.output.produce(n);
            self.offset += n;
        }
    }
}

impl<I, O> Kernel for Framer<I, O>
where
    I: CpuBufferReader<Item = u8>,
    O: CpuBufferWriter<Item = u8>,
{
    async fn init(&mut self, meta: &mut BlockMeta) -> Result<()> {
        debug!(
            "{}: framing with {:?}",
            meta.type_name(),
            self.encoder.config()
        );
        Ok(())
    }

    async fn work(&mut self, io: &mut WorkIo, _meta: &mut BlockMeta) -> Result<()> {
        self.frame_input()?;
        self.drain_output();

        // queue drained while input was waiting for room
        if !self.input.slice().is_empty() && self.queue.len() < self.max_queued {
            io.call_again = true;
        }

        if self.input.finished() && self.input.slice().is_empty() && self.pending() == 0 {
            io.finished = true;
        }

        Ok(())
    }
}
