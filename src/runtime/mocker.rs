//! Run blocks without a scheduler
use std::fmt::Debug;
use std::ops::Deref;
use std::ops::DerefMut;

use crate::runtime::buffer::CpuBufferReader;
use crate::runtime::buffer::CpuBufferWriter;
use crate::runtime::BlockMeta;
use crate::runtime::ItemTag;
use crate::runtime::Kernel;
use crate::runtime::Result;
use crate::runtime::Tag;
use crate::runtime::WorkIo;

/// Mocker for a block
///
/// A harness to run a block without a runtime. Used for unit tests and benchmarking.
pub struct Mocker<K> {
    block: K,
    meta: BlockMeta,
    io: WorkIo,
}

impl<K: Kernel> Mocker<K> {
    /// Create mocker
    pub fn new(block: K) -> Self {
        Mocker {
            block,
            meta: BlockMeta::new(std::any::type_name::<K>()),
            io: WorkIo::default(),
        }
    }

    /// Run the block until it neither asks to be called again nor makes progress
    pub fn run(&mut self) -> Result<()> {
        futures::executor::block_on(self.run_async())
    }

    /// Init the block wrapped by the mocker
    pub fn init(&mut self) -> Result<()> {
        futures::executor::block_on(self.block.init(&mut self.meta))
    }

    /// The block signaled that it is done
    pub fn finished(&self) -> bool {
        self.io.finished
    }

    /// Run the mocker async
    pub async fn run_async(&mut self) -> Result<()> {
        loop {
            self.block.work(&mut self.io, &mut self.meta).await?;

            if !self.io.call_again || self.io.finished {
                break;
            } else {
                self.io.call_again = false;
            }
        }
        Ok(())
    }
}

impl<K> Deref for Mocker<K> {
    type Target = K;

    fn deref(&self) -> &Self::Target {
        &self.block
    }
}

impl<K> DerefMut for Mocker<K> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.block
    }
}

/// Mock input buffer
#[derive(Debug, Default)]
pub struct Reader<T> {
    data: Vec<T>,
    finished: bool,
}

impl<T> Reader<T> {
    /// Replace the buffered items
    pub fn set(&mut self, data: Vec<T>) {
        self.data = data;
        self.finished = true;
    }

    /// Append items, keeping the buffer open for more
    pub fn push(&mut self, data: impl IntoIterator<Item = T>) {
        self.data.extend(data);
    }

    /// Mark the input as finished
    pub fn finish(&mut self) {
        self.finished = true;
    }
}

impl<T: Debug + Send> CpuBufferReader for Reader<T> {
    type Item = T;

    fn slice(&mut self) -> &[T] {
        &self.data
    }

    fn consume(&mut self, amount: usize) {
        self.data.drain(0..amount);
    }

    fn finished(&self) -> bool {
        self.finished
    }
}

/// Mock output buffer
#[derive(Debug, Default)]
pub struct Writer<T> {
    data: Vec<T>,
    produced: usize,
    tags: Vec<ItemTag>,
}

impl<T: Clone + Default> Writer<T> {
    /// Make room for `n` more items
    pub fn reserve(&mut self, n: usize) {
        self.data.resize(self.produced + n, T::default());
    }

    /// Produced items and tags
    pub fn get(&self) -> (Vec<T>, Vec<ItemTag>) {
        (self.data[..self.produced].to_vec(), self.tags.clone())
    }

    /// Take produced items and tags, keeping the free space
    pub fn take(&mut self) -> (Vec<T>, Vec<ItemTag>) {
        let data = self.data.drain(..self.produced).collect();
        self.produced = 0;
        (data, std::mem::take(&mut self.tags))
    }
}

impl<T: Debug + Send> CpuBufferWriter for Writer<T> {
    type Item = T;

    fn slice(&mut self) -> &mut [T] {
        &mut self.data[self.produced..]
    }

    fn produce(&mut self, amount: usize) {
        self.produced += amount;
    }

    fn add_tag(&mut self, index: usize, tag: Tag) {
        self.tags.push(ItemTag {
            index: self.produced + index,
            tag,
        });
    }
}
