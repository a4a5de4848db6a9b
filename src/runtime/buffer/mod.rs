//! Stream buffer interface
//!
//! Blocks own their stream ports as buffer readers and writers. The host
//! scheduler provides the implementations; [`mocker`](crate::runtime::mocker)
//! provides in-memory ones for tests.
use crate::runtime::Tag;

/// CPU-accessible input buffer
pub trait CpuBufferReader: Send {
    /// Item type
    type Item;
    /// Items available for reading
    fn slice(&mut self) -> &[Self::Item];
    /// Mark `amount` items as read
    fn consume(&mut self, amount: usize);
    /// Upstream will not produce more items
    fn finished(&self) -> bool;
}

/// CPU-accessible output buffer
pub trait CpuBufferWriter: Send {
    /// Item type
    type Item;
    /// Free space for writing
    fn slice(&mut self) -> &mut [Self::Item];
    /// Mark `amount` items as written
    fn produce(&mut self, amount: usize);
    /// Attach a tag to the item at `index`, relative to the start of [`slice`](Self::slice)
    fn add_tag(&mut self, index: usize, tag: Tag);
}
