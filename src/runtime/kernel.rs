use std::fmt;
use std::future::Future;

use crate::runtime::Result;

/// Kernel
///
/// Central trait to implement a block
pub trait Kernel: Send {
    /// Processes stream data
    fn work(
        &mut self,
        _io: &mut WorkIo,
        _meta: &mut BlockMeta,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
    /// Initialize kernel
    fn init(&mut self, _meta: &mut BlockMeta) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}

/// Work IO
///
/// Communicate between `work()` and the scheduler.
#[derive(Default)]
pub struct WorkIo {
    /// Call block immediately again
    pub call_again: bool,
    /// Mark block as finished
    pub finished: bool,
}

impl fmt::Debug for WorkIo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WorkIo")
            .field("call_again", &self.call_again)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Block metadata
#[derive(Debug, Clone)]
pub struct BlockMeta {
    type_name: String,
}

impl BlockMeta {
    /// Metadata for a block of the given type
    pub fn new(type_name: &str) -> BlockMeta {
        BlockMeta {
            type_name: type_name.to_string(),
        }
    }

    /// Type name of the block
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}
