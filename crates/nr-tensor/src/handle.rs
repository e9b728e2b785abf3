use std::fmt;
use std::ops::Range;

use crate::info::TensorInfo;

/// Unique identity of a tensor handle within its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub(crate) u64);

impl HandleId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a buffer inside a [`crate::TensorArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllocationId(pub(crate) usize);

impl AllocationId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Whether a handle owns its buffer or aliases another handle's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Owning,
    View { base: HandleId },
}

/// A reference to tensor memory held in a [`crate::TensorArena`].
///
/// A handle is a light record: `(id, info, allocation, byte offset)`. Cloning
/// it yields the *same* handle, the way cloning an `Rc` yields the same
/// pointee; two handles are the same tensor binding iff [`TensorHandle::is_same`]
/// holds. The memory itself lives in the arena and is only reachable through it.
#[derive(Debug, Clone)]
pub struct TensorHandle {
    pub(crate) id: HandleId,
    pub(crate) info: TensorInfo,
    pub(crate) allocation: AllocationId,
    pub(crate) byte_offset: usize,
    pub(crate) kind: HandleKind,
}

impl TensorHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn info(&self) -> &TensorInfo {
        &self.info
    }

    pub fn allocation(&self) -> AllocationId {
        self.allocation
    }

    /// Offset of this handle's first byte within its allocation.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn byte_len(&self) -> usize {
        self.info.num_bytes()
    }

    /// Byte range addressed within the allocation.
    pub fn byte_range(&self) -> Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_len()
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn is_view(&self) -> bool {
        matches!(self.kind, HandleKind::View { .. })
    }

    /// Identity: same handle id bound to the same allocation region.
    pub fn is_same(&self, other: &TensorHandle) -> bool {
        self.id == other.id
            && self.allocation == other.allocation
            && self.byte_offset == other.byte_offset
    }

    /// True if both handles address overlapping bytes of one allocation.
    pub fn aliases(&self, other: &TensorHandle) -> bool {
        if self.allocation != other.allocation {
            return false;
        }
        let a = self.byte_range();
        let b = other.byte_range();
        a.start < b.end && b.start < a.end
    }

    /// True if both handles address exactly the same bytes.
    pub fn same_region(&self, other: &TensorHandle) -> bool {
        self.allocation == other.allocation && self.byte_range() == other.byte_range()
    }
}
