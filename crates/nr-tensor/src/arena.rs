use tracing::trace;

use crate::error::{Result, TensorError};
use crate::handle::{AllocationId, HandleId, HandleKind, TensorHandle};
use crate::info::TensorInfo;
use crate::shape::Shape;
use crate::storage::CpuStorage;

/// Owner of every tensor buffer used by one network.
///
/// Owning handles get their own allocation; views point into an existing
/// allocation at a byte offset. All reads and writes go through the arena,
/// so the single-writer rule of a pass is enforced by `&mut TensorArena`.
///
/// A view must not be used after its base is released. The arena does not
/// keep the base alive, but it turns such an access into
/// [`TensorError::Released`] instead of touching freed memory.
#[derive(Debug, Default)]
pub struct TensorArena {
    allocations: Vec<Option<Vec<u8>>>,
    next_handle: u64,
    limit: Option<usize>,
    allocated_bytes: usize,
}

impl TensorArena {
    /// Create an arena without a byte budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena that refuses allocations beyond `limit` live bytes.
    pub fn with_limit(limit: usize) -> Self {
        TensorArena {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Total bytes held by live allocations.
    pub fn allocated_bytes(&self) -> usize {
        self.allocated_bytes
    }

    /// Number of live allocations.
    pub fn allocation_count(&self) -> usize {
        self.allocations.iter().filter(|a| a.is_some()).count()
    }

    fn next_id(&mut self) -> HandleId {
        let id = HandleId(self.next_handle);
        self.next_handle += 1;
        id
    }

    /// Allocate a zero-filled buffer sized for `info` and return the owning handle.
    ///
    /// # Errors
    /// [`TensorError::Allocation`] if the size overflows, exceeds the arena
    /// limit, or the allocator refuses the reservation.
    pub fn create_owning(&mut self, info: TensorInfo) -> Result<TensorHandle> {
        let bytes = info.checked_num_bytes().ok_or_else(|| TensorError::Allocation {
            bytes: usize::MAX,
            reason: format!("size of {} overflows usize", info),
        })?;

        if let Some(limit) = self.limit {
            if self.allocated_bytes.saturating_add(bytes) > limit {
                return Err(TensorError::Allocation {
                    bytes,
                    reason: format!(
                        "arena limit {} bytes, {} already allocated",
                        limit, self.allocated_bytes
                    ),
                });
            }
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(bytes)
            .map_err(|e| TensorError::Allocation {
                bytes,
                reason: e.to_string(),
            })?;
        buffer.resize(bytes, 0);

        let allocation = AllocationId(self.allocations.len());
        self.allocations.push(Some(buffer));
        self.allocated_bytes += bytes;

        let id = self.next_id();
        trace!(handle = %id, allocation = allocation.0, bytes, %info, "allocated owning tensor");

        Ok(TensorHandle {
            id,
            info,
            allocation,
            byte_offset: 0,
            kind: HandleKind::Owning,
        })
    }

    /// Create a view of `info` located `byte_offset` bytes into `base`.
    ///
    /// `base` may itself be a view; the new view is positioned relative to
    /// the bytes `base` addresses and references the same allocation.
    ///
    /// # Errors
    /// [`TensorError::OutOfBounds`] if `byte_offset + info.num_bytes()`
    /// exceeds `base.byte_len()`, and [`TensorError::Released`] if the base
    /// allocation is gone.
    pub fn create_view(
        &mut self,
        base: &TensorHandle,
        info: TensorInfo,
        byte_offset: usize,
    ) -> Result<TensorHandle> {
        self.check_live(base)?;

        let size = info.checked_num_bytes().unwrap_or(usize::MAX);
        let base_size = base.byte_len();
        if byte_offset.checked_add(size).map_or(true, |end| end > base_size) {
            return Err(TensorError::OutOfBounds {
                offset: byte_offset,
                size,
                base_size,
            });
        }

        let id = self.next_id();
        trace!(
            handle = %id,
            base = %base.id,
            allocation = base.allocation.0,
            byte_offset = base.byte_offset + byte_offset,
            %info,
            "created view"
        );

        Ok(TensorHandle {
            id,
            info,
            allocation: base.allocation,
            byte_offset: base.byte_offset + byte_offset,
            kind: HandleKind::View { base: base.id },
        })
    }

    /// Create a view over the sub-region `origin..origin + shape` of `parent`.
    ///
    /// Returns `Ok(None)` when the region is not one contiguous row-major run
    /// of the parent; the caller then needs an owning handle and a copy.
    ///
    /// # Errors
    /// [`TensorError::InvalidShape`] for an empty or zero-sized region,
    /// [`TensorError::OutOfBounds`] if the region does not fit in the parent.
    pub fn create_sub_tensor(
        &mut self,
        parent: &TensorHandle,
        shape: impl Into<Shape>,
        origin: &[usize],
    ) -> Result<Option<TensorHandle>> {
        let shape = shape.into();
        let parent_shape = parent.info().shape();
        let width = parent.info().data_type().size_in_bytes();

        if !shape.is_valid_tensor_shape() {
            return Err(TensorError::InvalidShape(shape.dims().to_vec()));
        }
        if shape.ndim() != parent_shape.ndim() || origin.len() != parent_shape.ndim() {
            return Err(TensorError::ShapeMismatch {
                expected: parent_shape.dims().to_vec(),
                got: shape.dims().to_vec(),
            });
        }
        if !parent_shape.contains_region(&shape, origin) {
            let strides = parent_shape.strides();
            let offset: usize = origin.iter().zip(&strides).map(|(o, s)| o * s).sum();
            return Err(TensorError::OutOfBounds {
                offset: offset * width,
                size: shape.numel() * width,
                base_size: parent.byte_len(),
            });
        }

        match parent_shape.contiguous_offset(&shape, origin) {
            Some(elements) => {
                let info = parent.info().try_with_shape(shape)?;
                self.create_view(parent, info, elements * width).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Free the buffer owned by `handle`.
    ///
    /// # Errors
    /// [`TensorError::NotOwning`] for views, [`TensorError::Released`] if the
    /// buffer was already freed.
    pub fn release(&mut self, handle: &TensorHandle) -> Result<()> {
        if handle.is_view() {
            return Err(TensorError::NotOwning(handle.id.0));
        }
        let slot = self
            .allocations
            .get_mut(handle.allocation.0)
            .ok_or_else(|| released(handle))?;
        let buffer = slot.take().ok_or_else(|| released(handle))?;
        self.allocated_bytes -= buffer.len();
        trace!(handle = %handle.id, allocation = handle.allocation.0, "released tensor");
        Ok(())
    }

    /// True if the handle's allocation is still live.
    pub fn is_live(&self, handle: &TensorHandle) -> bool {
        matches!(self.allocations.get(handle.allocation.0), Some(Some(_)))
    }

    fn check_live(&self, handle: &TensorHandle) -> Result<()> {
        if self.is_live(handle) {
            Ok(())
        } else {
            Err(released(handle))
        }
    }

    /// Raw bytes addressed by `handle`.
    pub fn bytes(&self, handle: &TensorHandle) -> Result<&[u8]> {
        let buffer = self
            .allocations
            .get(handle.allocation.0)
            .and_then(|a| a.as_ref())
            .ok_or_else(|| released(handle))?;
        buffer
            .get(handle.byte_range())
            .ok_or_else(|| out_of_bounds(handle, buffer.len()))
    }

    /// Mutable raw bytes addressed by `handle`.
    pub fn bytes_mut(&mut self, handle: &TensorHandle) -> Result<&mut [u8]> {
        let buffer = self
            .allocations
            .get_mut(handle.allocation.0)
            .and_then(|a| a.as_mut())
            .ok_or_else(|| released(handle))?;
        let len = buffer.len();
        buffer
            .get_mut(handle.byte_range())
            .ok_or_else(|| out_of_bounds(handle, len))
    }

    /// Read the handle's elements as typed storage.
    pub fn read(&self, handle: &TensorHandle) -> Result<CpuStorage> {
        CpuStorage::from_le_bytes(handle.info().data_type(), self.bytes(handle)?)
    }

    /// Overwrite the handle's elements.
    ///
    /// # Errors
    /// Fails if the storage type or element count disagrees with the handle's info.
    pub fn write(&mut self, handle: &TensorHandle, data: &CpuStorage) -> Result<()> {
        let info = handle.info();
        if data.data_type() != info.data_type() {
            return Err(TensorError::DataTypeMismatch {
                expected: info.data_type(),
                got: data.data_type(),
            });
        }
        if data.len() != info.num_elements() {
            return Err(TensorError::ShapeMismatch {
                expected: vec![info.num_elements()],
                got: vec![data.len()],
            });
        }
        data.write_le_bytes(self.bytes_mut(handle)?)
    }

    pub fn read_f32(&self, handle: &TensorHandle) -> Result<Vec<f32>> {
        match self.read(handle)? {
            CpuStorage::F32(v) => Ok(v),
            other => Err(TensorError::DataTypeMismatch {
                expected: crate::DataType::Float32,
                got: other.data_type(),
            }),
        }
    }

    pub fn write_f32(&mut self, handle: &TensorHandle, data: &[f32]) -> Result<()> {
        self.write(handle, &CpuStorage::F32(data.to_vec()))
    }

    pub fn read_u8(&self, handle: &TensorHandle) -> Result<Vec<u8>> {
        match self.read(handle)? {
            CpuStorage::U8(v) => Ok(v),
            other => Err(TensorError::DataTypeMismatch {
                expected: crate::DataType::QuantisedAsymm8,
                got: other.data_type(),
            }),
        }
    }

    pub fn write_u8(&mut self, handle: &TensorHandle, data: &[u8]) -> Result<()> {
        self.write(handle, &CpuStorage::U8(data.to_vec()))
    }

    /// Zero the bytes addressed by `handle`.
    pub fn fill_zero(&mut self, handle: &TensorHandle) -> Result<()> {
        self.bytes_mut(handle)?.fill(0);
        Ok(())
    }

    /// Copy all bytes of `src` into `dst`. Sizes must match; overlapping
    /// regions of one allocation are handled.
    pub fn copy(&mut self, src: &TensorHandle, dst: &TensorHandle) -> Result<()> {
        if src.byte_len() != dst.byte_len() {
            return Err(TensorError::ShapeMismatch {
                expected: dst.info().shape().dims().to_vec(),
                got: src.info().shape().dims().to_vec(),
            });
        }
        if src.same_region(dst) {
            self.check_live(src)?;
            return Ok(());
        }
        if src.allocation == dst.allocation {
            self.check_live(src)?;
            let buffer = self.allocations[src.allocation.0]
                .as_mut()
                .ok_or_else(|| released(src))?;
            buffer.copy_within(src.byte_range(), dst.byte_offset);
            return Ok(());
        }
        let data = self.bytes(src)?.to_vec();
        self.bytes_mut(dst)?.copy_from_slice(&data);
        Ok(())
    }
}

fn released(handle: &TensorHandle) -> TensorError {
    TensorError::Released {
        handle: handle.id.0,
        allocation: handle.allocation.0,
    }
}

fn out_of_bounds(handle: &TensorHandle, base_size: usize) -> TensorError {
    TensorError::OutOfBounds {
        offset: handle.byte_offset,
        size: handle.byte_len(),
        base_size,
    }
}
