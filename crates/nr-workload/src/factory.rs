use std::fmt::Debug;

use nr_tensor::{DataType, Shape, TensorArena, TensorHandle, TensorInfo};

use crate::error::{Result, WorkloadError};
use crate::layer::LayerType;
use crate::queue::*;
use crate::workload::Workload;

/// Contract every backend implements to turn queue descriptors into workloads.
///
/// Per-operation methods default to [`WorkloadError::UnsupportedOperation`];
/// a backend overrides the ones it implements. Construction is all-or-nothing
/// and never re-wraps the handles it is given.
pub trait WorkloadFactory: Send + Sync + Debug {
    fn backend_id(&self) -> &str;

    fn is_layer_supported(&self, layer: LayerType, data_type: DataType) -> bool;

    /// Whether split/merge layers may be wired through views of the parent
    /// tensor instead of separate buffers.
    fn supports_sub_tensors(&self) -> bool {
        false
    }

    fn create_tensor_handle(&self, arena: &mut TensorArena, info: TensorInfo) -> Result<TensorHandle> {
        Ok(arena.create_owning(info)?)
    }

    /// A view over `origin..origin + shape` of `parent`, or `None` when the
    /// backend has no sub-tensor support or the region is not contiguous.
    fn create_sub_tensor_handle(
        &self,
        arena: &mut TensorArena,
        parent: &TensorHandle,
        shape: &Shape,
        origin: &[usize],
    ) -> Result<Option<TensorHandle>> {
        if !self.supports_sub_tensors() {
            return Ok(None);
        }
        Ok(arena.create_sub_tensor(parent, shape.clone(), origin)?)
    }

    fn create_activation(&self, _: ActivationQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Activation, data_type))
    }

    fn create_addition(&self, _: AdditionQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Addition, data_type))
    }

    fn create_batch_normalization(
        &self,
        _: BatchNormalizationQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::BatchNormalization, data_type))
    }

    fn create_convert_fp16_to_fp32(
        &self,
        _: ConvertFp16ToFp32QueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::ConvertFp16ToFp32, data_type))
    }

    fn create_convert_fp32_to_fp16(
        &self,
        _: ConvertFp32ToFp16QueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::ConvertFp32ToFp16, data_type))
    }

    fn create_convolution2d(
        &self,
        _: Convolution2dQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Convolution2d, data_type))
    }

    fn create_depthwise_convolution2d(
        &self,
        _: DepthwiseConvolution2dQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::DepthwiseConvolution2d, data_type))
    }

    fn create_floor(&self, _: FloorQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Floor, data_type))
    }

    fn create_fully_connected(
        &self,
        _: FullyConnectedQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::FullyConnected, data_type))
    }

    fn create_l2_normalization(
        &self,
        _: L2NormalizationQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::L2Normalization, data_type))
    }

    fn create_mem_copy(&self, _: MemCopyQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::MemCopy, data_type))
    }

    fn create_merger(&self, _: MergerQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Merger, data_type))
    }

    fn create_multiplication(
        &self,
        _: MultiplicationQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Multiplication, data_type))
    }

    fn create_normalization(
        &self,
        _: NormalizationQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Normalization, data_type))
    }

    fn create_pooling2d(&self, _: Pooling2dQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Pooling2d, data_type))
    }

    fn create_reshape(&self, _: ReshapeQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Reshape, data_type))
    }

    fn create_resize_bilinear(
        &self,
        _: ResizeBilinearQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::ResizeBilinear, data_type))
    }

    fn create_softmax(&self, _: SoftmaxQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Softmax, data_type))
    }

    fn create_splitter(&self, _: SplitterQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        Err(unsupported(self, LayerType::Splitter, data_type))
    }

    /// Dispatch a tagged descriptor to the matching `create_*` method.
    fn create_workload(&self, descriptor: LayerDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        match descriptor {
            LayerDescriptor::Activation(d) => self.create_activation(d, data_type),
            LayerDescriptor::Addition(d) => self.create_addition(d, data_type),
            LayerDescriptor::BatchNormalization(d) => self.create_batch_normalization(d, data_type),
            LayerDescriptor::ConvertFp16ToFp32(d) => self.create_convert_fp16_to_fp32(d, data_type),
            LayerDescriptor::ConvertFp32ToFp16(d) => self.create_convert_fp32_to_fp16(d, data_type),
            LayerDescriptor::Convolution2d(d) => self.create_convolution2d(d, data_type),
            LayerDescriptor::DepthwiseConvolution2d(d) => {
                self.create_depthwise_convolution2d(d, data_type)
            }
            LayerDescriptor::Floor(d) => self.create_floor(d, data_type),
            LayerDescriptor::FullyConnected(d) => self.create_fully_connected(d, data_type),
            LayerDescriptor::L2Normalization(d) => self.create_l2_normalization(d, data_type),
            LayerDescriptor::MemCopy(d) => self.create_mem_copy(d, data_type),
            LayerDescriptor::Merger(d) => self.create_merger(d, data_type),
            LayerDescriptor::Multiplication(d) => self.create_multiplication(d, data_type),
            LayerDescriptor::Normalization(d) => self.create_normalization(d, data_type),
            LayerDescriptor::Pooling2d(d) => self.create_pooling2d(d, data_type),
            LayerDescriptor::Reshape(d) => self.create_reshape(d, data_type),
            LayerDescriptor::ResizeBilinear(d) => self.create_resize_bilinear(d, data_type),
            LayerDescriptor::Softmax(d) => self.create_softmax(d, data_type),
            LayerDescriptor::Splitter(d) => self.create_splitter(d, data_type),
        }
    }
}

fn unsupported<F: WorkloadFactory + ?Sized>(factory: &F, layer: LayerType, data_type: DataType) -> WorkloadError {
    WorkloadError::unsupported(factory.backend_id(), layer, data_type)
}
