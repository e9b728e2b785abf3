use nr_tensor::DataType;
use nr_workload::*;

use crate::workloads::*;

/// Identifier the reference backend registers under.
pub const REF_BACKEND_ID: &str = "CpuRef";

/// Workload factory for the reference CPU backend.
///
/// Every operation has a `Float32` workload. All but the float-only
/// normalization layers and `Floor` also have a `QuantisedAsymm8` one.
/// Conversions are built for the type they consume.
#[derive(Debug, Clone, Default)]
pub struct RefWorkloadFactory;

impl RefWorkloadFactory {
    pub fn new() -> Self {
        RefWorkloadFactory
    }
}

fn is_float_only(layer: LayerType) -> bool {
    matches!(
        layer,
        LayerType::BatchNormalization
            | LayerType::Normalization
            | LayerType::L2Normalization
            | LayerType::Floor
    )
}

impl WorkloadFactory for RefWorkloadFactory {
    fn backend_id(&self) -> &str {
        REF_BACKEND_ID
    }

    fn is_layer_supported(&self, layer: LayerType, data_type: DataType) -> bool {
        match layer {
            LayerType::ConvertFp16ToFp32 => data_type == DataType::Float16,
            LayerType::ConvertFp32ToFp16 => data_type == DataType::Float32,
            _ if is_float_only(layer) => data_type == DataType::Float32,
            _ => matches!(data_type, DataType::Float32 | DataType::QuantisedAsymm8),
        }
    }

    fn supports_sub_tensors(&self) -> bool {
        true
    }

    fn create_activation(&self, d: ActivationQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefActivationFloat32Workload, RefActivationUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_addition(&self, d: AdditionQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefAdditionFloat32Workload, RefAdditionUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_batch_normalization(
        &self,
        d: BatchNormalizationQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_float_workload::<_, RefBatchNormalizationFloat32Workload>(REF_BACKEND_ID, d, data_type)
    }

    fn create_convert_fp16_to_fp32(
        &self,
        d: ConvertFp16ToFp32QueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_single_type_workload::<_, RefConvertFp16ToFp32Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
            DataType::Float16,
        )
    }

    fn create_convert_fp32_to_fp16(
        &self,
        d: ConvertFp32ToFp16QueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_single_type_workload::<_, RefConvertFp32ToFp16Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
            DataType::Float32,
        )
    }

    fn create_convolution2d(
        &self,
        d: Convolution2dQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefConvolution2dFloat32Workload, RefConvolution2dUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_depthwise_convolution2d(
        &self,
        d: DepthwiseConvolution2dQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_workload::<
            _,
            RefDepthwiseConvolution2dFloat32Workload,
            RefDepthwiseConvolution2dUint8Workload,
        >(REF_BACKEND_ID, d, data_type)
    }

    fn create_floor(&self, d: FloorQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        make_float_workload::<_, RefFloorFloat32Workload>(REF_BACKEND_ID, d, data_type)
    }

    fn create_fully_connected(
        &self,
        d: FullyConnectedQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefFullyConnectedFloat32Workload, RefFullyConnectedUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_l2_normalization(
        &self,
        d: L2NormalizationQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_float_workload::<_, RefL2NormalizationFloat32Workload>(REF_BACKEND_ID, d, data_type)
    }

    fn create_mem_copy(&self, d: MemCopyQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefMemCopyFloat32Workload, RefMemCopyUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_merger(&self, d: MergerQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefMergerFloat32Workload, RefMergerUint8Workload>(REF_BACKEND_ID, d, data_type)
    }

    fn create_multiplication(
        &self,
        d: MultiplicationQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefMultiplicationFloat32Workload, RefMultiplicationUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_normalization(
        &self,
        d: NormalizationQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_float_workload::<_, RefNormalizationFloat32Workload>(REF_BACKEND_ID, d, data_type)
    }

    fn create_pooling2d(&self, d: Pooling2dQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefPooling2dFloat32Workload, RefPooling2dUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_reshape(&self, d: ReshapeQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefReshapeFloat32Workload, RefReshapeUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_resize_bilinear(
        &self,
        d: ResizeBilinearQueueDescriptor,
        data_type: DataType,
    ) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefResizeBilinearFloat32Workload, RefResizeBilinearUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_softmax(&self, d: SoftmaxQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefSoftmaxFloat32Workload, RefSoftmaxUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }

    fn create_splitter(&self, d: SplitterQueueDescriptor, data_type: DataType) -> Result<Box<dyn Workload>> {
        make_workload::<_, RefSplitterFloat32Workload, RefSplitterUint8Workload>(
            REF_BACKEND_ID,
            d,
            data_type,
        )
    }
}
