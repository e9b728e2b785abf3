use std::fmt::Debug;

use nr_tensor::{DataType, TensorHandle};

use crate::descriptors::*;
use crate::error::{Result, WorkloadError};
use crate::layer::LayerType;
use crate::validate;

/// The tensors and parameters one layer instance works on.
///
/// Inputs are read by the workload, outputs written. Handles may be owning
/// or views; the descriptor holds them exactly as the driver bound them.
#[derive(Debug, Clone)]
pub struct QueueDescriptor<P> {
    pub inputs: Vec<TensorHandle>,
    pub outputs: Vec<TensorHandle>,
    pub parameters: P,
}

impl<P> QueueDescriptor<P> {
    pub fn new(inputs: Vec<TensorHandle>, outputs: Vec<TensorHandle>, parameters: P) -> Self {
        QueueDescriptor {
            inputs,
            outputs,
            parameters,
        }
    }
}

impl<P: LayerParameters> QueueDescriptor<P> {
    pub fn layer_type(&self) -> LayerType {
        P::LAYER_TYPE
    }

    /// Run every construction-time check for building a `data_type` workload:
    /// arity, handle data types, then the layer's shape rules.
    pub fn validate(&self, data_type: DataType) -> Result<()> {
        let layer = P::LAYER_TYPE;
        let (in_arity, out_arity) = (layer.input_arity(), layer.output_arity());
        if !in_arity.accepts(self.inputs.len()) {
            return Err(WorkloadError::invalid(
                layer,
                format!("expected {} inputs, got {}", in_arity, self.inputs.len()),
            ));
        }
        if !out_arity.accepts(self.outputs.len()) {
            return Err(WorkloadError::invalid(
                layer,
                format!("expected {} outputs, got {}", out_arity, self.outputs.len()),
            ));
        }
        P::validate_data_types(self, data_type)?;
        P::validate_shapes(self, data_type)
    }
}

/// Parameters of one operation kind, with the shape rules that go with it.
pub trait LayerParameters: Debug + Clone + Send + Sync + 'static {
    const LAYER_TYPE: LayerType;

    /// Every input and output must carry `data_type` unless overridden.
    fn validate_data_types(descriptor: &QueueDescriptor<Self>, data_type: DataType) -> Result<()> {
        validate::all_handles_have_type(Self::LAYER_TYPE, descriptor, data_type)
    }

    /// Layer-specific shape inference and parameter checks. Called after the
    /// arity check, so indexing the fixed inputs/outputs is safe.
    fn validate_shapes(descriptor: &QueueDescriptor<Self>, data_type: DataType) -> Result<()>;
}

pub type ActivationQueueDescriptor = QueueDescriptor<ActivationDescriptor>;
pub type AdditionQueueDescriptor = QueueDescriptor<AdditionDescriptor>;
pub type BatchNormalizationQueueDescriptor = QueueDescriptor<BatchNormalizationDescriptor>;
pub type ConvertFp16ToFp32QueueDescriptor = QueueDescriptor<ConvertFp16ToFp32Descriptor>;
pub type ConvertFp32ToFp16QueueDescriptor = QueueDescriptor<ConvertFp32ToFp16Descriptor>;
pub type Convolution2dQueueDescriptor = QueueDescriptor<Convolution2dDescriptor>;
pub type DepthwiseConvolution2dQueueDescriptor = QueueDescriptor<DepthwiseConvolution2dDescriptor>;
pub type FloorQueueDescriptor = QueueDescriptor<FloorDescriptor>;
pub type FullyConnectedQueueDescriptor = QueueDescriptor<FullyConnectedDescriptor>;
pub type L2NormalizationQueueDescriptor = QueueDescriptor<L2NormalizationDescriptor>;
pub type MemCopyQueueDescriptor = QueueDescriptor<MemCopyDescriptor>;
pub type MergerQueueDescriptor = QueueDescriptor<MergerDescriptor>;
pub type MultiplicationQueueDescriptor = QueueDescriptor<MultiplicationDescriptor>;
pub type NormalizationQueueDescriptor = QueueDescriptor<NormalizationDescriptor>;
pub type Pooling2dQueueDescriptor = QueueDescriptor<Pooling2dDescriptor>;
pub type ReshapeQueueDescriptor = QueueDescriptor<ReshapeDescriptor>;
pub type ResizeBilinearQueueDescriptor = QueueDescriptor<ResizeBilinearDescriptor>;
pub type SoftmaxQueueDescriptor = QueueDescriptor<SoftmaxDescriptor>;
pub type SplitterQueueDescriptor = QueueDescriptor<SplitterDescriptor>;

/// A queue descriptor of any operation kind, for drivers that hold layers
/// in one list and dispatch through [`crate::WorkloadFactory::create_workload`].
#[derive(Debug, Clone)]
pub enum LayerDescriptor {
    Activation(ActivationQueueDescriptor),
    Addition(AdditionQueueDescriptor),
    BatchNormalization(BatchNormalizationQueueDescriptor),
    ConvertFp16ToFp32(ConvertFp16ToFp32QueueDescriptor),
    ConvertFp32ToFp16(ConvertFp32ToFp16QueueDescriptor),
    Convolution2d(Convolution2dQueueDescriptor),
    DepthwiseConvolution2d(DepthwiseConvolution2dQueueDescriptor),
    Floor(FloorQueueDescriptor),
    FullyConnected(FullyConnectedQueueDescriptor),
    L2Normalization(L2NormalizationQueueDescriptor),
    MemCopy(MemCopyQueueDescriptor),
    Merger(MergerQueueDescriptor),
    Multiplication(MultiplicationQueueDescriptor),
    Normalization(NormalizationQueueDescriptor),
    Pooling2d(Pooling2dQueueDescriptor),
    Reshape(ReshapeQueueDescriptor),
    ResizeBilinear(ResizeBilinearQueueDescriptor),
    Softmax(SoftmaxQueueDescriptor),
    Splitter(SplitterQueueDescriptor),
}

macro_rules! for_each_layer {
    ($self:expr, $d:ident => $body:expr) => {
        match $self {
            LayerDescriptor::Activation($d) => $body,
            LayerDescriptor::Addition($d) => $body,
            LayerDescriptor::BatchNormalization($d) => $body,
            LayerDescriptor::ConvertFp16ToFp32($d) => $body,
            LayerDescriptor::ConvertFp32ToFp16($d) => $body,
            LayerDescriptor::Convolution2d($d) => $body,
            LayerDescriptor::DepthwiseConvolution2d($d) => $body,
            LayerDescriptor::Floor($d) => $body,
            LayerDescriptor::FullyConnected($d) => $body,
            LayerDescriptor::L2Normalization($d) => $body,
            LayerDescriptor::MemCopy($d) => $body,
            LayerDescriptor::Merger($d) => $body,
            LayerDescriptor::Multiplication($d) => $body,
            LayerDescriptor::Normalization($d) => $body,
            LayerDescriptor::Pooling2d($d) => $body,
            LayerDescriptor::Reshape($d) => $body,
            LayerDescriptor::ResizeBilinear($d) => $body,
            LayerDescriptor::Softmax($d) => $body,
            LayerDescriptor::Splitter($d) => $body,
        }
    };
}

impl LayerDescriptor {
    pub fn layer_type(&self) -> LayerType {
        for_each_layer!(self, d => d.layer_type())
    }

    pub fn inputs(&self) -> &[TensorHandle] {
        for_each_layer!(self, d => &d.inputs)
    }

    pub fn outputs(&self) -> &[TensorHandle] {
        for_each_layer!(self, d => &d.outputs)
    }

    pub fn validate(&self, data_type: DataType) -> Result<()> {
        for_each_layer!(self, d => d.validate(data_type))
    }
}

macro_rules! impl_from_queue_descriptor {
    ($($variant:ident => $params:ty),* $(,)?) => {
        $(
            impl From<QueueDescriptor<$params>> for LayerDescriptor {
                fn from(d: QueueDescriptor<$params>) -> Self {
                    LayerDescriptor::$variant(d)
                }
            }
        )*
    };
}

impl_from_queue_descriptor! {
    Activation => ActivationDescriptor,
    Addition => AdditionDescriptor,
    BatchNormalization => BatchNormalizationDescriptor,
    ConvertFp16ToFp32 => ConvertFp16ToFp32Descriptor,
    ConvertFp32ToFp16 => ConvertFp32ToFp16Descriptor,
    Convolution2d => Convolution2dDescriptor,
    DepthwiseConvolution2d => DepthwiseConvolution2dDescriptor,
    Floor => FloorDescriptor,
    FullyConnected => FullyConnectedDescriptor,
    L2Normalization => L2NormalizationDescriptor,
    MemCopy => MemCopyDescriptor,
    Merger => MergerDescriptor,
    Multiplication => MultiplicationDescriptor,
    Normalization => NormalizationDescriptor,
    Pooling2d => Pooling2dDescriptor,
    Reshape => ReshapeDescriptor,
    ResizeBilinear => ResizeBilinearDescriptor,
    Softmax => SoftmaxDescriptor,
    Splitter => SplitterDescriptor,
}
