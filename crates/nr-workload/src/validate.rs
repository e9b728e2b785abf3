//! Construction-time checks for every layer's queue descriptor.
//!
//! A descriptor that fails here never becomes a workload.

use nr_tensor::{ConstTensor, DataType, Shape, TensorHandle, TensorInfo};

use crate::descriptors::*;
use crate::error::{Result, WorkloadError};
use crate::layer::LayerType;
use crate::queue::{LayerParameters, QueueDescriptor};

pub(crate) fn all_handles_have_type<P>(
    layer: LayerType,
    descriptor: &QueueDescriptor<P>,
    data_type: DataType,
) -> Result<()> {
    for (i, h) in descriptor.inputs.iter().enumerate() {
        expect_type(layer, &format!("input {}", i), h.info(), data_type)?;
    }
    for (i, h) in descriptor.outputs.iter().enumerate() {
        expect_type(layer, &format!("output {}", i), h.info(), data_type)?;
    }
    Ok(())
}

fn expect_type(layer: LayerType, what: &str, info: &TensorInfo, data_type: DataType) -> Result<()> {
    if info.data_type() != data_type {
        return Err(WorkloadError::invalid(
            layer,
            format!(
                "{} is {} but the workload is built for {}",
                what,
                info.data_type(),
                data_type
            ),
        ));
    }
    Ok(())
}

fn expect_shape(layer: LayerType, what: &str, actual: &Shape, expected: &Shape) -> Result<()> {
    if actual != expected {
        return Err(WorkloadError::invalid(
            layer,
            format!("{} shape {} does not match expected {}", what, actual, expected),
        ));
    }
    Ok(())
}

fn expect_rank(layer: LayerType, what: &str, shape: &Shape, rank: usize) -> Result<()> {
    if shape.ndim() != rank {
        return Err(WorkloadError::invalid(
            layer,
            format!("{} must have {} dimensions, got {}", what, rank, shape),
        ));
    }
    Ok(())
}

fn same_input_output_shape<P>(layer: LayerType, d: &QueueDescriptor<P>) -> Result<()> {
    expect_shape(
        layer,
        "output",
        d.outputs[0].info().shape(),
        d.inputs[0].info().shape(),
    )
}

/// Layers that move raw bytes need identical quantization on both sides.
fn same_quantization(layer: LayerType, what: &str, a: &TensorInfo, b: &TensorInfo) -> Result<()> {
    if a.data_type().is_quantized() && !a.same_quantization(b) {
        return Err(WorkloadError::invalid(
            layer,
            format!(
                "{} quantization ({}, {}) differs from ({}, {})",
                what,
                b.quantization_scale(),
                b.quantization_offset(),
                a.quantization_scale(),
                a.quantization_offset()
            ),
        ));
    }
    Ok(())
}

fn expected_bias_type(data_type: DataType) -> DataType {
    if data_type.is_quantized() {
        DataType::Signed32
    } else {
        data_type
    }
}

fn check_weight_and_bias(
    layer: LayerType,
    weight: &ConstTensor,
    bias: Option<&ConstTensor>,
    data_type: DataType,
    bias_len: usize,
) -> Result<()> {
    expect_type(layer, "weight", weight.info(), data_type)?;
    if let Some(bias) = bias {
        expect_type(layer, "bias", bias.info(), expected_bias_type(data_type))?;
        expect_shape(layer, "bias", bias.shape(), &Shape::from([bias_len]))?;
    }
    Ok(())
}

fn check_window(layer: LayerType, window: &ConvolutionWindow) -> Result<()> {
    if window.stride_x == 0 || window.stride_y == 0 {
        return Err(WorkloadError::invalid(layer, "strides must be positive"));
    }
    if window.dilation_x == 0 || window.dilation_y == 0 {
        return Err(WorkloadError::invalid(layer, "dilations must be positive"));
    }
    Ok(())
}

fn boxes_overlap(a_origin: &[usize], a: &Shape, b_origin: &[usize], b: &Shape) -> bool {
    a_origin
        .iter()
        .zip(a.dims())
        .zip(b_origin.iter().zip(b.dims()))
        .all(|((&ao, &ad), (&bo, &bd))| ao < bo + bd && bo < ao + ad)
}

/// Shared split/merge rules: one origin per view, each view inside `whole`,
/// views pairwise disjoint, and no two view handles aliasing each other.
fn check_views(
    layer: LayerType,
    whole: &TensorHandle,
    views: &[TensorHandle],
    origins: &[ViewOrigin],
    side: &str,
) -> Result<()> {
    if origins.len() != views.len() {
        return Err(WorkloadError::invalid(
            layer,
            format!(
                "{} view origins for {} {}s",
                origins.len(),
                views.len(),
                side
            ),
        ));
    }
    let whole_shape = whole.info().shape();
    for (i, (view, origin)) in views.iter().zip(origins).enumerate() {
        let shape = view.info().shape();
        let what = format!("{} {}", side, i);
        expect_rank(layer, &what, shape, whole_shape.ndim())?;
        if origin.coords().len() != whole_shape.ndim() {
            return Err(WorkloadError::invalid(
                layer,
                format!(
                    "view origin {:?} for {} has wrong rank",
                    origin.coords(),
                    what
                ),
            ));
        }
        if !whole_shape.contains_region(shape, origin.coords()) {
            return Err(WorkloadError::invalid(
                layer,
                format!(
                    "{} of shape {} at origin {:?} exceeds {}",
                    what,
                    shape,
                    origin.coords(),
                    whole_shape
                ),
            ));
        }
        same_quantization(layer, &what, whole.info(), view.info())?;
    }
    for i in 0..views.len() {
        for j in i + 1..views.len() {
            if boxes_overlap(
                origins[i].coords(),
                views[i].info().shape(),
                origins[j].coords(),
                views[j].info().shape(),
            ) {
                return Err(WorkloadError::invalid(
                    layer,
                    format!("views of {}s {} and {} overlap", side, i, j),
                ));
            }
            if views[i].aliases(&views[j]) {
                return Err(WorkloadError::invalid(
                    layer,
                    format!("{} handles {} and {} alias the same bytes", side, i, j),
                ));
            }
        }
    }
    Ok(())
}

impl LayerParameters for ActivationDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Activation;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        same_input_output_shape(Self::LAYER_TYPE, d)
    }
}

fn validate_broadcast<P>(layer: LayerType, d: &QueueDescriptor<P>) -> Result<()> {
    let a = d.inputs[0].info().shape();
    let b = d.inputs[1].info().shape();
    let expected = Shape::broadcast_shape(a, b).map_err(|e| WorkloadError::invalid(layer, e.to_string()))?;
    expect_shape(layer, "output", d.outputs[0].info().shape(), &expected)
}

impl LayerParameters for AdditionDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Addition;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        validate_broadcast(Self::LAYER_TYPE, d)
    }
}

impl LayerParameters for MultiplicationDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Multiplication;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        validate_broadcast(Self::LAYER_TYPE, d)
    }
}

impl LayerParameters for BatchNormalizationDescriptor {
    const LAYER_TYPE: LayerType = LayerType::BatchNormalization;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        same_input_output_shape(layer, d)?;
        let input = d.inputs[0].info().shape();
        if input.ndim() < 2 {
            return Err(WorkloadError::invalid(layer, "input needs a channel dimension"));
        }
        let channels = Shape::from([input.dim(1)]);
        let p = &d.parameters;
        expect_shape(layer, "mean", p.mean.shape(), &channels)?;
        expect_shape(layer, "variance", p.variance.shape(), &channels)?;
        expect_shape(layer, "beta", p.beta.shape(), &channels)?;
        expect_shape(layer, "gamma", p.gamma.shape(), &channels)
    }
}

impl LayerParameters for Convolution2dDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Convolution2d;

    fn validate_shapes(d: &QueueDescriptor<Self>, data_type: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        let p = &d.parameters;
        let input = d.inputs[0].info().shape();
        expect_rank(layer, "input", input, 4)?;
        expect_rank(layer, "weight", p.weight.shape(), 4)?;
        check_window(layer, &p.window)?;
        if p.weight.shape().dim(1) != input.dim(1) {
            return Err(WorkloadError::invalid(
                layer,
                format!(
                    "weight expects {} input channels, input has {}",
                    p.weight.shape().dim(1),
                    input.dim(1)
                ),
            ));
        }
        check_weight_and_bias(
            layer,
            &p.weight,
            p.bias.as_ref(),
            data_type,
            p.weight.shape().dim(0),
        )?;
        let expected = p.infer_output_shape(input).ok_or_else(|| {
            WorkloadError::invalid(layer, "kernel does not fit the padded input")
        })?;
        expect_shape(layer, "output", d.outputs[0].info().shape(), &expected)
    }
}

impl LayerParameters for DepthwiseConvolution2dDescriptor {
    const LAYER_TYPE: LayerType = LayerType::DepthwiseConvolution2d;

    fn validate_shapes(d: &QueueDescriptor<Self>, data_type: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        let p = &d.parameters;
        let input = d.inputs[0].info().shape();
        expect_rank(layer, "input", input, 4)?;
        expect_rank(layer, "weight", p.weight.shape(), 4)?;
        check_window(layer, &p.window)?;
        if p.weight.shape().dim(1) != input.dim(1) {
            return Err(WorkloadError::invalid(
                layer,
                format!(
                    "weight expects {} channels, input has {}",
                    p.weight.shape().dim(1),
                    input.dim(1)
                ),
            ));
        }
        check_weight_and_bias(
            layer,
            &p.weight,
            p.bias.as_ref(),
            data_type,
            input.dim(1) * p.depth_multiplier(),
        )?;
        let expected = p.infer_output_shape(input).ok_or_else(|| {
            WorkloadError::invalid(layer, "kernel does not fit the padded input")
        })?;
        expect_shape(layer, "output", d.outputs[0].info().shape(), &expected)
    }
}

impl LayerParameters for FullyConnectedDescriptor {
    const LAYER_TYPE: LayerType = LayerType::FullyConnected;

    fn validate_shapes(d: &QueueDescriptor<Self>, data_type: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        let p = &d.parameters;
        let input = d.inputs[0].info().shape();
        let (inputs, outputs) = p
            .weight_dims()
            .ok_or_else(|| WorkloadError::invalid(layer, "weight must be a matrix"))?;
        let batch = input.dim(0);
        if input.numel() / batch != inputs {
            return Err(WorkloadError::invalid(
                layer,
                format!(
                    "input {} flattens to {} features, weight expects {}",
                    input,
                    input.numel() / batch,
                    inputs
                ),
            ));
        }
        check_weight_and_bias(layer, &p.weight, p.bias.as_ref(), data_type, outputs)?;
        expect_shape(
            layer,
            "output",
            d.outputs[0].info().shape(),
            &Shape::from([batch, outputs]),
        )
    }
}

impl LayerParameters for NormalizationDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Normalization;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        expect_rank(layer, "input", d.inputs[0].info().shape(), 4)?;
        if d.parameters.norm_size == 0 {
            return Err(WorkloadError::invalid(layer, "norm_size must be positive"));
        }
        same_input_output_shape(layer, d)
    }
}

impl LayerParameters for L2NormalizationDescriptor {
    const LAYER_TYPE: LayerType = LayerType::L2Normalization;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        if d.inputs[0].info().num_dimensions() < 2 {
            return Err(WorkloadError::invalid(layer, "input needs a channel dimension"));
        }
        same_input_output_shape(layer, d)
    }
}

impl LayerParameters for Pooling2dDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Pooling2d;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        let input = d.inputs[0].info().shape();
        expect_rank(layer, "input", input, 4)?;
        let expected = d.parameters.infer_output_shape(input).ok_or_else(|| {
            WorkloadError::invalid(layer, "pooling window does not fit the padded input")
        })?;
        expect_shape(layer, "output", d.outputs[0].info().shape(), &expected)
    }
}

impl LayerParameters for SoftmaxDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Softmax;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        same_input_output_shape(Self::LAYER_TYPE, d)
    }
}

impl LayerParameters for SplitterDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Splitter;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        check_views(
            Self::LAYER_TYPE,
            &d.inputs[0],
            &d.outputs,
            &d.parameters.views,
            "output",
        )
    }
}

impl LayerParameters for MergerDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Merger;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        check_views(
            Self::LAYER_TYPE,
            &d.outputs[0],
            &d.inputs,
            &d.parameters.views,
            "input",
        )
    }
}

impl LayerParameters for ResizeBilinearDescriptor {
    const LAYER_TYPE: LayerType = LayerType::ResizeBilinear;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        let input = d.inputs[0].info().shape();
        expect_rank(layer, "input", input, 4)?;
        let p = &d.parameters;
        if p.target_width == 0 || p.target_height == 0 {
            return Err(WorkloadError::invalid(layer, "target size must be positive"));
        }
        expect_shape(
            layer,
            "output",
            d.outputs[0].info().shape(),
            &Shape::from([input.dim(0), input.dim(1), p.target_height, p.target_width]),
        )
    }
}

impl LayerParameters for ReshapeDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Reshape;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        let input = d.inputs[0].info();
        let output = d.outputs[0].info();
        expect_shape(layer, "output", output.shape(), &d.parameters.target_shape)?;
        if input.num_elements() != output.num_elements() {
            return Err(WorkloadError::invalid(
                layer,
                format!(
                    "cannot reshape {} elements into {}",
                    input.num_elements(),
                    output.shape()
                ),
            ));
        }
        same_quantization(layer, "output", input, output)
    }
}

impl LayerParameters for FloorDescriptor {
    const LAYER_TYPE: LayerType = LayerType::Floor;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        same_input_output_shape(Self::LAYER_TYPE, d)
    }
}

impl LayerParameters for MemCopyDescriptor {
    const LAYER_TYPE: LayerType = LayerType::MemCopy;

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        let layer = Self::LAYER_TYPE;
        same_input_output_shape(layer, d)?;
        same_quantization(layer, "output", d.inputs[0].info(), d.outputs[0].info())
    }
}

fn validate_conversion<P>(
    layer: LayerType,
    d: &QueueDescriptor<P>,
    data_type: DataType,
    from: DataType,
    to: DataType,
) -> Result<()> {
    if data_type != from {
        return Err(WorkloadError::invalid(
            layer,
            format!("converts from {}, cannot be built for {}", from, data_type),
        ));
    }
    expect_type(layer, "input 0", d.inputs[0].info(), from)?;
    expect_type(layer, "output 0", d.outputs[0].info(), to)
}

impl LayerParameters for ConvertFp16ToFp32Descriptor {
    const LAYER_TYPE: LayerType = LayerType::ConvertFp16ToFp32;

    /// The workload's data type names the representation it consumes.
    fn validate_data_types(d: &QueueDescriptor<Self>, data_type: DataType) -> Result<()> {
        validate_conversion(
            Self::LAYER_TYPE,
            d,
            data_type,
            DataType::Float16,
            DataType::Float32,
        )
    }

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        same_input_output_shape(Self::LAYER_TYPE, d)
    }
}

impl LayerParameters for ConvertFp32ToFp16Descriptor {
    const LAYER_TYPE: LayerType = LayerType::ConvertFp32ToFp16;

    fn validate_data_types(d: &QueueDescriptor<Self>, data_type: DataType) -> Result<()> {
        validate_conversion(
            Self::LAYER_TYPE,
            d,
            data_type,
            DataType::Float32,
            DataType::Float16,
        )
    }

    fn validate_shapes(d: &QueueDescriptor<Self>, _: DataType) -> Result<()> {
        same_input_output_shape(Self::LAYER_TYPE, d)
    }
}
