//! Per-operation parameters carried by a [`crate::QueueDescriptor`].
//!
//! All spatial layers use NCHW layout.

use nr_tensor::{ConstTensor, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationFunction {
    Sigmoid,
    /// `a * tanh(b * x)`
    TanH,
    /// `a * x + b`
    Linear,
    ReLu,
    /// `min(a, max(b, x))`
    BoundedReLu,
    /// `ln(1 + e^x)`
    SoftReLu,
    /// `x > 0 ? x : a * x`
    LeakyReLu,
    Abs,
    Sqrt,
    Square,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivationDescriptor {
    pub function: ActivationFunction,
    pub a: f32,
    pub b: f32,
}

impl ActivationDescriptor {
    pub fn new(function: ActivationFunction) -> Self {
        ActivationDescriptor {
            function,
            a: 0.0,
            b: 0.0,
        }
    }

    pub fn with_params(mut self, a: f32, b: f32) -> Self {
        self.a = a;
        self.b = b;
        self
    }
}

impl Default for ActivationDescriptor {
    fn default() -> Self {
        Self::new(ActivationFunction::Sigmoid)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionDescriptor;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiplicationDescriptor;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloorDescriptor;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemCopyDescriptor;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertFp16ToFp32Descriptor;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertFp32ToFp16Descriptor;

/// Per-channel batch normalization statistics, each of shape `[C]`.
#[derive(Debug, Clone)]
pub struct BatchNormalizationDescriptor {
    pub eps: f32,
    pub mean: ConstTensor,
    pub variance: ConstTensor,
    pub beta: ConstTensor,
    pub gamma: ConstTensor,
}

/// Padding, stride and dilation shared by the convolution layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvolutionWindow {
    pub pad_left: usize,
    pub pad_right: usize,
    pub pad_top: usize,
    pub pad_bottom: usize,
    pub stride_x: usize,
    pub stride_y: usize,
    pub dilation_x: usize,
    pub dilation_y: usize,
}

impl Default for ConvolutionWindow {
    fn default() -> Self {
        ConvolutionWindow {
            pad_left: 0,
            pad_right: 0,
            pad_top: 0,
            pad_bottom: 0,
            stride_x: 1,
            stride_y: 1,
            dilation_x: 1,
            dilation_y: 1,
        }
    }
}

impl ConvolutionWindow {
    pub fn with_padding(mut self, left: usize, right: usize, top: usize, bottom: usize) -> Self {
        self.pad_left = left;
        self.pad_right = right;
        self.pad_top = top;
        self.pad_bottom = bottom;
        self
    }

    pub fn with_stride(mut self, x: usize, y: usize) -> Self {
        self.stride_x = x;
        self.stride_y = y;
        self
    }

    pub fn with_dilation(mut self, x: usize, y: usize) -> Self {
        self.dilation_x = x;
        self.dilation_y = y;
        self
    }

    /// Output `(height, width)` for an input plane and kernel, or `None` if
    /// the dilated kernel does not fit the padded input.
    pub fn output_size(
        &self,
        in_height: usize,
        in_width: usize,
        kernel_height: usize,
        kernel_width: usize,
    ) -> Option<(usize, usize)> {
        let h = conv_output_dim(
            in_height,
            self.pad_top + self.pad_bottom,
            kernel_height,
            self.stride_y,
            self.dilation_y,
        )?;
        let w = conv_output_dim(
            in_width,
            self.pad_left + self.pad_right,
            kernel_width,
            self.stride_x,
            self.dilation_x,
        )?;
        Some((h, w))
    }
}

/// `(input + padding - dilated_kernel) / stride + 1`, rounded down.
pub fn conv_output_dim(
    input: usize,
    padding: usize,
    kernel: usize,
    stride: usize,
    dilation: usize,
) -> Option<usize> {
    if stride == 0 || dilation == 0 || kernel == 0 {
        return None;
    }
    let dilated = (kernel - 1) * dilation + 1;
    let padded = input + padding;
    if dilated > padded {
        return None;
    }
    Some((padded - dilated) / stride + 1)
}

/// Regular 2D convolution. Weights are `[out_channels, in_channels, kH, kW]`,
/// bias (optional) is `[out_channels]`.
#[derive(Debug, Clone)]
pub struct Convolution2dDescriptor {
    pub window: ConvolutionWindow,
    pub weight: ConstTensor,
    pub bias: Option<ConstTensor>,
}

impl Convolution2dDescriptor {
    pub fn new(weight: ConstTensor, bias: Option<ConstTensor>, window: ConvolutionWindow) -> Self {
        Convolution2dDescriptor {
            window,
            weight,
            bias,
        }
    }

    pub fn bias_enabled(&self) -> bool {
        self.bias.is_some()
    }

    /// Output shape for an NCHW input, if the window fits.
    pub fn infer_output_shape(&self, input: &Shape) -> Option<Shape> {
        let w = self.weight.shape();
        if input.ndim() != 4 || w.ndim() != 4 {
            return None;
        }
        let (h, wd) = self
            .window
            .output_size(input.dim(2), input.dim(3), w.dim(2), w.dim(3))?;
        Some(Shape::from([input.dim(0), w.dim(0), h, wd]))
    }
}

/// Depthwise 2D convolution. Weights are `[multiplier, channels, kH, kW]`;
/// output channel `c * multiplier + m` reads input channel `c`. Bias
/// (optional) is `[channels * multiplier]`.
#[derive(Debug, Clone)]
pub struct DepthwiseConvolution2dDescriptor {
    pub window: ConvolutionWindow,
    pub weight: ConstTensor,
    pub bias: Option<ConstTensor>,
}

impl DepthwiseConvolution2dDescriptor {
    pub fn new(weight: ConstTensor, bias: Option<ConstTensor>, window: ConvolutionWindow) -> Self {
        DepthwiseConvolution2dDescriptor {
            window,
            weight,
            bias,
        }
    }

    pub fn bias_enabled(&self) -> bool {
        self.bias.is_some()
    }

    pub fn depth_multiplier(&self) -> usize {
        self.weight.shape().dim(0)
    }

    pub fn infer_output_shape(&self, input: &Shape) -> Option<Shape> {
        let w = self.weight.shape();
        if input.ndim() != 4 || w.ndim() != 4 {
            return None;
        }
        let (h, wd) = self
            .window
            .output_size(input.dim(2), input.dim(3), w.dim(2), w.dim(3))?;
        Some(Shape::from([input.dim(0), input.dim(1) * w.dim(0), h, wd]))
    }
}

/// Weights are `[inputs, outputs]`, or `[outputs, inputs]` when
/// `transpose_weight_matrix` is set. Bias (optional) is `[outputs]`.
#[derive(Debug, Clone)]
pub struct FullyConnectedDescriptor {
    pub weight: ConstTensor,
    pub bias: Option<ConstTensor>,
    pub transpose_weight_matrix: bool,
}

impl FullyConnectedDescriptor {
    pub fn new(weight: ConstTensor, bias: Option<ConstTensor>, transpose_weight_matrix: bool) -> Self {
        FullyConnectedDescriptor {
            weight,
            bias,
            transpose_weight_matrix,
        }
    }

    pub fn bias_enabled(&self) -> bool {
        self.bias.is_some()
    }

    /// `(input_size, output_size)` read from the weight matrix.
    pub fn weight_dims(&self) -> Option<(usize, usize)> {
        let w = self.weight.shape();
        if w.ndim() != 2 {
            return None;
        }
        if self.transpose_weight_matrix {
            Some((w.dim(1), w.dim(0)))
        } else {
            Some((w.dim(0), w.dim(1)))
        }
    }

    /// The input is flattened to `[batch, numel / batch]`.
    pub fn infer_output_shape(&self, input: &Shape) -> Option<Shape> {
        let (_, outputs) = self.weight_dims()?;
        Some(Shape::from([input.dim(0), outputs]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationChannel {
    Across,
    Within,
}

/// Local response normalization (local brightness):
/// `y = x / (k + alpha * sum(x^2))^beta` over a `norm_size` window.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationDescriptor {
    pub channel_type: NormalizationChannel,
    pub norm_size: usize,
    pub alpha: f32,
    pub beta: f32,
    pub k: f32,
}

impl Default for NormalizationDescriptor {
    fn default() -> Self {
        NormalizationDescriptor {
            channel_type: NormalizationChannel::Across,
            norm_size: 5,
            alpha: 1e-4,
            beta: 0.75,
            k: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct L2NormalizationDescriptor {
    /// Lower bound on the sum of squares, guards against division by zero.
    pub eps: f32,
}

impl Default for L2NormalizationDescriptor {
    fn default() -> Self {
        L2NormalizationDescriptor { eps: 1e-12 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolingAlgorithm {
    Max,
    Average,
    L2,
}

/// How padded positions count toward average and L2 pooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMethod {
    /// Padding takes part in the divisor as zeros.
    IgnoreValue,
    /// Only real input elements count.
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShapeRounding {
    Floor,
    Ceiling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pooling2dDescriptor {
    pub pool_type: PoolingAlgorithm,
    pub pad_left: usize,
    pub pad_right: usize,
    pub pad_top: usize,
    pub pad_bottom: usize,
    pub pool_width: usize,
    pub pool_height: usize,
    pub stride_x: usize,
    pub stride_y: usize,
    pub output_shape_rounding: OutputShapeRounding,
    pub padding_method: PaddingMethod,
}

impl Pooling2dDescriptor {
    pub fn new(pool_type: PoolingAlgorithm, pool_width: usize, pool_height: usize) -> Self {
        Pooling2dDescriptor {
            pool_type,
            pad_left: 0,
            pad_right: 0,
            pad_top: 0,
            pad_bottom: 0,
            pool_width,
            pool_height,
            stride_x: 1,
            stride_y: 1,
            output_shape_rounding: OutputShapeRounding::Floor,
            padding_method: PaddingMethod::Exclude,
        }
    }

    pub fn with_padding(mut self, left: usize, right: usize, top: usize, bottom: usize) -> Self {
        self.pad_left = left;
        self.pad_right = right;
        self.pad_top = top;
        self.pad_bottom = bottom;
        self
    }

    pub fn with_stride(mut self, x: usize, y: usize) -> Self {
        self.stride_x = x;
        self.stride_y = y;
        self
    }

    pub fn with_rounding(mut self, rounding: OutputShapeRounding) -> Self {
        self.output_shape_rounding = rounding;
        self
    }

    pub fn with_padding_method(mut self, method: PaddingMethod) -> Self {
        self.padding_method = method;
        self
    }

    pub fn infer_output_shape(&self, input: &Shape) -> Option<Shape> {
        if input.ndim() != 4 {
            return None;
        }
        let h = pool_output_dim(
            input.dim(2),
            self.pad_top + self.pad_bottom,
            self.pool_height,
            self.stride_y,
            self.output_shape_rounding,
        )?;
        let w = pool_output_dim(
            input.dim(3),
            self.pad_left + self.pad_right,
            self.pool_width,
            self.stride_x,
            self.output_shape_rounding,
        )?;
        Some(Shape::from([input.dim(0), input.dim(1), h, w]))
    }
}

/// `(input + padding - pool) / stride + 1` with the requested rounding.
pub fn pool_output_dim(
    input: usize,
    padding: usize,
    pool: usize,
    stride: usize,
    rounding: OutputShapeRounding,
) -> Option<usize> {
    if stride == 0 || pool == 0 {
        return None;
    }
    let padded = input + padding;
    if pool > padded {
        return None;
    }
    let span = padded - pool;
    let steps = match rounding {
        OutputShapeRounding::Floor => span / stride,
        OutputShapeRounding::Ceiling => span.div_ceil(stride),
    };
    Some(steps + 1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxDescriptor {
    pub beta: f32,
}

impl Default for SoftmaxDescriptor {
    fn default() -> Self {
        SoftmaxDescriptor { beta: 1.0 }
    }
}

/// Where one view starts within the full tensor, one coordinate per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOrigin(pub Vec<usize>);

impl ViewOrigin {
    pub fn coords(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for ViewOrigin {
    fn from(v: Vec<usize>) -> Self {
        ViewOrigin(v)
    }
}

/// One view origin per splitter output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitterDescriptor {
    pub views: Vec<ViewOrigin>,
}

impl SplitterDescriptor {
    pub fn new(views: Vec<ViewOrigin>) -> Self {
        SplitterDescriptor { views }
    }
}

/// One view origin per merger input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergerDescriptor {
    pub views: Vec<ViewOrigin>,
}

impl MergerDescriptor {
    pub fn new(views: Vec<ViewOrigin>) -> Self {
        MergerDescriptor { views }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeBilinearDescriptor {
    pub target_width: usize,
    pub target_height: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReshapeDescriptor {
    pub target_shape: Shape,
}

impl ReshapeDescriptor {
    pub fn new(target_shape: impl Into<Shape>) -> Self {
        ReshapeDescriptor {
            target_shape: target_shape.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conv_output_dim_reference_case() {
        // 8x16 input, 5x3 kernel, pads T/B 1 and L/R 3, stride y 4 and x 2.
        assert_eq!(conv_output_dim(8, 2, 5, 4, 1), Some(2));
        assert_eq!(conv_output_dim(16, 6, 3, 2, 1), Some(10));
    }

    #[test]
    fn test_conv_output_dim_dilation() {
        // 3-tap kernel with dilation 2 covers 5 inputs.
        assert_eq!(conv_output_dim(7, 0, 3, 1, 2), Some(3));
        assert_eq!(conv_output_dim(4, 0, 3, 1, 2), None);
    }

    #[test]
    fn test_conv_output_dim_rejects_zero_stride() {
        assert_eq!(conv_output_dim(8, 0, 3, 0, 1), None);
    }

    #[test]
    fn test_pool_output_dim_rounding() {
        assert_eq!(pool_output_dim(5, 2, 3, 3, OutputShapeRounding::Floor), Some(2));
        assert_eq!(pool_output_dim(5, 4, 3, 2, OutputShapeRounding::Floor), Some(4));
        // 6 / 4 rounds down to 1 or up to 2.
        assert_eq!(pool_output_dim(7, 2, 3, 4, OutputShapeRounding::Floor), Some(2));
        assert_eq!(pool_output_dim(7, 2, 3, 4, OutputShapeRounding::Ceiling), Some(3));
    }

    #[test]
    fn test_pooling_infer_reference_case() {
        let desc = Pooling2dDescriptor::new(PoolingAlgorithm::Average, 3, 3)
            .with_padding(2, 2, 1, 1)
            .with_stride(2, 3);
        let out = desc.infer_output_shape(&Shape::from([3, 2, 5, 5])).unwrap();
        assert_eq!(out.dims(), &[3, 2, 2, 4]);
    }

    #[test]
    fn test_convolution_infer_reference_case() {
        let weight = ConstTensor::from_f32([2, 3, 5, 3], vec![0.0; 90]);
        let window = ConvolutionWindow::default()
            .with_padding(3, 3, 1, 1)
            .with_stride(2, 4);
        let desc = Convolution2dDescriptor::new(weight, None, window);
        let out = desc.infer_output_shape(&Shape::from([2, 3, 8, 16])).unwrap();
        assert_eq!(out.dims(), &[2, 2, 2, 10]);
        assert!(!desc.bias_enabled());
    }

    #[test]
    fn test_depthwise_infer_multiplies_channels() {
        let weight = ConstTensor::from_f32([3, 3, 5, 3], vec![0.0; 135]);
        let window = ConvolutionWindow::default()
            .with_padding(3, 3, 1, 1)
            .with_stride(2, 4);
        let desc = DepthwiseConvolution2dDescriptor::new(weight, None, window);
        let out = desc.infer_output_shape(&Shape::from([2, 3, 8, 16])).unwrap();
        assert_eq!(out.dims(), &[2, 9, 2, 10]);
    }

    #[test]
    fn test_fully_connected_weight_dims() {
        let weight = ConstTensor::from_f32([7, 20], vec![0.0; 140]);
        let desc = FullyConnectedDescriptor::new(weight.clone(), None, true);
        assert_eq!(desc.weight_dims(), Some((20, 7)));
        let desc = FullyConnectedDescriptor::new(weight, None, false);
        assert_eq!(desc.weight_dims(), Some((7, 20)));
    }
}
