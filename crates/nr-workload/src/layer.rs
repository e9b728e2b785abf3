use std::fmt;

/// Operation kinds a workload can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Activation,
    Addition,
    BatchNormalization,
    ConvertFp16ToFp32,
    ConvertFp32ToFp16,
    Convolution2d,
    DepthwiseConvolution2d,
    Floor,
    FullyConnected,
    L2Normalization,
    MemCopy,
    Merger,
    Multiplication,
    Normalization,
    Pooling2d,
    Reshape,
    ResizeBilinear,
    Softmax,
    Splitter,
}

/// Number of tensors a layer accepts on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    /// Variable count, at least this many. The exact count is fixed by the
    /// layer's view list.
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exactly(k) => n == k,
            Arity::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(k) => write!(f, "exactly {}", k),
            Arity::AtLeast(k) => write!(f, "at least {}", k),
        }
    }
}

impl LayerType {
    pub const ALL: [LayerType; 19] = [
        LayerType::Activation,
        LayerType::Addition,
        LayerType::BatchNormalization,
        LayerType::ConvertFp16ToFp32,
        LayerType::ConvertFp32ToFp16,
        LayerType::Convolution2d,
        LayerType::DepthwiseConvolution2d,
        LayerType::Floor,
        LayerType::FullyConnected,
        LayerType::L2Normalization,
        LayerType::MemCopy,
        LayerType::Merger,
        LayerType::Multiplication,
        LayerType::Normalization,
        LayerType::Pooling2d,
        LayerType::Reshape,
        LayerType::ResizeBilinear,
        LayerType::Softmax,
        LayerType::Splitter,
    ];

    pub fn input_arity(&self) -> Arity {
        match self {
            LayerType::Addition | LayerType::Multiplication => Arity::Exactly(2),
            LayerType::Merger => Arity::AtLeast(1),
            _ => Arity::Exactly(1),
        }
    }

    pub fn output_arity(&self) -> Arity {
        match self {
            LayerType::Splitter => Arity::AtLeast(1),
            _ => Arity::Exactly(1),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayerType::Activation => "Activation",
            LayerType::Addition => "Addition",
            LayerType::BatchNormalization => "BatchNormalization",
            LayerType::ConvertFp16ToFp32 => "ConvertFp16ToFp32",
            LayerType::ConvertFp32ToFp16 => "ConvertFp32ToFp16",
            LayerType::Convolution2d => "Convolution2d",
            LayerType::DepthwiseConvolution2d => "DepthwiseConvolution2d",
            LayerType::Floor => "Floor",
            LayerType::FullyConnected => "FullyConnected",
            LayerType::L2Normalization => "L2Normalization",
            LayerType::MemCopy => "MemCopy",
            LayerType::Merger => "Merger",
            LayerType::Multiplication => "Multiplication",
            LayerType::Normalization => "Normalization",
            LayerType::Pooling2d => "Pooling2d",
            LayerType::Reshape => "Reshape",
            LayerType::ResizeBilinear => "ResizeBilinear",
            LayerType::Softmax => "Softmax",
            LayerType::Splitter => "Splitter",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
