use std::fmt;

/// Element data types a tensor can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 16-bit floating point (IEEE 754 half-precision, via the `half` crate).
    Float16,
    /// 32-bit floating point.
    Float32,
    /// 8-bit asymmetric quantized: `real = scale * (q - offset)`.
    QuantisedAsymm8,
    /// 32-bit signed integer. Used for quantized biases.
    Signed32,
}

impl DataType {
    /// Returns the size in bytes of a single element.
    ///
    /// - Float16: 2 bytes
    /// - Float32: 4 bytes
    /// - QuantisedAsymm8: 1 byte
    /// - Signed32: 4 bytes
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DataType::Float16 => 2,
            DataType::Float32 => 4,
            DataType::QuantisedAsymm8 => 1,
            DataType::Signed32 => 4,
        }
    }

    /// Returns true if this data type carries quantization parameters.
    pub fn is_quantized(&self) -> bool {
        matches!(self, DataType::QuantisedAsymm8)
    }

    /// Returns true for the floating point types.
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float16 | DataType::Float32)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Float16 => write!(f, "Float16"),
            DataType::Float32 => write!(f, "Float32"),
            DataType::QuantisedAsymm8 => write!(f, "QuantisedAsymm8"),
            DataType::Signed32 => write!(f, "Signed32"),
        }
    }
}
