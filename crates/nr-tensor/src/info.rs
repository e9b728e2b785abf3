use std::fmt;

use crate::dtype::DataType;
use crate::error::{Result, TensorError};
use crate::shape::Shape;

/// Immutable description of a tensor: shape, data type and quantization.
///
/// Two infos compare equal when shape and data type match and, for quantized
/// types only, scale and offset match exactly.
#[derive(Debug, Clone)]
pub struct TensorInfo {
    shape: Shape,
    data_type: DataType,
    quantization_scale: f32,
    quantization_offset: i32,
}

impl TensorInfo {
    /// Create a tensor info with default quantization parameters `(1.0, 0)`.
    ///
    /// # Panics
    /// Panics if the shape has no dimensions or a zero-sized dimension. Use
    /// [`TensorInfo::try_new`] for untrusted shapes.
    pub fn new(shape: impl Into<Shape>, data_type: DataType) -> Self {
        let shape = shape.into();
        assert!(
            shape.is_valid_tensor_shape(),
            "invalid tensor shape {}",
            shape
        );
        TensorInfo {
            shape,
            data_type,
            quantization_scale: 1.0,
            quantization_offset: 0,
        }
    }

    /// Fallible variant of [`TensorInfo::new`].
    pub fn try_new(shape: impl Into<Shape>, data_type: DataType) -> Result<Self> {
        let shape = shape.into();
        if !shape.is_valid_tensor_shape() {
            return Err(TensorError::InvalidShape(shape.dims().to_vec()));
        }
        Ok(TensorInfo {
            shape,
            data_type,
            quantization_scale: 1.0,
            quantization_offset: 0,
        })
    }

    /// Create a quantized tensor info.
    ///
    /// # Panics
    /// Same conditions as [`TensorInfo::new`].
    pub fn quantized(shape: impl Into<Shape>, data_type: DataType, scale: f32, offset: i32) -> Self {
        TensorInfo::new(shape, data_type).with_quantization(scale, offset)
    }

    /// Returns a copy with the given quantization parameters.
    pub fn with_quantization(mut self, scale: f32, offset: i32) -> Self {
        self.quantization_scale = scale;
        self.quantization_offset = offset;
        self
    }

    /// Returns a copy with a different shape but the same type and quantization.
    pub fn with_shape(&self, shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        assert!(
            shape.is_valid_tensor_shape(),
            "invalid tensor shape {}",
            shape
        );
        TensorInfo {
            shape,
            ..self.clone()
        }
    }

    /// Fallible variant of [`TensorInfo::with_shape`].
    pub fn try_with_shape(&self, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if !shape.is_valid_tensor_shape() {
            return Err(TensorError::InvalidShape(shape.dims().to_vec()));
        }
        Ok(TensorInfo {
            shape,
            ..self.clone()
        })
    }

    /// Returns a copy with a different data type, keeping shape and quantization.
    pub fn with_data_type(&self, data_type: DataType) -> Self {
        TensorInfo {
            data_type,
            ..self.clone()
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn quantization_scale(&self) -> f32 {
        self.quantization_scale
    }

    pub fn quantization_offset(&self) -> i32 {
        self.quantization_offset
    }

    pub fn num_dimensions(&self) -> usize {
        self.shape.ndim()
    }

    pub fn num_elements(&self) -> usize {
        self.shape.numel()
    }

    /// Number of bytes needed to hold the tensor contiguously.
    pub fn num_bytes(&self) -> usize {
        self.num_elements() * self.data_type.size_in_bytes()
    }

    /// Like [`TensorInfo::num_bytes`] but returns `None` on overflow.
    pub fn checked_num_bytes(&self) -> Option<usize> {
        self.shape
            .checked_numel()
            .and_then(|n| n.checked_mul(self.data_type.size_in_bytes()))
    }

    /// True when scale and offset match, regardless of data type.
    pub fn same_quantization(&self, other: &TensorInfo) -> bool {
        self.quantization_scale == other.quantization_scale
            && self.quantization_offset == other.quantization_offset
    }
}

impl PartialEq for TensorInfo {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape || self.data_type != other.data_type {
            return false;
        }
        !self.data_type.is_quantized() || self.same_quantization(other)
    }
}

impl fmt::Display for TensorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.shape, self.data_type)?;
        if self.data_type.is_quantized() {
            write!(
                f,
                " (scale={}, offset={})",
                self.quantization_scale, self.quantization_offset
            )?;
        }
        Ok(())
    }
}
