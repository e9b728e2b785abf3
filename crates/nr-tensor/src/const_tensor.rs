use std::sync::Arc;

use crate::dtype::DataType;
use crate::error::{Result, TensorError};
use crate::info::TensorInfo;
use crate::quantize;
use crate::shape::Shape;
use crate::storage::CpuStorage;

/// An immutable tensor with its own storage, used for layer parameters
/// such as weights, biases and batch-norm statistics.
///
/// The storage is shared behind an `Arc`, so cloning a descriptor that holds
/// weights never copies them.
#[derive(Debug, Clone)]
pub struct ConstTensor {
    info: TensorInfo,
    storage: Arc<CpuStorage>,
}

impl ConstTensor {
    /// Create a constant tensor from an info and matching storage.
    ///
    /// # Errors
    /// Fails if the storage type or element count disagrees with `info`.
    pub fn new(info: TensorInfo, storage: CpuStorage) -> Result<Self> {
        if storage.data_type() != info.data_type() {
            return Err(TensorError::DataTypeMismatch {
                expected: info.data_type(),
                got: storage.data_type(),
            });
        }
        if storage.len() != info.num_elements() {
            return Err(TensorError::Other(format!(
                "constant tensor {} needs {} elements, got {}",
                info,
                info.num_elements(),
                storage.len()
            )));
        }
        Ok(ConstTensor {
            info,
            storage: Arc::new(storage),
        })
    }

    /// Create a Float32 constant tensor.
    ///
    /// # Panics
    /// Panics if `data.len() != shape.numel()` or the shape is invalid.
    pub fn from_f32(shape: impl Into<Shape>, data: Vec<f32>) -> Self {
        let shape = shape.into();
        assert_eq!(
            data.len(),
            shape.numel(),
            "data length {} does not match shape {} (numel={})",
            data.len(),
            shape,
            shape.numel()
        );
        ConstTensor {
            info: TensorInfo::new(shape, DataType::Float32),
            storage: Arc::new(CpuStorage::F32(data)),
        }
    }

    /// Create a zero-filled constant of the given info.
    pub fn zeros(info: TensorInfo) -> Self {
        let storage = CpuStorage::zeros(info.data_type(), info.num_elements());
        ConstTensor {
            info,
            storage: Arc::new(storage),
        }
    }

    pub fn info(&self) -> &TensorInfo {
        &self.info
    }

    pub fn shape(&self) -> &Shape {
        self.info.shape()
    }

    pub fn data_type(&self) -> DataType {
        self.info.data_type()
    }

    pub fn storage(&self) -> &CpuStorage {
        &self.storage
    }

    /// Returns the values as f32, dequantizing with this tensor's own
    /// quantization parameters where needed.
    pub fn to_f32(&self) -> Vec<f32> {
        let scale = self.info.quantization_scale();
        let offset = self.info.quantization_offset();
        match self.storage.as_ref() {
            CpuStorage::F32(v) => v.clone(),
            CpuStorage::F16(v) => v.iter().map(|h| h.to_f32()).collect(),
            CpuStorage::U8(v) => quantize::dequantize_slice(v, scale, offset),
            CpuStorage::I32(v) => v
                .iter()
                .map(|&x| scale * (x as i64 - offset as i64) as f32)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f32() {
        let t = ConstTensor::from_f32([2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(t.shape().dims(), &[2, 3]);
        assert_eq!(t.data_type(), DataType::Float32);
        assert_eq!(t.to_f32(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    #[should_panic]
    fn test_from_f32_len_mismatch_panics() {
        let _t = ConstTensor::from_f32([3], vec![1.0, 2.0]);
    }

    #[test]
    fn test_new_type_mismatch() {
        let info = TensorInfo::new([2], DataType::Float32);
        let err = ConstTensor::new(info, CpuStorage::from(vec![1u8, 2])).unwrap_err();
        assert!(matches!(err, TensorError::DataTypeMismatch { .. }));
    }

    #[test]
    fn test_quantized_to_f32() {
        let info = TensorInfo::quantized([3], DataType::QuantisedAsymm8, 0.5, 2);
        let t = ConstTensor::new(info, CpuStorage::from(vec![2u8, 4, 6])).unwrap();
        assert_eq!(t.to_f32(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_signed32_to_f32() {
        let info = TensorInfo::new([2], DataType::Signed32).with_quantization(0.25, 0);
        let t = ConstTensor::new(info, CpuStorage::from(vec![4i32, -8])).unwrap();
        assert_eq!(t.to_f32(), vec![1.0, -2.0]);
    }

    #[test]
    fn test_clone_shares_storage() {
        let t = ConstTensor::from_f32([2], vec![1.0, 2.0]);
        let c = t.clone();
        assert!(std::ptr::eq(t.storage(), c.storage()));
    }
}
