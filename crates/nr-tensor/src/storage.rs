use half::f16;

use crate::dtype::DataType;
use crate::error::{Result, TensorError};

/// Typed CPU-side element storage.
///
/// Arena allocations are raw little-endian bytes; `CpuStorage` is the typed
/// form used when a workload or caller reads or writes a tensor's elements.
#[derive(Debug, Clone, PartialEq)]
pub enum CpuStorage {
    /// 16-bit floating point storage.
    F16(Vec<f16>),
    /// 32-bit floating point storage.
    F32(Vec<f32>),
    /// Raw quantized 8-bit storage.
    U8(Vec<u8>),
    /// 32-bit signed integer storage.
    I32(Vec<i32>),
}

impl CpuStorage {
    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        match self {
            CpuStorage::F16(v) => v.len(),
            CpuStorage::F32(v) => v.len(),
            CpuStorage::U8(v) => v.len(),
            CpuStorage::I32(v) => v.len(),
        }
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the data type of this storage.
    pub fn data_type(&self) -> DataType {
        match self {
            CpuStorage::F16(_) => DataType::Float16,
            CpuStorage::F32(_) => DataType::Float32,
            CpuStorage::U8(_) => DataType::QuantisedAsymm8,
            CpuStorage::I32(_) => DataType::Signed32,
        }
    }

    /// Returns the data as an f32 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not F32.
    pub fn as_f32_slice(&self) -> Result<&[f32]> {
        match self {
            CpuStorage::F32(v) => Ok(v.as_slice()),
            other => Err(TensorError::DataTypeMismatch {
                expected: DataType::Float32,
                got: other.data_type(),
            }),
        }
    }

    /// Returns the data as a u8 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not U8.
    pub fn as_u8_slice(&self) -> Result<&[u8]> {
        match self {
            CpuStorage::U8(v) => Ok(v.as_slice()),
            other => Err(TensorError::DataTypeMismatch {
                expected: DataType::QuantisedAsymm8,
                got: other.data_type(),
            }),
        }
    }

    /// Returns the data as an i32 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not I32.
    pub fn as_i32_slice(&self) -> Result<&[i32]> {
        match self {
            CpuStorage::I32(v) => Ok(v.as_slice()),
            other => Err(TensorError::DataTypeMismatch {
                expected: DataType::Signed32,
                got: other.data_type(),
            }),
        }
    }

    /// Returns the data as an f16 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not F16.
    pub fn as_f16_slice(&self) -> Result<&[f16]> {
        match self {
            CpuStorage::F16(v) => Ok(v.as_slice()),
            other => Err(TensorError::DataTypeMismatch {
                expected: DataType::Float16,
                got: other.data_type(),
            }),
        }
    }

    /// Create zero-filled storage for the given data type and element count.
    pub fn zeros(data_type: DataType, n: usize) -> Self {
        match data_type {
            DataType::Float16 => CpuStorage::F16(vec![f16::ZERO; n]),
            DataType::Float32 => CpuStorage::F32(vec![0.0; n]),
            DataType::QuantisedAsymm8 => CpuStorage::U8(vec![0; n]),
            DataType::Signed32 => CpuStorage::I32(vec![0; n]),
        }
    }

    /// Decode little-endian bytes into typed storage.
    ///
    /// # Errors
    /// Returns an error if `bytes.len()` is not a multiple of the element width.
    pub fn from_le_bytes(data_type: DataType, bytes: &[u8]) -> Result<Self> {
        let width = data_type.size_in_bytes();
        if bytes.len() % width != 0 {
            return Err(TensorError::Other(format!(
                "{} bytes is not a whole number of {} elements",
                bytes.len(),
                data_type
            )));
        }
        let storage = match data_type {
            DataType::Float16 => CpuStorage::F16(
                bytes
                    .chunks_exact(2)
                    .map(|c| f16::from_le_bytes([c[0], c[1]]))
                    .collect(),
            ),
            DataType::Float32 => CpuStorage::F32(
                bytes
                    .chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            DataType::QuantisedAsymm8 => CpuStorage::U8(bytes.to_vec()),
            DataType::Signed32 => CpuStorage::I32(
                bytes
                    .chunks_exact(4)
                    .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
        };
        Ok(storage)
    }

    /// Encode this storage into `out` as little-endian bytes.
    ///
    /// # Errors
    /// Returns an error if `out` is not exactly the encoded size.
    pub fn write_le_bytes(&self, out: &mut [u8]) -> Result<()> {
        let expected = self.len() * self.data_type().size_in_bytes();
        if out.len() != expected {
            return Err(TensorError::Other(format!(
                "destination holds {} bytes but storage encodes to {}",
                out.len(),
                expected
            )));
        }
        match self {
            CpuStorage::F16(v) => {
                for (dst, x) in out.chunks_exact_mut(2).zip(v) {
                    dst.copy_from_slice(&x.to_le_bytes());
                }
            }
            CpuStorage::F32(v) => {
                for (dst, x) in out.chunks_exact_mut(4).zip(v) {
                    dst.copy_from_slice(&x.to_le_bytes());
                }
            }
            CpuStorage::U8(v) => out.copy_from_slice(v),
            CpuStorage::I32(v) => {
                for (dst, x) in out.chunks_exact_mut(4).zip(v) {
                    dst.copy_from_slice(&x.to_le_bytes());
                }
            }
        }
        Ok(())
    }

    /// Encode this storage into a fresh byte vector.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.len() * self.data_type().size_in_bytes()];
        // Sized above, cannot fail.
        let _ = self.write_le_bytes(&mut out);
        out
    }
}

impl From<Vec<f32>> for CpuStorage {
    fn from(v: Vec<f32>) -> Self {
        CpuStorage::F32(v)
    }
}

impl From<Vec<u8>> for CpuStorage {
    fn from(v: Vec<u8>) -> Self {
        CpuStorage::U8(v)
    }
}

impl From<Vec<i32>> for CpuStorage {
    fn from(v: Vec<i32>) -> Self {
        CpuStorage::I32(v)
    }
}

impl From<Vec<f16>> for CpuStorage {
    fn from(v: Vec<f16>) -> Self {
        CpuStorage::F16(v)
    }
}
