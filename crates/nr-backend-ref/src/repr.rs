use std::fmt::Debug;

use nr_tensor::quantize::{dequantize_slice, quantize_slice};
use nr_tensor::{DataType, TensorArena, TensorHandle};
use nr_workload::Result;

/// How a workload family moves element values in and out of the arena.
///
/// Kernels compute in f32; the representation decides how handle bytes map
/// to and from those values.
pub trait Representation: Send + Sync + Debug + 'static {
    const DATA_TYPE: DataType;

    /// Suffix used in workload names.
    const NAME: &'static str;

    fn read(arena: &TensorArena, handle: &TensorHandle) -> Result<Vec<f32>>;

    fn write(arena: &mut TensorArena, handle: &TensorHandle, values: &[f32]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Float32;

impl Representation for Float32 {
    const DATA_TYPE: DataType = DataType::Float32;
    const NAME: &'static str = "Float32";

    fn read(arena: &TensorArena, handle: &TensorHandle) -> Result<Vec<f32>> {
        Ok(arena.read_f32(handle)?)
    }

    fn write(arena: &mut TensorArena, handle: &TensorHandle, values: &[f32]) -> Result<()> {
        Ok(arena.write_f32(handle, values)?)
    }
}

/// Asymmetric 8-bit values, each handle dequantized with its own scale and
/// offset. Writes round to nearest and saturate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uint8;

impl Representation for Uint8 {
    const DATA_TYPE: DataType = DataType::QuantisedAsymm8;
    const NAME: &'static str = "Uint8";

    fn read(arena: &TensorArena, handle: &TensorHandle) -> Result<Vec<f32>> {
        let info = handle.info();
        let raw = arena.read_u8(handle)?;
        Ok(dequantize_slice(
            &raw,
            info.quantization_scale(),
            info.quantization_offset(),
        ))
    }

    fn write(arena: &mut TensorArena, handle: &TensorHandle, values: &[f32]) -> Result<()> {
        let info = handle.info();
        let raw = quantize_slice(values, info.quantization_scale(), info.quantization_offset());
        Ok(arena.write_u8(handle, &raw)?)
    }
}
