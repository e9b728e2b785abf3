use half::f16;
use nr_tensor::{CpuStorage, DataType, TensorArena};
use nr_workload::{ConvertFp16ToFp32Descriptor, ConvertFp32ToFp16Descriptor, Result};

use super::ref_workload;

ref_workload!(
    /// Widens Float16 input to Float32 output.
    RefConvertFp16ToFp32Workload,
    ConvertFp16ToFp32Descriptor,
    DataType::Float16
);

impl RefConvertFp16ToFp32Workload {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let input = arena.read(&d.inputs[0])?;
        let widened: Vec<f32> = input.as_f16_slice()?.iter().map(|h| h.to_f32()).collect();
        Ok(arena.write_f32(&d.outputs[0], &widened)?)
    }
}

ref_workload!(
    /// Narrows Float32 input to Float16 output, rounding to nearest even.
    RefConvertFp32ToFp16Workload,
    ConvertFp32ToFp16Descriptor,
    DataType::Float32
);

impl RefConvertFp32ToFp16Workload {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let input = arena.read_f32(&d.inputs[0])?;
        let narrowed: Vec<f16> = input.iter().map(|&v| f16::from_f32(v)).collect();
        Ok(arena.write(&d.outputs[0], &CpuStorage::F16(narrowed))?)
    }
}
