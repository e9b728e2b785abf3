use nr_tensor::TensorArena;
use nr_workload::{Pooling2dDescriptor, Result};

use super::ref_workload;
use crate::kernels::pooling::pooling2d;
use crate::repr::{Float32, Representation, Uint8};

ref_workload!(RefPooling2dWorkload<R>, Pooling2dDescriptor);

impl<R: Representation> RefPooling2dWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let (input, output) = (&d.inputs[0], &d.outputs[0]);
        let values = R::read(arena, input)?;
        let result = pooling2d(&values, input.info().shape(), &d.parameters, output.info().shape());
        R::write(arena, output, &result)
    }
}

pub type RefPooling2dFloat32Workload = RefPooling2dWorkload<Float32>;
pub type RefPooling2dUint8Workload = RefPooling2dWorkload<Uint8>;
