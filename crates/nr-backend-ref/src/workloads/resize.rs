use nr_tensor::TensorArena;
use nr_workload::{ResizeBilinearDescriptor, Result};

use super::ref_workload;
use crate::kernels::resize::resize_bilinear;
use crate::repr::{Float32, Representation, Uint8};

ref_workload!(RefResizeBilinearWorkload<R>, ResizeBilinearDescriptor);

impl<R: Representation> RefResizeBilinearWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let (input, output) = (&d.inputs[0], &d.outputs[0]);
        let values = R::read(arena, input)?;
        let result = resize_bilinear(&values, input.info().shape(), output.info().shape());
        R::write(arena, output, &result)
    }
}

pub type RefResizeBilinearFloat32Workload = RefResizeBilinearWorkload<Float32>;
pub type RefResizeBilinearUint8Workload = RefResizeBilinearWorkload<Uint8>;
