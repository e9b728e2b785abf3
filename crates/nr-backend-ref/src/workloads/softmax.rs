use nr_tensor::TensorArena;
use nr_workload::{Result, SoftmaxDescriptor};

use super::ref_workload;
use crate::kernels::softmax::softmax;
use crate::repr::{Float32, Representation, Uint8};

ref_workload!(RefSoftmaxWorkload<R>, SoftmaxDescriptor);

impl<R: Representation> RefSoftmaxWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let (input, output) = (&d.inputs[0], &d.outputs[0]);
        let shape = input.info().shape();
        let depth = shape.dim(shape.ndim() - 1);
        let values = R::read(arena, input)?;
        R::write(arena, output, &softmax(&values, depth, d.parameters.beta))
    }
}

pub type RefSoftmaxFloat32Workload = RefSoftmaxWorkload<Float32>;
pub type RefSoftmaxUint8Workload = RefSoftmaxWorkload<Uint8>;
