use nr_tensor::TensorArena;
use nr_workload::{ActivationDescriptor, FloorDescriptor, Result};

use super::ref_workload;
use crate::kernels::activation;
use crate::repr::{Float32, Representation, Uint8};

ref_workload!(RefActivationWorkload<R>, ActivationDescriptor);

impl<R: Representation> RefActivationWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let p = &d.parameters;
        let input = R::read(arena, &d.inputs[0])?;
        let output = activation::activation(&input, p.function, p.a, p.b);
        R::write(arena, &d.outputs[0], &output)
    }
}

pub type RefActivationFloat32Workload = RefActivationWorkload<Float32>;
pub type RefActivationUint8Workload = RefActivationWorkload<Uint8>;

ref_workload!(RefFloorWorkload<R>, FloorDescriptor);

impl<R: Representation> RefFloorWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let input = R::read(arena, &d.inputs[0])?;
        R::write(arena, &d.outputs[0], &activation::floor(&input))
    }
}

pub type RefFloorFloat32Workload = RefFloorWorkload<Float32>;
