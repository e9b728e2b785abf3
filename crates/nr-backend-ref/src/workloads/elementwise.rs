use nr_tensor::TensorArena;
use nr_workload::{AdditionDescriptor, MultiplicationDescriptor, QueueDescriptor, Result};

use super::ref_workload;
use crate::kernels::elementwise::broadcast_binary;
use crate::repr::{Float32, Representation, Uint8};

fn run_binary<R: Representation, P>(
    d: &QueueDescriptor<P>,
    arena: &mut TensorArena,
    op: impl Fn(f32, f32) -> f32,
) -> Result<()> {
    let (a, b, out) = (&d.inputs[0], &d.inputs[1], &d.outputs[0]);
    let lhs = R::read(arena, a)?;
    let rhs = R::read(arena, b)?;
    let result = broadcast_binary(
        &lhs,
        a.info().shape(),
        &rhs,
        b.info().shape(),
        out.info().shape(),
        op,
    );
    R::write(arena, out, &result)
}

ref_workload!(RefAdditionWorkload<R>, AdditionDescriptor);

impl<R: Representation> RefAdditionWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        run_binary::<R, _>(self.data(), arena, |x, y| x + y)
    }
}

pub type RefAdditionFloat32Workload = RefAdditionWorkload<Float32>;
pub type RefAdditionUint8Workload = RefAdditionWorkload<Uint8>;

ref_workload!(RefMultiplicationWorkload<R>, MultiplicationDescriptor);

impl<R: Representation> RefMultiplicationWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        run_binary::<R, _>(self.data(), arena, |x, y| x * y)
    }
}

pub type RefMultiplicationFloat32Workload = RefMultiplicationWorkload<Float32>;
pub type RefMultiplicationUint8Workload = RefMultiplicationWorkload<Uint8>;
