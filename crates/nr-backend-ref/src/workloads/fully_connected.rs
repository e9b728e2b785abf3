use nr_tensor::TensorArena;
use nr_workload::{FullyConnectedDescriptor, Result, WorkloadError};

use super::ref_workload;
use crate::kernels::fully_connected::fully_connected;
use crate::repr::{Float32, Representation, Uint8};

ref_workload!(RefFullyConnectedWorkload<R>, FullyConnectedDescriptor);

impl<R: Representation> RefFullyConnectedWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let p = &d.parameters;
        let (input, output) = (&d.inputs[0], &d.outputs[0]);
        let (inputs, outputs) = p.weight_dims().ok_or_else(|| WorkloadError::Execution {
            layer: self.base.layer_type(),
            reason: "weight is not a matrix".to_string(),
        })?;
        let values = R::read(arena, input)?;
        let weight = p.weight.to_f32();
        let bias = p.bias.as_ref().map(|b| b.to_f32());
        let result = fully_connected(
            &values,
            input.info().shape().dim(0),
            &weight,
            inputs,
            outputs,
            p.transpose_weight_matrix,
            bias.as_deref(),
        );
        R::write(arena, output, &result)
    }
}

pub type RefFullyConnectedFloat32Workload = RefFullyConnectedWorkload<Float32>;
pub type RefFullyConnectedUint8Workload = RefFullyConnectedWorkload<Uint8>;
