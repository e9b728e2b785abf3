use nr_tensor::TensorArena;
use nr_workload::{Convolution2dDescriptor, DepthwiseConvolution2dDescriptor, Result};

use super::ref_workload;
use crate::kernels::conv;
use crate::repr::{Float32, Representation, Uint8};

ref_workload!(
    /// Weights and bias are dequantized with their own parameters, so a
    /// quantized layer accumulates in f32 before requantizing the output.
    RefConvolution2dWorkload<R>,
    Convolution2dDescriptor
);

impl<R: Representation> RefConvolution2dWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let p = &d.parameters;
        let (input, output) = (&d.inputs[0], &d.outputs[0]);
        let values = R::read(arena, input)?;
        let weight = p.weight.to_f32();
        let bias = p.bias.as_ref().map(|b| b.to_f32());
        let result = conv::convolution2d(
            &values,
            input.info().shape(),
            &weight,
            p.weight.shape(),
            bias.as_deref(),
            &p.window,
            output.info().shape(),
        );
        R::write(arena, output, &result)
    }
}

pub type RefConvolution2dFloat32Workload = RefConvolution2dWorkload<Float32>;
pub type RefConvolution2dUint8Workload = RefConvolution2dWorkload<Uint8>;

ref_workload!(RefDepthwiseConvolution2dWorkload<R>, DepthwiseConvolution2dDescriptor);

impl<R: Representation> RefDepthwiseConvolution2dWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let p = &d.parameters;
        let (input, output) = (&d.inputs[0], &d.outputs[0]);
        let values = R::read(arena, input)?;
        let weight = p.weight.to_f32();
        let bias = p.bias.as_ref().map(|b| b.to_f32());
        let result = conv::depthwise_convolution2d(
            &values,
            input.info().shape(),
            &weight,
            p.weight.shape(),
            bias.as_deref(),
            &p.window,
            output.info().shape(),
        );
        R::write(arena, output, &result)
    }
}

pub type RefDepthwiseConvolution2dFloat32Workload = RefDepthwiseConvolution2dWorkload<Float32>;
pub type RefDepthwiseConvolution2dUint8Workload = RefDepthwiseConvolution2dWorkload<Uint8>;
