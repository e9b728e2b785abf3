use nr_tensor::TensorArena;
use nr_workload::{
    BatchNormalizationDescriptor, L2NormalizationDescriptor, NormalizationDescriptor, Result,
};

use super::ref_workload;
use crate::kernels::normalization::{self, BatchStats};
use crate::repr::{Float32, Representation};

ref_workload!(RefBatchNormalizationWorkload<R>, BatchNormalizationDescriptor);

impl<R: Representation> RefBatchNormalizationWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let p = &d.parameters;
        let (input, output) = (&d.inputs[0], &d.outputs[0]);
        let (mean, variance, beta, gamma) = (
            p.mean.to_f32(),
            p.variance.to_f32(),
            p.beta.to_f32(),
            p.gamma.to_f32(),
        );
        let stats = BatchStats {
            mean: &mean,
            variance: &variance,
            beta: &beta,
            gamma: &gamma,
        };
        let values = R::read(arena, input)?;
        let result = normalization::batch_normalization(&values, input.info().shape(), &stats, p.eps);
        R::write(arena, output, &result)
    }
}

pub type RefBatchNormalizationFloat32Workload = RefBatchNormalizationWorkload<Float32>;

ref_workload!(RefNormalizationWorkload<R>, NormalizationDescriptor);

impl<R: Representation> RefNormalizationWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let (input, output) = (&d.inputs[0], &d.outputs[0]);
        let values = R::read(arena, input)?;
        let result = normalization::local_response(&values, input.info().shape(), &d.parameters);
        R::write(arena, output, &result)
    }
}

pub type RefNormalizationFloat32Workload = RefNormalizationWorkload<Float32>;

ref_workload!(RefL2NormalizationWorkload<R>, L2NormalizationDescriptor);

impl<R: Representation> RefL2NormalizationWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let (input, output) = (&d.inputs[0], &d.outputs[0]);
        let values = R::read(arena, input)?;
        let result = normalization::l2_normalization(&values, input.info().shape(), d.parameters.eps);
        R::write(arena, output, &result)
    }
}

pub type RefL2NormalizationFloat32Workload = RefL2NormalizationWorkload<Float32>;
