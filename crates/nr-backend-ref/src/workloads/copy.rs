//! Layers that move raw bytes without touching element values.
//!
//! A splitter output or merger input that is already a view of exactly its
//! region of the parent tensor needs no copy; those are skipped.

use nr_tensor::{TensorArena, TensorHandle};
use nr_workload::{MemCopyDescriptor, MergerDescriptor, ReshapeDescriptor, Result, SplitterDescriptor};
use tracing::trace;

use super::ref_workload;
use crate::kernels::region::{copy_region, is_exact_region};
use crate::repr::{Float32, Representation, Uint8};

ref_workload!(RefSplitterWorkload<R>, SplitterDescriptor);

impl<R: Representation> RefSplitterWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let input = &d.inputs[0];
        let pending: Vec<(&TensorHandle, &[usize])> = d
            .outputs
            .iter()
            .zip(&d.parameters.views)
            .map(|(output, view)| (output, view.coords()))
            .filter(|(output, origin)| !is_exact_region(input, output, origin))
            .collect();
        trace!(
            workload = %self.name,
            copied = pending.len(),
            aliased = d.outputs.len() - pending.len(),
            "split"
        );
        if pending.is_empty() {
            return Ok(());
        }

        let source = arena.bytes(input)?.to_vec();
        let width = input.info().data_type().size_in_bytes();
        for (output, origin) in pending {
            let shape = output.info().shape();
            let zero = vec![0; shape.ndim()];
            copy_region(
                &source,
                input.info().shape(),
                origin,
                arena.bytes_mut(output)?,
                shape,
                &zero,
                shape,
                width,
            );
        }
        Ok(())
    }
}

pub type RefSplitterFloat32Workload = RefSplitterWorkload<Float32>;
pub type RefSplitterUint8Workload = RefSplitterWorkload<Uint8>;

ref_workload!(RefMergerWorkload<R>, MergerDescriptor);

impl<R: Representation> RefMergerWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        let output = &d.outputs[0];
        let width = output.info().data_type().size_in_bytes();

        // Inputs may be views into the output away from their own region, so
        // every source is read before any region is written.
        let pending = d
            .inputs
            .iter()
            .zip(&d.parameters.views)
            .filter(|(input, view)| !is_exact_region(output, input, view.coords()))
            .map(|(input, view)| -> Result<_> {
                Ok((input, view.coords(), arena.bytes(input)?.to_vec()))
            })
            .collect::<Result<Vec<_>>>()?;
        trace!(
            workload = %self.name,
            copied = pending.len(),
            aliased = d.inputs.len() - pending.len(),
            "merge"
        );

        for (input, origin, source) in pending {
            let shape = input.info().shape();
            let zero = vec![0; shape.ndim()];
            copy_region(
                &source,
                shape,
                &zero,
                arena.bytes_mut(output)?,
                output.info().shape(),
                origin,
                shape,
                width,
            );
        }
        Ok(())
    }
}

pub type RefMergerFloat32Workload = RefMergerWorkload<Float32>;
pub type RefMergerUint8Workload = RefMergerWorkload<Uint8>;

ref_workload!(RefReshapeWorkload<R>, ReshapeDescriptor);

impl<R: Representation> RefReshapeWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        Ok(arena.copy(&d.inputs[0], &d.outputs[0])?)
    }
}

pub type RefReshapeFloat32Workload = RefReshapeWorkload<Float32>;
pub type RefReshapeUint8Workload = RefReshapeWorkload<Uint8>;

ref_workload!(RefMemCopyWorkload<R>, MemCopyDescriptor);

impl<R: Representation> RefMemCopyWorkload<R> {
    fn run(&self, arena: &mut TensorArena) -> Result<()> {
        let d = self.data();
        Ok(arena.copy(&d.inputs[0], &d.outputs[0])?)
    }
}

pub type RefMemCopyFloat32Workload = RefMemCopyWorkload<Float32>;
pub type RefMemCopyUint8Workload = RefMemCopyWorkload<Uint8>;
