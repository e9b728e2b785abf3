use std::sync::Arc;

use nr_tensor::{DataType, Shape, TensorArena, TensorHandle, TensorInfo};
use nr_workload::{LayerDescriptor, Workload, WorkloadError, WorkloadFactory};
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::registry::BackendRegistry;

/// Builds the workloads of one network, layer by layer, in execution order.
///
/// Each layer goes to the first backend in the configured preference order
/// that supports it. Construction is fail-fast: after any layer fails, every
/// further `add_layer` and the final `build` return
/// [`RuntimeError::ConstructionFailed`].
#[derive(Debug)]
pub struct NetworkBuilder {
    backends: Vec<Arc<dyn WorkloadFactory>>,
    config: RuntimeConfig,
    arena: TensorArena,
    workloads: Vec<(String, Box<dyn Workload>)>,
    failure: Option<String>,
}

impl NetworkBuilder {
    /// # Errors
    /// [`RuntimeError::UnknownBackend`] if a preferred backend is not in the
    /// registry.
    pub fn new(registry: &BackendRegistry, config: RuntimeConfig) -> Result<Self> {
        let backends = config
            .backend_preferences
            .iter()
            .map(|id| {
                registry
                    .get(id)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnknownBackend(id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let arena = match config.arena_limit {
            Some(limit) => TensorArena::with_limit(limit),
            None => TensorArena::new(),
        };

        Ok(Self {
            backends,
            config,
            arena,
            workloads: Vec::new(),
            failure: None,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn arena(&self) -> &TensorArena {
        &self.arena
    }

    /// Mutable access, e.g. for creating views the builder has no helper for.
    pub fn arena_mut(&mut self) -> &mut TensorArena {
        &mut self.arena
    }

    fn check_not_failed(&self) -> Result<()> {
        match &self.failure {
            Some(reason) => Err(RuntimeError::ConstructionFailed(reason.clone())),
            None => Ok(()),
        }
    }

    fn fail<T>(&mut self, err: RuntimeError) -> Result<T> {
        self.failure.get_or_insert_with(|| err.to_string());
        Err(err)
    }

    /// Allocate an owning tensor through the most preferred backend.
    pub fn add_tensor(&mut self, info: TensorInfo) -> Result<TensorHandle> {
        self.check_not_failed()?;
        let handle = match self.backends.first() {
            Some(backend) => backend.create_tensor_handle(&mut self.arena, info),
            None => self.arena.create_owning(info).map_err(WorkloadError::from),
        };
        match handle {
            Ok(handle) => Ok(handle),
            Err(e) => self.fail(e.into()),
        }
    }

    /// A tensor standing for the region `origin..origin + shape` of `parent`.
    ///
    /// Returns a view of the parent when sub-tensors are enabled, some
    /// preferred backend supports them and the region is contiguous.
    /// Otherwise a fresh owning tensor is allocated and split/merge layers
    /// copy into or out of it.
    pub fn add_sub_tensor(
        &mut self,
        parent: &TensorHandle,
        shape: impl Into<Shape>,
        origin: &[usize],
    ) -> Result<TensorHandle> {
        self.check_not_failed()?;
        let shape = shape.into();
        if self.config.use_sub_tensors {
            for backend in self.backends.clone() {
                if !backend.supports_sub_tensors() {
                    continue;
                }
                match backend.create_sub_tensor_handle(&mut self.arena, parent, &shape, origin) {
                    Ok(Some(view)) => return Ok(view),
                    Ok(None) => break,
                    Err(e) => return self.fail(e.into()),
                }
            }
        }
        debug!(%shape, ?origin, "sub-tensor falls back to an owning tensor");
        match parent.info().try_with_shape(shape) {
            Ok(info) => self.add_tensor(info),
            Err(e) => self.fail(e.into()),
        }
    }

    /// Create the workload for one layer, trying backends in preference
    /// order. Only [`WorkloadError::UnsupportedOperation`] moves on to the
    /// next backend; any other error fails the whole network.
    ///
    /// Returns the layer's index in execution order.
    pub fn add_layer(&mut self, layer: impl Into<LayerDescriptor>, data_type: DataType) -> Result<usize> {
        self.check_not_failed()?;
        let layer = layer.into();
        let layer_type = layer.layer_type();
        let mut tried = Vec::new();

        for backend in self.backends.clone() {
            let id = backend.backend_id().to_string();
            match backend.create_workload(layer.clone(), data_type) {
                Ok(workload) => {
                    debug!(backend = %id, workload = workload.name(), index = self.workloads.len(), "added layer");
                    self.workloads.push((id, workload));
                    return Ok(self.workloads.len() - 1);
                }
                Err(WorkloadError::UnsupportedOperation { .. }) => {
                    warn!(backend = %id, layer = %layer_type, %data_type, "backend cannot run layer, falling back");
                    tried.push(id);
                }
                Err(e) => return self.fail(e.into()),
            }
        }

        self.fail(RuntimeError::NoBackend {
            layer: layer_type,
            data_type,
            tried,
        })
    }

    /// # Errors
    /// [`RuntimeError::ConstructionFailed`] if any earlier step failed.
    pub fn build(self) -> Result<LoadedNetwork> {
        self.check_not_failed()?;
        info!(
            layers = self.workloads.len(),
            tensors = self.arena.allocation_count(),
            bytes = self.arena.allocated_bytes(),
            "network loaded"
        );
        Ok(LoadedNetwork {
            arena: self.arena,
            workloads: self.workloads,
        })
    }
}

/// A fully constructed network: its tensor arena and workloads in
/// execution order.
#[derive(Debug)]
pub struct LoadedNetwork {
    arena: TensorArena,
    workloads: Vec<(String, Box<dyn Workload>)>,
}

impl LoadedNetwork {
    /// Run every workload once, in the order the layers were added.
    pub fn execute(&mut self) -> Result<()> {
        for (backend, workload) in &self.workloads {
            debug!(%backend, workload = workload.name(), "running layer");
            workload.execute(&mut self.arena)?;
        }
        Ok(())
    }

    pub fn arena(&self) -> &TensorArena {
        &self.arena
    }

    /// For writing inputs and reading outputs between runs.
    pub fn arena_mut(&mut self) -> &mut TensorArena {
        &mut self.arena
    }

    pub fn len(&self) -> usize {
        self.workloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workloads.is_empty()
    }

    pub fn workload(&self, index: usize) -> Option<&dyn Workload> {
        self.workloads.get(index).map(|(_, w)| w.as_ref())
    }

    /// Id of the backend that built the layer at `index`.
    pub fn backend_of(&self, index: usize) -> Option<&str> {
        self.workloads.get(index).map(|(id, _)| id.as_str())
    }
}
