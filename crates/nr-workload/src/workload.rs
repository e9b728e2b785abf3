use std::fmt::Debug;

use nr_tensor::{DataType, TensorArena, TensorHandle};
use tracing::debug;

use crate::error::{Result, WorkloadError};
use crate::layer::LayerType;
use crate::queue::{LayerParameters, QueueDescriptor};

/// One executable layer instance built by a backend factory.
///
/// A workload holds its descriptor by value and never owns tensor memory:
/// dropping it leaves every handle's allocation untouched.
pub trait Workload: Send + Sync + Debug {
    /// Concrete workload name, e.g. `RefSoftmaxFloat32Workload`.
    fn name(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    /// Data type the workload was built for.
    fn data_type(&self) -> DataType;

    fn inputs(&self) -> &[TensorHandle];

    fn outputs(&self) -> &[TensorHandle];

    /// Read the inputs and overwrite the outputs.
    ///
    /// Keeps no state between calls, so executing twice over unchanged
    /// inputs writes identical outputs.
    fn execute(&self, arena: &mut TensorArena) -> Result<()>;
}

/// A validated descriptor plus the data type it was validated for.
///
/// Concrete workloads embed this, so holding one proves construction-time
/// validation succeeded.
#[derive(Debug, Clone)]
pub struct BaseWorkload<P> {
    data: QueueDescriptor<P>,
    data_type: DataType,
}

impl<P: LayerParameters> BaseWorkload<P> {
    /// # Errors
    /// [`WorkloadError::InvalidDescriptor`] if the descriptor fails any check.
    pub fn new(data: QueueDescriptor<P>, data_type: DataType) -> Result<Self> {
        data.validate(data_type)?;
        Ok(BaseWorkload { data, data_type })
    }

    pub fn data(&self) -> &QueueDescriptor<P> {
        &self.data
    }

    pub fn parameters(&self) -> &P {
        &self.data.parameters
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn layer_type(&self) -> LayerType {
        P::LAYER_TYPE
    }

    pub fn inputs(&self) -> &[TensorHandle] {
        &self.data.inputs
    }

    pub fn outputs(&self) -> &[TensorHandle] {
        &self.data.outputs
    }
}

/// A workload type built from one kind of queue descriptor.
pub trait TypedWorkload<P: LayerParameters>: Workload + Sized + 'static {
    fn create(descriptor: QueueDescriptor<P>) -> Result<Self>;
}

fn boxed<P, W>(backend: &str, descriptor: QueueDescriptor<P>) -> Result<Box<dyn Workload>>
where
    P: LayerParameters,
    W: TypedWorkload<P>,
{
    let workload = W::create(descriptor)?;
    debug!(
        backend,
        workload = workload.name(),
        inputs = workload.inputs().len(),
        outputs = workload.outputs().len(),
        "created workload"
    );
    Ok(Box::new(workload))
}

/// Build the float or the uint8 workload type for `descriptor`, selected by
/// `data_type`. Any other data type is unsupported.
pub fn make_workload<P, F, U>(
    backend: &str,
    descriptor: QueueDescriptor<P>,
    data_type: DataType,
) -> Result<Box<dyn Workload>>
where
    P: LayerParameters,
    F: TypedWorkload<P>,
    U: TypedWorkload<P>,
{
    match data_type {
        DataType::Float32 => boxed::<P, F>(backend, descriptor),
        DataType::QuantisedAsymm8 => boxed::<P, U>(backend, descriptor),
        other => Err(WorkloadError::unsupported(backend, P::LAYER_TYPE, other)),
    }
}

/// Build `W` when `data_type` is exactly `accepted`.
pub fn make_single_type_workload<P, W>(
    backend: &str,
    descriptor: QueueDescriptor<P>,
    data_type: DataType,
    accepted: DataType,
) -> Result<Box<dyn Workload>>
where
    P: LayerParameters,
    W: TypedWorkload<P>,
{
    if data_type != accepted {
        return Err(WorkloadError::unsupported(backend, P::LAYER_TYPE, data_type));
    }
    boxed::<P, W>(backend, descriptor)
}

/// For layers that only have a float implementation.
pub fn make_float_workload<P, F>(
    backend: &str,
    descriptor: QueueDescriptor<P>,
    data_type: DataType,
) -> Result<Box<dyn Workload>>
where
    P: LayerParameters,
    F: TypedWorkload<P>,
{
    make_single_type_workload::<P, F>(backend, descriptor, data_type, DataType::Float32)
}
