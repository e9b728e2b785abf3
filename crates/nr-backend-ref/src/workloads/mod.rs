//! One workload type family per operation.
//!
//! Most families are generic over a [`crate::Representation`] and come in
//! `Float32` and `Uint8` flavours; float-only layers only get the `Float32`
//! alias. Every workload keeps its validated descriptor and nothing else.

/// Declares a workload struct around a [`nr_workload::BaseWorkload`] and
/// implements [`nr_workload::Workload`] and [`nr_workload::TypedWorkload`]
/// for it. The type supplies `fn run(&self, arena) -> Result<()>`.
macro_rules! ref_workload {
    ($(#[$meta:meta])* $ty:ident<R>, $params:ty) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $ty<R> {
            base: nr_workload::BaseWorkload<$params>,
            name: String,
            _repr: std::marker::PhantomData<R>,
        }

        impl<R: $crate::Representation> $ty<R> {
            pub fn data(&self) -> &nr_workload::QueueDescriptor<$params> {
                self.base.data()
            }
        }

        impl<R: $crate::Representation> nr_workload::TypedWorkload<$params> for $ty<R> {
            fn create(descriptor: nr_workload::QueueDescriptor<$params>) -> nr_workload::Result<Self> {
                let base = nr_workload::BaseWorkload::new(descriptor, R::DATA_TYPE)?;
                let name = format!("Ref{}{}Workload", base.layer_type(), R::NAME);
                Ok($ty {
                    base,
                    name,
                    _repr: std::marker::PhantomData,
                })
            }
        }

        impl<R: $crate::Representation> nr_workload::Workload for $ty<R> {
            $crate::workloads::workload_methods!();
        }
    };
    ($(#[$meta:meta])* $ty:ident, $params:ty, $data_type:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $ty {
            base: nr_workload::BaseWorkload<$params>,
            name: String,
        }

        impl $ty {
            pub fn data(&self) -> &nr_workload::QueueDescriptor<$params> {
                self.base.data()
            }
        }

        impl nr_workload::TypedWorkload<$params> for $ty {
            fn create(descriptor: nr_workload::QueueDescriptor<$params>) -> nr_workload::Result<Self> {
                let base = nr_workload::BaseWorkload::new(descriptor, $data_type)?;
                let name = format!("Ref{}Workload", base.layer_type());
                Ok($ty { base, name })
            }
        }

        impl nr_workload::Workload for $ty {
            $crate::workloads::workload_methods!();
        }
    };
}

macro_rules! workload_methods {
    () => {
        fn name(&self) -> &str {
            &self.name
        }

        fn layer_type(&self) -> nr_workload::LayerType {
            self.base.layer_type()
        }

        fn data_type(&self) -> nr_tensor::DataType {
            self.base.data_type()
        }

        fn inputs(&self) -> &[nr_tensor::TensorHandle] {
            self.base.inputs()
        }

        fn outputs(&self) -> &[nr_tensor::TensorHandle] {
            self.base.outputs()
        }

        fn execute(&self, arena: &mut nr_tensor::TensorArena) -> nr_workload::Result<()> {
            tracing::debug!(workload = %self.name, "execute");
            self.run(arena)
        }
    };
}

pub(crate) use workload_methods;
pub(crate) use ref_workload;

pub mod activation;
pub mod convert;
pub mod convolution;
pub mod copy;
pub mod elementwise;
pub mod fully_connected;
pub mod normalization;
pub mod pooling;
pub mod resize;
pub mod softmax;

pub use activation::*;
pub use convert::*;
pub use convolution::*;
pub use copy::*;
pub use elementwise::*;
pub use fully_connected::*;
pub use normalization::*;
pub use pooling::*;
pub use resize::*;
pub use softmax::*;
