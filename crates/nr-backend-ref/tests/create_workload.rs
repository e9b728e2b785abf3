//! Building reference workloads from queue descriptors and running them.

use approx::assert_relative_eq;
use nr_backend_ref::*;
use nr_tensor::{ConstTensor, DataType, Shape, TensorArena, TensorHandle, TensorInfo};
use nr_workload::*;

fn f32_handle(arena: &mut TensorArena, dims: &[usize]) -> TensorHandle {
    arena
        .create_owning(TensorInfo::new(dims, DataType::Float32))
        .unwrap()
}

fn u8_handle(arena: &mut TensorArena, dims: &[usize], scale: f32, offset: i32) -> TensorHandle {
    arena
        .create_owning(TensorInfo::quantized(dims, DataType::QuantisedAsymm8, scale, offset))
        .unwrap()
}

#[test]
fn test_workloads_keep_the_bound_handles() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[1, 1]);
    let output = f32_handle(&mut arena, &[1, 1]);
    let d = ActivationQueueDescriptor::new(
        vec![input.clone()],
        vec![output.clone()],
        ActivationDescriptor::new(ActivationFunction::ReLu),
    );
    let w = factory.create_activation(d, DataType::Float32).unwrap();

    assert_eq!(w.name(), "RefActivationFloat32Workload");
    assert_eq!(w.layer_type(), LayerType::Activation);
    assert_eq!(w.inputs().len(), 1);
    assert_eq!(w.outputs().len(), 1);
    assert!(w.inputs()[0].is_same(&input));
    assert!(w.outputs()[0].is_same(&output));
}

#[test]
fn test_uint8_variant_is_a_distinct_type() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = u8_handle(&mut arena, &[4, 1], 1.0, 0);
    let output = u8_handle(&mut arena, &[4, 1], 1.0 / 256.0, 0);
    let d = SoftmaxQueueDescriptor::new(vec![input], vec![output], SoftmaxDescriptor::default());
    let w = factory.create_softmax(d, DataType::QuantisedAsymm8).unwrap();
    assert_eq!(w.name(), "RefSoftmaxUint8Workload");
    assert_eq!(w.data_type(), DataType::QuantisedAsymm8);
}

#[test]
fn test_float_only_layers_reject_uint8() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = u8_handle(&mut arena, &[1, 2, 1, 1], 1.0, 0);
    let output = u8_handle(&mut arena, &[1, 2, 1, 1], 1.0, 0);
    let d = L2NormalizationQueueDescriptor::new(
        vec![input],
        vec![output],
        L2NormalizationDescriptor::default(),
    );
    let err = factory
        .create_l2_normalization(d, DataType::QuantisedAsymm8)
        .unwrap_err();
    assert!(matches!(
        err,
        WorkloadError::UnsupportedOperation { layer: LayerType::L2Normalization, .. }
    ));
}

#[test]
fn test_numeric_representation_isolation() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let f_in = f32_handle(&mut arena, &[2, 2]);
    let f_out = f32_handle(&mut arena, &[2, 2]);
    let d = ActivationQueueDescriptor::new(vec![f_in], vec![f_out], ActivationDescriptor::default());
    let err = factory
        .create_activation(d, DataType::QuantisedAsymm8)
        .unwrap_err();
    assert!(matches!(err, WorkloadError::InvalidDescriptor { .. }));

    let q_in = u8_handle(&mut arena, &[2, 2], 1.0, 0);
    let q_out = u8_handle(&mut arena, &[2, 2], 1.0, 0);
    let d = ActivationQueueDescriptor::new(vec![q_in], vec![q_out], ActivationDescriptor::default());
    assert!(factory.create_activation(d, DataType::Float32).is_err());
}

#[test]
fn test_arity_is_enforced_by_the_factory() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let a = f32_handle(&mut arena, &[2, 3]);
    let out = f32_handle(&mut arena, &[2, 3]);
    let d = AdditionQueueDescriptor::new(vec![a], vec![out], AdditionDescriptor);
    assert!(matches!(
        factory.create_addition(d, DataType::Float32),
        Err(WorkloadError::InvalidDescriptor { layer: LayerType::Addition, .. })
    ));
}

#[test]
fn test_dispatch_through_layer_descriptor() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[4, 1]);
    let output = f32_handle(&mut arena, &[1, 4]);
    let layer: LayerDescriptor =
        ReshapeQueueDescriptor::new(vec![input], vec![output], ReshapeDescriptor::new([1, 4])).into();
    let w = factory.create_workload(layer, DataType::Float32).unwrap();
    assert_eq!(w.name(), "RefReshapeFloat32Workload");
    assert_eq!(w.outputs()[0].info().shape().dims(), &[1, 4]);
}

/// Splitter output 0 feeds merger input 1 and output 1 feeds input 0.
#[test]
fn test_splitter_merger_share_handles() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[2, 7, 7]);
    let sub_shape = Shape::from([1, 7, 7]);
    let first = factory
        .create_sub_tensor_handle(&mut arena, &input, &sub_shape, &[0, 0, 0])
        .unwrap()
        .unwrap();
    let second = factory
        .create_sub_tensor_handle(&mut arena, &input, &sub_shape, &[1, 0, 0])
        .unwrap()
        .unwrap();
    assert_eq!(first.allocation(), input.allocation());
    assert!(!first.aliases(&second));

    let splitter = factory
        .create_splitter(
            SplitterQueueDescriptor::new(
                vec![input.clone()],
                vec![first.clone(), second.clone()],
                SplitterDescriptor::new(vec![vec![0, 0, 0].into(), vec![1, 0, 0].into()]),
            ),
            DataType::Float32,
        )
        .unwrap();

    let merged = f32_handle(&mut arena, &[2, 7, 7]);
    let merger = factory
        .create_merger(
            MergerQueueDescriptor::new(
                vec![second.clone(), first.clone()],
                vec![merged.clone()],
                MergerDescriptor::new(vec![vec![0, 0, 0].into(), vec![1, 0, 0].into()]),
            ),
            DataType::Float32,
        )
        .unwrap();

    assert!(splitter.outputs()[0].is_same(&merger.inputs()[1]));
    assert!(splitter.outputs()[1].is_same(&merger.inputs()[0]));
    assert_eq!(splitter.outputs()[0].byte_offset(), 0);
    assert_eq!(splitter.outputs()[1].byte_offset(), 49 * 4);

    let data: Vec<f32> = (0..98).map(|v| v as f32).collect();
    arena.write_f32(&input, &data).unwrap();
    splitter.execute(&mut arena).unwrap();
    merger.execute(&mut arena).unwrap();

    let out = arena.read_f32(&merged).unwrap();
    assert_eq!(&out[..49], &data[49..]);
    assert_eq!(&out[49..], &data[..49]);
}

#[test]
fn test_split_merge_round_trip_without_copies() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let parent = f32_handle(&mut arena, &[2, 4]);
    let row = Shape::from([1, 4]);
    let top = factory
        .create_sub_tensor_handle(&mut arena, &parent, &row, &[0, 0])
        .unwrap()
        .unwrap();
    let bottom = factory
        .create_sub_tensor_handle(&mut arena, &parent, &row, &[1, 0])
        .unwrap()
        .unwrap();
    let views = || vec![vec![0, 0].into(), vec![1, 0].into()];

    let splitter = factory
        .create_splitter(
            SplitterQueueDescriptor::new(
                vec![parent.clone()],
                vec![top.clone(), bottom.clone()],
                SplitterDescriptor::new(views()),
            ),
            DataType::Float32,
        )
        .unwrap();
    let merger = factory
        .create_merger(
            MergerQueueDescriptor::new(
                vec![top.clone(), bottom.clone()],
                vec![parent.clone()],
                MergerDescriptor::new(views()),
            ),
            DataType::Float32,
        )
        .unwrap();

    let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    arena.write_f32(&parent, &data).unwrap();
    splitter.execute(&mut arena).unwrap();
    assert_eq!(arena.read_f32(&top).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(arena.read_f32(&bottom).unwrap(), vec![5.0, 6.0, 7.0, 8.0]);
    merger.execute(&mut arena).unwrap();
    assert_eq!(arena.read_f32(&parent).unwrap(), data.to_vec());
    assert_eq!(arena.allocation_count(), 1);
}

#[test]
fn test_non_contiguous_split_copies() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[2, 4]);
    let half = Shape::from([2, 2]);
    assert!(factory
        .create_sub_tensor_handle(&mut arena, &input, &half, &[0, 2])
        .unwrap()
        .is_none());

    let left = f32_handle(&mut arena, &[2, 2]);
    let right = f32_handle(&mut arena, &[2, 2]);
    let splitter = factory
        .create_splitter(
            SplitterQueueDescriptor::new(
                vec![input.clone()],
                vec![left.clone(), right.clone()],
                SplitterDescriptor::new(vec![vec![0, 0].into(), vec![0, 2].into()]),
            ),
            DataType::Float32,
        )
        .unwrap();
    arena
        .write_f32(&input, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])
        .unwrap();
    splitter.execute(&mut arena).unwrap();
    assert_eq!(arena.read_f32(&left).unwrap(), vec![1.0, 2.0, 5.0, 6.0]);
    assert_eq!(arena.read_f32(&right).unwrap(), vec![3.0, 4.0, 7.0, 8.0]);
}

#[test]
fn test_fan_out_shares_one_handle() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[1, 3]);
    let shared = f32_handle(&mut arena, &[1, 3]);
    let out_a = f32_handle(&mut arena, &[1, 3]);
    let out_b = f32_handle(&mut arena, &[1, 3]);

    let producer = factory
        .create_activation(
            ActivationQueueDescriptor::new(
                vec![input.clone()],
                vec![shared.clone()],
                ActivationDescriptor::new(ActivationFunction::Abs),
            ),
            DataType::Float32,
        )
        .unwrap();
    let square = factory
        .create_activation(
            ActivationQueueDescriptor::new(
                vec![shared.clone()],
                vec![out_a.clone()],
                ActivationDescriptor::new(ActivationFunction::Square),
            ),
            DataType::Float32,
        )
        .unwrap();
    let floor = factory
        .create_floor(
            FloorQueueDescriptor::new(vec![shared.clone()], vec![out_b.clone()], FloorDescriptor),
            DataType::Float32,
        )
        .unwrap();

    assert!(square.inputs()[0].is_same(&producer.outputs()[0]));
    assert!(floor.inputs()[0].is_same(&producer.outputs()[0]));

    arena.write_f32(&input, &[-1.5, 2.0, -3.25]).unwrap();
    for w in [&producer, &square, &floor] {
        w.execute(&mut arena).unwrap();
    }
    assert_eq!(arena.read_f32(&out_a).unwrap(), vec![2.25, 4.0, 10.5625]);
    assert_eq!(arena.read_f32(&out_b).unwrap(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_execute_is_idempotent() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[1, 1, 4, 4]);
    let output = f32_handle(&mut arena, &[1, 1, 2, 2]);
    let w = factory
        .create_pooling2d(
            Pooling2dQueueDescriptor::new(
                vec![input.clone()],
                vec![output.clone()],
                Pooling2dDescriptor::new(PoolingAlgorithm::Average, 2, 2).with_stride(2, 2),
            ),
            DataType::Float32,
        )
        .unwrap();
    let data: Vec<f32> = (1..=16).map(|v| v as f32).collect();
    arena.write_f32(&input, &data).unwrap();

    w.execute(&mut arena).unwrap();
    let first = arena.read_f32(&output).unwrap();
    w.execute(&mut arena).unwrap();
    assert_eq!(arena.read_f32(&output).unwrap(), first);
    assert_eq!(first, vec![3.5, 5.5, 11.5, 13.5]);
}

#[test]
fn test_uint8_addition_uses_each_handles_quantization() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let a = u8_handle(&mut arena, &[1, 4], 0.5, 0);
    let b = u8_handle(&mut arena, &[1, 4], 1.0, 10);
    let out = u8_handle(&mut arena, &[1, 4], 1.0, 0);
    let w = factory
        .create_addition(
            AdditionQueueDescriptor::new(vec![a.clone(), b.clone()], vec![out.clone()], AdditionDescriptor),
            DataType::QuantisedAsymm8,
        )
        .unwrap();

    // a = 1, 2, 100, 3; b = 0, 1, 200, -10
    arena.write_u8(&a, &[2, 4, 200, 6]).unwrap();
    arena.write_u8(&b, &[10, 11, 210, 0]).unwrap();
    w.execute(&mut arena).unwrap();
    // 300 saturates to 255, -7 saturates to 0.
    assert_eq!(arena.read_u8(&out).unwrap(), vec![1, 3, 255, 0]);
}

#[test]
fn test_convolution_with_bias() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[1, 1, 3, 3]);
    let output = f32_handle(&mut arena, &[1, 2, 2, 2]);
    let weight = ConstTensor::from_f32([2, 1, 2, 2], vec![1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, -1.0]);
    let bias = ConstTensor::from_f32([2], vec![0.0, 10.0]);
    let w = factory
        .create_convolution2d(
            Convolution2dQueueDescriptor::new(
                vec![input.clone()],
                vec![output.clone()],
                Convolution2dDescriptor::new(weight, Some(bias), ConvolutionWindow::default()),
            ),
            DataType::Float32,
        )
        .unwrap();
    let data: Vec<f32> = (1..=9).map(|v| v as f32).collect();
    arena.write_f32(&input, &data).unwrap();
    w.execute(&mut arena).unwrap();
    assert_eq!(
        arena.read_f32(&output).unwrap(),
        vec![12.0, 16.0, 24.0, 28.0, 6.0, 6.0, 6.0, 6.0]
    );
}

#[test]
fn test_quantized_fully_connected() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = u8_handle(&mut arena, &[1, 2], 0.5, 0);
    let output = u8_handle(&mut arena, &[1, 1], 0.25, 0);
    let weight = ConstTensor::new(
        TensorInfo::quantized([2, 1], DataType::QuantisedAsymm8, 0.5, 0),
        vec![2u8, 4].into(),
    )
    .unwrap();
    let bias = ConstTensor::new(
        TensorInfo::quantized([1], DataType::Signed32, 0.25, 0),
        vec![4i32].into(),
    )
    .unwrap();
    let w = factory
        .create_fully_connected(
            FullyConnectedQueueDescriptor::new(
                vec![input.clone()],
                vec![output.clone()],
                FullyConnectedDescriptor::new(weight, Some(bias), false),
            ),
            DataType::QuantisedAsymm8,
        )
        .unwrap();
    // input = 1.0, 2.0; weight = 1.0, 2.0; bias = 1.0 -> 6.0 = 24 * 0.25
    arena.write_u8(&input, &[2, 4]).unwrap();
    w.execute(&mut arena).unwrap();
    assert_eq!(arena.read_u8(&output).unwrap(), vec![24]);
}

#[test]
fn test_batch_normalization_and_l2() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[1, 2, 1, 1]);
    let normed = f32_handle(&mut arena, &[1, 2, 1, 1]);
    let l2 = f32_handle(&mut arena, &[1, 2, 1, 1]);
    let stat = |v: [f32; 2]| ConstTensor::from_f32([2], v.to_vec());
    let bn = factory
        .create_batch_normalization(
            BatchNormalizationQueueDescriptor::new(
                vec![input.clone()],
                vec![normed.clone()],
                BatchNormalizationDescriptor {
                    eps: 0.0,
                    mean: stat([1.0, 0.0]),
                    variance: stat([1.0, 4.0]),
                    beta: stat([0.0, 1.0]),
                    gamma: stat([1.0, 1.0]),
                },
            ),
            DataType::Float32,
        )
        .unwrap();
    let norm = factory
        .create_l2_normalization(
            L2NormalizationQueueDescriptor::new(
                vec![normed.clone()],
                vec![l2.clone()],
                L2NormalizationDescriptor::default(),
            ),
            DataType::Float32,
        )
        .unwrap();
    arena.write_f32(&input, &[4.0, 8.0]).unwrap();
    bn.execute(&mut arena).unwrap();
    norm.execute(&mut arena).unwrap();
    assert_eq!(arena.read_f32(&normed).unwrap(), vec![3.0, 5.0]);
    let out = arena.read_f32(&l2).unwrap();
    let len = 34.0f32.sqrt();
    assert_relative_eq!(out[0], 3.0 / len, epsilon = 1e-6);
    assert_relative_eq!(out[1], 5.0 / len, epsilon = 1e-6);
}

#[test]
fn test_resize_bilinear_workload() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[2, 3, 4, 4]);
    let output = f32_handle(&mut arena, &[2, 3, 2, 2]);
    let w = factory
        .create_resize_bilinear(
            ResizeBilinearQueueDescriptor::new(
                vec![input.clone()],
                vec![output.clone()],
                ResizeBilinearDescriptor {
                    target_width: 2,
                    target_height: 2,
                },
            ),
            DataType::Float32,
        )
        .unwrap();
    let data: Vec<f32> = (0..96).map(|v| v as f32).collect();
    arena.write_f32(&input, &data).unwrap();
    w.execute(&mut arena).unwrap();
    let out = arena.read_f32(&output).unwrap();
    assert_eq!(&out[..4], &[0.0, 2.0, 8.0, 10.0]);
    assert_eq!(&out[4..8], &[16.0, 18.0, 24.0, 26.0]);
}

#[test]
fn test_memcopy_into_view_and_back() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let src = f32_handle(&mut arena, &[4]);
    let same = arena
        .create_view(&src, TensorInfo::new([4], DataType::Float32), 0)
        .unwrap();
    let w = factory
        .create_mem_copy(
            MemCopyQueueDescriptor::new(vec![src.clone()], vec![same.clone()], MemCopyDescriptor),
            DataType::Float32,
        )
        .unwrap();
    arena.write_f32(&src, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    w.execute(&mut arena).unwrap();
    assert_eq!(arena.read_f32(&same).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_execute_after_release_fails() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[2]);
    let output = f32_handle(&mut arena, &[2]);
    let w = factory
        .create_floor(
            FloorQueueDescriptor::new(vec![input.clone()], vec![output], FloorDescriptor),
            DataType::Float32,
        )
        .unwrap();
    arena.release(&input).unwrap();
    assert!(matches!(
        w.execute(&mut arena),
        Err(WorkloadError::Tensor(nr_tensor::TensorError::Released { .. }))
    ));
}

fn typed_handle<R: Representation>(arena: &mut TensorArena, dims: &[usize]) -> TensorHandle {
    arena.create_owning(TensorInfo::new(dims, R::DATA_TYPE)).unwrap()
}

/// A `[2, 4]` tensor and views over its two rows.
fn split_rows<R: Representation>(
    factory: &RefWorkloadFactory,
    arena: &mut TensorArena,
) -> (TensorHandle, TensorHandle, TensorHandle) {
    let parent = typed_handle::<R>(arena, &[2, 4]);
    let row = Shape::from([1, 4]);
    let top = factory
        .create_sub_tensor_handle(arena, &parent, &row, &[0, 0])
        .unwrap()
        .unwrap();
    let bottom = factory
        .create_sub_tensor_handle(arena, &parent, &row, &[1, 0])
        .unwrap()
        .unwrap();
    (parent, top, bottom)
}

fn row_views() -> Vec<ViewOrigin> {
    vec![vec![0, 0].into(), vec![1, 0].into()]
}

/// Each splitter output feeds two activations.
fn check_splitter_fan_out<R: Representation>() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let (parent, top, bottom) = split_rows::<R>(&factory, &mut arena);
    let splitter = factory
        .create_splitter(
            SplitterQueueDescriptor::new(
                vec![parent.clone()],
                vec![top.clone(), bottom.clone()],
                SplitterDescriptor::new(row_views()),
            ),
            R::DATA_TYPE,
        )
        .unwrap();
    assert_eq!(splitter.name(), format!("RefSplitter{}Workload", R::NAME));

    let functions = [
        ActivationDescriptor::new(ActivationFunction::ReLu),
        ActivationDescriptor::new(ActivationFunction::Linear).with_params(2.0, 1.0),
    ];
    let mut consumers = Vec::new();
    let mut outputs = Vec::new();
    for (index, source) in [&top, &bottom].into_iter().enumerate() {
        for function in &functions {
            let output = typed_handle::<R>(&mut arena, &[1, 4]);
            let w = factory
                .create_activation(
                    ActivationQueueDescriptor::new(
                        vec![source.clone()],
                        vec![output.clone()],
                        function.clone(),
                    ),
                    R::DATA_TYPE,
                )
                .unwrap();
            assert!(w.inputs()[0].is_same(&splitter.outputs()[index]));
            consumers.push(w);
            outputs.push(output);
        }
    }
    assert!(consumers[0].inputs()[0].is_same(&consumers[1].inputs()[0]));
    assert!(consumers[2].inputs()[0].is_same(&consumers[3].inputs()[0]));
    assert!(!consumers[0].inputs()[0].aliases(&consumers[2].inputs()[0]));

    R::write(&mut arena, &parent, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
    splitter.execute(&mut arena).unwrap();
    for w in &consumers {
        w.execute(&mut arena).unwrap();
    }
    let read = |h: &TensorHandle| R::read(&arena, h).unwrap();
    assert_eq!(read(&outputs[0]), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(read(&outputs[1]), vec![3.0, 5.0, 7.0, 9.0]);
    assert_eq!(read(&outputs[2]), vec![5.0, 6.0, 7.0, 8.0]);
    assert_eq!(read(&outputs[3]), vec![11.0, 13.0, 15.0, 17.0]);
}

#[test]
fn test_splitter_outputs_fan_out_float32() {
    check_splitter_fan_out::<Float32>();
}

#[test]
fn test_splitter_outputs_fan_out_uint8() {
    check_splitter_fan_out::<Uint8>();
}

/// Splitter output 0 is merger input 1 and output 1 is input 0, with the
/// merger writing back into the buffer both views point into.
fn check_swapped_merge_in_place<R: Representation>() {
    let factory = RefWorkloadFactory::new();
    let mut arena = TensorArena::new();
    let (parent, top, bottom) = split_rows::<R>(&factory, &mut arena);
    let splitter = factory
        .create_splitter(
            SplitterQueueDescriptor::new(
                vec![parent.clone()],
                vec![top.clone(), bottom.clone()],
                SplitterDescriptor::new(row_views()),
            ),
            R::DATA_TYPE,
        )
        .unwrap();
    let merger = factory
        .create_merger(
            MergerQueueDescriptor::new(
                vec![bottom.clone(), top.clone()],
                vec![parent.clone()],
                MergerDescriptor::new(row_views()),
            ),
            R::DATA_TYPE,
        )
        .unwrap();
    assert_eq!(merger.name(), format!("RefMerger{}Workload", R::NAME));
    assert!(splitter.outputs()[0].is_same(&merger.inputs()[1]));
    assert!(splitter.outputs()[1].is_same(&merger.inputs()[0]));

    R::write(&mut arena, &parent, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
    splitter.execute(&mut arena).unwrap();
    merger.execute(&mut arena).unwrap();
    assert_eq!(
        R::read(&arena, &parent).unwrap(),
        vec![5.0, 6.0, 7.0, 8.0, 1.0, 2.0, 3.0, 4.0]
    );
    assert_eq!(arena.allocation_count(), 1);
}

#[test]
fn test_swapped_merge_in_place_float32() {
    check_swapped_merge_in_place::<Float32>();
}

#[test]
fn test_swapped_merge_in_place_uint8() {
    check_swapped_merge_in_place::<Uint8>();
}
