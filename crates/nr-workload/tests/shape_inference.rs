//! Output shapes accepted and rejected by descriptor validation.

use nr_tensor::{ConstTensor, DataType, TensorArena, TensorHandle, TensorInfo};
use nr_workload::*;

fn f32_handle(arena: &mut TensorArena, dims: &[usize]) -> TensorHandle {
    arena
        .create_owning(TensorInfo::new(dims, DataType::Float32))
        .unwrap()
}

fn accepts<P: LayerParameters>(params: P, input: &[usize], output: &[usize]) -> bool {
    let mut arena = TensorArena::new();
    let i = f32_handle(&mut arena, input);
    let o = f32_handle(&mut arena, output);
    QueueDescriptor::new(vec![i], vec![o], params)
        .validate(DataType::Float32)
        .is_ok()
}

#[test]
fn test_convolution_output_shape() {
    let weight = ConstTensor::from_f32([2, 3, 5, 3], vec![0.0; 90]);
    let bias = ConstTensor::from_f32([2], vec![0.0; 2]);
    let window = ConvolutionWindow::default()
        .with_padding(3, 3, 1, 1)
        .with_stride(2, 4);
    let params = Convolution2dDescriptor::new(weight, Some(bias), window);
    assert!(accepts(params.clone(), &[2, 3, 8, 16], &[2, 2, 2, 10]));
    assert!(!accepts(params, &[2, 3, 8, 16], &[2, 2, 3, 10]));
}

#[test]
fn test_convolution_bias_length() {
    let weight = ConstTensor::from_f32([2, 3, 5, 3], vec![0.0; 90]);
    let bias = ConstTensor::from_f32([3], vec![0.0; 3]);
    let window = ConvolutionWindow::default()
        .with_padding(3, 3, 1, 1)
        .with_stride(2, 4);
    let params = Convolution2dDescriptor::new(weight, Some(bias), window);
    assert!(!accepts(params, &[2, 3, 8, 16], &[2, 2, 2, 10]));
}

#[test]
fn test_depthwise_output_shape() {
    let weight = ConstTensor::from_f32([3, 3, 5, 3], vec![0.0; 135]);
    let bias = ConstTensor::from_f32([9], vec![0.0; 9]);
    let window = ConvolutionWindow::default()
        .with_padding(3, 3, 1, 1)
        .with_stride(2, 4);
    let params = DepthwiseConvolution2dDescriptor::new(weight, Some(bias), window);
    assert!(accepts(params, &[2, 3, 8, 16], &[2, 9, 2, 10]));
}

#[test]
fn test_pooling_output_shape() {
    let params = Pooling2dDescriptor::new(PoolingAlgorithm::Max, 3, 3)
        .with_padding(2, 2, 1, 1)
        .with_stride(2, 3);
    assert!(accepts(params.clone(), &[3, 2, 5, 5], &[3, 2, 2, 4]));
    assert!(!accepts(params, &[3, 2, 5, 5], &[3, 2, 2, 5]));
}

#[test]
fn test_fully_connected_output_shape() {
    let weight = ConstTensor::from_f32([7, 20], vec![0.0; 140]);
    let bias = ConstTensor::from_f32([7], vec![0.0; 7]);
    let params = FullyConnectedDescriptor::new(weight, Some(bias), true);
    assert!(accepts(params.clone(), &[3, 1, 4, 5], &[3, 7]));
    assert!(!accepts(params, &[3, 1, 4, 6], &[3, 7]));
}

#[test]
fn test_resize_bilinear_output_shape() {
    let params = ResizeBilinearDescriptor {
        target_width: 2,
        target_height: 2,
    };
    assert!(accepts(params.clone(), &[2, 3, 4, 4], &[2, 3, 2, 2]));
    assert!(!accepts(params, &[2, 3, 4, 4], &[2, 3, 4, 4]));
}

#[test]
fn test_same_shape_layers() {
    assert!(accepts(L2NormalizationDescriptor::default(), &[5, 20, 50, 67], &[5, 20, 50, 67]));
    assert!(accepts(NormalizationDescriptor::default(), &[3, 5, 5, 1], &[3, 5, 5, 1]));
    assert!(accepts(SoftmaxDescriptor::default(), &[4, 1], &[4, 1]));
    assert!(accepts(FloorDescriptor, &[2, 3], &[2, 3]));
    assert!(!accepts(SoftmaxDescriptor::default(), &[4, 1], &[1, 4]));
    assert!(!accepts(MemCopyDescriptor, &[4, 1], &[1, 4]));
}

#[test]
fn test_batch_normalization_shape() {
    let stats = || ConstTensor::from_f32([3], vec![0.0; 3]);
    let params = BatchNormalizationDescriptor {
        eps: 1e-5,
        mean: stats(),
        variance: stats(),
        beta: stats(),
        gamma: stats(),
    };
    assert!(accepts(params.clone(), &[2, 3, 1, 1], &[2, 3, 1, 1]));
    assert!(!accepts(params, &[2, 4, 1, 1], &[2, 4, 1, 1]));
}

#[test]
fn test_reshape_shape() {
    assert!(accepts(ReshapeDescriptor::new([1, 4]), &[4, 1], &[1, 4]));
    assert!(!accepts(ReshapeDescriptor::new([2, 4]), &[4, 1], &[2, 4]));
}

#[test]
fn test_elementwise_shapes() {
    let mut arena = TensorArena::new();
    let a = f32_handle(&mut arena, &[2, 3]);
    let b = f32_handle(&mut arena, &[2, 3]);
    let out = f32_handle(&mut arena, &[2, 3]);
    let add = QueueDescriptor::new(vec![a.clone(), b.clone()], vec![out.clone()], AdditionDescriptor);
    assert!(add.validate(DataType::Float32).is_ok());
    let mul = QueueDescriptor::new(vec![a, b], vec![out], MultiplicationDescriptor);
    assert!(mul.validate(DataType::Float32).is_ok());
}

#[test]
fn test_splitter_shapes() {
    let mut arena = TensorArena::new();
    let input = f32_handle(&mut arena, &[5, 7, 7]);
    let outputs = vec![
        f32_handle(&mut arena, &[1, 7, 7]),
        f32_handle(&mut arena, &[2, 7, 7]),
        f32_handle(&mut arena, &[2, 7, 7]),
    ];
    let views = SplitterDescriptor::new(vec![
        vec![0, 0, 0].into(),
        vec![1, 0, 0].into(),
        vec![3, 0, 0].into(),
    ]);
    let d = QueueDescriptor::new(vec![input], outputs, views);
    assert!(d.validate(DataType::Float32).is_ok());
    assert_eq!(LayerDescriptor::from(d).layer_type(), LayerType::Splitter);
}

#[test]
fn test_merger_shapes() {
    let mut arena = TensorArena::new();
    let output = f32_handle(&mut arena, &[5, 7, 7]);
    let inputs = vec![
        f32_handle(&mut arena, &[2, 7, 7]),
        f32_handle(&mut arena, &[3, 7, 7]),
    ];
    let views = MergerDescriptor::new(vec![vec![0, 0, 0].into(), vec![2, 0, 0].into()]);
    let d = QueueDescriptor::new(inputs.clone(), vec![output.clone()], views);
    assert!(d.validate(DataType::Float32).is_ok());

    let short = MergerDescriptor::new(vec![vec![0, 0, 0].into(), vec![3, 0, 0].into()]);
    let d = QueueDescriptor::new(inputs, vec![output], short);
    assert!(d.validate(DataType::Float32).is_err());
}

#[test]
fn test_quantized_copy_requires_same_quantization() {
    let mut arena = TensorArena::new();
    let a = arena
        .create_owning(TensorInfo::quantized([4], DataType::QuantisedAsymm8, 0.5, 10))
        .unwrap();
    let b = arena
        .create_owning(TensorInfo::quantized([4], DataType::QuantisedAsymm8, 0.25, 10))
        .unwrap();
    let d = QueueDescriptor::new(vec![a.clone()], vec![b], MemCopyDescriptor);
    assert!(d.validate(DataType::QuantisedAsymm8).is_err());

    let c = arena
        .create_owning(TensorInfo::quantized([4], DataType::QuantisedAsymm8, 0.5, 10))
        .unwrap();
    let d = QueueDescriptor::new(vec![a], vec![c], MemCopyDescriptor);
    assert!(d.validate(DataType::QuantisedAsymm8).is_ok());
}
