use nr_tensor::Shape;
use nr_workload::ConvolutionWindow;

/// Input coordinate read by output position `out` at kernel tap `k`, or
/// `None` when it falls in the padding.
fn input_coord(out: usize, k: usize, stride: usize, dilation: usize, pad: usize, size: usize) -> Option<usize> {
    (out * stride + k * dilation)
        .checked_sub(pad)
        .filter(|&i| i < size)
}

/// 2D convolution, NCHW input and `[O, C, kH, kW]` weights.
pub fn convolution2d(
    input: &[f32],
    input_shape: &Shape,
    weight: &[f32],
    weight_shape: &Shape,
    bias: Option<&[f32]>,
    window: &ConvolutionWindow,
    output_shape: &Shape,
) -> Vec<f32> {
    let (n, c, h, w) = dims4(input_shape);
    let (kh, kw) = (weight_shape.dim(2), weight_shape.dim(3));
    let (_, o, oh, ow) = dims4(output_shape);

    let mut out = vec![0.0f32; output_shape.numel()];
    for b in 0..n {
        for oc in 0..o {
            let base = bias.map_or(0.0, |bias| bias[oc]);
            for oy in 0..oh {
                for ox in 0..ow {
                    let mut sum = base;
                    for ic in 0..c {
                        for ky in 0..kh {
                            let Some(iy) =
                                input_coord(oy, ky, window.stride_y, window.dilation_y, window.pad_top, h)
                            else {
                                continue;
                            };
                            for kx in 0..kw {
                                let Some(ix) = input_coord(
                                    ox,
                                    kx,
                                    window.stride_x,
                                    window.dilation_x,
                                    window.pad_left,
                                    w,
                                ) else {
                                    continue;
                                };
                                let x = input[((b * c + ic) * h + iy) * w + ix];
                                let k = weight[((oc * c + ic) * kh + ky) * kw + kx];
                                sum += x * k;
                            }
                        }
                    }
                    out[((b * o + oc) * oh + oy) * ow + ox] = sum;
                }
            }
        }
    }
    out
}

/// Depthwise 2D convolution with `[M, C, kH, kW]` weights. Output channel
/// `ic * M + m` convolves input channel `ic` with filter `m`.
pub fn depthwise_convolution2d(
    input: &[f32],
    input_shape: &Shape,
    weight: &[f32],
    weight_shape: &Shape,
    bias: Option<&[f32]>,
    window: &ConvolutionWindow,
    output_shape: &Shape,
) -> Vec<f32> {
    let (n, c, h, w) = dims4(input_shape);
    let (m, kh, kw) = (weight_shape.dim(0), weight_shape.dim(2), weight_shape.dim(3));
    let (_, o, oh, ow) = dims4(output_shape);

    let mut out = vec![0.0f32; output_shape.numel()];
    for b in 0..n {
        for ic in 0..c {
            for mi in 0..m {
                let oc = ic * m + mi;
                let base = bias.map_or(0.0, |bias| bias[oc]);
                for oy in 0..oh {
                    for ox in 0..ow {
                        let mut sum = base;
                        for ky in 0..kh {
                            let Some(iy) =
                                input_coord(oy, ky, window.stride_y, window.dilation_y, window.pad_top, h)
                            else {
                                continue;
                            };
                            for kx in 0..kw {
                                let Some(ix) = input_coord(
                                    ox,
                                    kx,
                                    window.stride_x,
                                    window.dilation_x,
                                    window.pad_left,
                                    w,
                                ) else {
                                    continue;
                                };
                                let x = input[((b * c + ic) * h + iy) * w + ix];
                                let k = weight[((mi * c + ic) * kh + ky) * kw + kx];
                                sum += x * k;
                            }
                        }
                        out[((b * o + oc) * oh + oy) * ow + ox] = sum;
                    }
                }
            }
        }
    }
    out
}

pub(crate) fn dims4(shape: &Shape) -> (usize, usize, usize, usize) {
    (shape.dim(0), shape.dim(1), shape.dim(2), shape.dim(3))
}
