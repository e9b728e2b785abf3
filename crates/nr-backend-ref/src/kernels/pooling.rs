use nr_tensor::Shape;
use nr_workload::{PaddingMethod, Pooling2dDescriptor, PoolingAlgorithm};

use super::conv::dims4;

/// 2D pooling over NCHW input.
///
/// The window is laid over the padded input. With `PaddingMethod::IgnoreValue`
/// the divisor is the window area clipped to the padded input; with
/// `Exclude` only real input elements count. A window that covers padding
/// only yields 0.
pub fn pooling2d(input: &[f32], input_shape: &Shape, desc: &Pooling2dDescriptor, output_shape: &Shape) -> Vec<f32> {
    let (n, c, h, w) = dims4(input_shape);
    let (_, _, oh, ow) = dims4(output_shape);
    let (h, w) = (h as isize, w as isize);

    let mut out = vec![0.0f32; output_shape.numel()];
    for plane in 0..n * c {
        let src = &input[plane * (h * w) as usize..(plane + 1) * (h * w) as usize];
        for oy in 0..oh {
            for ox in 0..ow {
                let mut hstart = (oy * desc.stride_y) as isize - desc.pad_top as isize;
                let mut wstart = (ox * desc.stride_x) as isize - desc.pad_left as isize;
                let mut hend = (hstart + desc.pool_height as isize).min(h + desc.pad_bottom as isize);
                let mut wend = (wstart + desc.pool_width as isize).min(w + desc.pad_right as isize);
                let padded_area = (hend - hstart) * (wend - wstart);

                hstart = hstart.max(0);
                wstart = wstart.max(0);
                hend = hend.min(h);
                wend = wend.min(w);

                let value = if hstart >= hend || wstart >= wend {
                    0.0
                } else {
                    let area = match desc.padding_method {
                        PaddingMethod::IgnoreValue => padded_area,
                        PaddingMethod::Exclude => (hend - hstart) * (wend - wstart),
                    } as f32;
                    let window = (hstart..hend).flat_map(|y| (wstart..wend).map(move |x| (y * w + x) as usize));
                    match desc.pool_type {
                        PoolingAlgorithm::Max => window.map(|i| src[i]).fold(f32::NEG_INFINITY, f32::max),
                        PoolingAlgorithm::Average => window.map(|i| src[i]).sum::<f32>() / area,
                        PoolingAlgorithm::L2 => (window.map(|i| src[i] * src[i]).sum::<f32>() / area).sqrt(),
                    }
                };
                out[(plane * oh + oy) * ow + ox] = value;
            }
        }
    }
    out
}
