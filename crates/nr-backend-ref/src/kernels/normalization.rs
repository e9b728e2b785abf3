use nr_tensor::Shape;
use nr_workload::{NormalizationChannel, NormalizationDescriptor};

use super::conv::dims4;

/// Local response normalization over NCHW input:
/// `y = x * (k + alpha * sum(x^2)) ^ -beta`, the sum taken over
/// `norm_size` neighbouring channels (across) or an `norm_size` square of the
/// same channel (within).
pub fn local_response(input: &[f32], shape: &Shape, desc: &NormalizationDescriptor) -> Vec<f32> {
    let (n, c, h, w) = dims4(shape);
    let radius = (desc.norm_size / 2) as isize;
    let at = |b: usize, ch: usize, y: usize, x: usize| ((b * c + ch) * h + y) * w + x;

    let mut out = vec![0.0f32; input.len()];
    for b in 0..n {
        for ch in 0..c {
            for y in 0..h {
                for x in 0..w {
                    let mut sum_sq = 0.0f32;
                    match desc.channel_type {
                        NormalizationChannel::Across => {
                            for k in clamped(ch, radius, c) {
                                let v = input[at(b, k, y, x)];
                                sum_sq += v * v;
                            }
                        }
                        NormalizationChannel::Within => {
                            for yy in clamped(y, radius, h) {
                                for xx in clamped(x, radius, w) {
                                    let v = input[at(b, ch, yy, xx)];
                                    sum_sq += v * v;
                                }
                            }
                        }
                    }
                    let i = at(b, ch, y, x);
                    let scale = desc.k + desc.alpha * sum_sq;
                    out[i] = input[i] * scale.powf(-desc.beta);
                }
            }
        }
    }
    out
}

fn clamped(centre: usize, radius: isize, size: usize) -> std::ops::Range<usize> {
    let lo = (centre as isize - radius).max(0) as usize;
    let hi = (centre as isize + radius + 1).min(size as isize) as usize;
    lo..hi
}

/// Normalize each spatial position across channels (dimension 1):
/// `y = x / sqrt(max(sum_c x^2, eps))`.
pub fn l2_normalization(input: &[f32], shape: &Shape, eps: f32) -> Vec<f32> {
    let n = shape.dim(0);
    let c = shape.dim(1);
    let spatial = shape.numel() / (n * c);

    let mut out = vec![0.0f32; input.len()];
    for b in 0..n {
        for s in 0..spatial {
            let idx = |ch: usize| (b * c + ch) * spatial + s;
            let sum_sq: f32 = (0..c).map(|ch| input[idx(ch)] * input[idx(ch)]).sum();
            let norm = sum_sq.max(eps).sqrt();
            for ch in 0..c {
                out[idx(ch)] = input[idx(ch)] / norm;
            }
        }
    }
    out
}

/// Per-channel statistics for [`batch_normalization`], all of length C.
pub struct BatchStats<'a> {
    pub mean: &'a [f32],
    pub variance: &'a [f32],
    pub beta: &'a [f32],
    pub gamma: &'a [f32],
}

/// `y = (x - mean) / sqrt(var + eps) * gamma + beta`, per channel of dimension 1.
pub fn batch_normalization(input: &[f32], shape: &Shape, stats: &BatchStats<'_>, eps: f32) -> Vec<f32> {
    let n = shape.dim(0);
    let c = shape.dim(1);
    let spatial = shape.numel() / (n * c);

    let mut out = vec![0.0f32; input.len()];
    for b in 0..n {
        for ch in 0..c {
            let mult = stats.gamma[ch] / (stats.variance[ch] + eps).sqrt();
            let start = (b * c + ch) * spatial;
            for i in start..start + spatial {
                out[i] = (input[i] - stats.mean[ch]) * mult + stats.beta[ch];
            }
        }
    }
    out
}
