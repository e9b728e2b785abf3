use nr_tensor::Shape;

/// Row-major strides of `shape` right-aligned to `rank`, with zero stride
/// on broadcast (size 1 or missing) dimensions.
fn broadcast_strides(shape: &Shape, rank: usize) -> Vec<usize> {
    let strides = shape.strides();
    let pad = rank - shape.ndim();
    (0..rank)
        .map(|d| {
            if d < pad || shape.dim(d - pad) == 1 {
                0
            } else {
                strides[d - pad]
            }
        })
        .collect()
}

/// Apply `op` element-wise with numpy-style broadcasting of `a` and `b`
/// onto `out_shape`.
pub fn broadcast_binary(
    a: &[f32],
    a_shape: &Shape,
    b: &[f32],
    b_shape: &Shape,
    out_shape: &Shape,
    op: impl Fn(f32, f32) -> f32,
) -> Vec<f32> {
    let rank = out_shape.ndim();
    let a_strides = broadcast_strides(a_shape, rank);
    let b_strides = broadcast_strides(b_shape, rank);
    let total = out_shape.numel();

    let mut out = Vec::with_capacity(total);
    let mut index = vec![0usize; rank];
    for _ in 0..total {
        let ai: usize = index.iter().zip(&a_strides).map(|(i, s)| i * s).sum();
        let bi: usize = index.iter().zip(&b_strides).map(|(i, s)| i * s).sum();
        out.push(op(a[ai], b[bi]));

        for d in (0..rank).rev() {
            index[d] += 1;
            if index[d] < out_shape.dim(d) {
                break;
            }
            index[d] = 0;
        }
    }
    out
}
