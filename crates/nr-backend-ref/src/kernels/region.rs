//! Raw-byte region copies for split, merge and reshape layers.

use nr_tensor::{Shape, TensorHandle};

/// Copy the box `region` from `src` at `src_origin` into `dst` at
/// `dst_origin`, row by row over the innermost dimension. Both buffers are
/// row-major with elements of `width` bytes.
#[allow(clippy::too_many_arguments)]
pub fn copy_region(
    src: &[u8],
    src_shape: &Shape,
    src_origin: &[usize],
    dst: &mut [u8],
    dst_shape: &Shape,
    dst_origin: &[usize],
    region: &Shape,
    width: usize,
) {
    let rank = region.ndim();
    let src_strides = src_shape.strides();
    let dst_strides = dst_shape.strides();
    let row_bytes = region.dim(rank - 1) * width;
    let rows = region.numel() / region.dim(rank - 1);

    let mut index = vec![0usize; rank];
    for _ in 0..rows {
        let offset = |origin: &[usize], strides: &[usize]| -> usize {
            index
                .iter()
                .zip(origin)
                .zip(strides)
                .map(|((i, o), s)| (i + o) * s)
                .sum::<usize>()
                * width
        };
        let s = offset(src_origin, &src_strides);
        let d = offset(dst_origin, &dst_strides);
        dst[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);

        for dim in (0..rank - 1).rev() {
            index[dim] += 1;
            if index[dim] < region.dim(dim) {
                break;
            }
            index[dim] = 0;
        }
    }
}

/// True if `part` already addresses exactly the bytes of the region of
/// `whole` starting at `origin`, so nothing needs copying.
pub fn is_exact_region(whole: &TensorHandle, part: &TensorHandle, origin: &[usize]) -> bool {
    if part.allocation() != whole.allocation() {
        return false;
    }
    let width = whole.info().data_type().size_in_bytes();
    whole
        .info()
        .shape()
        .contiguous_offset(part.info().shape(), origin)
        .is_some_and(|elements| part.byte_offset() == whole.byte_offset() + elements * width)
}
