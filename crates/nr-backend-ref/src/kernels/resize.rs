use nr_tensor::Shape;

use super::conv::dims4;

/// Bilinear resize of each NCHW plane to the output's height and width.
///
/// Output pixel `(y, x)` samples the input at `(y * in_h / out_h,
/// x * in_w / out_w)`; neighbours past the edge are clamped to the last
/// row or column.
pub fn resize_bilinear(input: &[f32], input_shape: &Shape, output_shape: &Shape) -> Vec<f32> {
    let (n, c, h, w) = dims4(input_shape);
    let (_, _, oh, ow) = dims4(output_shape);
    let scale_y = h as f32 / oh as f32;
    let scale_x = w as f32 / ow as f32;

    let mut out = vec![0.0f32; output_shape.numel()];
    for plane in 0..n * c {
        let src = &input[plane * h * w..(plane + 1) * h * w];
        for y in 0..oh {
            let iy = y as f32 * scale_y;
            let y0 = iy.floor() as usize;
            let y1 = (y0 + 1).min(h - 1);
            let dy = iy - y0 as f32;
            for x in 0..ow {
                let ix = x as f32 * scale_x;
                let x0 = ix.floor() as usize;
                let x1 = (x0 + 1).min(w - 1);
                let dx = ix - x0 as f32;

                let top = src[y0 * w + x0] * (1.0 - dx) + src[y0 * w + x1] * dx;
                let bottom = src[y1 * w + x0] * (1.0 - dx) + src[y1 * w + x1] * dx;
                out[(plane * oh + y) * ow + x] = top * (1.0 - dy) + bottom * dy;
            }
        }
    }
    out
}
