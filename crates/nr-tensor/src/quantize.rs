//! Asymmetric 8-bit quantization helpers.
//!
//! `real = scale * (q - offset)`, with `q` saturated to `0..=255` on the way in.

/// Quantize one value, rounding to nearest and saturating to the u8 range.
pub fn quantize(value: f32, scale: f32, offset: i32) -> u8 {
    let q = (value / scale).round() + offset as f32;
    if q.is_nan() {
        return offset.clamp(0, 255) as u8;
    }
    q.clamp(0.0, 255.0) as u8
}

/// Dequantize one u8 value.
pub fn dequantize(q: u8, scale: f32, offset: i32) -> f32 {
    scale * (q as i32 - offset) as f32
}

pub fn quantize_slice(values: &[f32], scale: f32, offset: i32) -> Vec<u8> {
    values.iter().map(|&v| quantize(v, scale, offset)).collect()
}

pub fn dequantize_slice(values: &[u8], scale: f32, offset: i32) -> Vec<f32> {
    values.iter().map(|&q| dequantize(q, scale, offset)).collect()
}
