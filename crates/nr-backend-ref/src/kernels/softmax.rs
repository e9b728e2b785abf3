/// Softmax along the innermost dimension of length `depth`:
/// `exp(beta * (x - max)) / sum`.
pub fn softmax(input: &[f32], depth: usize, beta: f32) -> Vec<f32> {
    let mut result = vec![0.0f32; input.len()];

    for (row, out) in input.chunks(depth).zip(result.chunks_mut(depth)) {
        // Subtract the max for numerical stability.
        let max_val = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let mut sum = 0.0f32;
        for (o, &x) in out.iter_mut().zip(row) {
            *o = ((x - max_val) * beta).exp();
            sum += *o;
        }
        for o in out.iter_mut() {
            *o /= sum;
        }
    }

    result
}
