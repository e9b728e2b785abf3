/// `out[b, o] = sum_i input[b, i] * W(i, o) + bias[o]`, where `W` is
/// stored `[inputs, outputs]`, or `[outputs, inputs]` when `transposed`.
pub fn fully_connected(
    input: &[f32],
    batch: usize,
    weight: &[f32],
    inputs: usize,
    outputs: usize,
    transposed: bool,
    bias: Option<&[f32]>,
) -> Vec<f32> {
    let mut out = vec![0.0f32; batch * outputs];
    for b in 0..batch {
        let row = &input[b * inputs..(b + 1) * inputs];
        for o in 0..outputs {
            let mut sum = bias.map_or(0.0, |bias| bias[o]);
            for (i, &x) in row.iter().enumerate() {
                let w = if transposed {
                    weight[o * inputs + i]
                } else {
                    weight[i * outputs + o]
                };
                sum += x * w;
            }
            out[b * outputs + o] = sum;
        }
    }
    out
}
