use nr_workload::ActivationFunction;

pub fn activate(x: f32, function: ActivationFunction, a: f32, b: f32) -> f32 {
    match function {
        ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        ActivationFunction::TanH => a * (b * x).tanh(),
        ActivationFunction::Linear => a * x + b,
        ActivationFunction::ReLu => x.max(0.0),
        ActivationFunction::BoundedReLu => a.min(b.max(x)),
        ActivationFunction::SoftReLu => x.exp().ln_1p(),
        ActivationFunction::LeakyReLu => {
            if x > 0.0 {
                x
            } else {
                a * x
            }
        }
        ActivationFunction::Abs => x.abs(),
        ActivationFunction::Sqrt => x.sqrt(),
        ActivationFunction::Square => x * x,
    }
}

pub fn activation(input: &[f32], function: ActivationFunction, a: f32, b: f32) -> Vec<f32> {
    input.iter().map(|&x| activate(x, function, a, b)).collect()
}

pub fn floor(input: &[f32]) -> Vec<f32> {
    input.iter().map(|x| x.floor()).collect()
}
