use crate::model::ParamOps;

/// Gradient-based parameter update.
///
/// Decoupled from the [`Trainer`](crate::trainer::Trainer) so any model can be paired
/// with any optimizer. `step` returns new parameters instead of mutating in place.
pub trait Optimizer<P> {
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Plain stochastic gradient descent: `θ ← θ - η · ∇L(θ)`.
#[derive(Clone, Copy, Debug)]
pub struct SGD {
    lr: f64,
}

impl SGD {
    /// `lr` is expected to be positive and finite; the trainer config validates it.
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }
}

impl<P: ParamOps> Optimizer<P> for SGD {
    fn step(&self, params: &P, gradients: &P) -> P {
        params.add(&gradients.scale(-self.lr))
    }
}
