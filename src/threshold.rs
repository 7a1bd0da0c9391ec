//! Spike threshold with surrogate gradients
//!
//! Spiking neurons emit `z = Θ(v - v_th)`, whose derivative is zero almost
//! everywhere. To train through it, the forward pass keeps the exact step
//! function while the backward pass uses the derivative of a smooth
//! primitive `s(x)`:
//!
//! ```text
//! z = Θ(x) + (s(x) - detach(s(x)))
//! ```
//!
//! The bracketed term is exactly zero in value, so `z` is binary, but its
//! gradient is `s'(x)`. This works on any burn backend; on non-autodiff
//! backends `detach` is a no-op.
//!
//! | Method | Surrogate derivative `s'(x)` |
//! |--------|------------------------------|
//! | [`ThresholdMethod::Heaviside`] | none (no gradient) |
//! | [`ThresholdMethod::SuperSpike`] | `1 / (α|x| + 1)²` |
//! | [`ThresholdMethod::Tanh`] | `α (1 - tanh²(αx))` |
//! | [`ThresholdMethod::Logistic`] | `α σ(αx) (1 - σ(αx))` |
//! | [`ThresholdMethod::Triangle`] | `α max(0, 1 - α|x|)` |

use burn::tensor::activation;
use burn::tensor::{backend::Backend, Tensor};
use serde::{Deserialize, Serialize};

/// Surrogate gradient used on the backward pass of the spike threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThresholdMethod {
    /// Plain step function, gradients do not flow through spikes
    Heaviside,
    /// SuperSpike fast sigmoid (Zenke & Ganguli, 2018)
    #[default]
    SuperSpike,
    /// Scaled tanh derivative
    Tanh,
    /// Logistic sigmoid derivative
    Logistic,
    /// Piecewise-linear bump of half-width `1/α`
    Triangle,
}

impl ThresholdMethod {
    /// Smooth primitive whose derivative is the surrogate, `None` for [`Self::Heaviside`].
    fn primitive<B: Backend, const D: usize>(
        self,
        x: Tensor<B, D>,
        alpha: f64,
    ) -> Option<Tensor<B, D>> {
        match self {
            Self::Heaviside => None,
            // d/dx [x / (α|x| + 1)] = 1 / (α|x| + 1)²
            Self::SuperSpike => {
                let denom = x.clone().abs().mul_scalar(alpha).add_scalar(1.0);
                Some(x / denom)
            }
            Self::Tanh => Some(x.mul_scalar(alpha).tanh()),
            Self::Logistic => Some(activation::sigmoid(x.mul_scalar(alpha))),
            // u - u|u|/2 with u = clamp(αx, -1, 1)
            Self::Triangle => {
                let u = x.mul_scalar(alpha).clamp(-1.0, 1.0);
                Some(u.clone() - u.clone() * u.abs().mul_scalar(0.5))
            }
        }
    }
}

/// Exact heaviside step: `1` where `x > 0`, `0` elsewhere.
pub fn heaviside<B: Backend, const D: usize>(x: Tensor<B, D>) -> Tensor<B, D> {
    x.greater_elem(0.0).float()
}

/// Spike nonlinearity with a pluggable surrogate gradient.
///
/// # Arguments
/// * `x` - Distance to threshold, typically `v - v_th`
/// * `method` - Surrogate used on the backward pass
/// * `alpha` - Surrogate steepness
///
/// # Returns
/// Tensor of the same shape whose values are exactly `0.0` or `1.0`
pub fn threshold<B: Backend, const D: usize>(
    x: Tensor<B, D>,
    method: ThresholdMethod,
    alpha: f64,
) -> Tensor<B, D> {
    let spikes = heaviside(x.clone());
    match method.primitive(x, alpha) {
        Some(smooth) => spikes + (smooth.clone() - smooth.detach()),
        None => spikes,
    }
}
