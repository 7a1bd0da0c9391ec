//! Leaky integrate-and-fire neuron model integrated with explicit Euler steps.

use crate::error::{self, check_shape, LifError};
use crate::threshold::{threshold, ThresholdMethod};
use burn::config::Config;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Parameters of the LIF neuron model
///
/// Time constants are given as inverses (in 1/s) so that the Euler updates
/// are plain products with `dt`.
#[derive(Config, Debug, PartialEq)]
pub struct LIFParameters {
    /// Inverse synaptic time constant
    #[config(default = 200.0)]
    pub tau_syn_inv: f64,
    /// Inverse membrane time constant
    #[config(default = 100.0)]
    pub tau_mem_inv: f64,
    /// Leak (resting) potential
    #[config(default = 0.0)]
    pub v_leak: f64,
    /// Spike threshold
    #[config(default = 1.0)]
    pub v_th: f64,
    /// Potential the membrane is reset to after a spike
    #[config(default = 0.0)]
    pub v_reset: f64,
    /// Surrogate gradient used by the spike threshold
    #[config(default = "ThresholdMethod::SuperSpike")]
    pub method: ThresholdMethod,
    /// Surrogate steepness
    #[config(default = 100.0)]
    pub alpha: f64,
}

impl Default for LIFParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl LIFParameters {
    /// Check that the parameters and the integration step describe a valid model.
    ///
    /// Large `dt` relative to the time constants is not an error here, see
    /// [`LIFParameters::warn_if_stiff`].
    pub fn validate(&self, dt: f64) -> error::Result<()> {
        for (name, value) in [
            ("tau_syn_inv", self.tau_syn_inv),
            ("tau_mem_inv", self.tau_mem_inv),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LifError::InvalidParameter(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("v_leak", self.v_leak),
            ("v_th", self.v_th),
            ("v_reset", self.v_reset),
        ] {
            if !value.is_finite() {
                return Err(LifError::InvalidParameter(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(LifError::InvalidParameter(format!(
                "alpha must be finite and non-negative, got {}",
                self.alpha
            )));
        }

        if !dt.is_finite() || dt <= 0.0 {
            return Err(LifError::InvalidTimeStep(dt));
        }

        Ok(())
    }

    /// Emit a warning when `dt` is not small relative to both time constants.
    ///
    /// Returns `true` if the warning fired.
    pub fn warn_if_stiff(&self, dt: f64) -> bool {
        let stiffest = self.tau_syn_inv.max(self.tau_mem_inv);
        let stiff = dt * stiffest >= 1.0;
        if stiff {
            tracing::warn!(
                dt,
                tau_syn_inv = self.tau_syn_inv,
                tau_mem_inv = self.tau_mem_inv,
                "dt is not small relative to the LIF time constants, Euler integration may diverge"
            );
        }
        stiff
    }
}

/// Which spikes drive the recurrent weights within one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecurrentFeedback {
    /// Spikes emitted in this step feed back immediately
    #[default]
    SameStep,
    /// Spikes carried in from the previous step feed back (one step delay)
    Delayed,
}

/// State of a recurrently connected LIF population
#[derive(Debug, Clone)]
pub struct LIFState<B: Backend> {
    /// Spikes emitted in the last step (0 or 1)
    pub z: Tensor<B, 2>,
    /// Membrane voltage
    pub v: Tensor<B, 2>,
    /// Synaptic current
    pub i: Tensor<B, 2>,
}

impl<B: Backend> LIFState<B> {
    /// Resting state: no spikes, no current, voltage at the leak potential.
    pub fn initial(
        batch_size: usize,
        hidden_size: usize,
        p: &LIFParameters,
        device: &B::Device,
    ) -> Self {
        let shape = [batch_size, hidden_size];
        Self {
            z: Tensor::zeros(shape, device),
            v: Tensor::full(shape, p.v_leak, device),
            i: Tensor::zeros(shape, device),
        }
    }

    /// `[batch, hidden_size]`
    pub fn dims(&self) -> [usize; 2] {
        self.v.dims()
    }

    fn check(&self, expected: [usize; 2]) -> error::Result<()> {
        check_shape("state.z", &expected, &self.z.dims())?;
        check_shape("state.v", &expected, &self.v.dims())?;
        check_shape("state.i", &expected, &self.i.dims())
    }
}

/// State of a feed-forward LIF population
///
/// There is no stored spike tensor: feed-forward cells receive current
/// directly, so spikes are only an output.
#[derive(Debug, Clone)]
pub struct LIFFeedForwardState<B: Backend, const D: usize = 2> {
    /// Membrane voltage
    pub v: Tensor<B, D>,
    /// Synaptic current
    pub i: Tensor<B, D>,
}

impl<B: Backend, const D: usize> LIFFeedForwardState<B, D> {
    /// Resting state of the given shape.
    pub fn initial(shape: [usize; D], p: &LIFParameters, device: &B::Device) -> Self {
        Self {
            v: Tensor::full(shape, p.v_leak, device),
            i: Tensor::zeros(shape, device),
        }
    }

    /// Shape shared by `v` and `i`
    pub fn dims(&self) -> [usize; D] {
        self.v.dims()
    }
}

/// Euler steps 1-4 shared by both variants: leak, decay, threshold, reset.
///
/// Returns `(spikes, v_reset_applied, i_decayed)`.
fn integrate<B: Backend, const D: usize>(
    v: Tensor<B, D>,
    i: Tensor<B, D>,
    p: &LIFParameters,
    dt: f64,
) -> (Tensor<B, D>, Tensor<B, D>, Tensor<B, D>) {
    // dv = dt * tau_mem_inv * (v_leak - v + i)
    let dv = (i.clone() - v.clone())
        .add_scalar(p.v_leak)
        .mul_scalar(dt * p.tau_mem_inv);
    let v_decayed = v + dv;

    // di = -dt * tau_syn_inv * i
    let di = i.clone().mul_scalar(-dt * p.tau_syn_inv);
    let i_decayed = i + di;

    let z_new = threshold(v_decayed.clone().sub_scalar(p.v_th), p.method, p.alpha);

    // Hard reset where a spike was emitted
    let v_new = v_decayed * z_new.clone().neg().add_scalar(1.0)
        + z_new.clone().mul_scalar(p.v_reset);

    (z_new, v_new, i_decayed)
}

/// One Euler step of a recurrent LIF population, failing on inconsistent shapes.
///
/// # Arguments
/// * `input` - Input spikes of shape `[batch, input_size]`
/// * `state` - Current state, each field `[batch, hidden_size]`
/// * `input_weights` - `[hidden_size, input_size]`
/// * `recurrent_weights` - `[hidden_size, hidden_size]`
/// * `p` - Neuron parameters
/// * `dt` - Integration step
/// * `feedback` - Which spikes drive the recurrent weights
///
/// # Returns
/// Tuple of (spikes, next_state) where spikes has shape `[batch, hidden_size]`
pub fn try_lif_step_with_feedback<B: Backend>(
    input: Tensor<B, 2>,
    state: LIFState<B>,
    input_weights: Tensor<B, 2>,
    recurrent_weights: Tensor<B, 2>,
    p: &LIFParameters,
    dt: f64,
    feedback: RecurrentFeedback,
) -> error::Result<(Tensor<B, 2>, LIFState<B>)> {
    let [batch_size, _] = input.dims();
    let [hidden_size, input_size] = input_weights.dims();

    check_shape("input", &[batch_size, input_size], &input.dims())?;
    check_shape(
        "recurrent_weights",
        &[hidden_size, hidden_size],
        &recurrent_weights.dims(),
    )?;
    state.check([batch_size, hidden_size])?;

    let LIFState { z, v, i } = state;
    let (z_new, v_new, i_decayed) = integrate(v, i, p, dt);

    let z_rec = match feedback {
        RecurrentFeedback::SameStep => z_new.clone(),
        RecurrentFeedback::Delayed => z,
    };

    // Synaptic input from incoming and recurrent spikes
    let i_new = i_decayed
        + input.matmul(input_weights.transpose())
        + z_rec.matmul(recurrent_weights.transpose());

    Ok((
        z_new.clone(),
        LIFState {
            z: z_new,
            v: v_new,
            i: i_new,
        },
    ))
}

/// Same as [`try_lif_step_with_feedback`] with same-step recurrent feedback.
pub fn try_lif_step<B: Backend>(
    input: Tensor<B, 2>,
    state: LIFState<B>,
    input_weights: Tensor<B, 2>,
    recurrent_weights: Tensor<B, 2>,
    p: &LIFParameters,
    dt: f64,
) -> error::Result<(Tensor<B, 2>, LIFState<B>)> {
    try_lif_step_with_feedback(
        input,
        state,
        input_weights,
        recurrent_weights,
        p,
        dt,
        RecurrentFeedback::SameStep,
    )
}

/// Panicking form of [`try_lif_step_with_feedback`].
///
/// # Panics
/// If the input, weight and state shapes are inconsistent.
pub fn lif_step_with_feedback<B: Backend>(
    input: Tensor<B, 2>,
    state: LIFState<B>,
    input_weights: Tensor<B, 2>,
    recurrent_weights: Tensor<B, 2>,
    p: &LIFParameters,
    dt: f64,
    feedback: RecurrentFeedback,
) -> (Tensor<B, 2>, LIFState<B>) {
    try_lif_step_with_feedback(
        input,
        state,
        input_weights,
        recurrent_weights,
        p,
        dt,
        feedback,
    )
    .unwrap_or_else(|err| panic!("{}", err))
}

/// One Euler step of a recurrent LIF population.
///
/// # Panics
/// If the input, weight and state shapes are inconsistent.
pub fn lif_step<B: Backend>(
    input: Tensor<B, 2>,
    state: LIFState<B>,
    input_weights: Tensor<B, 2>,
    recurrent_weights: Tensor<B, 2>,
    p: &LIFParameters,
    dt: f64,
) -> (Tensor<B, 2>, LIFState<B>) {
    lif_step_with_feedback(
        input,
        state,
        input_weights,
        recurrent_weights,
        p,
        dt,
        RecurrentFeedback::SameStep,
    )
}

/// One Euler step of a feed-forward LIF population, failing on inconsistent shapes.
///
/// `input` is a current (e.g. the output of a linear or convolution layer)
/// added directly to the decayed synaptic current.
pub fn try_lif_feed_forward_step<B: Backend, const D: usize>(
    input: Tensor<B, D>,
    state: LIFFeedForwardState<B, D>,
    p: &LIFParameters,
    dt: f64,
) -> error::Result<(Tensor<B, D>, LIFFeedForwardState<B, D>)> {
    let shape = input.dims();
    check_shape("state.v", &shape, &state.v.dims())?;
    check_shape("state.i", &shape, &state.i.dims())?;

    let (z_new, v_new, i_decayed) = integrate(state.v, state.i, p, dt);
    let i_new = i_decayed + input;

    Ok((z_new, LIFFeedForwardState { v: v_new, i: i_new }))
}

/// Panicking form of [`try_lif_feed_forward_step`].
///
/// # Panics
/// If the state shape differs from the input shape.
pub fn lif_feed_forward_step<B: Backend, const D: usize>(
    input: Tensor<B, D>,
    state: LIFFeedForwardState<B, D>,
    p: &LIFParameters,
    dt: f64,
) -> (Tensor<B, D>, LIFFeedForwardState<B, D>) {
    try_lif_feed_forward_step(input, state, p, dt).unwrap_or_else(|err| panic!("{}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::backend::Backend as BurnBackend;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;
    type TestDevice = <TestBackend as BurnBackend>::Device;

    fn get_test_device() -> TestDevice {
        Default::default()
    }

    fn to_vec<const D: usize>(t: Tensor<TestBackend, D>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    fn random_weights(rows: usize, cols: usize) -> Tensor<TestBackend, 2> {
        Tensor::random(
            [rows, cols],
            Distribution::Normal(0.0, 2.0),
            &get_test_device(),
        )
    }

    #[test]
    fn test_default_parameters() {
        let p = LIFParameters::default();

        assert_eq!(p.tau_syn_inv, 200.0);
        assert_eq!(p.tau_mem_inv, 100.0);
        assert_eq!(p.v_leak, 0.0);
        assert_eq!(p.v_th, 1.0);
        assert_eq!(p.v_reset, 0.0);
        assert_eq!(p.method, ThresholdMethod::SuperSpike);
        assert_eq!(p.alpha, 100.0);
        assert!(p.validate(0.001).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let p = LIFParameters::new().with_tau_mem_inv(0.0);
        assert!(matches!(p.validate(0.001), Err(LifError::InvalidParameter(_))));

        let p = LIFParameters::new().with_tau_syn_inv(f64::INFINITY);
        assert!(matches!(p.validate(0.001), Err(LifError::InvalidParameter(_))));

        let p = LIFParameters::new().with_v_th(f64::NAN);
        assert!(matches!(p.validate(0.001), Err(LifError::InvalidParameter(_))));

        let p = LIFParameters::new().with_alpha(-1.0);
        assert!(matches!(p.validate(0.001), Err(LifError::InvalidParameter(_))));

        let p = LIFParameters::new();
        assert_eq!(p.validate(0.0), Err(LifError::InvalidTimeStep(0.0)));
        assert_eq!(p.validate(-0.1), Err(LifError::InvalidTimeStep(-0.1)));
    }

    #[test]
    fn test_parameters_serde() {
        let p = LIFParameters::new()
            .with_v_th(0.75)
            .with_method(ThresholdMethod::Triangle);

        let json = serde_json::to_string(&p).unwrap();
        let restored: LIFParameters = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, p);
    }

    #[test]
    fn test_stiffness_warning() {
        let p = LIFParameters::new();

        assert!(!p.warn_if_stiff(0.001));
        // dt is twice the synaptic time constant
        assert!(p.warn_if_stiff(0.01));
    }

    #[test]
    fn test_initial_state() {
        let device = get_test_device();
        let p = LIFParameters::new().with_v_leak(-0.5);
        let state = LIFState::<TestBackend>::initial(3, 4, &p, &device);

        assert_eq!(state.dims(), [3, 4]);
        assert!(to_vec(state.z).iter().all(|&x| x == 0.0));
        assert!(to_vec(state.v).iter().all(|&x| x == -0.5));
        assert!(to_vec(state.i).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_zero_input_steady_state() {
        let device = get_test_device();
        let p = LIFParameters::new().with_v_leak(0.3);
        let state = LIFState::<TestBackend>::initial(2, 5, &p, &device);
        let input = Tensor::<TestBackend, 2>::zeros([2, 3], &device);
        let w_in = Tensor::<TestBackend, 2>::zeros([5, 3], &device);
        let w_rec = Tensor::<TestBackend, 2>::zeros([5, 5], &device);

        let (z, next) = lif_step(input, state, w_in, w_rec, &p, 0.001);

        assert!(to_vec(z).iter().all(|&x| x == 0.0));
        assert!(to_vec(next.v).iter().all(|&x| (x - 0.3).abs() < 1e-6));
        assert!(to_vec(next.i).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_spikes_are_binary() {
        let device = get_test_device();
        let p = LIFParameters::new();
        let state = LIFState {
            z: Tensor::<TestBackend, 2>::zeros([8, 16], &device),
            v: Tensor::random([8, 16], Distribution::Uniform(-2.0, 3.0), &device),
            i: Tensor::random([8, 16], Distribution::Uniform(-20.0, 20.0), &device),
        };
        let input = Tensor::<TestBackend, 2>::random([8, 4], Distribution::Uniform(0.0, 1.0), &device)
            .greater_elem(0.5)
            .float();

        let (z, next) = lif_step(
            input,
            state,
            random_weights(16, 4),
            random_weights(16, 16),
            &p,
            0.001,
        );

        let z = to_vec(z);
        assert!(z.iter().all(|&x| x == 0.0 || x == 1.0));
        assert_eq!(z, to_vec(next.z));
    }

    #[test]
    fn test_reset_correctness() {
        let device = get_test_device();
        let p = LIFParameters::new().with_v_reset(-0.25);
        let dt = 0.001;
        let v = Tensor::<TestBackend, 2>::random([6, 10], Distribution::Uniform(0.5, 1.5), &device);
        let i = Tensor::<TestBackend, 2>::random([6, 10], Distribution::Uniform(-5.0, 5.0), &device);

        // Voltage after the leak step, before reset
        let v_decayed = to_vec(
            v.clone() + (i.clone() - v.clone()).add_scalar(p.v_leak).mul_scalar(dt * p.tau_mem_inv),
        );

        let state = LIFFeedForwardState { v, i };
        let input = Tensor::<TestBackend, 2>::zeros([6, 10], &device);
        let (z, next) = lif_feed_forward_step(input, state, &p, dt);

        let z = to_vec(z);
        let v_new = to_vec(next.v);
        assert!(z.iter().any(|&x| x == 1.0), "expected at least one spike");
        assert!(z.iter().any(|&x| x == 0.0), "expected at least one silent neuron");
        for k in 0..z.len() {
            if z[k] == 1.0 {
                assert_eq!(v_new[k], -0.25);
            } else {
                assert!((v_new[k] - v_decayed[k]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_step_is_deterministic() {
        let device = get_test_device();
        let p = LIFParameters::new();
        let state = LIFState {
            z: Tensor::<TestBackend, 2>::zeros([4, 8], &device),
            v: Tensor::random([4, 8], Distribution::Uniform(0.0, 1.5), &device),
            i: Tensor::random([4, 8], Distribution::Uniform(-3.0, 3.0), &device),
        };
        let input = Tensor::<TestBackend, 2>::ones([4, 3], &device);
        let w_in = random_weights(8, 3);
        let w_rec = random_weights(8, 8);

        let (z1, s1) = lif_step(input.clone(), state.clone(), w_in.clone(), w_rec.clone(), &p, 0.001);
        let (z2, s2) = lif_step(input, state, w_in, w_rec, &p, 0.001);

        assert_eq!(to_vec(z1), to_vec(z2));
        assert_eq!(to_vec(s1.v), to_vec(s2.v));
        assert_eq!(to_vec(s1.i), to_vec(s2.i));
    }

    #[test]
    fn test_euler_update_values() {
        let device = get_test_device();
        let p = LIFParameters::new();
        let state = LIFFeedForwardState::<TestBackend, 1> {
            v: Tensor::from_floats([0.5], &device),
            i: Tensor::from_floats([2.0], &device),
        };
        let input = Tensor::<TestBackend, 1>::from_floats([0.75], &device);

        let (z, next) = lif_feed_forward_step(input, state, &p, 0.001);

        // v' = 0.5 + 0.1 * (0 - 0.5 + 2) = 0.65, i' = 2 - 0.2 * 2 + 0.75 = 2.35
        assert_eq!(to_vec(z), vec![0.0]);
        assert!((to_vec(next.v)[0] - 0.65).abs() < 1e-6);
        assert!((to_vec(next.i)[0] - 2.35).abs() < 1e-6);
    }

    #[test]
    fn test_recurrent_feedback_timing() {
        let device = get_test_device();
        let p = LIFParameters::new();
        // Neuron 0 is above threshold after the leak step, neuron 1 is silent
        let state = LIFState {
            z: Tensor::<TestBackend, 2>::zeros([1, 2], &device),
            v: Tensor::from_floats([[2.0, 0.0]], &device),
            i: Tensor::from_floats([[10.0, 0.0]], &device),
        };
        let input = Tensor::<TestBackend, 2>::zeros([1, 1], &device);
        let w_in = Tensor::<TestBackend, 2>::zeros([2, 1], &device);
        // Neuron 0 excites neuron 1
        let w_rec = Tensor::<TestBackend, 2>::from_floats([[0.0, 0.0], [3.0, 0.0]], &device);

        let (_, same) = lif_step_with_feedback(
            input.clone(),
            state.clone(),
            w_in.clone(),
            w_rec.clone(),
            &p,
            0.001,
            RecurrentFeedback::SameStep,
        );
        let (_, delayed) = lif_step_with_feedback(
            input,
            state,
            w_in,
            w_rec,
            &p,
            0.001,
            RecurrentFeedback::Delayed,
        );

        assert!((to_vec(same.i)[1] - 3.0).abs() < 1e-6);
        assert_eq!(to_vec(delayed.i)[1], 0.0);
        assert_eq!(to_vec(same.z), to_vec(delayed.z));
    }

    #[test]
    fn test_input_width_mismatch_is_an_error() {
        let device = get_test_device();
        let p = LIFParameters::new();
        let state = LIFState::<TestBackend>::initial(2, 4, &p, &device);
        let input = Tensor::<TestBackend, 2>::zeros([2, 5], &device);

        let result = try_lif_step(input, state, random_weights(4, 3), random_weights(4, 4), &p, 0.001);

        assert_eq!(
            result.map(|_| ()).unwrap_err(),
            LifError::ShapeMismatch {
                tensor: "input",
                expected: vec![2, 3],
                actual: vec![2, 5],
            }
        );
    }

    #[test]
    fn test_state_batch_mismatch_is_an_error() {
        let device = get_test_device();
        let p = LIFParameters::new();
        let state = LIFState::<TestBackend>::initial(3, 4, &p, &device);
        let input = Tensor::<TestBackend, 2>::zeros([2, 3], &device);

        let result = try_lif_step(input, state, random_weights(4, 3), random_weights(4, 4), &p, 0.001);

        assert!(matches!(
            result,
            Err(LifError::ShapeMismatch { tensor: "state.z", .. })
        ));
    }

    #[test]
    #[should_panic(expected = "Shape mismatch for input")]
    fn test_lif_step_panics_on_mismatch() {
        let device = get_test_device();
        let p = LIFParameters::new();
        let state = LIFState::<TestBackend>::initial(2, 4, &p, &device);
        let input = Tensor::<TestBackend, 2>::zeros([2, 7], &device);

        let _ = lif_step(input, state, random_weights(4, 3), random_weights(4, 4), &p, 0.001);
    }

    #[test]
    #[should_panic(expected = "Shape mismatch for state.v")]
    fn test_feed_forward_step_panics_on_mismatch() {
        let device = get_test_device();
        let p = LIFParameters::new();
        let state = LIFFeedForwardState::<TestBackend, 2>::initial([2, 4], &p, &device);
        let input = Tensor::<TestBackend, 2>::zeros([2, 5], &device);

        let _ = lif_feed_forward_step(input, state, &p, 0.001);
    }
}
