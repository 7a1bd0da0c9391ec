//! Recurrently connected LIF cell
//!
//! Owns the input and recurrent weight matrices and integrates one time
//! step per call via [`try_lif_step_with_feedback`].

use super::SpikingCell;
use crate::error::{self, LifError};
use crate::functional::{try_lif_step_with_feedback, LIFParameters, LIFState, RecurrentFeedback};
use burn::config::Config;
use burn::module::{Ignored, Module, Param};
use burn::tensor::backend::Backend;
use burn::tensor::{Distribution, Tensor};

/// Configuration to create a [`LIFCell`]
#[derive(Config, Debug)]
pub struct LIFCellConfig {
    /// Number of input neurons
    pub input_size: usize,
    /// Number of LIF neurons in the cell
    pub hidden_size: usize,
    /// Neuron parameters
    #[config(default = "LIFParameters::new()")]
    pub parameters: LIFParameters,
    /// Integration step
    #[config(default = 0.001)]
    pub dt: f64,
    /// Which spikes drive the recurrent weights
    #[config(default = "RecurrentFeedback::SameStep")]
    pub feedback: RecurrentFeedback,
}

impl LIFCellConfig {
    /// Initialize a cell, failing on invalid sizes or parameters.
    ///
    /// Weights are drawn from `N(0, 2 / hidden_size)`. Use the backend's
    /// seeding to make them reproducible.
    pub fn try_init<B: Backend>(&self, device: &B::Device) -> error::Result<LIFCell<B>> {
        if self.input_size == 0 || self.hidden_size == 0 {
            return Err(LifError::InvalidParameter(format!(
                "input_size and hidden_size must be non-zero, got {} and {}",
                self.input_size, self.hidden_size
            )));
        }
        self.parameters.validate(self.dt)?;
        self.parameters.warn_if_stiff(self.dt);

        let std = (2.0 / self.hidden_size as f64).sqrt();
        let input_weights = Self::init_weights([self.hidden_size, self.input_size], std, device);
        let recurrent_weights =
            Self::init_weights([self.hidden_size, self.hidden_size], std, device);

        Ok(LIFCell {
            input_weights,
            recurrent_weights,
            input_size: self.input_size,
            hidden_size: self.hidden_size,
            p: Ignored(self.parameters.clone()),
            dt: self.dt,
            feedback: Ignored(self.feedback),
        })
    }

    /// Initialize a cell.
    ///
    /// # Panics
    /// If the configuration is invalid, see [`LIFCellConfig::try_init`].
    pub fn init<B: Backend>(&self, device: &B::Device) -> LIFCell<B> {
        self.try_init(device)
            .unwrap_or_else(|err| panic!("Invalid LIFCell configuration: {}", err))
    }

    fn init_weights<B: Backend>(
        shape: [usize; 2],
        std: f64,
        device: &B::Device,
    ) -> Param<Tensor<B, 2>> {
        let tensor = Tensor::random(shape, Distribution::Normal(0.0, std), device);
        Param::from_tensor(tensor)
    }
}

/// Leaky integrate-and-fire cell with recurrent connections
///
/// Implements one Euler step of
///
/// ```text
/// dv/dt = τ_mem⁻¹ (v_leak - v + i)
/// di/dt = -τ_syn⁻¹ i
/// z = Θ(v - v_th)
/// v = (1 - z) v + z v_reset
/// i = i + W_in z_in + W_rec z_rec
/// ```
///
/// The cell keeps no state between calls: the caller threads [`LIFState`]
/// through successive calls, or passes `None` to start from rest.
#[derive(Module, Debug)]
pub struct LIFCell<B: Backend> {
    /// Input-to-hidden weights, `[hidden_size, input_size]`
    pub input_weights: Param<Tensor<B, 2>>,
    /// Hidden-to-hidden weights, `[hidden_size, hidden_size]`
    pub recurrent_weights: Param<Tensor<B, 2>>,
    #[module(skip)]
    input_size: usize,
    #[module(skip)]
    hidden_size: usize,
    /// Neuron parameters
    p: Ignored<LIFParameters>,
    /// Integration step
    #[module(skip)]
    dt: f64,
    feedback: Ignored<RecurrentFeedback>,
}

impl<B: Backend> LIFCell<B> {
    /// Create a new LIF cell with default parameters and `dt = 0.001`
    ///
    /// # Arguments
    /// * `input_size` - Number of input neurons
    /// * `hidden_size` - Number of LIF neurons
    /// * `device` - Device to create the weights on
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        LIFCellConfig::new(input_size, hidden_size).init(device)
    }

    pub fn with_parameters(mut self, p: LIFParameters) -> Self {
        p.warn_if_stiff(self.dt);
        self.p = Ignored(p);
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.p.warn_if_stiff(dt);
        self.dt = dt;
        self
    }

    pub fn with_feedback(mut self, feedback: RecurrentFeedback) -> Self {
        self.feedback = Ignored(feedback);
        self
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn parameters(&self) -> &LIFParameters {
        &self.p
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn feedback(&self) -> RecurrentFeedback {
        *self.feedback
    }

    /// Resting state for a batch of the given size
    pub fn initial_state(&self, batch_size: usize, device: &B::Device) -> LIFState<B> {
        LIFState::initial(batch_size, self.hidden_size, &self.p, device)
    }

    /// Perform one integration step, failing on invalid shapes or parameters
    ///
    /// # Arguments
    /// * `input` - Input spikes of shape `[batch_size, input_size]`
    /// * `state` - Previous state, or `None` to start from rest
    ///
    /// # Returns
    /// Tuple of (spikes, new_state), spikes of shape `[batch_size, hidden_size]`
    pub fn try_forward(
        &self,
        input: Tensor<B, 2>,
        state: Option<LIFState<B>>,
    ) -> error::Result<(Tensor<B, 2>, LIFState<B>)> {
        self.p.validate(self.dt)?;

        // Initialize state if not provided, matching the input's batch and device
        let state = match state {
            Some(state) => state,
            None => {
                let [batch_size, _] = input.dims();
                self.initial_state(batch_size, &input.device())
            }
        };

        try_lif_step_with_feedback(
            input,
            state,
            self.input_weights.val(),
            self.recurrent_weights.val(),
            &self.p,
            self.dt,
            *self.feedback,
        )
    }

    /// Perform one integration step
    ///
    /// # Panics
    /// If the input or state shapes disagree with the weights.
    pub fn forward(
        &self,
        input: Tensor<B, 2>,
        state: Option<LIFState<B>>,
    ) -> (Tensor<B, 2>, LIFState<B>) {
        self.try_forward(input, state)
            .unwrap_or_else(|err| panic!("{}", err))
    }
}

impl<B: Backend> SpikingCell<B> for LIFCell<B> {
    type State = LIFState<B>;

    fn output_size(&self, input_size: usize) -> error::Result<usize> {
        if input_size != self.input_size {
            return Err(LifError::ShapeMismatch {
                tensor: "input",
                expected: vec![self.input_size],
                actual: vec![input_size],
            });
        }
        Ok(self.hidden_size)
    }

    fn try_step(
        &self,
        input: Tensor<B, 2>,
        state: Option<Self::State>,
    ) -> error::Result<(Tensor<B, 2>, Self::State)> {
        self.try_forward(input, state)
    }
}
