//! Feed-forward LIF cell
//!
//! Receives an input current computed elsewhere (a linear map, a
//! convolution, ...) and owns no weights.

use super::SpikingCell;
use crate::error::Result;
use crate::functional::{try_lif_feed_forward_step, LIFFeedForwardState, LIFParameters};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use std::fmt;

/// Leaky integrate-and-fire cell without recurrent connections
///
/// Implements one Euler step of the LIF dynamics with the transition
/// `i = i + x`, where `x` is the input current. Works on tensors of any rank;
/// the state always has the input's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LIFFeedForwardCell {
    p: LIFParameters,
    dt: f64,
}

impl Default for LIFFeedForwardCell {
    fn default() -> Self {
        Self::new()
    }
}

impl LIFFeedForwardCell {
    /// Create a cell with default parameters and `dt = 0.001`
    pub fn new() -> Self {
        Self {
            p: LIFParameters::new(),
            dt: 0.001,
        }
    }

    pub fn with_parameters(mut self, p: LIFParameters) -> Self {
        p.warn_if_stiff(self.dt);
        self.p = p;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.p.warn_if_stiff(dt);
        self.dt = dt;
        self
    }

    pub fn parameters(&self) -> &LIFParameters {
        &self.p
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Perform one integration step, failing on invalid shapes or parameters
    ///
    /// # Arguments
    /// * `input` - Input current of any shape
    /// * `state` - Previous state, or `None` to start from rest
    pub fn try_forward<B: Backend, const D: usize>(
        &self,
        input: Tensor<B, D>,
        state: Option<LIFFeedForwardState<B, D>>,
    ) -> Result<(Tensor<B, D>, LIFFeedForwardState<B, D>)> {
        self.p.validate(self.dt)?;

        let state = state.unwrap_or_else(|| {
            LIFFeedForwardState::initial(input.dims(), &self.p, &input.device())
        });

        try_lif_feed_forward_step(input, state, &self.p, self.dt)
    }

    /// Perform one integration step
    ///
    /// # Panics
    /// If the state shape differs from the input shape.
    pub fn forward<B: Backend, const D: usize>(
        &self,
        input: Tensor<B, D>,
        state: Option<LIFFeedForwardState<B, D>>,
    ) -> (Tensor<B, D>, LIFFeedForwardState<B, D>) {
        self.try_forward(input, state)
            .unwrap_or_else(|err| panic!("{}", err))
    }
}

impl fmt::Display for LIFFeedForwardCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LIFFeedForwardCell(p={:?}, dt={})", self.p, self.dt)
    }
}

impl<B: Backend> SpikingCell<B> for LIFFeedForwardCell {
    type State = LIFFeedForwardState<B, 2>;

    fn output_size(&self, input_size: usize) -> Result<usize> {
        Ok(input_size)
    }

    fn try_step(
        &self,
        input: Tensor<B, 2>,
        state: Option<Self::State>,
    ) -> Result<(Tensor<B, 2>, Self::State)> {
        self.try_forward(input, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::ThresholdMethod;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_feed_forward_cell_defaults() {
        let cell = LIFFeedForwardCell::default();

        assert_eq!(cell.dt(), 0.001);
        assert_eq!(cell.parameters(), &LIFParameters::new());
    }

    #[test]
    fn test_feed_forward_cell_display() {
        let cell = LIFFeedForwardCell::new()
            .with_parameters(LIFParameters::new().with_method(ThresholdMethod::Tanh))
            .with_dt(0.0005);

        let repr = cell.to_string();
        assert!(repr.starts_with("LIFFeedForwardCell(p=LIFParameters"));
        assert!(repr.contains("Tanh"));
        assert!(repr.ends_with("dt=0.0005)"));
    }

    #[test]
    fn test_feed_forward_cell_any_rank() {
        let device = Default::default();
        let cell = LIFFeedForwardCell::new();

        // [batch, channels, height, width], e.g. the output of a convolution
        let input = Tensor::<TestBackend, 4>::ones([2, 3, 4, 4], &device);
        let (output, state) = cell.forward(input, None);

        assert_eq!(output.dims(), [2, 3, 4, 4]);
        assert_eq!(state.dims(), [2, 3, 4, 4]);
    }

    #[test]
    fn test_feed_forward_cell_injects_current() {
        let device = Default::default();
        let cell = LIFFeedForwardCell::new();

        let input = Tensor::<TestBackend, 2>::full([1, 3], 2.5, &device);
        let (output, state) = cell.forward(input, None);

        // Input enters the current after the voltage update
        let v = state.v.into_data().to_vec::<f32>().unwrap();
        let i = state.i.into_data().to_vec::<f32>().unwrap();
        assert!(output.into_data().to_vec::<f32>().unwrap().iter().all(|&x| x == 0.0));
        assert!(v.iter().all(|&x| x == 0.0));
        assert!(i.iter().all(|&x| (x - 2.5).abs() < 1e-6));
    }
}
