//! LIF layers
//!
//! Wrap a LIF cell in time so that the layer processes whole spike trains
//! and returns the spikes of every step together with the final state.

use super::scan::try_scan;
use crate::cells::{LIFCell, LIFFeedForwardCell};
use crate::error::Result;
use crate::functional::{LIFFeedForwardState, LIFParameters, LIFState};
use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Recurrent LIF layer
///
/// Processes input of shape `[seq_len, batch, input_size]` and returns
/// spikes of shape `[seq_len, batch, hidden_size]`. The weights of the
/// inner [`LIFCell`] are shared by every time step.
#[derive(Module, Debug)]
pub struct LIFLayer<B: Backend> {
    cell: LIFCell<B>,
}

impl<B: Backend> LIFLayer<B> {
    /// Create a new LIF layer with default parameters and `dt = 0.001`
    ///
    /// # Arguments
    /// * `input_size` - Number of input neurons
    /// * `hidden_size` - Number of LIF neurons
    /// * `device` - Device to create the weights on
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        Self::from_cell(LIFCell::new(input_size, hidden_size, device))
    }

    /// Wrap an existing cell
    pub fn from_cell(cell: LIFCell<B>) -> Self {
        Self { cell }
    }

    pub fn cell(&self) -> &LIFCell<B> {
        &self.cell
    }

    pub fn input_size(&self) -> usize {
        self.cell.input_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.cell.hidden_size()
    }

    /// Forward pass through the layer, failing on invalid shapes
    ///
    /// # Arguments
    /// * `input` - Input spikes of shape `[seq_len, batch, input_size]`
    /// * `state` - Optional initial state, each field `[batch, hidden_size]`
    ///
    /// # Returns
    /// Tuple of (spikes, final_state). `final_state` is `None` only when the
    /// sequence is empty and no initial state was given.
    pub fn try_forward(
        &self,
        input: Tensor<B, 3>,
        state: Option<LIFState<B>>,
    ) -> Result<(Tensor<B, 3>, Option<LIFState<B>>)> {
        try_scan(&self.cell, input, state)
    }

    /// Forward pass through the layer
    ///
    /// # Panics
    /// If the input or state shapes disagree with the cell's weights.
    pub fn forward(
        &self,
        input: Tensor<B, 3>,
        state: Option<LIFState<B>>,
    ) -> (Tensor<B, 3>, Option<LIFState<B>>) {
        self.try_forward(input, state)
            .unwrap_or_else(|err| panic!("{}", err))
    }
}

/// Feed-forward LIF layer
///
/// Processes input currents of shape `[seq_len, batch, neurons]` and returns
/// spikes of the same shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LIFFeedForwardLayer {
    cell: LIFFeedForwardCell,
}

impl LIFFeedForwardLayer {
    /// Create a layer with the given parameters and integration step
    pub fn new(p: LIFParameters, dt: f64) -> Self {
        Self::from_cell(LIFFeedForwardCell::new().with_parameters(p).with_dt(dt))
    }

    /// Wrap an existing cell
    pub fn from_cell(cell: LIFFeedForwardCell) -> Self {
        Self { cell }
    }

    pub fn cell(&self) -> &LIFFeedForwardCell {
        &self.cell
    }

    /// Forward pass through the layer, failing on invalid shapes
    pub fn try_forward<B: Backend>(
        &self,
        input: Tensor<B, 3>,
        state: Option<LIFFeedForwardState<B, 2>>,
    ) -> Result<(Tensor<B, 3>, Option<LIFFeedForwardState<B, 2>>)> {
        try_scan(&self.cell, input, state)
    }

    /// Forward pass through the layer
    ///
    /// # Panics
    /// If the state shape differs from the per-step input shape.
    pub fn forward<B: Backend>(
        &self,
        input: Tensor<B, 3>,
        state: Option<LIFFeedForwardState<B, 2>>,
    ) -> (Tensor<B, 3>, Option<LIFFeedForwardState<B, 2>>) {
        self.try_forward(input, state)
            .unwrap_or_else(|err| panic!("{}", err))
    }
}
