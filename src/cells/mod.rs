//! # Spiking Cell Implementations
//!
//! This module provides single-timestep LIF cells. Each call integrates one
//! Euler step; the higher-level layers in [`crate::rnn`] fold cells across a
//! sequence.
//!
//! ## Cell Types
//!
//! | Cell | Input | Weights | State |
//! |------|-------|---------|-------|
//! | [`LIFCell`] | spikes `[batch, input_size]` | input + recurrent | [`LIFState`](crate::functional::LIFState) |
//! | [`LIFFeedForwardCell`] | current, any shape | none | [`LIFFeedForwardState`](crate::functional::LIFFeedForwardState) |
//!
//! ## State Handling
//!
//! Cells never store state. Every call takes an `Option<State>` and returns
//! the next state; `None` starts from rest (voltage at `v_leak`, no current,
//! no spikes) with the input's batch size and device.
//!
//! ```ignore
//! use lif::cells::LIFCell;
//!
//! let cell = LIFCell::<Backend>::new(16, 32, &device);
//!
//! let (z, state) = cell.forward(input_t0, None);
//! let (z, state) = cell.forward(input_t1, Some(state));
//! // z: [batch, 32]
//! ```

pub mod lif_cell;
pub mod lif_feed_forward_cell;

pub use lif_cell::{LIFCell, LIFCellConfig};
pub use lif_feed_forward_cell::LIFFeedForwardCell;

use crate::error::Result;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// A cell that can be folded over time by [`crate::rnn::scan`]
pub trait SpikingCell<B: Backend> {
    /// State threaded from one step to the next
    type State: Clone + core::fmt::Debug;

    /// Number of output neurons for an input with `input_size` features,
    /// failing if the cell cannot accept that width
    fn output_size(&self, input_size: usize) -> Result<usize>;

    /// Integrate one step of `[batch, input_size]` input
    fn try_step(
        &self,
        input: Tensor<B, 2>,
        state: Option<Self::State>,
    ) -> Result<(Tensor<B, 2>, Self::State)>;
}
