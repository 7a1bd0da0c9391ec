//! # LIF - Leaky Integrate-and-Fire spiking neurons (Rust)
//!
//! Discrete-time LIF neuron populations for the Burn framework, usable inside
//! a differentiable computation graph.
//!
//! ## Features
//!
//! - **Euler integration** of coupled membrane-voltage / synaptic-current dynamics
//! - **Surrogate gradients**: exact spikes forward, smooth derivative backward
//!   ([`threshold::ThresholdMethod`])
//! - **Recurrent cells** with learnable input and recurrent weights
//! - **Feed-forward cells** driven by an externally computed current
//! - **Layers** that fold a cell over a leading time axis
//!
//! ## Quick Start
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use lif::prelude::*;
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! // 10 time steps, 5 batches, 2 input neurons
//! let layer = LIFLayer::<Backend>::new(2, 4, &device);
//! let input = Tensor::<Backend, 3>::zeros([10, 5, 2], &device);
//!
//! let (spikes, state) = layer.forward(input, None);
//! assert_eq!(spikes.dims(), [10, 5, 4]);
//! assert!(state.is_some());
//! ```
//!
//! ## Cell-level Usage
//!
//! For direct cell access (single timestep processing):
//!
//! ```ignore
//! use lif::cells::LIFCellConfig;
//! use lif::functional::LIFParameters;
//!
//! let cell = LIFCellConfig::new(16, 32)
//!     .with_parameters(LIFParameters::new().with_v_th(0.5))
//!     .with_dt(0.0005)
//!     .init::<Backend>(&device);
//!
//! let (z, state) = cell.forward(input, None);
//! ```

pub mod cells;
pub mod error;
pub mod functional;
pub mod rnn;
pub mod threshold;

pub mod prelude {
    pub use crate::cells::{LIFCell, LIFCellConfig, LIFFeedForwardCell, SpikingCell};
    pub use crate::error::LifError;
    pub use crate::functional::{
        lif_feed_forward_step, lif_step, LIFFeedForwardState, LIFParameters, LIFState,
        RecurrentFeedback,
    };
    pub use crate::rnn::{scan, try_scan, LIFFeedForwardLayer, LIFLayer};
    pub use crate::threshold::{threshold, ThresholdMethod};
}
