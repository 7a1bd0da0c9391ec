//! # Layers for Spike Train Processing
//!
//! This module folds the single-step cells from [`crate::cells`] across a
//! leading time axis. **These are the primary APIs most users should use.**
//!
//! ## Available Layers
//!
//! | Layer | Cell | Input |
//! |-------|------|-------|
//! | [`LIFLayer`] | [`LIFCell`](crate::cells::LIFCell) | spikes `[seq_len, batch, input_size]` |
//! | [`LIFFeedForwardLayer`] | [`LIFFeedForwardCell`](crate::cells::LIFFeedForwardCell) | currents `[seq_len, batch, neurons]` |
//!
//! Any [`SpikingCell`](crate::cells::SpikingCell) can be folded directly with
//! [`scan`] / [`try_scan`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use lif::prelude::*;
//!
//! let layer = LIFLayer::<Backend>::new(2, 4, &device);
//!
//! // 10 time steps, 5 batches, 2 input neurons
//! let input: Tensor<Backend, 3> = Tensor::zeros([10, 5, 2], &device);
//! let (spikes, state) = layer.forward(input, None);
//!
//! // spikes: [10, 5, 4]
//! // state: Some(LIFState) with fields of shape [5, 4]
//! ```
//!
//! ## Stateful Processing
//!
//! ```ignore
//! let (out1, state) = layer.forward(chunk1, None);
//! let (out2, state) = layer.forward(chunk2, state);
//! // Identical to processing chunk1 and chunk2 as one sequence
//! ```
//!
//! ## Ordering
//!
//! Time steps are integrated strictly in sequence. Within one step the
//! arithmetic is vectorized by the backend across batch and neurons.

pub mod lif;
pub mod scan;

pub use lif::{LIFFeedForwardLayer, LIFLayer};
pub use scan::{scan, try_scan};
