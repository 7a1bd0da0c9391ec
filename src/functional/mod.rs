//! # Pure LIF step functions
//!
//! This module holds the neuron model itself: parameters, per-neuron state
//! and the explicit Euler step that maps `(input, state)` to
//! `(spikes, next_state)`. The step functions own nothing and never mutate
//! their arguments; [`crate::cells`] wraps them with learnable weights and
//! default-state handling, and [`crate::rnn`] folds them over time.
//!
//! ## Dynamics
//!
//! ```text
//! dv/dt = τ_mem⁻¹ (v_leak - v + i)
//! di/dt = -τ_syn⁻¹ i
//! z     = Θ(v - v_th)
//! v     = (1 - z) v + z v_reset
//! ```
//!
//! The recurrent step then injects `z_in W_inᵀ + z W_recᵀ` into the synaptic
//! current, the feed-forward step injects an externally computed current `x`.
//!
//! ## Tensor Shapes
//!
//! | Tensor | Recurrent | Feed-forward |
//! |--------|-----------|--------------|
//! | `input` | `[batch, input_size]` | any shape |
//! | state fields | `[batch, hidden_size]` | same as `input` |
//! | `input_weights` | `[hidden_size, input_size]` | - |
//! | `recurrent_weights` | `[hidden_size, hidden_size]` | - |

pub mod lif;

pub use lif::{
    lif_feed_forward_step, lif_step, lif_step_with_feedback, try_lif_feed_forward_step,
    try_lif_step, try_lif_step_with_feedback, LIFFeedForwardState, LIFParameters, LIFState,
    RecurrentFeedback,
};
