//! Temporal scan: fold a spiking cell over a leading time axis.

use crate::cells::SpikingCell;
use crate::error::Result;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Fold `cell` over `input` of shape `[seq_len, batch, features]`, failing on the first invalid step
///
/// Steps run strictly in order: step `t + 1` receives the state produced by
/// step `t`. If any step fails the whole scan fails and no partial output is
/// returned.
///
/// # Returns
/// Tuple of (outputs, final_state) where outputs has shape
/// `[seq_len, batch, output_size]`. For an empty sequence the outputs are
/// empty and `state` is returned unchanged.
pub fn try_scan<B: Backend, C: SpikingCell<B>>(
    cell: &C,
    input: Tensor<B, 3>,
    state: Option<C::State>,
) -> Result<(Tensor<B, 3>, Option<C::State>)> {
    let [seq_len, batch_size, input_size] = input.dims();
    tracing::debug!(seq_len, batch_size, input_size, "scanning spiking cell");

    // Reject a mismatched width even when there is nothing to integrate
    let output_size = cell.output_size(input_size)?;

    if seq_len == 0 {
        let output = Tensor::zeros([0, batch_size, output_size], &input.device());
        return Ok((output, state));
    }

    let mut current_state = state;
    let mut outputs: Vec<Tensor<B, 2>> = Vec::with_capacity(seq_len);

    for t in 0..seq_len {
        // input[t, batch, features] -> [batch, features]
        let step_input = input
            .clone()
            .narrow(0, t, 1)
            .reshape([batch_size, input_size]);

        let (output, new_state) = cell.try_step(step_input, current_state)?;
        tracing::trace!(step = t, "integrated time step");

        current_state = Some(new_state);
        outputs.push(output);
    }

    // Stack outputs along a new leading time axis
    let output = Tensor::stack(outputs, 0);
    Ok((output, current_state))
}

/// Panicking form of [`try_scan`].
///
/// # Panics
/// If any step receives inconsistent shapes.
pub fn scan<B: Backend, C: SpikingCell<B>>(
    cell: &C,
    input: Tensor<B, 3>,
    state: Option<C::State>,
) -> (Tensor<B, 3>, Option<C::State>) {
    try_scan(cell, input, state).unwrap_or_else(|err| panic!("{}", err))
}
