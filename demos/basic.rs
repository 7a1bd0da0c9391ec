//! Basic usage example of LIF cells and layers
//!
//! This example demonstrates how to drive a recurrent LIF layer with a spike
//! train and how to use the feed-forward cell step by step.

use burn::backend::NdArray;
use burn::tensor::{Distribution, Tensor};
use lif::cells::{LIFCellConfig, LIFFeedForwardCell};
use lif::functional::LIFParameters;
use lif::rnn::LIFLayer;

fn main() {
    println!("=== LIF Basic Example ===\n");

    // Use the NdArray backend (CPU)
    type Backend = NdArray<f32>;
    let device = Default::default();

    // Example 1: Recurrent layer over a random spike train
    println!("Example 1: Recurrent LIF layer");
    let layer = LIFLayer::<Backend>::new(20, 50, &device);

    println!("  Input size: {}", layer.input_size());
    println!("  Hidden size: {}", layer.hidden_size());

    // Input shape: [seq=100, batch=4, features=20], ~20% of inputs spike per step
    let input = Tensor::<Backend, 3>::random([100, 4, 20], Distribution::Uniform(0.0, 1.0), &device)
        .greater_elem(0.8)
        .float();

    let (spikes, state) = layer.forward(input, None);
    let rate = spikes.clone().mean().into_data().to_vec::<f32>().unwrap()[0];

    println!("  Output shape: {:?}", spikes.dims());
    if let Some(state) = state {
        println!("  Final voltage shape: {:?}", state.v.dims());
    }
    println!("  Mean firing rate: {:.3} spikes/step", rate);
    println!();

    // Example 2: Custom parameters through the config
    println!("Example 2: Custom neuron parameters");
    let cell = LIFCellConfig::new(20, 50)
        .with_parameters(LIFParameters::new().with_v_th(0.5).with_tau_mem_inv(50.0))
        .with_dt(0.0005)
        .init::<Backend>(&device);
    println!("  Parameters: {:?}", cell.parameters());
    println!("  dt: {}", cell.dt());
    println!();

    // Example 3: Feed-forward cell with a constant input current
    println!("Example 3: Feed-forward cell");
    let ff = LIFFeedForwardCell::new();
    let current = Tensor::<Backend, 2>::full([1, 1], 1.5, &device);

    let mut state = None;
    let mut train = String::new();
    for _ in 0..40 {
        let (z, next) = ff.forward(current.clone(), state);
        let z = z.into_data().to_vec::<f32>().unwrap()[0];
        train.push(if z > 0.0 { '|' } else { '.' });
        state = Some(next);
    }
    println!("  {}", ff);
    println!("  Spike train: {}", train);
    println!();

    println!("=== Example completed successfully! ===");
}
