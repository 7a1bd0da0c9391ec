//! Surrogate gradients
//!
//! Spikes are binary on the forward pass, yet the weights of a LIF layer
//! still receive gradients through the surrogate derivative. Requires an
//! autodiff backend.

use burn::backend::{Autodiff, NdArray};
use burn::tensor::Tensor;
use lif::cells::LIFCellConfig;
use lif::functional::LIFParameters;
use lif::rnn::LIFLayer;
use lif::threshold::ThresholdMethod;

fn main() {
    println!("=== Surrogate Gradient Example ===\n");

    type Backend = Autodiff<NdArray<f32>>;
    let device = Default::default();

    for method in [
        ThresholdMethod::SuperSpike,
        ThresholdMethod::Tanh,
        ThresholdMethod::Logistic,
        ThresholdMethod::Triangle,
    ] {
        let cell = LIFCellConfig::new(8, 16)
            .with_parameters(LIFParameters::new().with_method(method).with_alpha(10.0))
            .init::<Backend>(&device);
        let layer = LIFLayer::from_cell(cell);

        let input = Tensor::<Backend, 3>::ones([20, 2, 8], &device);
        let (spikes, _) = layer.forward(input, None);

        // Loss: total spike count
        let count = spikes.clone().sum().into_data().to_vec::<f32>().unwrap()[0];
        let grads = spikes.sum().backward();

        match layer.cell().input_weights.val().grad(&grads) {
            Some(grad) => {
                let norm = grad.powf_scalar(2.0).sum().sqrt();
                let norm = norm.into_data().to_vec::<f32>().unwrap()[0];
                println!(
                    "  {:?}: {} spikes, |dL/dW_in| = {:.5}",
                    method, count, norm
                );
            }
            None => println!("  {:?}: {} spikes, no gradient", method, count),
        }
    }

    println!("\n=== Example completed successfully! ===");
}
