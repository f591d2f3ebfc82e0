//! Example: decorating a synthetic 210x160 RGB environment with an Atari-style pipeline

use mdp_wrap_image::prelude::*;
use mdp_wrap_image::GradientMdp;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{ "stages": [
    { "op": "crop_hwc", "index": 0, "ymin": 34, "ymax": 194, "xmin": 0, "xmax": 160 },
    { "op": "grayscale_hwc", "index": 0 },
    { "op": "resize", "index": 0, "height": 84, "width": 84,
      "options": { "interpolation": "linear" } },
    { "op": "stack_chw", "index": 0, "size": 4 }
] }"#;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pipeline = PipelineConfig::from_json(CONFIG)?.build()?;
    let base = GradientMdp::new(vec![vec![210, 160, 3], vec![4]]).with_noise(2.0);
    let mdp = base.decorate(pipeline);

    let blob = mdp.describe_blob()?;
    println!("Declared inputs:");
    for (i, input) in blob.models[0].inputs.iter().enumerate() {
        println!("  slot {i}: {:?}", input.shape);
    }

    let mut controller = mdp.controller(&ControllerConfig::seeded(42))?;
    for step in 0..6 {
        let state = controller.get_state()?;
        let screen = &state.inputs[0];
        println!(
            "Step {}: screen {:?}, mean {:.2}",
            step + 1,
            screen.shape(),
            screen.mean().unwrap_or_default()
        );
    }

    Ok(())
}
