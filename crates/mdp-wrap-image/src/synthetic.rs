//! Synthetic image MDP for tests, benchmarks and demos
//!
//! Every slot emits a tensor of its declared shape whose element at flat
//! offset `i` on step `t` equals `t * STEP_OFFSET + i`, plus optional seeded
//! uniform noise. Frames from different steps are therefore easy to tell
//! apart after any crop or stack.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mdp_wrap_core::{
    BlobDescription, Controller, ControllerConfig, InputDescription, Mdp, ModelDescription, Result,
    Shape, State, Tensor, WrapError,
};
use ndarray::{Array, IxDyn};

/// Value added per step to every element
pub const STEP_OFFSET: f32 = 1000.0;

/// MDP emitting deterministic ramps of fixed shapes
#[derive(Debug, Clone)]
pub struct GradientMdp {
    /// Declared shape per slot
    slots: Vec<Shape>,
    /// Number of models referencing every slot
    models: usize,
    /// Noise amplitude
    noise: f32,
}

impl GradientMdp {
    /// Create an MDP with one model and the given slot shapes
    #[must_use]
    pub fn new(slots: Vec<Shape>) -> Self {
        Self {
            slots,
            models: 1,
            noise: 0.0,
        }
    }

    /// Report `models` identical models in `describe_blob`
    #[must_use]
    pub fn with_models(mut self, models: usize) -> Self {
        self.models = models;
        self
    }

    /// Add uniform noise in `[-amplitude, amplitude)` to every element
    #[must_use]
    pub fn with_noise(mut self, amplitude: f32) -> Self {
        self.noise = amplitude.abs();
        self
    }
}

impl Mdp for GradientMdp {
    type Controller = GradientController;

    fn describe_blob(&self) -> Result<BlobDescription> {
        let model = ModelDescription {
            inputs: self
                .slots
                .iter()
                .enumerate()
                .map(|(i, shape)| InputDescription::new(shape.clone()).named(format!("slot{i}")))
                .collect(),
        };
        Ok(BlobDescription::new(vec![model; self.models]))
    }

    fn controller(&self, config: &ControllerConfig) -> Result<Self::Controller> {
        if self.slots.is_empty() {
            return Err(WrapError::Environment("gradient MDP has no slots".to_string()));
        }
        Ok(GradientController {
            slots: self.slots.clone(),
            noise: self.noise,
            step: 0,
            rng: StdRng::seed_from_u64(config.seed.unwrap_or(0)),
        })
    }
}

/// Controller of a [`GradientMdp`]
#[derive(Debug, Clone)]
pub struct GradientController {
    slots: Vec<Shape>,
    noise: f32,
    step: u32,
    rng: StdRng,
}

impl GradientController {
    /// Number of states emitted so far
    #[must_use]
    pub fn step(&self) -> u32 {
        self.step
    }

    #[allow(clippy::cast_precision_loss)]
    fn frame(&mut self, shape: &[usize]) -> Result<Tensor> {
        let base = self.step as f32 * STEP_OFFSET;
        let len: usize = shape.iter().product();
        let noise = self.noise;
        let rng = &mut self.rng;
        let data = (0..len)
            .map(|i| {
                let jitter = if noise > 0.0 {
                    rng.gen_range(-noise..noise)
                } else {
                    0.0
                };
                base + i as f32 + jitter
            })
            .collect::<Vec<_>>();
        Ok(Array::from_shape_vec(IxDyn(shape), data)?)
    }
}

impl Controller for GradientController {
    fn get_state(&mut self) -> Result<State> {
        let slots = self.slots.clone();
        let inputs = slots
            .iter()
            .map(|shape| self.frame(shape))
            .collect::<Result<Vec<_>>>()?;
        self.step += 1;
        Ok(State::new(inputs))
    }
}
