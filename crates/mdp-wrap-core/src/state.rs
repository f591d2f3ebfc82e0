//! Per-step state emitted by a controller

use serde::{Deserialize, Serialize};

use crate::{Result, Shape, Tensor, WrapError};

/// Observation state produced by [`Controller::get_state`](crate::Controller::get_state)
///
/// Each entry of `inputs` is one observation slot. A fresh state is built on
/// every call; decorators take it by value and hand it back transformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Observation tensors, one per slot
    pub inputs: Vec<Tensor>,
}

impl State {
    /// Create a state from its observation tensors
    #[must_use]
    pub fn new(inputs: Vec<Tensor>) -> Self {
        Self { inputs }
    }

    /// Borrow the tensor at `index`
    pub fn input(&self, index: usize) -> Result<&Tensor> {
        let len = self.inputs.len();
        self.inputs
            .get(index)
            .ok_or(WrapError::SlotOutOfRange { index, len })
    }

    /// Mutably borrow the tensor at `index`
    pub fn input_mut(&mut self, index: usize) -> Result<&mut Tensor> {
        let len = self.inputs.len();
        self.inputs
            .get_mut(index)
            .ok_or(WrapError::SlotOutOfRange { index, len })
    }

    /// Shapes of all inputs, in slot order
    #[must_use]
    pub fn shapes(&self) -> Vec<Shape> {
        self.inputs.iter().map(|t| t.shape().to_vec()).collect()
    }
}
