//! Static model topology reported by an MDP
//!
//! A [`BlobDescription`] lists the models an environment feeds and, for each
//! model, the declared shape of every input slot. Decorators rewrite these
//! shapes so that they keep matching the tensors `get_state` emits.

use serde::{Deserialize, Serialize};

use crate::Shape;

/// Declared shape of one observation slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescription {
    /// Declared tensor shape
    pub shape: Shape,
    /// Optional human-readable name, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl InputDescription {
    /// Create an unnamed input description
    #[must_use]
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            name: None,
        }
    }

    /// Attach a name to this input
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One model consuming observation slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescription {
    /// Input slots, in state order
    pub inputs: Vec<InputDescription>,
}

/// Description of every model an MDP feeds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobDescription {
    /// Models, in declaration order
    pub models: Vec<ModelDescription>,
}

impl BlobDescription {
    /// Create a description from its models
    #[must_use]
    pub fn new(models: Vec<ModelDescription>) -> Self {
        Self { models }
    }

    /// Declared inputs at `index`, one per model that references the slot
    pub fn inputs_at_mut(
        &mut self,
        index: usize,
    ) -> impl Iterator<Item = &mut InputDescription> + '_ {
        self.models
            .iter_mut()
            .filter_map(move |model| model.inputs.get_mut(index))
    }

    /// Declared shapes at `index`, one per model that references the slot
    #[must_use]
    pub fn shapes_at(&self, index: usize) -> Vec<&Shape> {
        self.models
            .iter()
            .filter_map(|model| model.inputs.get(index).map(|input| &input.shape))
            .collect()
    }
}
