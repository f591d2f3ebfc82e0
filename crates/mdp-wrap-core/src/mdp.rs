//! MDP and controller traits

use serde::{Deserialize, Serialize};

use crate::{BlobDescription, Result, State};

/// Construction parameters handed to [`Mdp::controller`]
///
/// Decorators forward this value to the wrapped MDP unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Random seed
    pub seed: Option<u64>,
    /// Additional parameters
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl ControllerConfig {
    /// Create a config with only a seed set
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            params: serde_json::Map::new(),
        }
    }

    /// Look up a free-form parameter
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.params.get(key)
    }
}

/// Per-episode driver of an MDP, producing observations
pub trait Controller {
    /// Produce the current observation state
    fn get_state(&mut self) -> Result<State>;
}

/// An environment whose controllers emit [`State`]s described by a [`BlobDescription`]
pub trait Mdp {
    /// Controller type created by this MDP
    type Controller: Controller;

    /// Report model topology, including the declared shape of every input slot
    fn describe_blob(&self) -> Result<BlobDescription>;

    /// Construct a new controller
    fn controller(&self, config: &ControllerConfig) -> Result<Self::Controller>;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn get_state(&mut self) -> Result<State> {
        (**self).get_state()
    }
}
