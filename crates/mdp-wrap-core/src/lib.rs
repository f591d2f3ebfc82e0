//! Boundary types for decorating MDP environments
//!
//! This crate defines what an observation decorator needs to know about an
//! environment: the per-step [`State`] a controller emits, the static
//! [`BlobDescription`] the environment reports about its models, and the
//! [`Mdp`] / [`Controller`] traits tying them together.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blob;
pub mod error;
pub mod mdp;
pub mod state;
pub mod tensor;

// Re-export core traits and types
pub use blob::{BlobDescription, InputDescription, ModelDescription};
pub use error::{Result, WrapError};
pub use mdp::{Controller, ControllerConfig, Mdp};
pub use state::State;
pub use tensor::{Shape, Tensor};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BlobDescription, Controller, ControllerConfig, Mdp, Result, State, Tensor,
    };
}
