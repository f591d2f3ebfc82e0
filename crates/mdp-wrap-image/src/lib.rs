//! Observation preprocessing decorators for MDP environments
//!
//! This crate augments an existing [`Mdp`](mdp_wrap_core::Mdp) with
//! observation stages without touching the environment's code:
//! - Spatial cropping and strided downsampling
//! - Resampling to a target size
//! - Channel layout and colour conversion
//! - Temporal frame stacking
//!
//! Every stage rewrites the declared shape in `describe_blob` with the same
//! code it applies to the tensors from `get_state`, so both always agree.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod config;
pub mod crop;
pub mod decorate;
pub mod downsample;
pub mod pipeline;
pub mod resize;
pub mod stack;
pub mod synthetic;
pub mod transform;
pub mod transpose;

// Re-export stages and decoration
pub use color::Grayscale;
pub use config::{PipelineConfig, StageConfig};
pub use crop::{Crop, CropBounds};
pub use decorate::{Decorated, DecoratedController, MdpExt};
pub use downsample::{Downsample, Stride};
pub use pipeline::{
    crop, crop_hwc, downsample, downsample_hwc, grayscale_hwc, resize, stack_chw,
    transpose_chw_hwc, transpose_hwc_chw, Pipeline, Stage,
};
pub use resize::{Interpolation, Resize, ResizeOptions};
pub use stack::{FrameBuffer, FrameBuffers};
pub use synthetic::{GradientController, GradientMdp};
pub use transform::{project_shape, Transform};
pub use transpose::Transpose;

// Re-export core types
pub use mdp_wrap_core::{
    BlobDescription, Controller, ControllerConfig, InputDescription, Mdp, ModelDescription,
    Result, State, Tensor, WrapError,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{MdpExt, Pipeline, PipelineConfig, ResizeOptions, Stride};
    pub use mdp_wrap_core::prelude::*;
}
