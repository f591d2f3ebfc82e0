//! Serde configuration for building pipelines
//!
//! ```json
//! { "stages": [
//!     { "op": "crop_hwc", "index": 0, "ymin": 34, "ymax": 194, "xmin": 0, "xmax": 160 },
//!     { "op": "grayscale_hwc", "index": 0 },
//!     { "op": "resize", "index": 0, "height": 84, "width": 84,
//!       "options": { "interpolation": "nearest" } },
//!     { "op": "stack_chw", "index": 0, "size": 4 }
//! ] }
//! ```
//!
//! Crop bounds may be negative (counted from the end of the axis) and may be
//! `null` or omitted to leave that side of the window open.
//!
//! `downsample` stages take `row_stride` / `col_stride` (also accepted as
//! `height` / `width`); these are step sizes, not output dimensions.

use serde::{Deserialize, Serialize};

use mdp_wrap_core::{Result, WrapError};

use crate::downsample::Stride;
use crate::pipeline::Pipeline;
use crate::resize::ResizeOptions;

/// Configuration of one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StageConfig {
    /// See [`Pipeline::crop`]
    Crop {
        /// Slot index
        index: usize,
        /// First row kept; negative counts from the bottom, absent or null is open
        ymin: Option<isize>,
        /// One past the last row kept
        ymax: Option<isize>,
        /// First column kept
        xmin: Option<isize>,
        /// One past the last column kept
        xmax: Option<isize>,
    },
    /// See [`Pipeline::crop_hwc`]
    CropHwc {
        /// Slot index
        index: usize,
        /// First row kept; negative counts from the bottom, absent or null is open
        ymin: Option<isize>,
        /// One past the last row kept
        ymax: Option<isize>,
        /// First column kept
        xmin: Option<isize>,
        /// One past the last column kept
        xmax: Option<isize>,
    },
    /// See [`Pipeline::downsample`]
    Downsample {
        /// Slot index
        index: usize,
        /// Keep every `row_stride`-th row
        #[serde(alias = "height")]
        row_stride: usize,
        /// Keep every `col_stride`-th column
        #[serde(alias = "width")]
        col_stride: usize,
    },
    /// See [`Pipeline::downsample_hwc`]
    DownsampleHwc {
        /// Slot index
        index: usize,
        /// Keep every `row_stride`-th row
        #[serde(alias = "height")]
        row_stride: usize,
        /// Keep every `col_stride`-th column
        #[serde(alias = "width")]
        col_stride: usize,
    },
    /// See [`Pipeline::resize`]
    Resize {
        /// Slot index
        index: usize,
        /// Target height in pixels
        height: usize,
        /// Target width in pixels
        width: usize,
        /// Backend options
        #[serde(default)]
        options: ResizeOptions,
    },
    /// See [`Pipeline::stack_chw`]
    StackChw {
        /// Slot index
        index: usize,
        /// Number of frames in the window
        size: usize,
    },
    /// See [`Pipeline::transpose_hwc_chw`]
    TransposeHwcChw {
        /// Slot index
        index: usize,
    },
    /// See [`Pipeline::transpose_chw_hwc`]
    TransposeChwHwc {
        /// Slot index
        index: usize,
    },
    /// See [`Pipeline::grayscale_hwc`]
    GrayscaleHwc {
        /// Slot index
        index: usize,
    },
}

impl StageConfig {
    /// Append this stage to `pipeline`
    pub fn append_to(&self, pipeline: Pipeline) -> Result<Pipeline> {
        match *self {
            Self::Crop {
                index,
                ymin,
                ymax,
                xmin,
                xmax,
            } => Ok(pipeline.crop(index, ymin, ymax, xmin, xmax)),
            Self::CropHwc {
                index,
                ymin,
                ymax,
                xmin,
                xmax,
            } => Ok(pipeline.crop_hwc(index, ymin, ymax, xmin, xmax)),
            Self::Downsample {
                index,
                row_stride,
                col_stride,
            } => pipeline.downsample(index, Stride::new(row_stride, col_stride)),
            Self::DownsampleHwc {
                index,
                row_stride,
                col_stride,
            } => pipeline.downsample_hwc(index, Stride::new(row_stride, col_stride)),
            Self::Resize {
                index,
                height,
                width,
                options,
            } => pipeline.resize(index, height, width, options),
            Self::StackChw { index, size } => pipeline.stack_chw(index, size),
            Self::TransposeHwcChw { index } => Ok(pipeline.transpose_hwc_chw(index)),
            Self::TransposeChwHwc { index } => Ok(pipeline.transpose_chw_hwc(index)),
            Self::GrayscaleHwc { index } => Ok(pipeline.grayscale_hwc(index)),
        }
    }
}

/// Ordered list of stage configurations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Stages in application order
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

impl PipelineConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and build the pipeline
    pub fn build(&self) -> Result<Pipeline> {
        self.stages
            .iter()
            .try_fold(Pipeline::new(), |pipeline, stage| stage.append_to(pipeline))
    }
}

impl TryFrom<PipelineConfig> for Pipeline {
    type Error = WrapError;

    fn try_from(config: PipelineConfig) -> Result<Self> {
        config.build()
    }
}
