//! Ordered observation pipelines
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s, each targeting one
//! observation slot. The same pipeline rewrites both the declared shapes of a
//! [`BlobDescription`] and the tensors of a [`State`], stage by stage in
//! order. Stages on different slots are independent; stages on the same slot
//! compose, so `crop` followed by `stack_chw` stacks cropped frames.
//!
//! Each free function in this module is a decorator factory: it returns a
//! single-stage pipeline that can [`wrap`](Pipeline::wrap) an MDP, or be
//! chained onto other stages.

use std::sync::Arc;

use tracing::trace;

use mdp_wrap_core::{BlobDescription, Mdp, Result, State, WrapError};

use crate::color::Grayscale;
use crate::crop::{Crop, CropBounds};
use crate::decorate::Decorated;
use crate::downsample::{Downsample, Stride};
use crate::resize::{Resize, ResizeOptions};
use crate::stack::{stacked_shape, FrameBuffers};
use crate::transform::Transform;
use crate::transpose::Transpose;

/// One step of a pipeline
#[derive(Debug, Clone)]
pub enum Stage {
    /// Stateless transform of one slot
    Map {
        /// Slot index
        index: usize,
        /// Transform applied to data and declared shape alike
        transform: Arc<dyn Transform>,
    },
    /// Frame stacking of one slot
    Stack {
        /// Slot index
        index: usize,
        /// Number of frames in the window
        size: usize,
    },
}

impl Stage {
    /// Slot this stage rewrites
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Map { index, .. } | Self::Stack { index, .. } => *index,
        }
    }

    /// Short name used in logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Map { transform, .. } => transform.name(),
            Self::Stack { .. } => "stack_chw",
        }
    }

    fn project(&self, blob: &mut BlobDescription) -> Result<()> {
        for input in blob.inputs_at_mut(self.index()) {
            input.shape = match self {
                Self::Map { transform, .. } => transform.project_shape(&input.shape)?,
                Self::Stack { size, .. } => stacked_shape(&input.shape, *size)?,
            };
        }
        Ok(())
    }

    fn apply(&self, state: &mut State, buffers: &mut FrameBuffers) -> Result<()> {
        let slot = state.input_mut(self.index())?;
        *slot = match self {
            Self::Map { transform, .. } => transform.apply(slot.view())?,
            Self::Stack { index, size } => {
                buffers.observe(*index, *size, std::mem::take(slot))?
            }
        };
        trace!(stage = self.name(), index = self.index(), shape = ?slot.shape(), "applied stage");
        Ok(())
    }
}

/// Ordered list of stages applied to states and blob descriptions
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Create an empty pipeline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages in application order
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Slots with a stacking stage
    pub fn stacked_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.stages.iter().filter_map(|stage| match stage {
            Stage::Stack { index, .. } => Some(*index),
            Stage::Map { .. } => None,
        })
    }

    /// Append a stage
    ///
    /// Fails with [`WrapError::DuplicateStack`] if the slot is already stacked
    /// and with [`WrapError::InvalidParameter`] for an empty stack window.
    pub fn push(mut self, stage: Stage) -> Result<Self> {
        if let Stage::Stack { index, size } = stage {
            if size == 0 {
                return Err(WrapError::InvalidParameter(format!(
                    "stack_chw size must be positive for slot {index}"
                )));
            }
            if self.stacked_slots().any(|stacked| stacked == index) {
                return Err(WrapError::DuplicateStack { index });
            }
        }
        self.stages.push(stage);
        Ok(self)
    }

    /// Append a stateless transform of slot `index`
    #[must_use]
    pub fn map(mut self, index: usize, transform: impl Transform + 'static) -> Self {
        self.stages.push(Stage::Map {
            index,
            transform: Arc::new(transform),
        });
        self
    }

    /// Append all stages of `other`
    pub fn then(self, other: Pipeline) -> Result<Self> {
        other.stages.into_iter().try_fold(self, Self::push)
    }

    /// Crop rows `ymin..ymax` and columns `xmin..xmax` of slot `index`
    ///
    /// Negative bounds count from the end of the axis; `None` leaves that side open.
    #[must_use]
    pub fn crop(
        self,
        index: usize,
        ymin: Option<isize>,
        ymax: Option<isize>,
        xmin: Option<isize>,
        xmax: Option<isize>,
    ) -> Self {
        self.map(index, Crop::new(CropBounds::new(ymin, ymax, xmin, xmax)))
    }

    /// Crop the spatial axes of channel-last slot `index`
    #[must_use]
    pub fn crop_hwc(
        self,
        index: usize,
        ymin: Option<isize>,
        ymax: Option<isize>,
        xmin: Option<isize>,
        xmax: Option<isize>,
    ) -> Self {
        self.map(index, Crop::hwc(CropBounds::new(ymin, ymax, xmin, xmax)))
    }

    /// Keep every `stride.rows`-th row and `stride.cols`-th column of slot `index`
    pub fn downsample(self, index: usize, stride: Stride) -> Result<Self> {
        Ok(self.map(index, Downsample::new(stride)?))
    }

    /// Strided subsampling of channel-last slot `index`
    pub fn downsample_hwc(self, index: usize, stride: Stride) -> Result<Self> {
        Ok(self.map(index, Downsample::hwc(stride)?))
    }

    /// Resample slot `index` to `height x width` pixels
    pub fn resize(
        self,
        index: usize,
        height: usize,
        width: usize,
        options: ResizeOptions,
    ) -> Result<Self> {
        Ok(self.map(index, Resize::new(height, width, options)?))
    }

    /// Stack the last `size` frames of slot `index` along its leading axis
    pub fn stack_chw(self, index: usize, size: usize) -> Result<Self> {
        self.push(Stage::Stack { index, size })
    }

    /// Convert slot `index` from `H x W x C` to `C x H x W`
    #[must_use]
    pub fn transpose_hwc_chw(self, index: usize) -> Self {
        self.map(index, Transpose::HwcToChw)
    }

    /// Convert slot `index` from `C x H x W` to `H x W x C`
    #[must_use]
    pub fn transpose_chw_hwc(self, index: usize) -> Self {
        self.map(index, Transpose::ChwToHwc)
    }

    /// Reduce RGB slot `index` to luminance
    #[must_use]
    pub fn grayscale_hwc(self, index: usize) -> Self {
        self.map(index, Grayscale)
    }

    /// Rewrite declared shapes in place
    pub fn project(&self, blob: &mut BlobDescription) -> Result<()> {
        self.stages.iter().try_for_each(|stage| stage.project(blob))
    }

    /// Apply every stage to `state`, updating frame buffers for stacked slots
    pub fn apply(&self, mut state: State, buffers: &mut FrameBuffers) -> Result<State> {
        for stage in &self.stages {
            stage.apply(&mut state, buffers)?;
        }
        Ok(state)
    }

    /// Decorate `mdp` with this pipeline
    #[must_use]
    pub fn wrap<M: Mdp>(self, mdp: M) -> Decorated<M> {
        Decorated::new(mdp, self)
    }
}

/// Decorator factory for [`Pipeline::crop`]
#[must_use]
pub fn crop(
    index: usize,
    ymin: Option<isize>,
    ymax: Option<isize>,
    xmin: Option<isize>,
    xmax: Option<isize>,
) -> Pipeline {
    Pipeline::new().crop(index, ymin, ymax, xmin, xmax)
}

/// Decorator factory for [`Pipeline::crop_hwc`]
#[must_use]
pub fn crop_hwc(
    index: usize,
    ymin: Option<isize>,
    ymax: Option<isize>,
    xmin: Option<isize>,
    xmax: Option<isize>,
) -> Pipeline {
    Pipeline::new().crop_hwc(index, ymin, ymax, xmin, xmax)
}

/// Decorator factory for [`Pipeline::downsample`]
pub fn downsample(index: usize, stride: Stride) -> Result<Pipeline> {
    Pipeline::new().downsample(index, stride)
}

/// Decorator factory for [`Pipeline::downsample_hwc`]
pub fn downsample_hwc(index: usize, stride: Stride) -> Result<Pipeline> {
    Pipeline::new().downsample_hwc(index, stride)
}

/// Decorator factory for [`Pipeline::resize`]
pub fn resize(
    index: usize,
    height: usize,
    width: usize,
    options: ResizeOptions,
) -> Result<Pipeline> {
    Pipeline::new().resize(index, height, width, options)
}

/// Decorator factory for [`Pipeline::stack_chw`]
pub fn stack_chw(index: usize, size: usize) -> Result<Pipeline> {
    Pipeline::new().stack_chw(index, size)
}

/// Decorator factory for [`Pipeline::transpose_hwc_chw`]
#[must_use]
pub fn transpose_hwc_chw(index: usize) -> Pipeline {
    Pipeline::new().transpose_hwc_chw(index)
}

/// Decorator factory for [`Pipeline::transpose_chw_hwc`]
#[must_use]
pub fn transpose_chw_hwc(index: usize) -> Pipeline {
    Pipeline::new().transpose_chw_hwc(index)
}

/// Decorator factory for [`Pipeline::grayscale_hwc`]
#[must_use]
pub fn grayscale_hwc(index: usize) -> Pipeline {
    Pipeline::new().grayscale_hwc(index)
}
