//! Channel layout conversion between `H x W x C` and `C x H x W`

use ndarray::{ArrayViewD, IxDyn};

use mdp_wrap_core::{Result, Tensor};

use crate::transform::{require_rank, Transform};

/// Axis permutation of a rank-3 observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    /// `H x W x C` to `C x H x W`
    HwcToChw,
    /// `C x H x W` to `H x W x C`
    ChwToHwc,
}

impl Transform for Transpose {
    fn name(&self) -> &'static str {
        match self {
            Self::HwcToChw => "transpose_hwc_chw",
            Self::ChwToHwc => "transpose_chw_hwc",
        }
    }

    fn apply(&self, image: ArrayViewD<'_, f32>) -> Result<Tensor> {
        require_rank(self.name(), &image, 3)?;
        let axes: &[usize] = match self {
            Self::HwcToChw => &[2, 0, 1],
            Self::ChwToHwc => &[1, 2, 0],
        };
        Ok(image.permuted_axes(IxDyn(axes)).as_standard_layout().into_owned())
    }
}
