//! Rectangular cropping of the two leading (spatial) axes

use ndarray::{ArrayViewD, Slice};
use serde::{Deserialize, Serialize};
use tracing::trace;

use mdp_wrap_core::{Result, Tensor};

use crate::transform::{require_min_rank, Transform};

/// Half-open crop window `[ymin, ymax) x [xmin, xmax)`
///
/// Bounds follow ordinary slice rules: a negative bound counts from the end
/// of its axis and `None` leaves that side open. Bounds are not validated; a
/// window reaching past the image is clipped to the image extent and an
/// inverted window yields an empty axis. Callers are expected to pass bounds
/// inside the observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBounds {
    /// First row kept
    pub ymin: Option<isize>,
    /// One past the last row kept
    pub ymax: Option<isize>,
    /// First column kept
    pub xmin: Option<isize>,
    /// One past the last column kept
    pub xmax: Option<isize>,
}

impl CropBounds {
    /// Create a crop window
    #[must_use]
    pub fn new(
        ymin: Option<isize>,
        ymax: Option<isize>,
        xmin: Option<isize>,
        xmax: Option<isize>,
    ) -> Self {
        Self {
            ymin,
            ymax,
            xmin,
            xmax,
        }
    }
}

/// Crop transform over `H x W [x ...]` (`crop`) or `H x W x C` (`crop_hwc`) tensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    bounds: CropBounds,
    channels_last: bool,
}

impl Crop {
    /// Crop the first two axes of a tensor with rank >= 2
    #[must_use]
    pub fn new(bounds: CropBounds) -> Self {
        Self {
            bounds,
            channels_last: false,
        }
    }

    /// Crop the spatial axes of a channel-last tensor with rank >= 3
    #[must_use]
    pub fn hwc(bounds: CropBounds) -> Self {
        Self {
            bounds,
            channels_last: true,
        }
    }

    /// Crop window
    #[must_use]
    pub fn bounds(&self) -> CropBounds {
        self.bounds
    }
}

/// Resolve one bound against an axis of `len`; `true` if it had to be clipped
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn resolve(bound: Option<isize>, open: usize, len: usize) -> (usize, bool) {
    let Some(bound) = bound else {
        return (open, false);
    };
    let len = len as isize;
    let absolute = if bound < 0 { bound + len } else { bound };
    let clipped = absolute.clamp(0, len);
    (clipped as usize, clipped != absolute)
}

/// Resolve a half-open range against `0..len`
fn range(lo: Option<isize>, hi: Option<isize>, len: usize) -> (usize, usize, bool) {
    let (lo, lo_clipped) = resolve(lo, 0, len);
    let (hi, hi_clipped) = resolve(hi, len, len);
    (lo, hi.max(lo), lo_clipped || hi_clipped)
}

impl Transform for Crop {
    fn name(&self) -> &'static str {
        if self.channels_last {
            "crop_hwc"
        } else {
            "crop"
        }
    }

    fn apply(&self, image: ArrayViewD<'_, f32>) -> Result<Tensor> {
        require_min_rank(self.name(), &image, if self.channels_last { 3 } else { 2 })?;

        let CropBounds {
            ymin,
            ymax,
            xmin,
            xmax,
        } = self.bounds;
        let (y0, y1, y_clipped) = range(ymin, ymax, image.shape()[0]);
        let (x0, x1, x_clipped) = range(xmin, xmax, image.shape()[1]);
        if y_clipped || x_clipped {
            trace!(
                transform = self.name(),
                shape = ?image.shape(),
                bounds = ?self.bounds,
                "crop window clipped to image extent"
            );
        }

        let cropped = image.slice_each_axis(|axis| match axis.axis.index() {
            0 => Slice::from(y0..y1),
            1 => Slice::from(x0..x1),
            _ => Slice::from(..),
        });
        Ok(cropped.to_owned())
    }
}
