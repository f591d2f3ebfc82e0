//! Resampling to a target pixel size, backed by `image::imageops::resize`
//!
//! Planes are resampled one channel at a time. The backend clamps floating
//! point samples to `[0, 1]`, so each plane is rescaled to that range on the
//! way in and restored on the way out. Filters that overshoot (`cubic`,
//! `lanczos3`) are therefore clamped as well: output samples never leave the
//! `[min, max]` range of their source plane.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use ndarray::{Array2, ArrayView2, ArrayViewD, Axis, Ix2};
use serde::{Deserialize, Serialize};

use mdp_wrap_core::{Result, Tensor, WrapError};

use crate::transform::Transform;

/// Interpolation filter used by the resampling backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Nearest neighbour
    Nearest,
    /// Bilinear
    #[default]
    #[serde(alias = "bilinear", alias = "triangle")]
    Linear,
    /// Catmull-Rom bicubic
    #[serde(alias = "bicubic", alias = "catmull_rom")]
    Cubic,
    /// Gaussian
    Gaussian,
    /// Lanczos with window 3
    #[serde(alias = "lanczos")]
    Lanczos3,
}

impl From<Interpolation> for FilterType {
    fn from(interpolation: Interpolation) -> Self {
        match interpolation {
            Interpolation::Nearest => FilterType::Nearest,
            Interpolation::Linear => FilterType::Triangle,
            Interpolation::Cubic => FilterType::CatmullRom,
            Interpolation::Gaussian => FilterType::Gaussian,
            Interpolation::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Options forwarded to the resampling backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeOptions {
    /// Interpolation filter
    pub interpolation: Interpolation,
}

/// Resize transform over `H x W` or `H x W x C` tensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    height: u32,
    width: u32,
    options: ResizeOptions,
}

impl Resize {
    /// Resize to `height x width` pixels
    pub fn new(height: usize, width: usize, options: ResizeOptions) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(WrapError::InvalidParameter(format!(
                "resize target must be non-empty, got {height}x{width}"
            )));
        }
        let to_u32 = |v: usize| {
            u32::try_from(v)
                .map_err(|_| WrapError::InvalidParameter(format!("resize target {v} too large")))
        };
        Ok(Self {
            height: to_u32(height)?,
            width: to_u32(width)?,
            options,
        })
    }

    /// Target `(height, width)`
    #[must_use]
    pub fn target(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }

    /// Backend options
    #[must_use]
    pub fn options(&self) -> ResizeOptions {
        self.options
    }

    fn resize_plane(&self, plane: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        let (rows, cols) = plane.dim();
        if rows == 0 || cols == 0 {
            return Err(WrapError::Resize(format!("cannot resize an empty {rows}x{cols} plane")));
        }

        let lo = plane.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = plane.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let scale = if hi > lo { hi - lo } else { 1.0 };

        let raw: Vec<f32> = plane.iter().map(|&x| (x - lo) / scale).collect();
        let too_large = |what: &str, n: usize| WrapError::Resize(format!("{what} {n} too large"));
        let w = u32::try_from(cols).map_err(|_| too_large("width", cols))?;
        let h = u32::try_from(rows).map_err(|_| too_large("height", rows))?;
        let source: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_raw(w, h, raw)
            .ok_or_else(|| {
                WrapError::Resize(format!("buffer does not fit a {rows}x{cols} image"))
            })?;

        let filter = self.options.interpolation.into();
        let resized = imageops::resize(&source, self.width, self.height, filter);
        let data = resized.into_raw().into_iter().map(|x| x * scale + lo).collect();
        Ok(Array2::from_shape_vec((self.height as usize, self.width as usize), data)?)
    }
}

impl Transform for Resize {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn apply(&self, image: ArrayViewD<'_, f32>) -> Result<Tensor> {
        match image.ndim() {
            2 => {
                let plane = image.into_dimensionality::<Ix2>()?;
                Ok(self.resize_plane(plane)?.into_dyn())
            }
            3 => {
                let planes = image
                    .axis_iter(Axis(2))
                    .map(|channel| self.resize_plane(channel.into_dimensionality::<Ix2>()?))
                    .collect::<Result<Vec<_>>>()?;
                let views: Vec<_> = planes.iter().map(Array2::view).collect();
                Ok(ndarray::stack(Axis(2), &views)?.into_dyn())
            }
            actual => Err(WrapError::RankMismatch {
                transform: self.name(),
                expected: "2 or 3".to_string(),
                actual,
            }),
        }
    }
}
