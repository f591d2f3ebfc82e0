//! Strided subsampling of the two leading (spatial) axes
//!
//! Note that [`Stride`] holds *step sizes*, not output dimensions: a stride of
//! `rows: 2` keeps every second row. Use [`Resize`](crate::Resize) for a target
//! pixel size.

use ndarray::{ArrayViewD, Slice};
use serde::{Deserialize, Serialize};

use mdp_wrap_core::{Result, Tensor, WrapError};

use crate::transform::{require_min_rank, Transform};

/// Row and column step sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stride {
    /// Keep every `rows`-th row
    pub rows: usize,
    /// Keep every `cols`-th column
    pub cols: usize,
}

impl Stride {
    /// Create a stride pair
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

/// Downsample transform; output extent is `ceil(H / rows) x ceil(W / cols)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downsample {
    stride: Stride,
    channels_last: bool,
}

impl Downsample {
    /// Subsample the first two axes of a tensor with rank >= 2
    pub fn new(stride: Stride) -> Result<Self> {
        Self::build(stride, false)
    }

    /// Subsample the spatial axes of a channel-last tensor with rank >= 3
    pub fn hwc(stride: Stride) -> Result<Self> {
        Self::build(stride, true)
    }

    fn build(stride: Stride, channels_last: bool) -> Result<Self> {
        if stride.rows == 0 || stride.cols == 0 {
            return Err(WrapError::InvalidParameter(format!(
                "downsample stride must be positive, got {}x{}",
                stride.rows, stride.cols
            )));
        }
        Ok(Self {
            stride,
            channels_last,
        })
    }

    /// Step sizes
    #[must_use]
    pub fn stride(&self) -> Stride {
        self.stride
    }
}

impl Transform for Downsample {
    fn name(&self) -> &'static str {
        if self.channels_last {
            "downsample_hwc"
        } else {
            "downsample"
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn apply(&self, image: ArrayViewD<'_, f32>) -> Result<Tensor> {
        require_min_rank(self.name(), &image, if self.channels_last { 3 } else { 2 })?;

        let Stride { rows, cols } = self.stride;
        let strided = image.slice_each_axis(|axis| match axis.axis.index() {
            0 => Slice::new(0, None, rows as isize),
            1 => Slice::new(0, None, cols as isize),
            _ => Slice::from(..),
        });
        Ok(strided.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    fn counting(shape: &[usize]) -> Tensor {
        let len = shape.iter().product::<usize>();
        Array::from_iter((0..len).map(|x| x as f32))
            .into_shape(IxDyn(shape))
            .unwrap()
    }

    #[test]
    fn test_downsample_every_other() {
        let image = counting(&[6, 6]);
        let out = Downsample::new(Stride::new(2, 2)).unwrap().apply(image.view()).unwrap();
        assert_eq!(out.shape(), &[3, 3]);
        for (i, row) in [0, 2, 4].into_iter().enumerate() {
            for (j, col) in [0, 2, 4].into_iter().enumerate() {
                assert_eq!(out[[i, j]], image[[row, col]]);
            }
        }
    }

    #[test]
    fn test_downsample_rounds_up() {
        let down = Downsample::new(Stride::new(4, 3)).unwrap();
        assert_eq!(down.project_shape(&[210, 160]).unwrap(), vec![53, 54]);
        assert_eq!(down.project_shape(&[1, 1]).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_downsample_hwc_keeps_channels() {
        let image = counting(&[4, 4, 3]);
        let out = Downsample::hwc(Stride::new(2, 4)).unwrap().apply(image.view()).unwrap();
        assert_eq!(out.shape(), &[2, 1, 3]);
        assert_eq!(out[[1, 0, 2]], image[[2, 0, 2]]);
    }

    #[test]
    fn test_zero_stride_rejected() {
        assert!(matches!(
            Downsample::new(Stride::new(0, 1)),
            Err(WrapError::InvalidParameter(_))
        ));
    }
}
