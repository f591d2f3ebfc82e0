//! Colour reduction of channel-last RGB observations

use ndarray::{Array, ArrayViewD, Axis, Zip};

use mdp_wrap_core::{Result, Tensor, WrapError};

use crate::transform::{require_rank, Transform};

/// ITU-R BT.601 luma weights for R, G and B
const LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// `H x W x 3` RGB to `H x W` luminance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grayscale;

impl Transform for Grayscale {
    fn name(&self) -> &'static str {
        "grayscale_hwc"
    }

    fn apply(&self, image: ArrayViewD<'_, f32>) -> Result<Tensor> {
        require_rank(self.name(), &image, 3)?;
        let channels = image.len_of(Axis(2));
        if channels != LUMA.len() {
            return Err(WrapError::InvalidParameter(format!(
                "grayscale_hwc expects 3 channels, got {channels}"
            )));
        }

        let r = image.index_axis(Axis(2), 0);
        let g = image.index_axis(Axis(2), 1);
        let b = image.index_axis(Axis(2), 2);
        let mut gray = Array::zeros(r.raw_dim());
        Zip::from(&mut gray)
            .and(&r)
            .and(&g)
            .and(&b)
            .for_each(|y, &r, &g, &b| *y = LUMA[0] * r + LUMA[1] * g + LUMA[2] * b);
        Ok(gray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::IxDyn;

    #[test]
    fn test_grayscale_weights() {
        let mut image = Tensor::zeros(IxDyn(&[1, 2, 3]));
        image[[0, 0, 0]] = 255.0;
        image[[0, 1, 0]] = 100.0;
        image[[0, 1, 1]] = 100.0;
        image[[0, 1, 2]] = 100.0;

        let gray = Grayscale.apply(image.view()).unwrap();
        assert_eq!(gray.shape(), &[1, 2]);
        assert_relative_eq!(gray[[0, 0]], 76.245, epsilon = 1e-3);
        assert_relative_eq!(gray[[0, 1]], 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_grayscale_rejects_rgba() {
        let err = Grayscale.project_shape(&[4, 4, 4]).unwrap_err();
        assert!(matches!(err, WrapError::InvalidParameter(_)));
    }
}
