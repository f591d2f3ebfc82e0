//! Transform abstraction and shape projection
//!
//! A [`Transform`] maps one observation tensor to another. The same code is
//! used twice: on live observations in `get_state`, and on a zero-filled probe
//! of the declared shape in `describe_blob`. Declared metadata therefore can
//! never drift from the data actually emitted.

use std::fmt::Debug;

use ndarray::ArrayViewD;

use mdp_wrap_core::{tensor, Result, Shape, Tensor, WrapError};

/// Pure tensor-to-tensor mapping applied to one observation slot
pub trait Transform: Debug + Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Transform one observation
    fn apply(&self, image: ArrayViewD<'_, f32>) -> Result<Tensor>;

    /// Derive the output shape for a declared input shape.
    ///
    /// Runs [`apply`](Transform::apply) on a zero tensor of `shape`.
    fn project_shape(&self, shape: &[usize]) -> Result<Shape> {
        project_shape(self, shape)
    }
}

/// Shape projector: run `transform` on `zeros(shape)` and report the result's shape
pub fn project_shape<T: Transform + ?Sized>(transform: &T, shape: &[usize]) -> Result<Shape> {
    let probe = tensor::zeros(shape);
    let out = transform.apply(probe.view())?;
    Ok(out.shape().to_vec())
}

/// Fail with [`WrapError::RankMismatch`] unless `image` has at least `min` axes
pub(crate) fn require_min_rank(
    transform: &'static str,
    image: &ArrayViewD<'_, f32>,
    min: usize,
) -> Result<()> {
    if image.ndim() < min {
        return Err(WrapError::RankMismatch {
            transform,
            expected: format!(">= {min}"),
            actual: image.ndim(),
        });
    }
    Ok(())
}

/// Fail with [`WrapError::RankMismatch`] unless `image` has exactly `rank` axes
pub(crate) fn require_rank(
    transform: &'static str,
    image: &ArrayViewD<'_, f32>,
    rank: usize,
) -> Result<()> {
    if image.ndim() != rank {
        return Err(WrapError::RankMismatch {
            transform,
            expected: rank.to_string(),
            actual: image.ndim(),
        });
    }
    Ok(())
}
