//! Tensor representation shared by states and transforms

use ndarray::{ArrayD, IxDyn};

/// Observation tensor: dynamic rank, row-major `f32`
pub type Tensor = ArrayD<f32>;

/// Declared tensor shape, outermost axis first
pub type Shape = Vec<usize>;

/// Allocate a zero-filled tensor of the given shape.
///
/// Shape projection runs transforms against these probes.
#[must_use]
pub fn zeros(shape: &[usize]) -> Tensor {
    Tensor::zeros(IxDyn(shape))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape() {
        let t = zeros(&[3, 4, 2]);
        assert_eq!(t.shape(), &[3, 4, 2]);
        assert!(t.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_zeros_empty_axis() {
        let t = zeros(&[0, 5]);
        assert_eq!(t.shape(), &[0, 5]);
        assert_eq!(t.len(), 0);
    }
}
