//! Temporal frame stacking
//!
//! A [`FrameBuffer`] is a fixed-capacity sliding window over the most recent
//! observations of one slot. It does not exist until the first observation
//! arrives; that frame is replicated to fill the window. Every later
//! observation evicts the oldest frame. The stacked output is the window
//! concatenated along the leading (channel) axis.

use std::collections::{HashMap, VecDeque};

use ndarray::{ArrayView, Axis, IxDyn};
use tracing::debug;

use mdp_wrap_core::{Result, Shape, Tensor, WrapError};

/// Sliding window of the last `capacity` frames of one slot
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Frames, oldest first
    frames: VecDeque<Tensor>,
    /// Window size
    capacity: usize,
}

impl FrameBuffer {
    /// Create a window holding `capacity` copies of `frame`
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn primed(frame: Tensor, capacity: usize) -> Self {
        assert!(capacity > 0, "frame buffer capacity must be positive");
        let frames = std::iter::repeat(frame).take(capacity).collect();
        Self { frames, capacity }
    }

    /// Append `frame`, evicting the oldest one
    ///
    /// # Panics
    ///
    /// Panics if the window no longer holds exactly `capacity` frames.
    pub fn push(&mut self, frame: Tensor) {
        if self.frames.len() >= self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
        assert_eq!(
            self.frames.len(),
            self.capacity,
            "frame buffer length diverged from its capacity"
        );
    }

    /// Frames, oldest first
    pub fn frames(&self) -> impl Iterator<Item = &Tensor> + '_ {
        self.frames.iter()
    }

    /// Window size
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Concatenate the window along axis 0
    pub fn stacked(&self) -> Result<Tensor> {
        let views: Vec<ArrayView<'_, f32, IxDyn>> = self.frames.iter().map(Tensor::view).collect();
        Ok(ndarray::concatenate(Axis(0), &views)?)
    }
}

/// Frame buffers of one controller, keyed by slot index
#[derive(Debug, Clone, Default)]
pub struct FrameBuffers {
    buffers: HashMap<usize, FrameBuffer>,
}

impl FrameBuffers {
    /// Create an empty set of buffers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer for `index`, if it has seen a frame
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FrameBuffer> {
        self.buffers.get(&index)
    }

    /// Whether slot `index` has a buffer
    #[must_use]
    pub fn is_primed(&self, index: usize) -> bool {
        self.buffers.contains_key(&index)
    }

    /// Whether no slot has a buffer yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Record `frame` for slot `index` and return the stacked window
    ///
    /// The first frame seen for a slot primes its buffer with `size` copies.
    pub fn observe(&mut self, index: usize, size: usize, frame: Tensor) -> Result<Tensor> {
        if frame.ndim() == 0 {
            return Err(WrapError::RankMismatch {
                transform: "stack_chw",
                expected: ">= 1".to_string(),
                actual: 0,
            });
        }
        match self.buffers.get_mut(&index) {
            Some(buffer) => buffer.push(frame),
            None => {
                debug!(index, size, shape = ?frame.shape(), "priming frame buffer");
                self.buffers.insert(index, FrameBuffer::primed(frame, size));
            }
        }
        self.buffers[&index].stacked()
    }
}

/// Declared shape of a stack of `size` frames of `shape`
pub fn stacked_shape(shape: &[usize], size: usize) -> Result<Shape> {
    let (&leading, rest) = shape.split_first().ok_or_else(|| WrapError::RankMismatch {
        transform: "stack_chw",
        expected: ">= 1".to_string(),
        actual: 0,
    })?;
    let mut stacked = Vec::with_capacity(shape.len());
    stacked.push(leading * size);
    stacked.extend_from_slice(rest);
    Ok(stacked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn frame(value: f32) -> Tensor {
        Array::from_elem(IxDyn(&[1, 2, 2]), value)
    }

    #[test]
    fn test_first_frame_replicated() {
        let mut buffers = FrameBuffers::new();
        assert!(!buffers.is_primed(0));

        let out = buffers.observe(0, 4, frame(7.0)).unwrap();
        assert_eq!(out.shape(), &[4, 2, 2]);
        assert!(out.iter().all(|&x| x == 7.0));
        assert_eq!(buffers.get(0).unwrap().frames().count(), 4);
    }

    #[test]
    fn test_window_slides() {
        let mut buffers = FrameBuffers::new();
        for k in 1..=6 {
            buffers.observe(3, 3, frame(k as f32)).unwrap();
        }
        let window: Vec<f32> = buffers.get(3).unwrap().frames().map(|f| f[[0, 0, 0]]).collect();
        assert_eq!(window, vec![4.0, 5.0, 6.0]);

        let out = buffers.observe(3, 3, frame(7.0)).unwrap();
        let leading: Vec<f32> = out.outer_iter().map(|f| f[[0, 0]]).collect();
        assert_eq!(leading, vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_slots_do_not_collide() {
        let mut buffers = FrameBuffers::new();
        buffers.observe(0, 2, frame(1.0)).unwrap();
        buffers.observe(1, 2, frame(9.0)).unwrap();
        buffers.observe(0, 2, frame(2.0)).unwrap();

        let slot1: Vec<f32> = buffers.get(1).unwrap().frames().map(|f| f[[0, 0, 0]]).collect();
        assert_eq!(slot1, vec![9.0, 9.0]);
    }

    #[test]
    fn test_mismatched_frames_error() {
        let mut buffers = FrameBuffers::new();
        buffers.observe(0, 2, frame(1.0)).unwrap();
        let wrong = Array::zeros(IxDyn(&[1, 3, 3]));
        assert!(matches!(buffers.observe(0, 2, wrong), Err(WrapError::Shape(_))));
    }

    #[test]
    fn test_stacked_shape() {
        assert_eq!(stacked_shape(&[3, 84, 84], 4).unwrap(), vec![12, 84, 84]);
        assert!(stacked_shape(&[], 4).is_err());
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity_panics() {
        let _ = FrameBuffer::primed(frame(0.0), 0);
    }
}
