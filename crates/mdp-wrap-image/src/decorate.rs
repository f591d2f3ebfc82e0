//! MDP decoration
//!
//! [`Decorated`] wraps an MDP with a [`Pipeline`] and implements [`Mdp`]
//! itself, so decoration is transparent and chainable. Wrapping a decorated
//! MDP again nests the layers: `get_state` and `describe_blob` run the inner
//! layer first, so the last pipeline applied is the last one the data sees.

use std::sync::Arc;

use tracing::debug;

use mdp_wrap_core::{BlobDescription, Controller, ControllerConfig, Mdp, Result, State};

use crate::pipeline::Pipeline;
use crate::stack::FrameBuffers;

/// An MDP whose observations pass through a pipeline
#[derive(Debug, Clone)]
pub struct Decorated<M> {
    /// Inner MDP
    inner: M,
    /// Stages shared with every controller
    pipeline: Arc<Pipeline>,
}

impl<M: Mdp> Decorated<M> {
    /// Wrap `inner` with `pipeline`
    #[must_use]
    pub fn new(inner: M, pipeline: Pipeline) -> Self {
        debug!(stages = pipeline.len(), "decorating MDP");
        Self {
            inner,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Get a reference to the inner MDP
    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Pipeline applied by this layer
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl<M: Mdp> Mdp for Decorated<M> {
    type Controller = DecoratedController<M::Controller>;

    fn describe_blob(&self) -> Result<BlobDescription> {
        let mut blob = self.inner.describe_blob()?;
        self.pipeline.project(&mut blob)?;
        Ok(blob)
    }

    fn controller(&self, config: &ControllerConfig) -> Result<Self::Controller> {
        let inner = self.inner.controller(config)?;
        Ok(DecoratedController::new(inner, Arc::clone(&self.pipeline)))
    }
}

/// Controller of a [`Decorated`] MDP, owning the frame buffers of its stacked slots
#[derive(Debug)]
pub struct DecoratedController<C> {
    /// Inner controller
    inner: C,
    /// Stages shared with the MDP
    pipeline: Arc<Pipeline>,
    /// Frame buffers, exclusive to this controller
    buffers: FrameBuffers,
}

impl<C: Controller> DecoratedController<C> {
    /// Wrap `inner` with `pipeline`
    ///
    /// Every controller owns a fresh [`FrameBuffers`]; no stacked slot has a
    /// buffer until the first [`Controller::get_state`].
    #[must_use]
    pub fn new(inner: C, pipeline: Arc<Pipeline>) -> Self {
        Self {
            inner,
            pipeline,
            buffers: FrameBuffers::new(),
        }
    }

    /// Get a reference to the inner controller
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Get a mutable reference to the inner controller
    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Frame buffers of stacked slots
    #[must_use]
    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }
}

impl<C: Controller> Controller for DecoratedController<C> {
    fn get_state(&mut self) -> Result<State> {
        let state = self.inner.get_state()?;
        self.pipeline.apply(state, &mut self.buffers)
    }
}

/// Decoration sugar for any [`Mdp`]
pub trait MdpExt: Mdp + Sized {
    /// Wrap this MDP with `pipeline`
    fn decorate(self, pipeline: Pipeline) -> Decorated<Self> {
        pipeline.wrap(self)
    }
}

impl<M: Mdp> MdpExt for M {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::GradientMdp;

    #[test]
    fn test_config_forwarded_to_inner() {
        let base = GradientMdp::new(vec![vec![3, 3]]).with_noise(1.0);
        let mdp = base.clone().decorate(Pipeline::new());

        let config = ControllerConfig::seeded(99);
        let mut plain = base.controller(&config).unwrap();
        let mut decorated = mdp.controller(&config).unwrap();
        assert_eq!(plain.get_state().unwrap(), decorated.get_state().unwrap());
    }

    #[test]
    fn test_fresh_controller_has_no_buffers() {
        let pipeline = crate::stack_chw(0, 2).unwrap();
        let mdp = GradientMdp::new(vec![vec![1, 2, 2]]).decorate(pipeline);
        let mut controller = mdp.controller(&ControllerConfig::default()).unwrap();
        assert!(!controller.buffers().is_primed(0));

        controller.get_state().unwrap();
        assert!(controller.buffers().is_primed(0));
        assert_eq!(mdp.pipeline().len(), 1);

        let second = mdp.controller(&ControllerConfig::default()).unwrap();
        assert!(!second.buffers().is_primed(0));
    }
}
