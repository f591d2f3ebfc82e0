//! Decoration ordering, frame stacking and controller isolation

use mdp_wrap_image::prelude::*;
use mdp_wrap_image::synthetic::STEP_OFFSET;
use mdp_wrap_image::{crop, stack_chw, transpose_hwc_chw, GradientMdp, WrapError};
use ndarray::{s, Axis};
use pretty_assertions::assert_eq;

fn leading_values(tensor: &Tensor) -> Vec<f32> {
    tensor.outer_iter().map(|frame| frame.iter().next().copied().unwrap()).collect()
}

#[test]
fn test_stack_initialization() {
    let mdp = GradientMdp::new(vec![vec![1, 2, 2]]).decorate(stack_chw(0, 4).unwrap());
    let blob = mdp.describe_blob().unwrap();
    assert_eq!(blob.models[0].inputs[0].shape, vec![4, 2, 2]);

    let mut controller = mdp.controller(&ControllerConfig::default()).unwrap();
    assert!(controller.buffers().is_empty());

    let state = controller.get_state().unwrap();
    let stacked = &state.inputs[0];
    assert_eq!(stacked.shape(), &[4, 2, 2]);

    assert_eq!(controller.inner().step(), 1);
    for frame in stacked.outer_iter() {
        assert_eq!(frame.to_owned().into_raw_vec(), vec![0.0, 1.0, 2.0, 3.0]);
    }
}

#[test]
fn test_stack_steady_state() {
    let size = 4;
    let mdp = GradientMdp::new(vec![vec![1, 2, 2]]).decorate(stack_chw(0, size).unwrap());
    let mut controller = mdp.controller(&ControllerConfig::default()).unwrap();

    let mut last = None;
    for _ in 0..7 {
        last = Some(controller.get_state().unwrap());
    }

    // frames f0..f6 were emitted; the window holds f3..f6
    let expected: Vec<f32> = (3..7).map(|k| k as f32 * STEP_OFFSET).collect();
    let buffer = controller.buffers().get(0).unwrap();
    assert_eq!(buffer.capacity(), size);
    let window: Vec<f32> = buffer.frames().map(|f| f[[0, 0, 0]]).collect();
    assert_eq!(window, expected);
    assert_eq!(leading_values(&last.unwrap().inputs[0]), expected);
}

#[test]
fn test_controllers_do_not_share_buffers() {
    let mdp = GradientMdp::new(vec![vec![1, 3, 3]]).decorate(stack_chw(0, 3).unwrap());
    let mut a = mdp.controller(&ControllerConfig::default()).unwrap();
    for _ in 0..5 {
        a.get_state().unwrap();
    }

    let mut b = mdp.controller(&ControllerConfig::default()).unwrap();
    assert!(b.buffers().is_empty());
    let fresh = b.get_state().unwrap();
    assert_eq!(leading_values(&fresh.inputs[0]), vec![0.0, 0.0, 0.0]);

    let window: Vec<f32> = a.buffers().get(0).unwrap().frames().map(|f| f[[0, 0, 0]]).collect();
    assert_eq!(window, vec![2.0 * STEP_OFFSET, 3.0 * STEP_OFFSET, 4.0 * STEP_OFFSET]);
    assert_eq!(
        mdp.describe_blob().unwrap().models[0].inputs[0].shape,
        vec![3, 3, 3]
    );
}

#[test]
fn test_crop_then_stack_stacks_cropped_frames() {
    let base = GradientMdp::new(vec![vec![6, 6]]);
    let mdp = crop(0, Some(1), Some(3), Some(1), Some(3))
        .then(stack_chw(0, 3).unwrap())
        .unwrap()
        .wrap(base.clone());

    assert_eq!(mdp.describe_blob().unwrap().models[0].inputs[0].shape, vec![6, 2]);

    let mut raw = base.controller(&ControllerConfig::default()).unwrap();
    let mut decorated = mdp.controller(&ControllerConfig::default()).unwrap();
    let mut frames = Vec::new();
    for _ in 0..5 {
        let source = raw.get_state().unwrap().inputs.remove(0);
        frames.push(source.slice(s![1..3, 1..3]).to_owned());
        let out = decorated.get_state().unwrap().inputs.remove(0);

        let start = frames.len().saturating_sub(3);
        let mut expected: Vec<_> = frames[start..].iter().map(|f| f.view()).collect();
        while expected.len() < 3 {
            expected.insert(0, frames[0].view());
        }
        let expected = ndarray::concatenate(Axis(0), &expected).unwrap().into_dyn();
        assert_eq!(out, expected);
    }
}

#[test]
fn test_nested_decoration_matches_single_pipeline() {
    let base = GradientMdp::new(vec![vec![6, 6]]);
    let nested = base
        .clone()
        .decorate(crop(0, Some(0), Some(4), Some(2), Some(6)))
        .decorate(stack_chw(0, 2).unwrap());
    let flat = base.decorate(
        crop(0, Some(0), Some(4), Some(2), Some(6))
            .then(stack_chw(0, 2).unwrap())
            .unwrap(),
    );

    assert_eq!(nested.describe_blob().unwrap(), flat.describe_blob().unwrap());

    let mut a = nested.controller(&ControllerConfig::default()).unwrap();
    let mut b = flat.controller(&ControllerConfig::default()).unwrap();
    for _ in 0..4 {
        assert_eq!(a.get_state().unwrap(), b.get_state().unwrap());
    }
}

#[test]
fn test_outer_layer_sees_inner_output() {
    // stacking first, then cropping the stacked rows: only the oldest frame survives
    let mdp = GradientMdp::new(vec![vec![4, 4]])
        .decorate(stack_chw(0, 2).unwrap())
        .decorate(crop(0, None, Some(4), None, Some(4)));
    assert_eq!(mdp.describe_blob().unwrap().models[0].inputs[0].shape, vec![4, 4]);

    let mut controller = mdp.controller(&ControllerConfig::default()).unwrap();
    controller.get_state().unwrap();
    let second = controller.get_state().unwrap();
    assert_eq!(second.inputs[0][[0, 0]], 0.0);
}

#[test]
fn test_independent_slots_commute() {
    let base = GradientMdp::new(vec![vec![4, 4, 3], vec![1, 5, 5]]).with_models(2);
    let ab = base
        .clone()
        .decorate(transpose_hwc_chw(0))
        .decorate(stack_chw(1, 2).unwrap());
    let ba = base
        .decorate(stack_chw(1, 2).unwrap())
        .decorate(transpose_hwc_chw(0));

    let blob = ab.describe_blob().unwrap();
    assert_eq!(blob, ba.describe_blob().unwrap());
    assert_eq!(blob.shapes_at(0), vec![&vec![3, 4, 4], &vec![3, 4, 4]]);
    assert_eq!(blob.shapes_at(1), vec![&vec![2, 5, 5], &vec![2, 5, 5]]);

    let mut x = ab.controller(&ControllerConfig::seeded(3)).unwrap();
    let mut y = ba.controller(&ControllerConfig::seeded(3)).unwrap();
    for _ in 0..3 {
        assert_eq!(x.get_state().unwrap(), y.get_state().unwrap());
    }
}

#[test]
fn test_slot_out_of_range_surfaces() {
    let mdp =
        GradientMdp::new(vec![vec![4, 4]]).decorate(crop(3, Some(0), Some(1), Some(0), Some(1)));
    let mut controller = mdp.controller(&ControllerConfig::default()).unwrap();
    assert!(matches!(
        controller.get_state(),
        Err(WrapError::SlotOutOfRange { index: 3, len: 1 })
    ));
    // the blob has no model input at slot 3, so nothing is rewritten
    assert_eq!(mdp.describe_blob().unwrap().shapes_at(0), vec![&vec![4, 4]]);
}
