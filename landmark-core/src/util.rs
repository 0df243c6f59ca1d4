//! Utilities.
use anyhow::Result;
use ndarray::{stack, ArrayD, Axis};

/// Moves the first axis of an array to the last position.
///
/// An array of shape `(k, d0, d1, ..)` becomes `(d0, d1, .., k)`.
pub fn move_first_axis_last<T: Clone>(arr: ArrayD<T>) -> ArrayD<T> {
    let ndim = arr.ndim();
    let axes = (1..ndim).chain(std::iter::once(0)).collect::<Vec<_>>();
    let permuted = arr.permuted_axes(axes);
    if permuted.is_standard_layout() {
        permuted
    } else {
        permuted.as_standard_layout().into_owned()
    }
}

/// Stacks frames along a new last axis, oldest first.
pub fn stack_history(frames: &[ArrayD<u8>]) -> Result<ArrayD<u8>> {
    let views = frames.iter().map(|f| f.view()).collect::<Vec<_>>();
    let ndim = frames.first().map_or(0, |f| f.ndim());
    Ok(stack(Axis(ndim), &views)?)
}

/// Returns the index of the largest value.
///
/// Ties resolve to the lowest index. NaN values never win unless all values are NaN,
/// in which case index 0 is returned.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    let mut best_value = f32::NEG_INFINITY;
    let mut found = false;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if !found || v > best_value {
            best = i;
            best_value = v;
            found = true;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn test_move_first_axis_last() {
        let arr = ArrayD::from_shape_fn(IxDyn(&[3, 2, 4]), |ix| (ix[0] * 100 + ix[1] * 10 + ix[2]) as u16);
        let moved = move_first_axis_last(arr);
        assert_eq!(moved.shape(), &[2, 4, 3]);
        assert!(moved.is_standard_layout());
        assert_eq!(moved[[1, 3, 2]], 213);
    }

    #[test]
    fn test_stack_history() -> Result<()> {
        let frames = (0..4u8)
            .map(|i| ArrayD::from_elem(IxDyn(&[2, 2, 2]), i))
            .collect::<Vec<_>>();
        let stacked = stack_history(&frames)?;
        assert_eq!(stacked.shape(), &[2, 2, 2, 4]);
        assert_eq!(stacked[[1, 0, 1, 3]], 3);
        Ok(())
    }

    #[test]
    fn test_argmax_prefers_lowest_index() {
        assert_eq!(argmax(&[0.1, 0.5, 0.5, -1.0]), 1);
        assert_eq!(argmax(&[2.0, 2.0]), 0);
        assert_eq!(argmax(&[f32::NAN, -3.0, f32::NAN]), 1);
        assert_eq!(argmax(&[f32::NAN, f32::NAN]), 0);
        assert_eq!(argmax(&[]), 0);
    }
}
