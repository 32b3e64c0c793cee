//! Broadcasting helpers for elementwise combination.

use crate::{Error, Result};

/// Shape of the result of combining operands of shapes `a` and `b`.
///
/// Shapes are compared from the trailing axis. Two sizes are compatible when
/// they are equal or one of them is 1, and an operand with fewer axes is
/// padded with leading 1s. A scalar (`[]`) combines with anything.
///
/// ```text
/// [4, 1] with [3]    -> [4, 3]
/// [] with [5]        -> [5]
/// [2, 3] with [2, 4] -> Error::Shape
/// ```
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let rank = a.len().max(b.len());
    (0..rank)
        .map(|axis| match (aligned_dim(a, rank, axis), aligned_dim(b, rank, axis)) {
            (x, y) if x == y || y == 1 => Ok(x),
            (1, y) => Ok(y),
            (x, y) => Err(Error::Shape(format!(
                "cannot broadcast {a:?} with {b:?}: axis {axis} has sizes {x} and {y}"
            ))),
        })
        .collect()
}

/// Map a flat index into the broadcast output to the flat index of an input.
///
/// `input_shape` must be broadcast-compatible with `output_shape`; dimensions
/// of size 1 (and missing leading dimensions) always map to position 0.
pub fn broadcast_index(flat: usize, output_shape: &[usize], input_shape: &[usize]) -> usize {
    let offset = output_shape.len() - input_shape.len();
    let mut remaining = flat;
    let mut index = 0;
    let mut stride = 1;

    for axis in (0..output_shape.len()).rev() {
        let out_dim = output_shape[axis];
        let coord = remaining % out_dim;
        remaining /= out_dim;

        if axis < offset {
            continue;
        }
        let in_dim = input_shape[axis - offset];
        if in_dim != 1 {
            index += coord * stride;
        }
        stride *= in_dim;
    }

    index
}

/// Size of `axis` once `shape` is left-padded with 1s to `rank` axes.
fn aligned_dim(shape: &[usize], rank: usize, axis: usize) -> usize {
    let pad = rank - shape.len();
    if axis < pad { 1 } else { shape[axis - pad] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_of_equal_operands() {
        assert_eq!(broadcast_shape(&[4, 2], &[4, 2]).unwrap(), vec![4, 2]);
    }

    #[test]
    fn test_shape_pads_leading_axes() {
        assert_eq!(broadcast_shape(&[3], &[5, 2, 3]).unwrap(), vec![5, 2, 3]);
        assert_eq!(broadcast_shape(&[4, 1], &[3]).unwrap(), vec![4, 3]);
    }

    #[test]
    fn test_shape_stretches_both_sides() {
        assert_eq!(broadcast_shape(&[1, 5, 1], &[3, 1, 2]).unwrap(), vec![3, 5, 2]);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = broadcast_shape(&[2, 3], &[2, 4]).unwrap_err();
        assert!(matches!(err, Error::Shape(ref msg) if msg.contains("axis 1")));
    }

    #[test]
    fn test_shape_with_scalars() {
        assert_eq!(broadcast_shape(&[], &[2, 2]).unwrap(), vec![2, 2]);
        assert_eq!(broadcast_shape(&[7], &[1]).unwrap(), vec![7]);
        assert!(broadcast_shape(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_broadcast_index_row_vector() {
        // [2, 3] output, [3] input: every row reads the same three elements
        let out = [2, 3];
        let input = [3];
        let mapped: Vec<usize> = (0..6).map(|i| broadcast_index(i, &out, &input)).collect();
        assert_eq!(mapped, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_broadcast_index_column_vector() {
        let out = [2, 3];
        let input = [2, 1];
        let mapped: Vec<usize> = (0..6).map(|i| broadcast_index(i, &out, &input)).collect();
        assert_eq!(mapped, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_broadcast_index_scalar() {
        let out = [4];
        let mapped: Vec<usize> = (0..4).map(|i| broadcast_index(i, &out, &[])).collect();
        assert_eq!(mapped, vec![0, 0, 0, 0]);
    }
}
