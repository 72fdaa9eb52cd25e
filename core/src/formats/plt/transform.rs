use ndarray::{ArrayD, Axis, IxDyn};
use serde::{Deserialize, Serialize};

use super::Variable;

/// Post-read array transforms, applied in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Reverse the three grid axes: `(zones, i, j, k)` -> `(zones, k, j, i)`
    pub permute: bool,
    /// Move the zone axis to the end, e.g. to get time as the last axis
    pub make_3d: bool,
    /// Remove all axes of length 1
    pub squeeze: bool,
}

impl TransformOptions {
    pub fn apply(&self, mut var: Variable) -> Variable {
        if self.permute {
            var = permute(var);
        }
        if self.make_3d {
            var = make_3d(var);
        }
        if self.squeeze {
            var = squeeze(var);
        }
        var
    }
}

/// Reverses every axis after the zone axis and relabels `size1`/`size3` to match.
///
/// Applying this twice restores the original order.
pub fn permute(mut var: Variable) -> Variable {
    if var.data.ndim() > 1 {
        let axes = std::iter::once(0)
            .chain((1..var.data.ndim()).rev())
            .collect::<Vec<_>>();
        var.data = var.data.permuted_axes(IxDyn(&axes));
    }
    std::mem::swap(&mut var.size1, &mut var.size3);
    var
}

/// Moves the zone axis from the front to the back.
pub fn make_3d(mut var: Variable) -> Variable {
    if var.data.ndim() > 1 {
        let axes = (1..var.data.ndim())
            .chain(std::iter::once(0))
            .collect::<Vec<_>>();
        var.data = var.data.permuted_axes(IxDyn(&axes));
    }
    var
}

pub fn squeeze(mut var: Variable) -> Variable {
    var.data = squeeze_array(var.data);
    var
}

fn squeeze_array(mut data: ArrayD<f64>) -> ArrayD<f64> {
    // Back to front, so the remaining axis indices stay valid
    for axis in (0..data.ndim()).rev() {
        if data.len_of(Axis(axis)) == 1 {
            data = data.index_axis_move(Axis(axis), 0);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ndarray::{Array, Ix2, Ix4};

    use super::*;

    fn variable(shape: &[usize]) -> Variable {
        let len = shape.iter().product::<usize>();
        let data = Array::from_shape_vec(IxDyn(shape), (0..len).map(|x| x as f64).collect())
            .unwrap();
        Variable {
            name: "PSD".to_string(),
            size1: shape[1],
            size2: shape[2],
            size3: shape[3],
            data,
            comments: Arc::from(Vec::new()),
            zone_labels: Arc::from(vec!["0".to_string(); shape[0]]),
        }
    }

    #[test]
    fn permute_reverses_grid_axes() {
        let var = permute(variable(&[2, 3, 4, 5]));
        assert_eq!(var.data.shape(), &[2, 5, 4, 3]);
        assert_eq!((var.size1, var.size2, var.size3), (5, 4, 3));

        let original = variable(&[2, 3, 4, 5]);
        let before = original.data.view().into_dimensionality::<Ix4>().unwrap();
        let after = var.data.view().into_dimensionality::<Ix4>().unwrap();
        assert_eq!(after[[1, 4, 2, 0]], before[[1, 0, 2, 4]]);
    }

    #[test]
    fn permute_twice_is_identity() {
        let var = permute(permute(variable(&[2, 3, 4, 5])));
        let original = variable(&[2, 3, 4, 5]);
        assert_eq!(var.data, original.data);
        assert_eq!(
            (var.size1, var.size2, var.size3),
            (original.size1, original.size2, original.size3)
        );
    }

    #[test]
    fn make_3d_moves_zone_axis_last() {
        let var = make_3d(variable(&[6, 3, 4, 1]));
        assert_eq!(var.data.shape(), &[3, 4, 1, 6]);
        let original = variable(&[6, 3, 4, 1]);
        let before = original.data.view().into_dimensionality::<Ix4>().unwrap();
        let after = var.data.view().into_dimensionality::<Ix4>().unwrap();
        assert_eq!(after[[2, 1, 0, 5]], before[[5, 2, 1, 0]]);
    }

    #[test]
    fn squeeze_drops_unit_axes() {
        let var = squeeze(variable(&[1, 3, 1, 4]));
        assert_eq!(var.data.shape(), &[3, 4]);
        let arr = var.data.view().into_dimensionality::<Ix2>().unwrap();
        assert_eq!(arr[[2, 3]], 11.0);
    }

    #[test]
    fn squeeze_all_unit_axes() {
        let var = squeeze(variable(&[1, 1, 1, 1]));
        assert_eq!(var.data.ndim(), 0);
        assert_eq!(var.data.len(), 1);
    }

    #[test]
    fn applies_in_order() {
        let options = TransformOptions {
            permute: true,
            make_3d: true,
            squeeze: true,
        };
        // (zones, i, j, k) -> (zones, k, j, i) -> (k, j, i, zones) -> drop j
        let var = options.apply(variable(&[7, 2, 1, 3]));
        assert_eq!(var.data.shape(), &[3, 2, 7]);
        assert_eq!((var.size1, var.size2, var.size3), (3, 1, 2));
    }

    #[test]
    fn defaults_leave_data_alone() {
        let var = TransformOptions::default().apply(variable(&[2, 1, 1, 3]));
        assert_eq!(var.data.shape(), &[2, 1, 1, 3]);
    }
}
