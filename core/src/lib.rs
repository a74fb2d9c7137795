//! Evaluation of contracted Cartesian Gaussian shells and their derivatives on grids.
pub mod basis;
pub mod config;
pub mod error;
pub mod eval;

pub use eval::{
    eval_deriv_shell, eval_deriv_shell_batch, eval_shell, eval_shell_gradient,
    eval_shell_laplacian, EvalInput, ShellValues,
};

pub mod testing {
    use itertools::iproduct;
    use ndarray::Array2;

    /// A uniform cubic grid with `points_per_axis` points from `-half_width` to
    /// `half_width` along each axis, and the volume element of one grid cell.
    pub fn cubic_grid(half_width: f64, points_per_axis: usize) -> (Array2<f64>, f64) {
        let spacing = 2.0 * half_width / (points_per_axis.max(2) - 1) as f64;
        let coordinate = |i: usize| -half_width + i as f64 * spacing;

        let mut grid = Array2::zeros((points_per_axis.pow(3), 3));
        for (mut row, (i, j, k)) in grid.outer_iter_mut().zip(iproduct!(
            0..points_per_axis,
            0..points_per_axis,
            0..points_per_axis
        )) {
            row[0] = coordinate(i);
            row[1] = coordinate(j);
            row[2] = coordinate(k);
        }

        (grid, spacing.powi(3))
    }

    #[cfg(test)]
    mod tests {
        #[test]
        fn test_cubic_grid() {
            let (grid, volume) = super::cubic_grid(1.0, 3);
            assert_eq!(grid.nrows(), 27);
            assert_eq!(volume, 1.0);
            assert_eq!(grid.row(0).to_vec(), vec![-1.0, -1.0, -1.0]);
            assert_eq!(grid.row(5).to_vec(), vec![-1.0, 0.0, 1.0]);
            assert_eq!(grid.row(26).to_vec(), vec![1.0, 1.0, 1.0]);
        }
    }
}
