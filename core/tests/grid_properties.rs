use approx::assert_abs_diff_eq;
use gto_core::{
    basis::{primitive_norm, Coefficients, ContractedShell},
    eval_deriv_shell, eval_shell, testing::cubic_grid, EvalInput,
};
use nalgebra::Vector3;
use ndarray::{array, Array1, Array2, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn primitive_shell(angular_momentum: i32, exponent: f64, center: Vector3<f64>) -> ContractedShell {
    ContractedShell::new(
        angular_momentum,
        center,
        vec![exponent],
        Coefficients::Segmented(array![1.0]),
    )
    .unwrap()
}

/// `(L, N)` values, flattening the contraction axis of generalized shells into rows.
fn rows(shell: &ContractedShell, points: &Array2<f64>, orders: [i32; 3]) -> Array2<f64> {
    let values = eval_deriv_shell(&EvalInput {
        points: points.view().into_dyn(),
        orders: &orders,
        shell,
    })
    .unwrap();
    let n_points = values.num_points();
    let values = values.values().to_owned();
    let n_rows = values.len() / n_points;
    values.into_shape((n_rows, n_points)).unwrap()
}

#[test]
fn normalized_primitives_have_unit_self_overlap() {
    let (grid, volume) = cubic_grid(6.0, 49);

    for (angular_momentum, exponent) in [(0, 1.0), (0, 0.6), (1, 0.8), (2, 1.3)] {
        let shell = primitive_shell(angular_momentum, exponent, Vector3::zeros());
        let values = rows(&shell, &grid, [0, 0, 0]);

        for (component, row) in values.outer_iter().enumerate() {
            let overlap = row.dot(&row) * volume;
            assert_abs_diff_eq!(overlap, 1.0, epsilon = 1e-7);

            // p functions along different axes do not overlap
            if angular_momentum == 1 {
                for other in values.outer_iter().skip(component + 1) {
                    assert_abs_diff_eq!(row.dot(&other) * volume, 0.0, epsilon = 1e-10);
                }
            }
        }
    }
}

#[test]
fn s_overlap_between_centers_matches_closed_form() {
    let (grid, volume) = cubic_grid(6.0, 49);
    let (a, b) = (0.9, 1.4);
    let center_b = Vector3::new(0.7, -0.3, 0.4);

    let values_a = rows(&primitive_shell(0, a, Vector3::zeros()), &grid, [0, 0, 0]);
    let values_b = rows(&primitive_shell(0, b, center_b), &grid, [0, 0, 0]);
    let overlap = values_a.row(0).dot(&values_b.row(0)) * volume;

    let p = a + b;
    let expected = (std::f64::consts::PI / p).powf(1.5)
        * (-a * b / p * center_b.norm_squared()).exp()
        * primitive_norm(a, [0, 0, 0])
        * primitive_norm(b, [0, 0, 0]);

    assert_abs_diff_eq!(overlap, expected, epsilon = 1e-7);
}

#[test]
fn derivatives_match_finite_differences() {
    let shell = ContractedShell::new(
        2,
        Vector3::new(0.2, -0.1, 0.3),
        vec![2.5, 0.9, 0.3],
        Coefficients::Generalized(array![[0.3, 0.1], [0.6, -0.4], [0.2, 1.0]]),
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let points = Array2::from_shape_simple_fn((16, 3), || rng.gen_range(-1.5..1.5));
    let step = 1e-5;

    for axis in 0..3 {
        let mut forward = points.clone();
        let mut backward = points.clone();
        forward.column_mut(axis).mapv_inplace(|x| x + step);
        backward.column_mut(axis).mapv_inplace(|x| x - step);

        let mut first = [0; 3];
        first[axis] = 1;
        let mut second = [0; 3];
        second[axis] = 2;

        let value = rows(&shell, &points, [0, 0, 0]);
        let value_forward = rows(&shell, &forward, [0, 0, 0]);
        let value_backward = rows(&shell, &backward, [0, 0, 0]);

        let central = (&value_forward - &value_backward) / (2.0 * step);
        let curvature = (&value_forward + &value_backward - &value * 2.0) / (step * step);

        assert_abs_diff_eq!(rows(&shell, &points, first), central, epsilon = 1e-6);
        assert_abs_diff_eq!(rows(&shell, &points, second), curvature, epsilon = 1e-3);

        // the derivative of the first derivative along the same axis is the second derivative
        let first_forward = rows(&shell, &forward, first);
        let first_backward = rows(&shell, &backward, first);
        assert_abs_diff_eq!(
            rows(&shell, &points, second),
            (&first_forward - &first_backward) / (2.0 * step),
            epsilon = 1e-6
        );
    }
}

#[test]
fn mixed_derivatives_commute_with_finite_differences() {
    let shell = primitive_shell(1, 0.7, Vector3::new(0.0, 0.5, -0.5));
    let points = array![[0.3, 0.1, 0.2], [-0.8, 0.9, -1.1], [1.2, -0.4, 0.0]];
    let step = 1e-5;

    let mut forward = points.clone();
    let mut backward = points.clone();
    forward.column_mut(1).mapv_inplace(|y| y + step);
    backward.column_mut(1).mapv_inplace(|y| y - step);

    let dxdy = rows(&shell, &points, [1, 1, 0]);
    let numeric = (rows(&shell, &forward, [1, 0, 0]) - rows(&shell, &backward, [1, 0, 0]))
        / (2.0 * step);

    assert_abs_diff_eq!(dxdy, numeric, epsilon = 1e-6);
}

#[test]
fn single_point_and_grid_agree_for_every_point() {
    let shell = primitive_shell(3, 0.45, Vector3::new(0.1, 0.2, 0.3));
    let (grid, _) = cubic_grid(2.0, 4);
    let all = rows(&shell, &grid, [2, 0, 1]);

    for (i, point) in grid.outer_iter().enumerate() {
        let single = eval_deriv_shell(&EvalInput {
            points: point.into_dyn(),
            orders: &[2, 0, 1],
            shell: &shell,
        })
        .unwrap();
        let single: Array1<f64> = single
            .values()
            .index_axis(Axis(1), 0)
            .to_owned()
            .into_dimensionality()
            .unwrap();
        assert_eq!(single, all.column(i));
    }

    let plain = eval_shell(grid.view().into_dyn(), &shell).unwrap();
    assert_eq!(plain.shape(), &[10, 64]);
}
