//! Unchecked kernel for derivatives of contracted Cartesian Gaussians on a grid.
//!
//! The n-th derivative of `x^l exp(-a x^2)` along one axis is expanded as
//!
//! ```text
//! sum_h C(n, h) P(l, n - h) (-sqrt(a))^h x^(l - n + h) H_h(sqrt(a) x) exp(-a x^2)
//! ```
//!
//! where `H_h` is the physicists' Hermite polynomial and `P` the falling factorial.
//! Every axis is handled independently and the three factors multiply.
use nalgebra::Vector3;
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, ArrayViewMut1, Zip};

use crate::basis::Coefficients;

use super::{
    special::{binomial, falling_factorial, hermite_table, HermiteTable},
    ShellValues,
};

/// Per-axis data of one primitive that is shared by every angular component.
struct AxisData {
    gauss: Array1<f64>,
    /// `H_0 ..= H_order` at `sqrt(alpha) * delta`; `None` if this axis is not differentiated.
    hermite: Option<HermiteTable>,
}

/// Evaluate the derivative of a (possibly generalized) contracted Cartesian shell.
///
/// * `points` - `(N, 3)` grid
/// * `orders` - derivative order along x, y and z; negative orders count as zero
/// * `angmom_components` - `(L, 3)` angular components, one output row each
/// * `exponents` - `(K,)` primitive exponents
/// * `coefficients` - `(K,)` or `(K, M)` contraction coefficients
/// * `norms` - `(L, K)` primitive normalization constants
///
/// Returns an `(L, N)` array for segmented coefficients and `(M, L, N)` for
/// generalized ones.
///
/// Nothing is validated here: shapes must be consistent and angular components
/// non-negative. Use [`super::eval_deriv_shell`] for the checked entry point.
#[allow(clippy::too_many_arguments)]
pub fn eval_deriv_contractions(
    points: ArrayView2<f64>,
    orders: [i32; 3],
    center: &Vector3<f64>,
    angmom_components: ArrayView2<i32>,
    exponents: ArrayView1<f64>,
    coefficients: &Coefficients,
    norms: ArrayView2<f64>,
) -> ShellValues {
    let n_points = points.nrows();
    let n_components = angmom_components.nrows();
    let orders = orders.map(|order| order.max(0));

    let rel_coords: [Array1<f64>; 3] =
        std::array::from_fn(|axis| points.column(axis).mapv(|r| r - center[axis]));

    let mut output = match coefficients {
        Coefficients::Segmented(_) => {
            ShellValues::Segmented(Array2::zeros((n_components, n_points)))
        }
        Coefficients::Generalized(coefficients) => ShellValues::Generalized(Array3::zeros((
            coefficients.ncols(),
            n_components,
            n_points,
        ))),
    };

    let mut primitive = Array2::<f64>::zeros((n_components, n_points));
    let mut scratch = Array1::<f64>::zeros(n_points);

    for (k, &alpha) in exponents.iter().enumerate() {
        let sqrt_alpha = alpha.sqrt();
        let axes: [AxisData; 3] = std::array::from_fn(|axis| {
            let delta = &rel_coords[axis];
            AxisData {
                gauss: delta.mapv(|d| (-alpha * d * d).exp()),
                hermite: (orders[axis] > 0).then(|| {
                    hermite_table(orders[axis] as usize, delta.mapv(|d| sqrt_alpha * d).view())
                }),
            }
        });

        for (l, component) in angmom_components.outer_iter().enumerate() {
            let mut value = primitive.row_mut(l);
            value.fill(norms[[l, k]]);

            for (axis, data) in axes.iter().enumerate() {
                let angular = component[axis];
                let delta = &rel_coords[axis];

                match &data.hermite {
                    None => Zip::from(&mut value)
                        .and(delta)
                        .and(&data.gauss)
                        .for_each(|v, &d, &g| *v *= d.powi(angular) * g),
                    Some(hermite) => {
                        hermite_sum(
                            scratch.view_mut(),
                            delta.view(),
                            hermite,
                            orders[axis],
                            angular,
                            sqrt_alpha,
                        );
                        Zip::from(&mut value)
                            .and(&scratch)
                            .and(&data.gauss)
                            .for_each(|v, &sum, &g| *v *= sum * g);
                    }
                }
            }
        }

        match (&mut output, coefficients) {
            (ShellValues::Segmented(output), Coefficients::Segmented(coefficients)) => {
                output.scaled_add(coefficients[k], &primitive);
            }
            (ShellValues::Generalized(output), Coefficients::Generalized(coefficients)) => {
                for (mut contraction, &coefficient) in
                    output.outer_iter_mut().zip(coefficients.row(k))
                {
                    contraction.scaled_add(coefficient, &primitive);
                }
            }
            _ => unreachable!("output layout always follows the coefficient layout"),
        }
    }

    output
}

/// Writes the Hermite expansion of the `order`-th derivative of `x^angular` times
/// the Gaussian, without the Gaussian itself, into `out`.
fn hermite_sum(
    mut out: ArrayViewMut1<f64>,
    delta: ArrayView1<f64>,
    hermite: &[Array1<f64>],
    order: i32,
    angular: i32,
    sqrt_alpha: f64,
) {
    out.fill(0.0);

    // terms below this index carry P(angular, order - h) = 0 and a negative power of delta
    let lowest = (order - angular).max(0);
    for h in lowest..=order {
        let coefficient = binomial(order, h)
            * falling_factorial(angular, order - h)
            * (-sqrt_alpha).powi(h);
        let power = angular - order + h;

        Zip::from(&mut out)
            .and(delta)
            .and(&hermite[h as usize])
            .for_each(|sum, &d, &herm| *sum += coefficient * d.powi(power) * herm);
    }
}
