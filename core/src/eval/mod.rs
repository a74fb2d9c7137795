//! Checked entry points for evaluating shells and their derivatives on a grid.
mod deriv;
pub mod special;

pub use deriv::eval_deriv_contractions;

use nalgebra::Vector3;
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayViewD, ArrayViewMutD, Axis, Ix2};

use crate::{
    basis::{Coefficients, Shell},
    error::EvalError,
};

/// Values of every function of a shell at every point of a grid.
#[derive(Clone, Debug, PartialEq)]
pub enum ShellValues {
    /// `(L, N)`: angular component × point, for segmented contractions
    Segmented(Array2<f64>),
    /// `(M, L, N)`: contraction × angular component × point, for generalized contractions
    Generalized(Array3<f64>),
}

impl ShellValues {
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Segmented(values) => values.shape(),
            Self::Generalized(values) => values.shape(),
        }
    }

    /// Number of grid points, i.e. the length of the last axis.
    pub fn num_points(&self) -> usize {
        self.shape().last().copied().unwrap_or(0)
    }

    pub fn values(&self) -> ArrayViewD<'_, f64> {
        match self {
            Self::Segmented(values) => values.view().into_dyn(),
            Self::Generalized(values) => values.view().into_dyn(),
        }
    }

    pub fn values_mut(&mut self) -> ArrayViewMutD<'_, f64> {
        match self {
            Self::Segmented(values) => values.view_mut().into_dyn(),
            Self::Generalized(values) => values.view_mut().into_dyn(),
        }
    }
}

/// The input to a checked derivative evaluation.
///
/// Fields are named so that call sites cannot silently swap the grid and the orders.
pub struct EvalInput<'p, 'a, S: Shell + ?Sized> {
    /// `(N, 3)` grid, or a single point of shape `(3,)`
    pub points: ArrayViewD<'p, f64>,
    /// derivative order along x, y and z. Negative orders are treated as zero.
    pub orders: &'a [i32],
    /// the shell to evaluate
    pub shell: &'a S,
}

/// Evaluate the derivative of `input.shell` at every point of `input.points`.
///
/// # Errors
///
/// * [`EvalError::PointsShape`] if the points are not `(N, 3)` or `(3,)`
/// * [`EvalError::OrdersLength`] if there are not exactly three orders
/// * [`EvalError::ShellStructure`] if the shell's tables do not fit together
pub fn eval_deriv_shell<S: Shell + ?Sized>(
    input: &EvalInput<S>,
) -> Result<ShellValues, EvalError> {
    let points = checked_points(input.points.view())?;
    let &[x, y, z] = input.orders else {
        return Err(EvalError::OrdersLength(input.orders.len()));
    };
    let prepared = Prepared::with_points(points, input.shell)?;

    log::trace!(
        "evaluating derivative ({x}, {y}, {z}) of a shell with {} components on {} points",
        prepared.angmom_components.nrows(),
        prepared.points.nrows()
    );

    Ok(prepared.evaluate([x, y, z]))
}

/// Evaluate `shell` at every point of `points`. Same as [`eval_deriv_shell`] with
/// all orders zero.
pub fn eval_shell<S: Shell + ?Sized>(
    points: ArrayViewD<f64>,
    shell: &S,
) -> Result<ShellValues, EvalError> {
    eval_deriv_shell(&EvalInput {
        points,
        orders: &[0, 0, 0],
        shell,
    })
}

/// Evaluate several derivative orders of the same shell on the same grid.
///
/// The result holds one entry per order vector, in the given order, each equal to
/// what [`eval_deriv_shell`] returns for that order vector alone.
pub fn eval_deriv_shell_batch<S: Shell + ?Sized>(
    points: ArrayViewD<f64>,
    orders: &[[i32; 3]],
    shell: &S,
) -> Result<Vec<ShellValues>, EvalError> {
    let prepared = Prepared::new(points, shell)?;
    log::debug!(
        "evaluating {} derivative orders on {} points",
        orders.len(),
        prepared.points.nrows()
    );

    Ok(prepared.evaluate_all(orders))
}

/// First derivatives along x, y and z.
pub fn eval_shell_gradient<S: Shell + ?Sized>(
    points: ArrayViewD<f64>,
    shell: &S,
) -> Result<[ShellValues; 3], EvalError> {
    let prepared = Prepared::new(points, shell)?;
    Ok([[1, 0, 0], [0, 1, 0], [0, 0, 1]].map(|orders| prepared.evaluate(orders)))
}

/// Sum of the second derivatives along x, y and z.
pub fn eval_shell_laplacian<S: Shell + ?Sized>(
    points: ArrayViewD<f64>,
    shell: &S,
) -> Result<ShellValues, EvalError> {
    let prepared = Prepared::new(points, shell)?;

    let mut laplacian = prepared.evaluate([2, 0, 0]);
    for orders in [[0, 2, 0], [0, 0, 2]] {
        let term = prepared.evaluate(orders);
        let mut total = laplacian.values_mut();
        total += &term.values();
    }
    Ok(laplacian)
}

/// Validated views into the grid and shell, ready for the kernel.
struct Prepared<'p, 's> {
    points: ArrayView2<'p, f64>,
    center: Vector3<f64>,
    angmom_components: ArrayView2<'s, i32>,
    exponents: ArrayView1<'s, f64>,
    coefficients: &'s Coefficients,
    norms: ArrayView2<'s, f64>,
}

impl<'p, 's> Prepared<'p, 's> {
    fn new<S: Shell + ?Sized>(
        points: ArrayViewD<'p, f64>,
        shell: &'s S,
    ) -> Result<Self, EvalError> {
        Self::with_points(checked_points(points)?, shell)
    }

    fn with_points<S: Shell + ?Sized>(
        points: ArrayView2<'p, f64>,
        shell: &'s S,
    ) -> Result<Self, EvalError> {
        check_shell(shell)?;

        Ok(Self {
            points,
            center: shell.center(),
            angmom_components: shell.angular_components(),
            exponents: shell.exponents(),
            coefficients: shell.coefficients(),
            norms: shell.norms(),
        })
    }

    #[cfg(feature = "rayon")]
    fn evaluate_all(&self, orders: &[[i32; 3]]) -> Vec<ShellValues> {
        use rayon::prelude::*;

        orders
            .par_iter()
            .map(|&orders| self.evaluate(orders))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn evaluate_all(&self, orders: &[[i32; 3]]) -> Vec<ShellValues> {
        orders.iter().map(|&orders| self.evaluate(orders)).collect()
    }

    fn evaluate(&self, orders: [i32; 3]) -> ShellValues {
        eval_deriv_contractions(
            self.points,
            orders,
            &self.center,
            self.angmom_components,
            self.exponents,
            self.coefficients,
            self.norms,
        )
    }
}

fn checked_points(points: ArrayViewD<f64>) -> Result<ArrayView2<f64>, EvalError> {
    let shape = points.shape().to_vec();

    if points.ndim() == 1 && points.len() == 3 {
        return points
            .insert_axis(Axis(0))
            .into_dimensionality::<Ix2>()
            .map_err(|_| EvalError::PointsShape(shape));
    }

    match points.into_dimensionality::<Ix2>() {
        Ok(points) if points.ncols() == 3 => Ok(points),
        _ => Err(EvalError::PointsShape(shape)),
    }
}

fn check_shell<S: Shell + ?Sized>(shell: &S) -> Result<(), EvalError> {
    let n_primitives = shell.exponents().len();
    let components = shell.angular_components();
    let coefficients = shell.coefficients();

    if components.ncols() != 3 {
        return Err(EvalError::ShellStructure {
            attribute: "angular_components",
            expected: vec![components.nrows(), 3],
            found: components.shape().to_vec(),
        });
    }

    let expected_coefficients = match coefficients {
        Coefficients::Segmented(_) => vec![n_primitives],
        Coefficients::Generalized(values) => vec![n_primitives, values.ncols().max(1)],
    };
    if coefficients.shape() != expected_coefficients.as_slice() {
        return Err(EvalError::ShellStructure {
            attribute: "coefficients",
            expected: expected_coefficients,
            found: coefficients.shape().to_vec(),
        });
    }

    let expected_norms = vec![components.nrows(), n_primitives];
    if shell.norms().shape() != expected_norms.as_slice() {
        return Err(EvalError::ShellStructure {
            attribute: "norms",
            expected: expected_norms,
            found: shell.norms().shape().to_vec(),
        });
    }

    Ok(())
}
