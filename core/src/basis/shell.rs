use nalgebra::Vector3;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::ShellError;

use super::{cartesian_components, primitive_norm};

/// What the grid evaluator needs to know about a shell.
///
/// Implementors promise that the tables fit together: `K` exponents, `K` coefficient
/// rows, `L` angular components with three entries each and an `(L, K)` norm table.
/// The checked entry points in [`crate::eval`] verify this before evaluating.
pub trait Shell {
    /// Total angular momentum of the shell.
    fn angular_momentum(&self) -> i32;

    fn center(&self) -> Vector3<f64>;

    /// `(K,)` primitive exponents
    fn exponents(&self) -> ArrayView1<'_, f64>;

    /// `(K,)` or `(K, M)` contraction coefficients
    fn coefficients(&self) -> &Coefficients;

    /// `(L, 3)` Cartesian angular components
    fn angular_components(&self) -> ArrayView2<'_, i32>;

    /// `(L, K)` normalization constant of each primitive, per angular component
    fn norms(&self) -> ArrayView2<'_, f64>;
}

/// Contraction coefficients of a shell.
#[derive(Clone, Debug, PartialEq)]
pub enum Coefficients {
    /// one coefficient per primitive
    Segmented(Array1<f64>),
    /// `(K, M)`: primitive × contraction, all contractions sharing the exponents
    Generalized(Array2<f64>),
}

impl Coefficients {
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Segmented(values) => values.shape(),
            Self::Generalized(values) => values.shape(),
        }
    }

    pub fn num_primitives(&self) -> usize {
        self.shape()[0]
    }

    /// Number of contracted functions per angular component (`M`).
    pub fn num_contractions(&self) -> usize {
        match self {
            Self::Segmented(_) => 1,
            Self::Generalized(values) => values.ncols(),
        }
    }
}

/// A set of contracted Cartesian Gaussians sharing a center and exponents.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractedShell {
    angular_momentum: i32,
    center: Vector3<f64>,
    exponents: Array1<f64>,
    coefficients: Coefficients,
    angular_components: Array2<i32>,
    norms: Array2<f64>,
}

impl ContractedShell {
    /// Creates a shell with every Cartesian component of `angular_momentum`.
    pub fn new(
        angular_momentum: i32,
        center: Vector3<f64>,
        exponents: Vec<f64>,
        coefficients: Coefficients,
    ) -> Result<Self, ShellError> {
        if angular_momentum < 0 {
            return Err(ShellError::NegativeAngularMomentum(angular_momentum));
        }
        Self::with_components(
            angular_momentum,
            center,
            exponents,
            coefficients,
            &cartesian_components(angular_momentum),
        )
    }

    /// Creates a shell from an explicit list of angular components.
    ///
    /// The components need not add up to `angular_momentum`, nor to the same total;
    /// every component produces one row of output.
    pub fn with_components(
        angular_momentum: i32,
        center: Vector3<f64>,
        exponents: Vec<f64>,
        coefficients: Coefficients,
        components: &[[i32; 3]],
    ) -> Result<Self, ShellError> {
        if angular_momentum < 0 {
            return Err(ShellError::NegativeAngularMomentum(angular_momentum));
        }
        if exponents.is_empty() {
            return Err(ShellError::NoPrimitives);
        }
        if let Some(&exponent) = exponents.iter().find(|e| !(e.is_finite() && **e > 0.0)) {
            return Err(ShellError::InvalidExponent(exponent));
        }
        if coefficients.num_primitives() != exponents.len() {
            return Err(ShellError::CoefficientCount {
                expected: exponents.len(),
                found: coefficients.num_primitives(),
            });
        }
        if coefficients.num_contractions() == 0 {
            return Err(ShellError::NoContractions);
        }
        if let Some(&component) = components.iter().find(|c| c.iter().any(|&x| x < 0)) {
            return Err(ShellError::NegativeComponent(component));
        }

        let norms = Array2::from_shape_fn((components.len(), exponents.len()), |(l, k)| {
            primitive_norm(exponents[k], components[l])
        });
        let angular_components =
            Array2::from_shape_fn((components.len(), 3), |(l, axis)| components[l][axis]);

        Ok(Self {
            angular_momentum,
            center,
            exponents: Array1::from_vec(exponents),
            coefficients,
            angular_components,
            norms,
        })
    }

    pub fn num_primitives(&self) -> usize {
        self.exponents.len()
    }

    pub fn num_components(&self) -> usize {
        self.angular_components.nrows()
    }

    pub fn num_contractions(&self) -> usize {
        self.coefficients.num_contractions()
    }
}

impl Shell for ContractedShell {
    fn angular_momentum(&self) -> i32 {
        self.angular_momentum
    }

    fn center(&self) -> Vector3<f64> {
        self.center
    }

    fn exponents(&self) -> ArrayView1<'_, f64> {
        self.exponents.view()
    }

    fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    fn angular_components(&self) -> ArrayView2<'_, i32> {
        self.angular_components.view()
    }

    fn norms(&self) -> ArrayView2<'_, f64> {
        self.norms.view()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_p_shell_tables() {
        let shell = ContractedShell::new(
            1,
            Vector3::new(1.0, 2.0, 3.0),
            vec![5.0, 1.0],
            Coefficients::Segmented(array![0.4, 0.6]),
        )
        .unwrap();

        assert_eq!(shell.num_primitives(), 2);
        assert_eq!(shell.num_components(), 3);
        assert_eq!(shell.num_contractions(), 1);
        assert_eq!(shell.angular_components(), array![[1, 0, 0], [0, 1, 0], [0, 0, 1]]);
        assert_eq!(shell.norms().shape(), &[3, 2]);
        assert_eq!(shell.norms()[[1, 0]], primitive_norm(5.0, [0, 1, 0]));
    }

    #[test]
    fn test_heterogeneous_components() {
        let shell = ContractedShell::with_components(
            1,
            Vector3::zeros(),
            vec![1.0],
            Coefficients::Generalized(array![[1.0, 0.5, 0.25]]),
            &[[0, 0, 0], [1, 0, 0], [2, 1, 0]],
        )
        .unwrap();

        assert_eq!(shell.num_components(), 3);
        assert_eq!(shell.num_contractions(), 3);
        assert_eq!(shell.norms()[[2, 0]], primitive_norm(1.0, [2, 1, 0]));
    }

    #[test]
    fn test_rejects_invalid_shells() {
        let segmented = || Coefficients::Segmented(array![1.0]);

        assert_eq!(
            ContractedShell::new(-1, Vector3::zeros(), vec![1.0], segmented()).unwrap_err(),
            ShellError::NegativeAngularMomentum(-1)
        );
        assert_eq!(
            ContractedShell::new(
                0,
                Vector3::zeros(),
                vec![],
                Coefficients::Segmented(Array1::zeros(0))
            )
            .unwrap_err(),
            ShellError::NoPrimitives
        );
        assert_eq!(
            ContractedShell::new(0, Vector3::zeros(), vec![-2.0], segmented()).unwrap_err(),
            ShellError::InvalidExponent(-2.0)
        );
        assert_eq!(
            ContractedShell::new(0, Vector3::zeros(), vec![1.0, 2.0], segmented()).unwrap_err(),
            ShellError::CoefficientCount {
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            ContractedShell::with_components(
                1,
                Vector3::zeros(),
                vec![1.0],
                segmented(),
                &[[1, -1, 0]]
            )
            .unwrap_err(),
            ShellError::NegativeComponent([1, -1, 0])
        );
    }
}
