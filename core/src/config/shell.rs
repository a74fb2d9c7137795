use std::path::Path;

use nalgebra::Vector3;
use ndarray::{Array1, Array2};
use serde::Deserialize;

use crate::{
    basis::{Coefficients, ContractedShell},
    error::{ConfigError, ShellError},
};

/// An electron shell as written by the Basis Set Exchange JSON format.
///
/// Numbers are kept as strings there, so they are parsed during conversion.
#[derive(Deserialize)]
pub struct ConfigElectronShell {
    #[serde(default)]
    #[allow(unused)]
    function_type: String,
    angular_momentum: Vec<i32>,
    exponents: Vec<String>,
    coefficients: Vec<Vec<String>>,
}

/// An electron shell placed at a center.
#[derive(Deserialize)]
pub struct ConfigShell {
    center: Vec<f64>,
    #[serde(flatten)]
    shell: ConfigElectronShell,
}

impl ConfigShell {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        super::load_json(path)
    }

    /// Builds the shells described by this entry.
    ///
    /// A single angular momentum with several coefficient rows is one generalized
    /// shell. Several angular momenta (e.g. SP shells) give one segmented shell per
    /// angular momentum, paired with the coefficient row at the same position.
    pub fn shells(&self) -> Result<Vec<ContractedShell>, ConfigError> {
        let &[x, y, z] = self.center.as_slice() else {
            return Err(ConfigError::Coordinate(self.center.len()));
        };
        let center = Vector3::new(x, y, z);
        self.shell.shells_at(center)
    }
}

impl ConfigElectronShell {
    pub fn shells_at(&self, center: Vector3<f64>) -> Result<Vec<ContractedShell>, ConfigError> {
        let exponents = self
            .exponents
            .iter()
            .map(|exponent| exponent.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self
            .coefficients
            .iter()
            .map(|row| parse_row(row, exponents.len()))
            .collect::<Result<Vec<_>, _>>()?;

        match self.angular_momentum.as_slice() {
            [] => Err(ConfigError::NoAngularMomentum),
            &[angular_momentum] => {
                let coefficients = match rows.as_slice() {
                    [] => {
                        return Err(ConfigError::CoefficientRows {
                            angular_momenta: 1,
                            coefficient_rows: 0,
                        })
                    }
                    [row] => Coefficients::Segmented(row.clone()),
                    rows => Coefficients::Generalized(Array2::from_shape_fn(
                        (exponents.len(), rows.len()),
                        |(k, m)| rows[m][k],
                    )),
                };
                Ok(vec![ContractedShell::new(
                    angular_momentum,
                    center,
                    exponents,
                    coefficients,
                )?])
            }
            angular_momenta => {
                if angular_momenta.len() != rows.len() {
                    return Err(ConfigError::CoefficientRows {
                        angular_momenta: angular_momenta.len(),
                        coefficient_rows: rows.len(),
                    });
                }

                angular_momenta
                    .iter()
                    .zip(rows)
                    .map(|(&angular_momentum, row)| {
                        ContractedShell::new(
                            angular_momentum,
                            center,
                            exponents.clone(),
                            Coefficients::Segmented(row),
                        )
                        .map_err(ConfigError::from)
                    })
                    .collect()
            }
        }
    }
}

fn parse_row(row: &[String], n_primitives: usize) -> Result<Array1<f64>, ConfigError> {
    if row.len() != n_primitives {
        return Err(ShellError::CoefficientCount {
            expected: n_primitives,
            found: row.len(),
        }
        .into());
    }

    Ok(row
        .iter()
        .map(|value| value.trim().parse::<f64>())
        .collect::<Result<Array1<_>, _>>()?)
}
