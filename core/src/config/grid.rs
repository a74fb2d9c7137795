use std::path::Path;

use ndarray::Array2;
use serde::Deserialize;

use crate::error::ConfigError;

/// A grid in a config file: a list of `[x, y, z]` points.
#[derive(Deserialize)]
pub struct ConfigGrid(Vec<Vec<f64>>);

impl ConfigGrid {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        super::load_json(path)
    }
}

impl TryFrom<ConfigGrid> for Array2<f64> {
    type Error = ConfigError;

    fn try_from(value: ConfigGrid) -> Result<Self, Self::Error> {
        let ConfigGrid(points) = value;

        let mut grid = Array2::zeros((points.len(), 3));
        for (mut row, point) in grid.outer_iter_mut().zip(&points) {
            let &[x, y, z] = point.as_slice() else {
                return Err(ConfigError::Coordinate(point.len()));
            };
            row[0] = x;
            row[1] = y;
            row[2] = z;
        }

        Ok(grid)
    }
}
