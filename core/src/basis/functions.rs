/// Normalization constant of the primitive `x^i y^j z^k exp(-alpha r^2)`.
pub fn primitive_norm(exponent: f64, [i, j, k]: [i32; 3]) -> f64 {
    // (2i)! / i!, kept in floating point so high angular momenta don't overflow
    let ratio = |n: i32| (n + 1..=2 * n).map(f64::from).product::<f64>();

    (std::f64::consts::FRAC_2_PI * exponent)
        .powi(3)
        .sqrt()
        .sqrt()
        * f64::sqrt((8.0 * exponent).powi(i + j + k) / (ratio(i) * ratio(j) * ratio(k)))
}

/// All `(i, j, k)` with `i + j + k = angular_magnitude`, with `i` descending, then `j`
/// descending: `xx, xy, xz, yy, yz, zz` for d shells.
pub fn cartesian_components(angular_magnitude: i32) -> Vec<[i32; 3]> {
    let mut components = Vec::with_capacity(
        ((angular_magnitude + 1) * (angular_magnitude + 2) / 2).max(0) as usize,
    );

    for i in (0..=angular_magnitude).rev() {
        for j in (0..=angular_magnitude - i).rev() {
            components.push([i, j, angular_magnitude - i - j]);
        }
    }

    components
}
