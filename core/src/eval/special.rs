//! Small special functions used by the derivative kernel.
//!
//! These replace library calls with explicit recurrences so that the truncation
//! rules at negative or out-of-range indices are ours to control.
use ndarray::{Array1, ArrayView1, Zip};
use smallvec::SmallVec;

/// Tables with at most this many degrees are kept off the heap.
const INLINE_DEGREES: usize = 5;

pub type HermiteTable = SmallVec<[Array1<f64>; INLINE_DEGREES]>;

/// Physicists' Hermite polynomials `H_0(x) ..= H_degree(x)`, evaluated element-wise.
///
/// Uses the three-term recurrence `H_{n+1}(x) = 2x H_n(x) - 2n H_{n-1}(x)`.
/// The returned table has `degree + 1` entries, one array per degree.
pub fn hermite_table(degree: usize, x: ArrayView1<f64>) -> HermiteTable {
    let mut table = HermiteTable::with_capacity(degree + 1);
    table.push(Array1::ones(x.len()));
    if degree == 0 {
        return table;
    }
    table.push(x.mapv(|x| 2.0 * x));

    for n in 1..degree {
        let next = Zip::from(x)
            .and(&table[n])
            .and(&table[n - 1])
            .map_collect(|&x, &h_n, &h_prev| 2.0 * x * h_n - 2.0 * n as f64 * h_prev);
        table.push(next);
    }

    table
}

/// Binomial coefficient `C(n, k)`, zero outside `0 <= k <= n`.
pub fn binomial(n: i32, k: i32) -> f64 {
    if k < 0 || n < 0 || k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Falling factorial `n (n - 1) ... (n - k + 1)`, i.e. the number of
/// k-permutations of n. Zero outside `0 <= k <= n`.
pub fn falling_factorial(n: i32, k: i32) -> f64 {
    if k < 0 || n < 0 || k > n {
        return 0.0;
    }
    (n - k + 1..=n).fold(1.0, |acc, i| acc * i as f64)
}
