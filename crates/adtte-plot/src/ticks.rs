//! Axis break proposals.

const HIGH_BIAS: f64 = 1.5;
const SMALL_SHRINK: f64 = 0.75;
const ROUNDING_EPS: f64 = 1e-10;

/// Proposes about `n + 1` equally spaced round values covering `[lo, hi]`.
///
/// The step is 1, 2 or 5 times a power of ten, chosen with a bias towards
/// larger steps. Non-finite bounds produce no breaks.
pub fn pretty(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let n = n.max(1);
    let min_n = n / 3;
    let h5 = 0.5 + 1.5 * HIGH_BIAS;

    let dx = hi - lo;
    let mut cell;
    let small;
    if dx == 0.0 && hi == 0.0 {
        cell = 1.0;
        small = true;
    } else {
        cell = lo.abs().max(hi.abs());
        let tolerance = (1.0 + 1.0 / (1.0 + HIGH_BIAS)) * n as f64 * f64::EPSILON;
        small = dx < cell * tolerance * 3.0;
    }

    if small {
        if cell > 10.0 {
            cell = 9.0 + cell / 10.0;
        }
        cell *= SMALL_SHRINK;
        if min_n > 1 {
            cell /= min_n as f64;
        }
    } else {
        cell = dx / n as f64;
    }

    let base = 10f64.powf(cell.log10().floor());
    let mut unit = base;
    if 2.0 * base - cell < HIGH_BIAS * (cell - unit) {
        unit = 2.0 * base;
        if 5.0 * base - cell < h5 * (cell - unit) {
            unit = 5.0 * base;
            if 10.0 * base - cell < HIGH_BIAS * (cell - unit) {
                unit = 10.0 * base;
            }
        }
    }

    let mut ns = (lo / unit + 1e-7).floor();
    let mut nu = (hi / unit - 1e-7).ceil();
    while ns * unit > lo + ROUNDING_EPS * unit {
        ns -= 1.0;
    }
    while nu * unit < hi - ROUNDING_EPS * unit {
        nu += 1.0;
    }

    let k = (0.5 + nu - ns).floor();
    let min_n = min_n as f64;
    if k < min_n {
        let missing = min_n - k;
        let half = (missing / 2.0).floor();
        let odd = missing % 2.0;
        if ns >= 0.0 {
            nu += half;
            ns -= half + odd;
        } else {
            ns -= half;
            nu += half + odd;
        }
    }

    let decimals = (-unit.log10().floor()).max(0.0) as i32 + 1;
    let scale = 10f64.powi(decimals);
    let steps = (nu - ns).round() as i64;
    (0..=steps)
        .map(|i| ((ns + i as f64) * unit * scale).round() / scale)
        .collect()
}

/// Breaks over the rounded extremes of the finite values.
pub fn rounded_range(values: impl IntoIterator<Item = f64>, n: usize) -> Vec<f64> {
    match finite_range(values) {
        Some((lo, hi)) => pretty(lo.round(), hi.round(), n),
        None => Vec::new(),
    }
}

/// Smallest and largest finite value, if any.
pub fn finite_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
