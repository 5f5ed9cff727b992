use crate::VxError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// `a <= b`, allowing `a` to exceed `b` by at most the tolerance.
pub fn le_with_tol(a: Real, b: Real, tol: Tolerances) -> bool {
    a <= b || nearly_equal(a, b, tol)
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, VxError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(VxError::NonFinite { what, value: v })
    }
}

/// Piecewise-linear interpolation of `(xs, ys)` at `x`.
///
/// `xs` must be ascending. Outside the grid the end values are returned; an
/// empty grid yields 0 and a NaN `x` yields NaN.
pub fn interp_linear(x: Real, xs: &[Real], ys: &[Real]) -> Real {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    if x.is_nan() {
        return Real::NAN;
    }
    if n == 1 || x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    // NaN grid entries can defeat the end checks; keep the bracket inside 1..n
    let hi = xs[..n].partition_point(|&v| v <= x).clamp(1, n - 1);
    let lo = hi - 1;
    let span = xs[hi] - xs[lo];
    if span == 0.0 {
        return ys[lo];
    }
    let t = (x - xs[lo]) / span;
    ys[lo] + t * (ys[hi] - ys[lo])
}

/// Minimum and maximum of the finite values in `values`.
pub fn finite_range<I>(values: I) -> Option<(Real, Real)>
where
    I: IntoIterator<Item = Real>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
