//! The protocol's utility curve
//!
//! - U(x, y) = |x+y|^8 - |x-y|^8
//! - M(x, y) = (|x+y|^7 + sign(x-y)·|x-y|^7) · 8
//!
//! M is the slope of U along the y axis. The Newton step needs it right after
//! U, so both come out of one evaluation.

/// Utility and marginal at one point of the curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// U(x, y)
    pub utility: f64,
    /// M(x, y)
    pub marginal: f64,
}

/// Evaluate the curve at `(x, y)`.
///
/// The 7th powers are taken as `p^8 / p` so quotes stay bit-compatible with
/// the values users have already been shown. `x == y` contributes zero to the
/// marginal instead of `0 / 0`.
pub fn evaluate(x: f64, y: f64) -> CurvePoint {
    let plus = x + y;
    let minus = x - y;

    let plus8 = pow8(plus);
    let plus7 = plus8 / plus;

    let minus8 = pow8(minus);
    let minus7 = if minus == 0.0 { 0.0 } else { minus8 / minus };

    CurvePoint {
        utility: (plus8 - minus8).abs(),
        marginal: (plus7 + minus7).abs() * 8.0,
    }
}

#[inline]
fn pow8(v: f64) -> f64 {
    let v2 = v * v;
    let v4 = v2 * v2;
    v4 * v4
}
