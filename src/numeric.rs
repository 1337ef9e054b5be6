//! Floating point root finding used when an equation cannot be solved by
//! rearranging it.

/// Bisection steps; enough to exhaust f64 precision on any bracket
const BISECTION_STEPS: usize = 200;

/// Root finding found roots that are not real
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexRoots;

/// Evaluate the polynomial with `coefficients` (lowest power first) at `x`
pub fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Sum of the absolute terms, the scale rounding errors are measured against
fn magnitude(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x.abs() + c.abs())
}

fn trimmed(coefficients: &[f64]) -> &[f64] {
    let end = coefficients
        .iter()
        .rposition(|c| *c != 0.0)
        .map_or(0, |last| last + 1);
    &coefficients[..end]
}

fn derivative(coefficients: &[f64]) -> Vec<f64> {
    coefficients
        .iter()
        .enumerate()
        .skip(1)
        .map(|(power, c)| c * power as f64)
        .collect()
}

/// Distinct real roots of a polynomial, ascending.
///
/// Roots are bracketed between consecutive roots of the derivative, so
/// each bracket holds at most one simple root; a derivative root that is
/// itself a zero of the polynomial is a repeated root.
pub fn real_roots(coefficients: &[f64]) -> Vec<f64> {
    let p = trimmed(coefficients);
    if p.len() < 2 {
        return Vec::new();
    }
    if p.len() == 2 {
        return vec![-p[0] / p[1]];
    }

    let leading = p[p.len() - 1];
    let bound = 1.0
        + p[..p.len() - 1]
            .iter()
            .map(|c| (c / leading).abs())
            .fold(0.0, f64::max);

    let mut points = vec![-bound];
    points.extend(
        real_roots(&derivative(p))
            .into_iter()
            .filter(|x| -bound < *x && *x < bound),
    );
    points.push(bound);

    let mut roots = Vec::new();
    let mut f = |x: f64| horner(p, x);
    for pair in points.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if vanishes(p, lo) {
            roots.push(lo);
        } else if !vanishes(p, hi) && (f(lo) < 0.0) != (f(hi) < 0.0) {
            roots.push(bisect(&mut f, lo, hi));
        }
    }
    dedup(&mut roots);
    roots
}

/// `p(x)` is zero up to rounding
fn vanishes(p: &[f64], x: f64) -> bool {
    horner(p, x).abs() <= 1e-12 * magnitude(p, x)
}

/// Real roots of the polynomial, or [`ComplexRoots`] when some of its
/// roots are not real.
///
/// Roots at zero are factored out exactly and quadratics are solved in
/// closed form. Above that, each real root is counted with the
/// multiplicity given by the derivatives it also zeroes, and the roots
/// are all real when the counts add up to the degree.
pub fn polynomial_roots(coefficients: &[f64]) -> Result<Vec<f64>, ComplexRoots> {
    let p = trimmed(coefficients);
    let zeros = p.iter().take_while(|c| **c == 0.0).count();
    let q = &p[zeros..];
    let mut roots = match q.len() {
        0 | 1 => Vec::new(),
        2 => vec![-q[0] / q[1]],
        3 => quadratic(q[0], q[1], q[2])?,
        len => {
            let roots = real_roots(q);
            let counted: usize = roots.iter().map(|root| multiplicity(q, *root)).sum();
            if counted < len - 1 {
                return Err(ComplexRoots);
            }
            roots
        }
    };
    if zeros > 0 {
        roots.push(0.0);
        dedup(&mut roots);
    }
    Ok(roots)
}

/// Roots of `a x^2 + b x + c`, `c` non-zero
fn quadratic(c: f64, b: f64, a: f64) -> Result<Vec<f64>, ComplexRoots> {
    let discriminant = b * b - 4.0 * a * c;
    // rounding in b^2 - 4ac
    let noise = 4.0 * f64::EPSILON * (b * b).max((4.0 * a * c).abs());
    if discriminant < -noise {
        return Err(ComplexRoots);
    }
    let q = -0.5 * (b + discriminant.max(0.0).sqrt().copysign(b));
    if q == 0.0 {
        return Ok(vec![0.0]);
    }
    let mut roots = vec![q / a, c / q];
    dedup(&mut roots);
    Ok(roots)
}

/// How many times `root` is a root of `p`: one more for every derivative
/// it also zeroes
fn multiplicity(p: &[f64], root: f64) -> usize {
    let mut count = 1;
    let mut d = derivative(p);
    while d.len() > 1 && horner(&d, root).abs() <= 1e-10 * magnitude(&d, root) {
        count += 1;
        d = derivative(&d);
    }
    count
}

/// Real roots of an arbitrary function, found by looking for sign changes
/// over a symmetric logarithmic grid and refining them by bisection. The
/// grid is dense over `1e-6..1e6` and sparse out to `1e300`.
///
/// A sign change across a pole refines to a point where `f` is large, and
/// is dropped. Returns `None` when `f` vanishes on two neighbouring grid
/// points, as its zeros are then not isolated.
pub fn scan_roots<F: FnMut(f64) -> f64>(mut f: F) -> Option<Vec<f64>> {
    let dense = (0..=1200).map(|step| -6.0 + f64::from(step) / 100.0);
    let sparse = (1..=2940).map(|step| 6.0 + f64::from(step) / 10.0);
    let mut grid = vec![0.0];
    for exponent in dense.chain(sparse) {
        let x = 10f64.powf(exponent);
        grid.push(x);
        grid.push(-x);
    }
    grid.sort_by(f64::total_cmp);

    let mut roots = Vec::new();
    let values: Vec<f64> = grid.iter().map(|x| f(*x)).collect();
    for i in 0..grid.len() - 1 {
        let (lo, hi) = (grid[i], grid[i + 1]);
        let (flo, fhi) = (values[i], values[i + 1]);
        if !flo.is_finite() || !fhi.is_finite() {
            continue;
        }
        if flo == 0.0 && fhi == 0.0 {
            return None;
        } else if flo == 0.0 {
            roots.push(lo);
        } else if fhi != 0.0 && (flo < 0.0) != (fhi < 0.0) {
            let root = bisect(&mut f, lo, hi);
            let residual = f(root);
            if residual.is_finite() && residual.abs() <= 1e-6 * flo.abs().max(fhi.abs()) {
                roots.push(root);
            }
        }
    }
    if values.last() == Some(&0.0) {
        roots.extend(grid.last());
    }
    dedup(&mut roots);
    Some(roots)
}

/// Refine a sign change of `f` on `[lo, hi]`
fn bisect<F: FnMut(f64) -> f64>(f: &mut F, mut lo: f64, mut hi: f64) -> f64 {
    let mut flo = f(lo);
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        let fmid = f(mid);
        if fmid == 0.0 {
            return mid;
        }
        if (fmid < 0.0) == (flo < 0.0) {
            lo = mid;
            flo = fmid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Sort and merge values closer than the solver can tell apart
pub fn dedup(values: &mut Vec<f64>) {
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() <= 1e-9 * a.abs().max(b.abs()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9 * e.abs().max(1.0), "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn horner_evaluation() {
        // 1 + 2x + 3x^2
        assert_eq!(horner(&[1.0, 2.0, 3.0], 2.0), 17.0);
        assert_eq!(horner(&[], 2.0), 0.0);
    }

    #[test]
    fn cubic_with_three_roots() {
        // (x - 1)(x - 2)(x - 3)
        let roots = polynomial_roots(&[-6.0, 11.0, -6.0, 1.0]).unwrap();
        assert_close(&roots, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn repeated_root_is_reported_once() {
        // (x - 1)^2 (x + 2)
        let roots = polynomial_roots(&[2.0, -3.0, 0.0, 1.0]).unwrap();
        assert_close(&roots, &[-2.0, 1.0]);
    }

    #[test]
    fn complex_roots_are_detected() {
        // (x - 1)(x^2 + 1)
        assert_eq!(polynomial_roots(&[-1.0, 1.0, -1.0, 1.0]), Err(ComplexRoots));
        assert_eq!(polynomial_roots(&[1.0, 0.0, 1.0]), Err(ComplexRoots));
        // x^4 + 1e6 x^2, a double zero and a complex pair
        assert_eq!(polynomial_roots(&[0.0, 0.0, 1e6, 0.0, 1.0]), Err(ComplexRoots));
    }

    #[test]
    fn quadratics_with_mixed_scales() {
        // x^2 + 1e6 x - 1
        let roots = polynomial_roots(&[-1.0, 1e6, 1.0]).unwrap();
        assert_close(&roots, &[-1_000_000.000_001, 9.999_999_999_99e-7]);
        // x^2 + x - 1e-12
        let roots = polynomial_roots(&[-1e-12, 1.0, 1.0]).unwrap();
        assert_eq!(roots.len(), 2);
        assert!((roots[1] - 1e-12).abs() < 1e-21, "{:?}", roots);
        // m_e x^2 + x - 1
        let roots = polynomial_roots(&[-1.0, 1.0, 9.109_383_701_5e-31]).unwrap();
        assert_eq!(roots.len(), 2);
        assert!((roots[1] - 1.0).abs() < 1e-12, "{:?}", roots);
    }

    #[test]
    fn tiny_roots_are_kept_apart() {
        let roots = polynomial_roots(&[-1e-20, 0.0, 1.0]).unwrap();
        assert_close(&roots, &[-1e-10, 1e-10]);
        assert!(roots[0] < 0.0 && roots[1] > 0.0);
    }

    #[test]
    fn roots_at_zero_are_factored_out() {
        // x^3 - 1e9 x
        let roots = polynomial_roots(&[0.0, -1e9, 0.0, 1.0]).unwrap();
        let r = 1e9f64.sqrt();
        assert_eq!(roots.len(), 3);
        assert_eq!(roots[1], 0.0);
        assert!((roots[0] + r).abs() < 1e-9 && (roots[2] - r).abs() < 1e-9, "{:?}", roots);
        // x^2 (x - 1e-3)(x - 1e3)
        let roots = polynomial_roots(&[0.0, 0.0, 1.0, -1000.001, 1.0]).unwrap();
        assert_eq!(roots.len(), 3);
        assert!((roots[1] - 1e-3).abs() < 1e-15, "{:?}", roots);
        assert!((roots[2] - 1e3).abs() < 1e-9, "{:?}", roots);
    }

    #[test]
    fn quartic() {
        // x^4 - 5x^2 + 4 = (x^2 - 1)(x^2 - 4)
        let roots = polynomial_roots(&[4.0, 0.0, -5.0, 0.0, 1.0]).unwrap();
        assert_close(&roots, &[-2.0, -1.0, 1.0, 2.0]);
    }

    #[test]
    fn trailing_zero_coefficients_lower_the_degree() {
        let roots = polynomial_roots(&[-4.0, 2.0, 0.0, 0.0]).unwrap();
        assert_close(&roots, &[2.0]);
        assert!(polynomial_roots(&[3.0]).unwrap().is_empty());
    }

    #[test]
    fn scan_finds_transcendental_roots() {
        // x e^x = 1 has the omega constant as its only real root
        let roots = scan_roots(|x| x * x.exp() - 1.0).unwrap();
        assert_close(&roots, &[0.567_143_290_409_783_8]);
    }

    #[test]
    fn scan_reaches_large_roots() {
        let roots = scan_roots(|x| x - 1e7 - x.sin()).unwrap();
        assert_eq!(roots.len(), 1, "{:?}", roots);
        assert!((roots[0] - 1e7).abs() < 1.0, "{:?}", roots);
    }

    #[test]
    fn scan_skips_poles() {
        let roots = scan_roots(|x| 1.0 / (x - 0.5)).unwrap();
        assert!(roots.is_empty(), "{:?}", roots);
    }

    #[test]
    fn scan_finds_exact_grid_zero() {
        let roots = scan_roots(|x| x * x * x).unwrap();
        assert_close(&roots, &[0.0]);
    }

    #[test]
    fn scan_rejects_flat_zeros() {
        assert_eq!(scan_roots(|x| x.floor() - 2.0), None);
        assert_eq!(scan_roots(|x| x / x - 1.0), None);
    }

    #[test]
    fn dedup_merges_neighbours() {
        let mut values = vec![2.0, 1.0, 1.0 + 1e-12, -0.5];
        dedup(&mut values);
        assert_eq!(values, vec![-0.5, 1.0, 2.0]);

        let mut values = vec![1e-20, -1e-20, 0.0, 0.0];
        dedup(&mut values);
        assert_eq!(values, vec![-1e-20, 0.0, 1e-20]);
    }
}
