//! Adaptive Gauss–Kronrod quadrature.
//!
//! Each interval is estimated with the 21-point Kronrod rule and its embedded
//! 10-point Gauss rule; `|K21 - G10|` is the local error. The interval with the
//! largest error is bisected until the total error meets
//! `max(epsabs, epsrel * |result|)` or the subdivision limit is reached.
//!
//! Reaching the limit is not an error: the best estimate is returned and the
//! event is logged at debug level. A non-finite integrand value is an error.
//!
//! Infinite ranges are mapped onto `(0, 1]` with `x = a + (1 - t) / t`. The
//! rule never evaluates interval endpoints, so `t = 0` is never touched.
//!
//! Sine-weighted integrals `∫ f(x) sin(ωx) dx` are summed over the half
//! periods of `sin(ωx)`. On `[a, ∞)` the partial sums are extrapolated with
//! Wynn's epsilon algorithm.

use std::f64::consts::PI;

use log::debug;

use crate::error::ToolkitError;

/// Kronrod abscissae (positive half, descending). Odd indices are Gauss nodes.
const XGK: [f64; 11] = [
    0.995_657_163_025_808_080_735_527_280_689_003,
    0.973_906_528_517_171_720_077_964_012_084_452,
    0.930_157_491_355_708_226_001_207_180_059_508,
    0.865_063_366_688_984_510_732_096_688_423_493,
    0.780_817_726_586_416_897_063_717_578_345_042,
    0.679_409_568_299_024_406_234_327_365_114_874,
    0.562_757_134_668_604_683_339_000_099_272_694,
    0.433_395_394_129_247_190_799_265_943_165_784,
    0.294_392_862_701_460_198_131_126_603_103_866,
    0.148_874_338_981_631_210_884_826_001_129_720,
    0.0,
];

const WGK: [f64; 11] = [
    0.011_694_638_867_371_874_278_064_396_062_192,
    0.032_558_162_307_964_727_478_818_972_459_390,
    0.054_755_896_574_351_996_031_381_300_244_580,
    0.075_039_674_810_919_952_767_043_140_916_190,
    0.093_125_454_583_697_605_535_065_465_083_366,
    0.109_387_158_802_297_641_899_210_590_325_805,
    0.123_491_976_262_065_851_077_208_292_238_457,
    0.134_709_217_311_473_325_928_054_001_771_707,
    0.142_775_938_577_060_080_797_094_273_138_717,
    0.147_739_104_901_338_491_374_841_515_972_068,
    0.149_445_554_002_916_905_664_936_468_389_821,
];

/// Gauss weights for `XGK[1], XGK[3], ..., XGK[9]`.
const WG: [f64; 5] = [
    0.066_671_344_308_688_137_593_568_809_893_332,
    0.149_451_349_150_580_593_145_776_339_657_697,
    0.219_086_362_515_982_043_995_534_934_228_163,
    0.269_266_719_309_996_355_091_226_921_569_469,
    0.295_524_224_714_752_870_173_892_994_651_338,
];

/// Half periods of `sin(ωx)` summed before giving up on `[a, ∞)`.
const MAX_HALF_PERIODS: usize = 5000;
/// Trailing partial sums fed to the epsilon extrapolation.
const WYNN_DEPTH: usize = 50;

/// Quadrature tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    pub epsabs: f64,
    pub epsrel: f64,
    /// Maximum number of subintervals.
    pub limit: usize,
}

impl Default for Quadrature {
    fn default() -> Self {
        Self {
            epsabs: 0.0,
            epsrel: 1e-4,
            limit: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

impl Quadrature {
    pub fn new(epsabs: f64, epsrel: f64, limit: usize) -> Self {
        Self {
            epsabs,
            epsrel,
            limit: limit.max(1),
        }
    }

    /// Integrate `f` over the finite interval `[a, b]`.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> Result<f64, ToolkitError>
    where
        F: Fn(f64) -> f64,
    {
        if !(a.is_finite() && b.is_finite()) {
            return Err(ToolkitError::invalid(format!(
                "integration bounds must be finite (a={a}, b={b})"
            )));
        }
        if a == b {
            return Ok(0.0);
        }

        let first = gauss_kronrod(&f, a, b)?;
        let mut segments = vec![first];
        let mut total = first.value;
        let mut total_err = first.error;

        while total_err > self.epsabs.max(self.epsrel * total.abs()) {
            if segments.len() >= self.limit {
                debug!(
                    "quadrature hit subdivision limit {} on [{a}, {b}]: result={total:e} err={total_err:e}",
                    self.limit
                );
                break;
            }

            let worst = segments
                .iter()
                .enumerate()
                .max_by(|x, y| x.1.error.total_cmp(&y.1.error))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let seg = segments.swap_remove(worst);

            let mid = 0.5 * (seg.a + seg.b);
            if mid <= seg.a.min(seg.b) || mid >= seg.a.max(seg.b) {
                // Interval no longer representable; accept what we have.
                debug!("quadrature interval [{}, {}] cannot be bisected further", seg.a, seg.b);
                segments.push(seg);
                break;
            }
            let left = gauss_kronrod(&f, seg.a, mid)?;
            let right = gauss_kronrod(&f, mid, seg.b)?;

            total += left.value + right.value - seg.value;
            total_err += left.error + right.error - seg.error;
            segments.push(left);
            segments.push(right);
        }

        // Re-sum to avoid drift from the incremental updates.
        Ok(segments.iter().map(|s| s.value).sum())
    }

    /// Integrate `f` over `[a, ∞)`.
    pub fn integrate_upper<F>(&self, f: F, a: f64) -> Result<f64, ToolkitError>
    where
        F: Fn(f64) -> f64,
    {
        self.integrate(
            |t| {
                let x = a + (1.0 - t) / t;
                f(x) / (t * t)
            },
            0.0,
            1.0,
        )
    }

    /// Integrate `f` over the whole real line.
    pub fn integrate_infinite<F>(&self, f: F) -> Result<f64, ToolkitError>
    where
        F: Fn(f64) -> f64,
    {
        self.integrate(
            |t| {
                let x = (1.0 - t) / t;
                (f(x) + f(-x)) / (t * t)
            },
            0.0,
            1.0,
        )
    }

    /// `∫_a^b f(x) sin(ωx) dx`, split at the zeros of `sin(ωx)`.
    pub fn integrate_sine<F>(&self, f: F, omega: f64, a: f64, b: f64) -> Result<f64, ToolkitError>
    where
        F: Fn(f64) -> f64,
    {
        check_frequency(omega)?;
        if !(a.is_finite() && b.is_finite()) {
            return Err(ToolkitError::invalid(format!(
                "integration bounds must be finite (a={a}, b={b})"
            )));
        }
        if a > b {
            return Ok(-self.integrate_sine(f, omega, b, a)?);
        }
        let half = PI / omega;
        let integrand = |x: f64| f(x) * (omega * x).sin();

        let mut total = 0.0;
        let mut lo = a;
        while lo < b {
            let hi = next_zero(lo, half).min(b);
            total += self.integrate(&integrand, lo, hi)?;
            lo = hi;
        }
        Ok(total)
    }

    /// `∫_a^∞ f(x) sin(ωx) dx`.
    ///
    /// Stops once a half period contributes less than the tolerance or the
    /// extrapolated sum settles.
    pub fn integrate_sine_upper<F>(&self, f: F, omega: f64, a: f64) -> Result<f64, ToolkitError>
    where
        F: Fn(f64) -> f64,
    {
        check_frequency(omega)?;
        if !a.is_finite() {
            return Err(ToolkitError::invalid(format!("lower bound must be finite (got {a})")));
        }
        let half = PI / omega;
        let integrand = |x: f64| f(x) * (omega * x).sin();

        let mut sums = Vec::new();
        let mut sum = 0.0;
        let mut previous = f64::NAN;
        let mut lo = a;
        for n in 0..MAX_HALF_PERIODS {
            let hi = next_zero(lo, half);
            let term = self.integrate(&integrand, lo, hi)?;
            sum += term;
            sums.push(sum);
            lo = hi;

            let estimate = wynn_epsilon(&sums[sums.len().saturating_sub(WYNN_DEPTH)..]);
            let tol = self.epsabs.max(self.epsrel * estimate.abs());
            if n >= 2 && term.abs() <= tol {
                return Ok(sum);
            }
            if n >= 4 && (estimate - previous).abs() <= tol {
                return Ok(estimate);
            }
            previous = estimate;
        }
        debug!("sine quadrature did not settle after {MAX_HALF_PERIODS} half periods (omega={omega})");
        Ok(previous)
    }
}

fn check_frequency(omega: f64) -> Result<(), ToolkitError> {
    if omega.is_finite() && omega > 0.0 {
        Ok(())
    } else {
        Err(ToolkitError::invalid(format!(
            "frequency must be finite and positive (got {omega})"
        )))
    }
}

/// First multiple of `half` strictly above `x`.
fn next_zero(x: f64, half: f64) -> f64 {
    let zero = ((x / half).floor() + 1.0) * half;
    if zero > x { zero } else { zero + half }
}

/// Limit of a sequence of partial sums by Wynn's epsilon algorithm.
///
/// Returns the last entry of the highest even column that stays finite.
fn wynn_epsilon(sums: &[f64]) -> f64 {
    let Some(&last) = sums.last() else {
        return 0.0;
    };
    let mut best = last;
    let mut prev = vec![0.0; sums.len() + 1];
    let mut cur = sums.to_vec();
    let mut column = 0;
    while cur.len() > 1 {
        let mut next = Vec::with_capacity(cur.len() - 1);
        for i in 0..cur.len() - 1 {
            let diff = cur[i + 1] - cur[i];
            if diff == 0.0 {
                return if column % 2 == 0 { cur[i + 1] } else { best };
            }
            next.push(prev[i + 1] + 1.0 / diff);
        }
        if next.iter().any(|v| !v.is_finite()) {
            break;
        }
        column += 1;
        if column % 2 == 0 {
            best = next[next.len() - 1];
        }
        prev = cur;
        cur = next;
    }
    best
}

fn gauss_kronrod<F>(f: &F, a: f64, b: f64) -> Result<Segment, ToolkitError>
where
    F: Fn(f64) -> f64,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let fc = f(center);
    let mut kronrod = fc * WGK[10];
    let mut gauss = 0.0;
    let mut finite = fc.is_finite();

    for (j, (&x, &wk)) in XGK.iter().zip(WGK.iter()).take(10).enumerate() {
        let dx = half * x;
        let f1 = f(center - dx);
        let f2 = f(center + dx);
        finite &= f1.is_finite() && f2.is_finite();
        kronrod += wk * (f1 + f2);
        if j % 2 == 1 {
            gauss += WG[j / 2] * (f1 + f2);
        }
    }

    if !finite {
        return Err(ToolkitError::Integration(format!(
            "non-finite integrand on [{a}, {b}]"
        )));
    }

    Ok(Segment {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    })
}
