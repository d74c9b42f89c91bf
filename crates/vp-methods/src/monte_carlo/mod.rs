//! Monte Carlo simulation under geometric Brownian motion.
//!
//! # Overview
//!
//! * [`GbmStepper`] — per-step drift/discount schedule sampled from a rate lookup
//! * [`PathArena`] — all paths stored in one flat `paths × (steps + 1)` buffer
//! * [`simulate_european`] — discounted terminal payoff estimator
//! * [`longstaff_schwartz`] — early-exercise estimator by least-squares regression
//!
//! Paths are generated in blocks of [`CHUNK_SIZE`]. Block `c` draws its
//! normals from a Mersenne Twister seeded with `derive_seed(seed, c)`, and
//! block results are reduced in block order, so a given seed produces the
//! same numbers whatever the size of the rayon thread pool.

use rayon::prelude::*;
use tracing::{debug, warn};
use vp_core::{ensure, errors::Result, Rate, Real, Size, Time};
use vp_math::{
    derive_seed, evaluate_quadratic, quadratic_regression, InverseCumulativeNormalRng, Statistics,
};

/// Number of paths per independently seeded block.
pub const CHUNK_SIZE: Size = 1024;

// ─── GbmStepper ───────────────────────────────────────────────────────────────

/// Log-normal stepping scheme with a piecewise-constant rate schedule.
///
/// Step `k` (from `t_k = k·Δt` to `t_{k+1}`) uses the rate `r_k` taken at
/// the elapsed fraction `k/steps` of the horizon:
/// `S ← S·exp((r_k − q − ½σ²)Δt + σ√Δt·Z)`.
#[derive(Debug, Clone)]
pub struct GbmStepper {
    spot: Real,
    vol_sqrt_dt: Real,
    dt: Time,
    drifts: Vec<Real>,
    // cumulative Σ_{i<k} r_i·Δt, length steps + 1
    integrated_rate: Vec<Real>,
}

impl GbmStepper {
    /// Build the schedule for `steps` steps over `[0, maturity]`.
    ///
    /// # Errors
    /// * [`InvalidTemporal`](vp_core::Error::InvalidTemporal) if `maturity ≤ 0`.
    /// * [`InvalidParameters`](vp_core::Error::InvalidParameters) if `steps == 0`.
    pub fn new(
        spot: Real,
        sigma: Real,
        dividend: Rate,
        maturity: Time,
        steps: Size,
        rate_at: impl Fn(Time) -> Rate,
    ) -> Result<Self> {
        ensure!(maturity > 0.0 => InvalidTemporal, "time to maturity must be positive, got {maturity}");
        ensure!(steps > 0 => InvalidParameters, "need at least one time step per path");
        let dt = maturity / steps as Real;
        let rates: Vec<Rate> = (0..steps).map(|k| rate_at(k as Real * dt / maturity)).collect();
        let drifts = rates
            .iter()
            .map(|r| (r - dividend - 0.5 * sigma * sigma) * dt)
            .collect();
        let mut integrated_rate = Vec::with_capacity(steps + 1);
        integrated_rate.push(0.0);
        let mut acc = 0.0;
        for r in &rates {
            acc += r * dt;
            integrated_rate.push(acc);
        }
        Ok(Self {
            spot,
            vol_sqrt_dt: sigma * dt.sqrt(),
            dt,
            drifts,
            integrated_rate,
        })
    }

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.drifts.len()
    }

    /// Step length `Δt`.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Discount factor from step `to` back to step `from` (`from ≤ to`),
    /// `Π_{k=from}^{to−1} exp(−r_k Δt)`.
    #[inline]
    pub fn discount(&self, from: Size, to: Size) -> Real {
        (self.integrated_rate[from] - self.integrated_rate[to]).exp()
    }

    /// Fill `path` (length `steps + 1`) with one realisation.
    pub fn fill_path(&self, path: &mut [Real], rng: &mut InverseCumulativeNormalRng) {
        let mut s = self.spot;
        path[0] = s;
        for (slot, drift) in path[1..].iter_mut().zip(&self.drifts) {
            s *= (drift + self.vol_sqrt_dt * rng.next_real()).exp();
            *slot = s;
        }
    }

    /// Terminal spot of one realisation, without storing the path.
    pub fn terminal(&self, rng: &mut InverseCumulativeNormalRng) -> Real {
        let mut s = self.spot;
        for drift in &self.drifts {
            s *= (drift + self.vol_sqrt_dt * rng.next_real()).exp();
        }
        s
    }
}

// ─── PathArena ────────────────────────────────────────────────────────────────

/// Every simulated path in a single row-major buffer.
#[derive(Debug, Clone)]
pub struct PathArena {
    paths: Size,
    width: Size,
    data: Vec<Real>,
}

impl PathArena {
    /// Simulate `paths` paths with `stepper`, chunk-parallel.
    ///
    /// # Errors
    /// [`InvalidParameters`](vp_core::Error::InvalidParameters) if `paths == 0`.
    pub fn generate(stepper: &GbmStepper, paths: Size, seed: u64) -> Result<Self> {
        ensure!(paths > 0 => InvalidParameters, "need at least one simulation path");
        let width = stepper.steps() + 1;
        let mut data = vec![0.0; paths * width];
        data.par_chunks_mut(CHUNK_SIZE * width)
            .enumerate()
            .for_each(|(chunk, block)| {
                let mut rng = InverseCumulativeNormalRng::new(derive_seed(seed, chunk as u64));
                for path in block.chunks_mut(width) {
                    stepper.fill_path(path, &mut rng);
                }
            });
        Ok(Self { paths, width, data })
    }

    /// Number of paths.
    pub fn paths(&self) -> Size {
        self.paths
    }

    /// Number of time steps per path.
    pub fn steps(&self) -> Size {
        self.width - 1
    }

    /// Path `i` as a slice of `steps + 1` spots.
    pub fn path(&self, i: Size) -> &[Real] {
        &self.data[i * self.width..(i + 1) * self.width]
    }

    /// Spot of path `i` at step `t`.
    #[inline]
    pub fn spot(&self, i: Size, t: Size) -> Real {
        self.data[i * self.width + t]
    }
}

// ─── Estimators ───────────────────────────────────────────────────────────────

/// European estimator: statistics of `payoff(S_T)` discounted along the
/// rate schedule, over `paths` paths.
///
/// # Errors
/// [`InvalidParameters`](vp_core::Error::InvalidParameters) if `paths == 0`.
pub fn simulate_european(
    stepper: &GbmStepper,
    payoff: impl Fn(Real) -> Real + Sync,
    paths: Size,
    seed: u64,
) -> Result<Statistics> {
    ensure!(paths > 0 => InvalidParameters, "need at least one simulation path");
    let discount = stepper.discount(0, stepper.steps());
    let chunks = paths.div_ceil(CHUNK_SIZE);
    debug!(paths, steps = stepper.steps(), chunks, "european simulation");

    let per_chunk: Vec<Statistics> = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = InverseCumulativeNormalRng::new(derive_seed(seed, chunk as u64));
            let n = CHUNK_SIZE.min(paths - chunk * CHUNK_SIZE);
            let mut stats = Statistics::new();
            for _ in 0..n {
                stats.add(payoff(stepper.terminal(&mut rng)) * discount);
            }
            stats
        })
        .collect();

    let mut total = Statistics::new();
    for s in &per_chunk {
        total.merge(s);
    }
    Ok(total)
}

/// Longstaff–Schwartz estimator over stored paths.
///
/// Working backwards from the last step but one down to step 1, the
/// in-the-money paths that have not yet exercised are regressed on the
/// basis `{1, x, x²}`; those whose intrinsic value beats the fitted
/// continuation exercise at that step. A step whose normal matrix is
/// singular is skipped. Returns the statistics of each path's cash flow
/// discounted from its exercise step to time zero.
pub fn longstaff_schwartz(
    arena: &PathArena,
    stepper: &GbmStepper,
    payoff: impl Fn(Real) -> Real,
) -> Statistics {
    let n = arena.paths();
    let steps = arena.steps();
    debug!(paths = n, steps, "longstaff-schwartz");

    let mut cash_flow: Vec<Real> = (0..n).map(|i| payoff(arena.spot(i, steps))).collect();
    let mut exercise_step = vec![steps; n];
    let mut itm: Vec<Size> = Vec::with_capacity(n);

    for t in (1..steps).rev() {
        itm.clear();
        itm.extend((0..n).filter(|&i| exercise_step[i] == steps && payoff(arena.spot(i, t)) > 0.0));
        if itm.is_empty() {
            continue;
        }

        let disc = stepper.discount(t, steps);
        let beta = match quadratic_regression(
            itm.iter().map(|&i| (arena.spot(i, t), cash_flow[i] * disc)),
        ) {
            Some(beta) => beta,
            None => {
                warn!(step = t, candidates = itm.len(), "degenerate regression, step skipped");
                continue;
            }
        };

        for &i in &itm {
            let s = arena.spot(i, t);
            let intrinsic = payoff(s);
            if intrinsic > evaluate_quadratic(&beta, s) {
                cash_flow[i] = intrinsic;
                exercise_step[i] = t;
            }
        }
    }

    let mut stats = Statistics::new();
    for (cf, &t) in cash_flow.iter().zip(&exercise_step) {
        stats.add(cf * stepper.discount(0, t));
    }
    stats
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use vp_core::Error;
    use vp_math::normal_cdf;

    fn bs_call_reference() -> Real {
        let d1: Real = (0.05 + 0.02) / 0.2;
        let d2 = d1 - 0.2;
        100.0 * normal_cdf(d1) - 100.0 * (-0.05_f64).exp() * normal_cdf(d2)
    }

    fn stepper(steps: Size) -> GbmStepper {
        GbmStepper::new(100.0, 0.2, 0.0, 1.0, steps, |_| 0.05).unwrap()
    }

    #[test]
    fn discount_schedule() {
        let st = GbmStepper::new(100.0, 0.2, 0.0, 1.0, 4, |x| 0.01 + 0.04 * x).unwrap();
        // rates at 0, 0.25, 0.5, 0.75
        let expected = (-(0.01 + 0.02 + 0.03 + 0.04) * 0.25_f64).exp();
        assert_abs_diff_eq!(st.discount(0, 4), expected, epsilon = 1e-15);
        assert_abs_diff_eq!(st.discount(3, 4), (-0.04 * 0.25_f64).exp(), epsilon = 1e-15);
        assert_eq!(st.discount(2, 2), 1.0);
    }

    #[test]
    fn european_call_converges_to_bs() {
        let stats = simulate_european(&stepper(50), |s| (s - 100.0).max(0.0), 50_000, 42).unwrap();
        let mc = stats.mean().unwrap();
        let bs = bs_call_reference();
        assert!((mc - bs).abs() < 0.3, "MC = {mc:.4}, BS = {bs:.4}");
        assert!(stats.error_estimate().unwrap() < 0.1);
    }

    #[test]
    fn same_seed_is_bit_identical() {
        let st = stepper(20);
        let a = simulate_european(&st, |s| (s - 100.0).max(0.0), 5_000, 7).unwrap();
        let b = simulate_european(&st, |s| (s - 100.0).max(0.0), 5_000, 7).unwrap();
        assert_eq!(a.mean(), b.mean());
        let c = simulate_european(&st, |s| (s - 100.0).max(0.0), 5_000, 8).unwrap();
        assert_ne!(a.mean(), c.mean());
    }

    #[test]
    fn arena_is_independent_of_thread_count() {
        let st = stepper(10);
        let wide = PathArena::generate(&st, 3 * CHUNK_SIZE + 17, 42).unwrap();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let narrow = pool.install(|| PathArena::generate(&st, 3 * CHUNK_SIZE + 17, 42).unwrap());
        assert_eq!(wide.data, narrow.data);
        assert_eq!(wide.path(5)[0], 100.0);
        assert_eq!(wide.path(5).len(), 11);
    }

    #[test]
    fn arena_paths_are_positive() {
        let arena = PathArena::generate(&stepper(25), 100, 1).unwrap();
        for i in 0..arena.paths() {
            assert!(arena.path(i).iter().all(|&s| s > 0.0));
        }
    }

    #[test]
    fn american_put_exceeds_european_put() {
        let st = stepper(50);
        let put = |s: Real| (100.0 - s).max(0.0);
        let arena = PathArena::generate(&st, 20_000, 42).unwrap();
        let am = longstaff_schwartz(&arena, &st, put).mean().unwrap();
        let eu = simulate_european(&st, put, 20_000, 42).unwrap().mean().unwrap();
        // American put (S=K=100, r=5%, σ=20%, T=1) ≈ 6.09, European ≈ 5.57.
        // Only paths still holding their terminal cash flow are regressed, so
        // the estimate sits above the American value.
        assert!(am > eu, "American {am:.4} <= European {eu:.4}");
        assert!(am > 6.0 && am < 6.9, "American put = {am:.4}");
        // exercising early never yields more than the strike
        assert!(am < 100.0);
    }

    #[test]
    fn single_step_has_no_exercise_decision() {
        let st = stepper(1);
        let put = |s: Real| (100.0 - s).max(0.0);
        let arena = PathArena::generate(&st, 1_000, 3).unwrap();
        let am = longstaff_schwartz(&arena, &st, put).mean().unwrap();
        let direct: Real = (0..arena.paths())
            .map(|i| put(arena.spot(i, 1)) * (-0.05_f64).exp())
            .sum::<Real>()
            / arena.paths() as Real;
        assert_abs_diff_eq!(am, direct, epsilon = 1e-12);
    }

    #[test]
    fn rejects_empty_simulation() {
        assert!(matches!(PathArena::generate(&stepper(5), 0, 1), Err(Error::InvalidParameters(_))));
        assert!(matches!(
            GbmStepper::new(100.0, 0.2, 0.0, 1.0, 0, |_| 0.05),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            GbmStepper::new(100.0, 0.2, 0.0, -0.5, 10, |_| 0.05),
            Err(Error::InvalidTemporal(_))
        ));
    }
}
