//! Monte Carlo batch driver: many independent scenes under a shared
//! configuration, rayon-parallel, with NaN-safe aggregate statistics and a
//! density-sweep linear fit.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::GlideError;
use crate::scene::{Scene, SimConfig};

/// Scalar summary of one simulated flight.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrialSummary {
    /// Mean of the trial's free-path segments (km). NaN when the flight
    /// crossed no thermal at all; aggregates filter non-finite values, so
    /// the convention never raises a division fault.
    pub mean_free_path: f64,
    /// Mechanical energy gained up to ground contact, or to the end of the
    /// flight when the glider never touched down (J)
    pub energy_gained: f64,
    /// Total simulated flight time (s)
    pub flight_time: f64,
    /// Straight-line distance flown from the origin (km)
    pub flight_distance: f64,
    /// True when the scene hit its iteration cap
    pub truncated: bool,
}

/// Mean/std/min/max over the finite values of one summary field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Number of finite samples the statistics are built from
    pub count: usize,
}

/// Aggregated results of one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResults {
    pub trials: Vec<TrialSummary>,
    pub mean_free_path: SummaryStatistics,
    pub energy_gained: SummaryStatistics,
    pub flight_time: SummaryStatistics,
    pub flight_distance: SummaryStatistics,
    /// Trials whose scene failed to run; skipped in all aggregates
    pub failed_trials: usize,
    /// Trials cut short by the iteration cap; flagged, not failed
    pub truncated_trials: usize,
}

/// One point of a density sweep.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DensityPoint {
    /// Thermal density (per km²)
    pub density: f64,
    /// Batch mean of per-trial mean free paths (km)
    pub mean_free_path: f64,
    /// Batch mean of flight times (s)
    pub flight_time: f64,
}

fn summarize(values: &[f64]) -> SummaryStatistics {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return SummaryStatistics {
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            count: 0,
        };
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let variance = if finite.len() > 1 {
        finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    SummaryStatistics {
        mean,
        std: variance.sqrt(),
        min,
        max,
        count: finite.len(),
    }
}

fn run_one_trial(config: &SimConfig, trial: usize) -> Result<TrialSummary, GlideError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(trial as u64)),
        None => StdRng::from_entropy(),
    };
    let mut scene = Scene::from_config(config, &mut rng)?;
    let outcome = scene.run()?;
    let mean_free_path = if outcome.free_paths.is_empty() {
        f64::NAN
    } else {
        outcome.free_paths.iter().sum::<f64>() / outcome.free_paths.len() as f64
    };
    Ok(TrialSummary {
        mean_free_path,
        energy_gained: scene.energy_gained(),
        flight_time: scene.time,
        flight_distance: scene.flight_distance(),
        truncated: outcome.truncated,
    })
}

/// Run `num_trials` independent scenes with identical configuration, each
/// with a freshly drawn field, and aggregate the resulting statistics.
///
/// Trials are fully independent and dispatched to the rayon pool; the
/// reduction is commutative, so ordering only affects floating-point
/// summation order. A trial whose scene errors is counted failed and
/// skipped; truncated trials stay in the aggregates but are flagged.
pub fn run_trials(config: &SimConfig, num_trials: usize) -> Result<BatchResults, GlideError> {
    if num_trials == 0 {
        return Err(GlideError::EmptyBatch);
    }
    config.validate()?;

    let results: Vec<Option<TrialSummary>> = (0..num_trials)
        .into_par_iter()
        .map(|trial| run_one_trial(config, trial).ok())
        .collect();

    let trials: Vec<TrialSummary> = results.iter().filter_map(|r| *r).collect();
    let failed_trials = num_trials - trials.len();
    let truncated_trials = trials.iter().filter(|t| t.truncated).count();
    log::info!(
        "batch complete: {} trials, {} failed, {} truncated",
        num_trials,
        failed_trials,
        truncated_trials
    );

    let column = |f: fn(&TrialSummary) -> f64| -> Vec<f64> { trials.iter().map(f).collect() };
    Ok(BatchResults {
        mean_free_path: summarize(&column(|t| t.mean_free_path)),
        energy_gained: summarize(&column(|t| t.energy_gained)),
        flight_time: summarize(&column(|t| t.flight_time)),
        flight_distance: summarize(&column(|t| t.flight_distance)),
        trials,
        failed_trials,
        truncated_trials,
    })
}

/// Run one batch per density and collect the aggregate of interest at each
/// point, for fitting aggregate-vs-density.
pub fn run_density_sweep(
    base: &SimConfig,
    densities: &[f64],
    num_trials: usize,
) -> Result<Vec<DensityPoint>, GlideError> {
    densities
        .iter()
        .map(|&density| {
            let config = SimConfig {
                density,
                ..base.clone()
            };
            let batch = run_trials(&config, num_trials)?;
            Ok(DensityPoint {
                density,
                mean_free_path: batch.mean_free_path.mean,
                flight_time: batch.flight_time.mean,
            })
        })
        .collect()
}

/// Least-squares linear best fit of y against x.
///
/// Returns `(slope, intercept)`, or `None` when fewer than two finite
/// sample pairs remain or all x coincide. The slope of mean free path
/// against density is the characteristic rate constant reported by
/// density sweeps.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let sxx = pairs.iter().map(|(x, _)| (x - mean_x).powi(2)).sum::<f64>();
    if sxx == 0.0 {
        return None;
    }
    let sxy = pairs
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>();
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glider::Strategy;

    fn seeded_config() -> SimConfig {
        SimConfig {
            seed: Some(1234),
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_zero_trials_is_an_error() {
        assert!(matches!(
            run_trials(&seeded_config(), 0),
            Err(GlideError::EmptyBatch)
        ));
    }

    #[test]
    fn test_zero_density_batch_tolerates_empty_free_paths() {
        let config = SimConfig {
            density: 0.0,
            ..seeded_config()
        };
        let batch = run_trials(&config, 8).unwrap();
        assert_eq!(batch.failed_trials, 0);
        // No crossings anywhere: the NaN convention propagates into an
        // empty aggregate instead of a division fault.
        assert!(batch.trials.iter().all(|t| t.mean_free_path.is_nan()));
        assert_eq!(batch.mean_free_path.count, 0);
        assert!(batch.mean_free_path.mean.is_nan());
        // The other aggregates stay well defined.
        assert!(batch.flight_time.mean > 0.0);
        assert!(batch.flight_distance.mean > 0.0);
    }

    #[test]
    fn test_batch_mean_free_path_in_plausible_range() {
        // 100 thermals of radius 0.1 on 10x10 km: the geometric mean free
        // path 1/(2 R rho) is 5 km; the batch estimate should land within
        // an order of magnitude of it.
        let config = SimConfig {
            radius: 0.1,
            density: 1.0,
            altitude: 1000.0,
            increment: 10.0,
            ..seeded_config()
        };
        let batch = run_trials(&config, 64).unwrap();
        assert!(batch.mean_free_path.count > 0);
        assert!(
            batch.mean_free_path.mean > 0.1 && batch.mean_free_path.mean < 20.0,
            "mean free path = {}",
            batch.mean_free_path.mean
        );
        assert!(batch.mean_free_path.std.is_finite());
    }

    #[test]
    fn test_seeking_strategy_runs_to_completion() {
        let config = SimConfig {
            strategy: Strategy::Seeking,
            density: 1.0,
            radius: 0.2,
            ..seeded_config()
        };
        let batch = run_trials(&config, 16).unwrap();
        assert_eq!(batch.failed_trials, 0);
        assert!(batch.flight_time.mean > 0.0);
    }

    #[test]
    fn test_seeded_batches_are_reproducible() {
        let config = seeded_config();
        let a = run_trials(&config, 8).unwrap();
        let b = run_trials(&config, 8).unwrap();
        assert_eq!(a.flight_time.mean, b.flight_time.mean);
        assert_eq!(a.flight_distance.mean, b.flight_distance.mean);
    }

    #[test]
    fn test_linear_fit_recovers_exact_line() {
        let xs = [0.2, 0.4, 0.6, 0.8];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x - 1.0).collect();
        let (slope, intercept) = linear_fit(&xs, &ys).unwrap();
        assert!((slope - 3.0).abs() < 1e-12);
        assert!((intercept + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_fit_degenerate_inputs() {
        assert!(linear_fit(&[1.0], &[2.0]).is_none());
        assert!(linear_fit(&[1.0, 1.0], &[2.0, 3.0]).is_none());
        // NaN pairs are filtered before vetoing the fit.
        let (slope, _) = linear_fit(&[0.0, f64::NAN, 1.0], &[0.0, f64::NAN, 2.0]).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_density_sweep_produces_one_point_per_density() {
        let densities = [0.2, 0.4];
        let points = run_density_sweep(&seeded_config(), &densities, 4).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].density, 0.2);
        assert!(points.iter().all(|p| p.flight_time.is_finite()));
    }
}
