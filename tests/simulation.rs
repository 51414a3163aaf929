//! End-to-end library tests: full scenes and batches driven through the
//! public API.

use rand::rngs::StdRng;
use rand::SeedableRng;

use glide_engine::{run_trials, Point, Scene, SimConfig, Strategy, SummaryStatistics, Weather};

fn reference_config() -> SimConfig {
    SimConfig {
        dim_x: 10.0,
        dim_y: 10.0,
        radius: 0.1,
        density: 1.0,
        altitude: 1000.0,
        ldr: 30.0,
        speed: 98.0,
        increment: 10.0,
        seed: Some(99),
        ..SimConfig::default()
    }
}

#[test]
fn test_full_scene_histories_are_consistent() {
    let config = reference_config();
    let mut rng = StdRng::seed_from_u64(99);
    let mut scene = Scene::from_config(&config, &mut rng).unwrap();
    let outcome = scene.run().unwrap();

    // Every step logged exactly one energy sample, plus the initial
    // history snapshot.
    assert_eq!(scene.glider.history.len(), scene.energy_log.len() + 1);
    assert_eq!(scene.crossings.len(), scene.energy_log.len());
    assert!(!outcome.truncated);

    // Time advanced monotonically.
    for pair in scene.energy_log.windows(2) {
        assert!(pair[1].time > pair[0].time);
    }

    // The energy invariant holds at every logged instant.
    for sample in &scene.energy_log {
        assert!((sample.mechanical - (sample.potential + sample.kinetic)).abs() < 1e-6);
    }

    // Free paths are non-negative and no longer than the field diagonal.
    let diagonal = (200.0_f64).sqrt();
    assert!(outcome
        .free_paths
        .iter()
        .all(|d| *d >= 0.0 && *d <= diagonal));
}

#[test]
fn test_glider_terminates_outside_both_bounds() {
    let config = reference_config();
    let mut rng = StdRng::seed_from_u64(5);
    let mut scene = Scene::from_config(&config, &mut rng).unwrap();
    scene.run().unwrap();
    // OR in-scene semantics: the loop only ends once both coordinates are
    // out of bounds.
    assert!(scene.glider.position.x >= scene.field.dim_x);
    assert!(scene.glider.position.y >= scene.field.dim_y);
}

#[test]
fn test_larger_batches_stabilize_the_estimate() {
    // Law-of-large-numbers check: the uncertainty of the estimated mean
    // free path shrinks as trials accumulate. Both batches draw from the
    // same per-trial seed sequence, so the comparison is deterministic.
    let config = reference_config();
    let small = run_trials(&config, 8).unwrap();
    let large = run_trials(&config, 128).unwrap();
    assert!(small.mean_free_path.count > 1);
    assert!(large.mean_free_path.count > small.mean_free_path.count);
    assert!(large.mean_free_path.mean.is_finite());
    // Standard error of the mean: the per-trial spread (std) estimates
    // the same population quantity in both batches, so sixteen times the
    // trials must cut the standard error well below the small batch's.
    let sem = |stats: &SummaryStatistics| stats.std / (stats.count as f64).sqrt();
    let sem_small = sem(&small.mean_free_path);
    let sem_large = sem(&large.mean_free_path);
    assert!(
        sem_large < sem_small,
        "standard error did not shrink with n: {sem_large} >= {sem_small}"
    );
}

#[test]
fn test_weather_driven_batch_runs() {
    let config = SimConfig {
        weather: Some(Weather::new(1028.0, 35.0, 16.0, 30.0)),
        strategy: Strategy::Seeking,
        ..reference_config()
    };
    let batch = run_trials(&config, 16).unwrap();
    assert_eq!(batch.failed_trials, 0);
    assert!(batch.flight_distance.mean > 0.0);
}

#[test]
fn test_history_snapshots_are_independent_values() {
    let config = SimConfig {
        density: 0.0,
        ..reference_config()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let mut scene = Scene::from_config(&config, &mut rng).unwrap();
    scene.run().unwrap();
    // The first logged snapshot still holds the origin even though the
    // glider has long since moved on.
    assert_eq!(scene.glider.history[0].0, Point::new(0.0, 0.0));
    assert_ne!(scene.glider.position, Point::new(0.0, 0.0));
}
