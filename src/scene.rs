//! Time-stepping orchestrator combining one field and one glider.
//!
//! Each step the scene asks the glider once whether it sits inside a
//! thermal and dispatches to one of two regimes: a full-increment glide
//! update outside lift, or a finer sub-increment climb update inside.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_STEPS, G_ACCEL_MPS2, IN_LIFT_SUBSTEPS, KMH_TO_MPS, NUMERICAL_TOLERANCE,
};
use crate::convection::Weather;
use crate::error::GlideError;
use crate::field::Field;
use crate::geometry::{distance, intersect, Point};
use crate::glider::{Glider, LiftHit, Strategy};

/// One logged energy sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergySample {
    /// Elapsed simulated time (s)
    pub time: f64,
    /// Potential energy (J)
    pub potential: f64,
    /// Kinetic energy (J)
    pub kinetic: f64,
    /// Mechanical energy (J)
    pub mechanical: f64,
}

/// Shared configuration for one simulated flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Domain width along x (km)
    pub dim_x: f64,
    /// Domain width along y (km)
    pub dim_y: f64,
    /// Thermal radius (km)
    pub radius: f64,
    /// Lift ceiling height (m)
    pub height: f64,
    /// Thermal density (per km²)
    pub density: f64,
    /// Lift-to-drag ratio
    pub ldr: f64,
    /// Cruise (best-glide) speed (km/h)
    pub speed: f64,
    /// Initial altitude (m)
    pub altitude: f64,
    /// Nominal time increment per step (s)
    pub increment: f64,
    /// Uniform thermal vertical climb rate (m/s), used when no weather
    /// model is attached
    pub climb_rate: f64,
    /// Steering strategy
    pub strategy: Strategy,
    /// Optional convective weather model; when present, each thermal gets
    /// its own sampled climb rate instead of the uniform one
    pub weather: Option<Weather>,
    /// Iteration cap per scene; exceeding it truncates the trial
    pub max_steps: usize,
    /// Optional RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dim_x: 10.0,
            dim_y: 10.0,
            radius: 0.3,
            height: 1600.0,
            density: 0.5,
            ldr: 30.0,
            speed: 98.0,
            altitude: 1250.0,
            increment: 10.0,
            climb_rate: 2.0,
            strategy: Strategy::Naive,
            weather: None,
            max_steps: DEFAULT_MAX_STEPS,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Validate the configuration before any scene is built from it.
    pub fn validate(&self) -> Result<(), GlideError> {
        if self.dim_x <= 0.0 || self.dim_y <= 0.0 {
            return Err("field dimensions must be positive".into());
        }
        if self.radius <= 0.0 {
            return Err("thermal radius must be positive".into());
        }
        if self.density < 0.0 {
            return Err("thermal density must be non-negative".into());
        }
        if self.ldr <= 0.0 {
            return Err("lift-to-drag ratio must be positive".into());
        }
        if self.speed <= 0.0 {
            return Err("speed must be positive".into());
        }
        if self.increment <= 0.0 {
            return Err("time increment must be positive".into());
        }
        if self.max_steps == 0 {
            return Err("iteration cap must be at least 1".into());
        }
        Ok(())
    }
}

/// Result of one completed scene run.
#[derive(Debug, Clone)]
pub struct SceneOutcome {
    /// Free-path segments: origin to the first distinct lift crossing, then
    /// between successive distinct crossings (km)
    pub free_paths: Vec<f64>,
    /// True when the iteration cap was hit before the in-scene predicate
    /// turned false
    pub truncated: bool,
}

/// A single simulated flight: one field, one glider, one clock.
#[derive(Debug, Clone)]
pub struct Scene {
    pub field: Field,
    pub glider: Glider,
    /// Elapsed simulated time (s)
    pub time: f64,
    /// Nominal time increment per step (s)
    pub increment: f64,
    /// Uniform thermal climb rate (m/s)
    pub climb_rate: f64,
    /// Per-thermal climb rates sampled from the weather model, parallel to
    /// `field.lifts`
    thermal_climb_rates: Option<Vec<f64>>,
    /// Lift entered during the previous glide step. The snapped entry
    /// point sits exactly on the circle, where the strict distance test is
    /// numerically ambiguous, so the entry is carried into the next step
    /// explicitly.
    pending_lift: Option<LiftHit>,
    /// Append-only (time, energies) log, one entry per step
    pub energy_log: Vec<EnergySample>,
    /// Per-step lift-detection log: the crossed thermal center or absence
    pub crossings: Vec<Option<Point>>,
    /// Iteration cap
    pub max_steps: usize,
    /// Set when the cap fired
    pub truncated: bool,
}

impl Scene {
    /// Build a scene from shared configuration, drawing a fresh field from
    /// `rng`. When a weather model is attached, one climb rate per thermal
    /// is sampled here as well; the field itself stays immutable.
    pub fn from_config<R: Rng>(config: &SimConfig, rng: &mut R) -> Result<Self, GlideError> {
        config.validate()?;
        let field = Field::generate(
            config.dim_x,
            config.dim_y,
            config.radius,
            config.height,
            config.density,
            rng,
        );
        let thermal_climb_rates = match &config.weather {
            Some(weather) => {
                let study_alt = weather.study_altitude_m();
                let rates = field
                    .lifts
                    .iter()
                    .map(|_| weather.sample_climb_rate(study_alt, rng))
                    .collect::<Result<Vec<_>, _>>()?;
                Some(rates)
            }
            None => None,
        };
        let glider = Glider::new(config.ldr, config.speed, config.altitude, config.strategy);
        Ok(Self {
            field,
            glider,
            time: 0.0,
            increment: config.increment,
            climb_rate: config.climb_rate,
            thermal_climb_rates,
            pending_lift: None,
            energy_log: Vec::new(),
            crossings: Vec::new(),
            max_steps: config.max_steps,
            truncated: false,
        })
    }

    fn climb_rate_for(&self, hit: &LiftHit) -> f64 {
        match &self.thermal_climb_rates {
            Some(rates) => rates[hit.index],
            None => self.climb_rate,
        }
    }

    fn log_energies(&mut self) {
        self.energy_log.push(EnergySample {
            time: self.time,
            potential: self.glider.potential_energy,
            kinetic: self.glider.kinetic_energy,
            mechanical: self.glider.mechanical_energy,
        });
    }

    /// OUTSIDE_LIFT regime: one full-increment glide step.
    ///
    /// At best-glide speed this is a steady glide losing altitude at
    /// speed/ldr. Right after leaving a thermal the glider still flies at
    /// minimum-sink speed; the pull-down back to best glide costs the
    /// kinetic-energy difference between the two speeds as extra altitude,
    /// and a seeking pilot picks a new heading at that moment.
    ///
    /// If the advanced position lands inside a thermal the step overshot
    /// the lift boundary; the position is snapped back to the circle entry
    /// point found by the intersection solver.
    pub fn update(&mut self) -> Result<(), GlideError> {
        self.time += self.increment;
        let dt = self.increment;

        let v_bg = self.glider.best_glide_speed * KMH_TO_MPS;
        let glide_loss = v_bg / self.glider.ldr * dt;
        if (self.glider.speed - self.glider.best_glide_speed).abs() < NUMERICAL_TOLERANCE {
            self.glider.altitude -= glide_loss;
        } else {
            let v_now = self.glider.speed * KMH_TO_MPS;
            let maneuver_loss = (v_bg * v_bg - v_now * v_now) / (2.0 * G_ACCEL_MPS2);
            self.glider.altitude -= maneuver_loss + glide_loss;
            self.glider.speed = self.glider.best_glide_speed;
            if self.glider.strategy == Strategy::Seeking {
                self.glider.seek_thermal(&self.field);
            }
        }

        let previous = self.glider.position;
        let heading = self.glider.heading;
        self.glider.advance(dt, heading);

        if let Some(hit) = self.glider.in_lift(&self.field) {
            let entry = intersect(hit.center, previous, self.glider.position, self.field.radius)?;
            self.glider.position = entry;
            if let Some(last) = self.glider.history.last_mut() {
                *last = (entry, self.glider.altitude);
            }
            self.pending_lift = Some(hit);
        }

        self.glider.recompute_energies();
        self.log_energies();
        Ok(())
    }

    /// IN_LIFT regime: one sub-increment climb step.
    ///
    /// On entry the glider still carries cruise speed; decelerating to
    /// minimum-sink speed converts that kinetic energy into altitude
    /// without loss. Once slowed, it climbs at the thermal rate minus its
    /// own minimum sink, clamped at the lift ceiling.
    pub fn update_in_lift(&mut self, hit: &LiftHit) {
        let sub = self.increment / IN_LIFT_SUBSTEPS;
        self.time += sub;

        if (self.glider.speed - self.glider.min_sink_speed).abs() < NUMERICAL_TOLERANCE {
            let net = self.climb_rate_for(hit) - self.glider.min_sink_rate;
            let next = self.glider.altitude + net * sub;
            self.glider.altitude = if net > 0.0 {
                next.min(self.field.height.max(self.glider.altitude))
            } else {
                next
            };
        } else {
            let v_now = self.glider.speed * KMH_TO_MPS;
            let v_ms = self.glider.min_sink_speed * KMH_TO_MPS;
            self.glider.altitude += (v_now * v_now - v_ms * v_ms) / (2.0 * G_ACCEL_MPS2);
            self.glider.speed = self.glider.min_sink_speed;
        }

        let heading = self.glider.heading;
        self.glider.advance(sub, heading);
        self.glider.recompute_energies();
        self.log_energies();
    }

    /// Run the simulation to termination.
    ///
    /// Each iteration evaluates the lift predicate exactly once, records
    /// the result in the crossing log and dispatches to the matching
    /// regime. The loop ends when the in-scene test fails or the iteration
    /// cap fires (truncated, reported, never fatal).
    pub fn run(&mut self) -> Result<SceneOutcome, GlideError> {
        if self.glider.strategy == Strategy::Seeking {
            self.glider.seek_thermal(&self.field);
        }
        let mut steps = 0usize;
        while self.glider.in_scene(&self.field) {
            if steps >= self.max_steps {
                self.truncated = true;
                log::warn!(
                    "scene truncated after {} steps at t = {:.0} s",
                    steps,
                    self.time
                );
                break;
            }
            let hit = self
                .pending_lift
                .take()
                .or_else(|| self.glider.in_lift(&self.field));
            self.crossings.push(hit.map(|h| h.center));
            match hit {
                Some(hit) => self.update_in_lift(&hit),
                None => self.update()?,
            }
            steps += 1;
        }
        Ok(SceneOutcome {
            free_paths: self.free_paths(),
            truncated: self.truncated,
        })
    }

    /// Free-path segments from the crossing log: distance from the origin
    /// to the first crossed thermal, then between successive distinct
    /// crossed thermals. Consecutive steps inside the same thermal collapse
    /// into a single crossing.
    pub fn free_paths(&self) -> Vec<f64> {
        let mut paths = Vec::new();
        let mut last = Point::new(0.0, 0.0);
        let mut previous_center: Option<Point> = None;
        for entry in &self.crossings {
            match entry {
                Some(center) if Some(*center) != previous_center => {
                    paths.push(distance(last, *center));
                    last = *center;
                    previous_center = Some(*center);
                }
                Some(_) => {}
                None => previous_center = None,
            }
        }
        paths
    }

    /// Mechanical energy gained between launch and ground contact (J).
    ///
    /// Ground contact is the first altitude-sign crossing in the logged
    /// history; when the glider never touches down, the final logged
    /// sample is used instead. Negative values mean net energy spent.
    pub fn energy_gained(&self) -> f64 {
        let Some(first) = self.energy_log.first() else {
            return 0.0;
        };
        // history[i + 1] corresponds to energy_log[i].
        let contact = self
            .glider
            .history
            .iter()
            .skip(1)
            .position(|(_, altitude)| *altitude <= 0.0);
        let sample = match contact {
            Some(idx) => &self.energy_log[idx.min(self.energy_log.len() - 1)],
            None => self.energy_log.last().unwrap_or(first),
        };
        sample.mechanical - first.mechanical
    }

    /// Straight-line distance flown from the origin (km).
    pub fn flight_distance(&self) -> f64 {
        distance(Point::new(0.0, 0.0), self.glider.position)
    }
}
