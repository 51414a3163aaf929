//! Glider state: position, altitude, speeds, heading, energy bookkeeping,
//! lift detection and the thermal-seeking heuristic.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HEADING_DEG, FALLBACK_HEADING_DEG, GLIDER_MASS_KG, G_ACCEL_MPS2, KMH_TO_MPS, M_TO_KM,
    MIN_SINK_SPEED_FACTOR, SEEK_BEARING_MAX_DEG, SEEK_BEARING_MIN_DEG, SEEK_RANGE_KM,
};
use crate::field::Field;
use crate::geometry::{distance, Point};

/// Pilot steering strategy between thermals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Fly a fixed heading and take whatever lift the path crosses.
    Naive,
    /// Actively re-steer toward the nearest detected thermal ahead.
    Seeking,
}

/// A detected lift: which thermal the glider is inside, and where its
/// center is.
///
/// The index feeds per-thermal climb-rate lookup when a convective weather
/// model is attached to the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftHit {
    pub index: usize,
    pub center: Point,
}

/// Physical and energetic state of the simulated glider.
#[derive(Debug, Clone)]
pub struct Glider {
    /// Lift-to-drag ratio (km traveled per km of altitude lost)
    pub ldr: f64,
    /// Current true airspeed (km/h)
    pub speed: f64,
    /// Optimal cruise speed between thermals (km/h); the configured speed
    pub best_glide_speed: f64,
    /// Airspeed minimizing the descent rate, flown inside thermals (km/h)
    pub min_sink_speed: f64,
    /// Descent rate at minimum-sink speed (m/s)
    pub min_sink_rate: f64,
    /// Altitude (m); non-positive values signal ground contact
    pub altitude: f64,
    /// Current position (km)
    pub position: Point,
    /// Heading, degrees from the x-axis
    pub heading: f64,
    /// Steering strategy
    pub strategy: Strategy,
    /// Potential energy (J)
    pub potential_energy: f64,
    /// Kinetic energy (J)
    pub kinetic_energy: f64,
    /// Mechanical energy (J); always potential + kinetic
    pub mechanical_energy: f64,
    /// Append-only (position, altitude) history, one snapshot per advance
    pub history: Vec<(Point, f64)>,
}

impl Glider {
    /// Place a glider at the origin of the field with the given glide
    /// ratio, cruise speed (km/h) and initial altitude (m).
    pub fn new(ldr: f64, speed: f64, altitude: f64, strategy: Strategy) -> Self {
        let min_sink_speed = speed * MIN_SINK_SPEED_FACTOR;
        let min_sink_rate = min_sink_speed * KMH_TO_MPS / ldr;
        let position = Point::new(0.0, 0.0);
        let mut glider = Self {
            ldr,
            speed,
            best_glide_speed: speed,
            min_sink_speed,
            min_sink_rate,
            altitude,
            position,
            heading: DEFAULT_HEADING_DEG,
            strategy,
            potential_energy: 0.0,
            kinetic_energy: 0.0,
            mechanical_energy: 0.0,
            history: vec![(position, altitude)],
        };
        glider.recompute_energies();
        glider
    }

    /// Recompute the energy triple from current altitude and airspeed:
    /// PE = mgh, KE = mv²/2, ME = PE + KE.
    pub fn recompute_energies(&mut self) {
        let v_mps = self.speed * KMH_TO_MPS;
        self.potential_energy = GLIDER_MASS_KG * G_ACCEL_MPS2 * self.altitude;
        self.kinetic_energy = 0.5 * GLIDER_MASS_KG * v_mps * v_mps;
        self.mechanical_energy = self.potential_energy + self.kinetic_energy;
    }

    /// First thermal whose center lies strictly closer than the field
    /// radius, or `None` when the glider is in still air.
    ///
    /// The caller evaluates this once per simulation step and passes the
    /// result into whichever update branch needs it.
    pub fn in_lift(&self, field: &Field) -> Option<LiftHit> {
        field
            .lifts
            .iter()
            .enumerate()
            .find(|(_, center)| distance(self.position, **center) < field.radius)
            .map(|(index, center)| LiftHit {
                index,
                center: *center,
            })
    }

    /// In-scene bounds test.
    ///
    /// Deliberately combines the axis bounds with a logical OR: the glider
    /// stays in scene while either coordinate is still within its bound,
    /// so termination requires both to be exceeded. This reproduces the
    /// reference behavior and materially changes when flights end; do not
    /// tighten it to an AND without revisiting the recorded statistics.
    pub fn in_scene(&self, field: &Field) -> bool {
        self.position.x < field.dim_x || self.position.y < field.dim_y
    }

    /// Re-steer toward the nearest thermal strictly ahead and to the right
    /// (dx > 0, dy > 0), within the 30°–60° bearing cone from the x-axis
    /// and within 10 km. Falls back to a 45° heading when no candidate
    /// qualifies. Mutates heading only.
    pub fn seek_thermal(&mut self, field: &Field) {
        let mut best: Option<(f64, Point)> = None;
        for center in &field.lifts {
            let dx = center.x - self.position.x;
            let dy = center.y - self.position.y;
            if dx <= 0.0 || dy <= 0.0 {
                continue;
            }
            let bearing = dy.atan2(dx).to_degrees();
            if !(SEEK_BEARING_MIN_DEG..=SEEK_BEARING_MAX_DEG).contains(&bearing) {
                continue;
            }
            let dist = distance(self.position, *center);
            if dist > SEEK_RANGE_KM {
                continue;
            }
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, *center));
            }
        }
        self.heading = match best {
            Some((_, target)) => {
                (target.y - self.position.y).atan2(target.x - self.position.x).to_degrees()
            }
            None => FALLBACK_HEADING_DEG,
        };
    }

    /// Dead-reckon along `heading` for `time_increment` seconds at the
    /// current airspeed and append the new snapshot to the history.
    ///
    /// `Point` is a plain `Copy` value, so every logged pair is an
    /// independent snapshot; later position updates cannot alter it.
    pub fn advance(&mut self, time_increment: f64, heading: f64) {
        let phi = heading.to_radians();
        let step_km = M_TO_KM * self.speed * KMH_TO_MPS * time_increment;
        self.position = Point::new(
            self.position.x + step_km * phi.cos(),
            self.position.y + step_km * phi.sin(),
        );
        self.history.push((self.position, self.altitude));
    }
}
