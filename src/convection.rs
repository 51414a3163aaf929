//! Convective weather model: lift ceiling and stochastic per-thermal climb
//! rates derived from ground conditions.
//!
//! Thermals in a real field do not all pull at the same rate. Given ground
//! temperature, dew point and pressure, this module derives a convective
//! velocity scale for the day and draws one climb rate per thermal around
//! it, evaluated at the standard 2/3-of-ceiling study altitude.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::constants::G_ACCEL_MPS2;
use crate::error::GlideError;

/// Surface heat flux scale (W/m²) driving the convective boundary layer
const SURFACE_HEAT_FLUX_W_M2: f64 = 365.0;

/// Specific heat capacity of air at constant pressure (J/(kg·K))
const CP_AIR: f64 = 1006.0;

/// Specific gas constant for dry air (J/(kg·K))
const R_AIR: f64 = 287.0;

/// Lift ceiling rises roughly 400 ft per kelvin of temperature/dew-point
/// spread (the classic soaring rule of thumb).
const CEILING_FT_PER_KELVIN: f64 = 400.0;

/// Offset between the sampled lift speed and the speed effectively
/// available to a climbing glider (m/s)
const CLIMB_SPEED_OFFSET_MPS: f64 = 1.3;

/// Fraction of the ceiling at which climb rates are evaluated
const STUDY_ALTITUDE_FRACTION: f64 = 2.0 / 3.0;

fn feet_to_meters(feet: f64) -> f64 {
    feet / 3.048
}

/// Ground weather conditions for a soaring day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Station pressure (hPa)
    pub pressure_hpa: f64,
    /// Ground temperature (K)
    pub temp_ground_k: f64,
    /// Dew point (K)
    pub dew_point_k: f64,
    /// Relative humidity (%)
    pub humidity: f64,
}

impl Weather {
    /// Build a weather bundle from Celsius surface readings.
    pub fn new(pressure_hpa: f64, temp_c: f64, dew_point_c: f64, humidity: f64) -> Self {
        Self {
            pressure_hpa,
            temp_ground_k: temp_c + 273.15,
            dew_point_k: dew_point_c + 273.15,
            humidity,
        }
    }

    /// Air density at the ground (kg/m³), from the ideal gas law.
    pub fn air_density(&self) -> f64 {
        self.pressure_hpa * 100.0 / (R_AIR * self.temp_ground_k)
    }

    /// Lift ceiling height (m): 400 ft per kelvin of temperature/dew-point
    /// spread.
    pub fn ceiling_m(&self) -> f64 {
        feet_to_meters(CEILING_FT_PER_KELVIN * (self.temp_ground_k - self.dew_point_k))
    }

    /// Virtual potential temperature at the ground (K).
    pub fn virtual_temperature(&self) -> f64 {
        self.temp_ground_k * (1013.25 / self.pressure_hpa).powf(2.0 / 7.0)
    }

    /// Kinematic surface heat flux (K·m/s).
    pub fn heat_flux(&self) -> f64 {
        SURFACE_HEAT_FLUX_W_M2 / (self.air_density() * CP_AIR)
    }

    /// Convective velocity scale w* (m/s) of the boundary layer: the
    /// theoretical vertical speed of the day's thermals, not the climb a
    /// glider actually achieves.
    pub fn convective_speed(&self) -> f64 {
        let q = self.heat_flux();
        let z_m = self.ceiling_m();
        let theta = self.virtual_temperature();
        (q * G_ACCEL_MPS2 * z_m / theta).powf(1.0 / 3.0)
    }

    /// Draw the raw vertical air speed of one thermal at `altitude_m` (m/s).
    ///
    /// The spread grows with the similarity profile sigma(z/z_m), so each
    /// thermal in a field pulls differently.
    pub fn sample_lift_speed<R: Rng>(
        &self,
        altitude_m: f64,
        rng: &mut R,
    ) -> Result<f64, GlideError> {
        let v0 = self.convective_speed();
        let z_zm = altitude_m / self.ceiling_m();
        let sigma =
            (v0 * v0 * 1.8 * z_zm.powf(2.0 / 3.0) * (1.0 - 0.8 * z_zm).powi(2)).sqrt();
        let dist = Normal::new(v0, sigma)
            .map_err(|e| format!("invalid lift speed distribution: {e}"))?;
        Ok(dist.sample(rng))
    }

    /// Draw the climb rate effectively available to a glider crossing one
    /// thermal at `altitude_m` (m/s).
    pub fn sample_climb_rate<R: Rng>(
        &self,
        altitude_m: f64,
        rng: &mut R,
    ) -> Result<f64, GlideError> {
        let z_zm = altitude_m / self.ceiling_m();
        let v0 = self.sample_lift_speed(altitude_m, rng)? + CLIMB_SPEED_OFFSET_MPS;
        Ok(v0 * z_zm.powf(1.0 / 3.0) * (1.0 - 1.1 * z_zm))
    }

    /// Standard study altitude for climb-rate evaluation: 2/3 of the
    /// ceiling.
    pub fn study_altitude_m(&self) -> f64 {
        STUDY_ALTITUDE_FRACTION * self.ceiling_m()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hot_day() -> Weather {
        Weather::new(1028.0, 35.0, 16.0, 30.0)
    }

    #[test]
    fn test_ceiling_from_temperature_spread() {
        // 19 K spread -> 7600 ft -> ~2493 m with the reference conversion.
        let ceiling = hot_day().ceiling_m();
        assert!((ceiling - 2493.4).abs() < 1.0);
    }

    #[test]
    fn test_convective_speed_is_positive_and_plausible() {
        let w_star = hot_day().convective_speed();
        assert!(w_star > 0.5 && w_star < 10.0, "w* = {w_star}");
    }

    #[test]
    fn test_sampled_climb_rates_are_finite() {
        let weather = hot_day();
        let mut rng = StdRng::seed_from_u64(42);
        let alt = weather.study_altitude_m();
        for _ in 0..100 {
            let rate = weather.sample_climb_rate(alt, &mut rng).unwrap();
            assert!(rate.is_finite());
        }
    }
}
