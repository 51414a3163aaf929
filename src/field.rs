//! Random thermal field over a rectangular domain.

use rand::Rng;

use crate::geometry::Point;

/// A rectangular field populated with thermal updraft cells.
///
/// Thermals are modeled as discs of a common radius around randomly drawn
/// centers. The field is immutable after construction: one field serves
/// exactly one simulated flight.
#[derive(Debug, Clone)]
pub struct Field {
    /// Domain width along x (km)
    pub dim_x: f64,
    /// Domain width along y (km)
    pub dim_y: f64,
    /// Radius of every lift disc (km)
    pub radius: f64,
    /// Lift ceiling height (m)
    pub height: f64,
    /// Thermal centers
    pub lifts: Vec<Point>,
}

impl Field {
    /// Generate a field with `floor(dim_x * dim_y * density)` thermals,
    /// each center drawn independently and uniformly over
    /// `[0, dim_x) x [0, dim_y)`.
    ///
    /// A zero-density field is valid: no lift ever triggers. Centers carry
    /// no uniqueness guarantee (coincidence has measure zero).
    pub fn generate<R: Rng>(
        dim_x: f64,
        dim_y: f64,
        radius: f64,
        height: f64,
        density: f64,
        rng: &mut R,
    ) -> Self {
        let n = (dim_x * dim_y * density).floor() as usize;
        let lifts = (0..n)
            .map(|_| Point::new(rng.gen_range(0.0..dim_x), rng.gen_range(0.0..dim_y)))
            .collect();
        log::debug!("generated field {dim_x}x{dim_y} km with {n} thermals");
        Self {
            dim_x,
            dim_y,
            radius,
            height,
            lifts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_thermal_count_is_floor_of_area_times_density() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = Field::generate(10.0, 10.0, 0.3, 1500.0, 0.53, &mut rng);
        assert_eq!(field.lifts.len(), 53);
    }

    #[test]
    fn test_centers_lie_within_domain() {
        let mut rng = StdRng::seed_from_u64(11);
        let field = Field::generate(7.0, 4.0, 0.2, 1200.0, 2.0, &mut rng);
        assert_eq!(field.lifts.len(), 56);
        for lift in &field.lifts {
            assert!(lift.x >= 0.0 && lift.x < 7.0);
            assert!(lift.y >= 0.0 && lift.y < 4.0);
        }
    }

    #[test]
    fn test_zero_density_field_is_valid() {
        let mut rng = StdRng::seed_from_u64(3);
        let field = Field::generate(10.0, 10.0, 0.3, 1500.0, 0.0, &mut rng);
        assert!(field.lifts.is_empty());
    }
}
