//! 2D geometry primitives: Euclidean distance and the circle–line
//! intersection solver used to pin down lift-entry points.

use nalgebra::Point2;

use crate::error::GlideError;

/// A position in the field plane, in kilometers.
pub type Point = Point2<f64>;

/// Euclidean distance between two points (km).
pub fn distance(a: Point, b: Point) -> f64 {
    (a - b).norm()
}

/// Intersection of the line through `p0` and `p1` with the circle of the
/// given `center` and `radius`, interpreted as the lift-entry point.
///
/// The segment is treated as an infinite line: substituting y = a*x + b
/// into the circle equation yields a quadratic in x, and the root nearest
/// `p0` (the smaller x, since the glider moves in +x) is returned. A
/// negative discriminant means the discretized step overshot a circle the
/// line never actually crosses, and a zero discriminant means the line is
/// exactly tangent; both cases fall back to `p0` unchanged rather than
/// raising an error, since grazing the rim is not an entry.
///
/// # Errors
/// Returns [`GlideError::VerticalPath`] when `p1.x == p0.x`, where the
/// slope is undefined.
pub fn intersect(center: Point, p0: Point, p1: Point, radius: f64) -> Result<Point, GlideError> {
    if p1.x == p0.x {
        return Err(GlideError::VerticalPath { x: p0.x });
    }
    let a = (p1.y - p0.y) / (p1.x - p0.x);
    let b = p0.y - a * p0.x;

    let coeff_a = 1.0 + a * a;
    let coeff_b = 2.0 * a * (b - center.y) - 2.0 * center.x;
    let coeff_c = center.x * center.x + (b - center.y) * (b - center.y) - radius * radius;
    let delta = coeff_b * coeff_b - 4.0 * coeff_a * coeff_c;

    let x = if delta > 0.0 {
        let root = delta.sqrt();
        ((-coeff_b - root) / (2.0 * coeff_a)).min((-coeff_b + root) / (2.0 * coeff_a))
    } else {
        p0.x
    };
    Ok(Point::new(x, a * x + b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_distance_symmetric() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert!((distance(a, b) - 5.0).abs() < TOL);
        assert!((distance(a, b) - distance(b, a)).abs() < TOL);
    }

    #[test]
    fn test_distance_zero_iff_equal() {
        let a = Point::new(3.5, -2.0);
        assert_eq!(distance(a, a), 0.0);
        let b = Point::new(3.5, -2.0 + 1e-6);
        assert!(distance(a, b) > 0.0);
    }

    #[test]
    fn test_intersect_lands_on_circle() {
        // Thermal at the origin, radius 1; path from outside to inside.
        let center = Point::new(0.0, 0.0);
        let p0 = Point::new(-3.0, -3.0);
        let p1 = Point::new(0.2, 0.2);
        let hit = intersect(center, p0, p1, 1.0).unwrap();
        assert!((distance(hit, center) - 1.0).abs() < 1e-9);
        // The entry point lies on the line y = x.
        assert!((hit.y - hit.x).abs() < 1e-9);
        // And on the p0 side of the circle.
        assert!(hit.x < 0.0);
    }

    #[test]
    fn test_intersect_negative_discriminant_falls_back() {
        // Line y = 5 never touches the unit circle at the origin.
        let center = Point::new(0.0, 0.0);
        let p0 = Point::new(-2.0, 5.0);
        let p1 = Point::new(2.0, 5.0);
        let hit = intersect(center, p0, p1, 1.0).unwrap();
        assert_eq!(hit, p0);
    }

    #[test]
    fn test_intersect_tangent_line_falls_back() {
        // Line y = 1 grazes the unit circle at (0, 1): zero discriminant.
        let center = Point::new(0.0, 0.0);
        let p0 = Point::new(-2.0, 1.0);
        let p1 = Point::new(2.0, 1.0);
        let hit = intersect(center, p0, p1, 1.0).unwrap();
        assert_eq!(hit, p0);
    }

    #[test]
    fn test_intersect_vertical_segment_errors() {
        let center = Point::new(0.0, 0.0);
        let p0 = Point::new(0.5, -2.0);
        let p1 = Point::new(0.5, 2.0);
        let err = intersect(center, p0, p1, 1.0).unwrap_err();
        assert!(matches!(err, GlideError::VerticalPath { .. }));
    }
}
