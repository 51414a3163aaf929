/// Physical constants used in the glide simulation

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Total glider mass including pilot and equipment (kg)
///
/// Typical single-seat club-class glider. All potential/kinetic energy
/// bookkeeping uses this value.
pub const GLIDER_MASS_KG: f64 = 350.0;

/// Conversion factor: kilometers per hour to meters per second
pub const KMH_TO_MPS: f64 = 1.0 / 3.6;

/// Conversion factor: meters to kilometers
pub const M_TO_KM: f64 = 0.001;

/// Ratio of minimum-sink speed to best-glide speed
///
/// Linear-polar approximation: the minimum-sink point of a glider polar
/// sits at roughly three quarters of the best-glide speed.
pub const MIN_SINK_SPEED_FACTOR: f64 = 0.75;

/// Sub-step divisor applied while climbing inside a thermal
///
/// The in-lift regime integrates at increment / IN_LIFT_SUBSTEPS for
/// better accuracy near the lift boundary.
pub const IN_LIFT_SUBSTEPS: f64 = 5.0;

/// Default heading for the naive fixed-heading strategy (degrees from the
/// x-axis)
pub const DEFAULT_HEADING_DEG: f64 = 30.0;

/// Fallback heading when the seeking strategy finds no candidate thermal
pub const FALLBACK_HEADING_DEG: f64 = 45.0;

/// Lower edge of the bearing cone scanned by the thermal-seeking heuristic
/// (degrees from the x-axis)
pub const SEEK_BEARING_MIN_DEG: f64 = 30.0;

/// Upper edge of the seeking bearing cone (degrees from the x-axis)
pub const SEEK_BEARING_MAX_DEG: f64 = 60.0;

/// Maximum range at which the seeking heuristic considers a thermal (km)
pub const SEEK_RANGE_KM: f64 = 10.0;

/// Default per-scene iteration cap
///
/// The run loop has no natural bound if the in-scene predicate never turns
/// false; exceeding the cap marks the trial truncated instead of hanging
/// the batch.
pub const DEFAULT_MAX_STEPS: usize = 200_000;

/// General numerical tolerance for floating point comparisons
pub const NUMERICAL_TOLERANCE: f64 = 1e-9;
