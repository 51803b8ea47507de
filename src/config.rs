/// Refractive index of the gap between the laser facet and the waveguide.
pub const MEDIUM_REFR_INDEX: f64 = 1.0;
/// Default first separation sampled by a sweep, um.
pub const SWEEP_START: f64 = 1.0;
/// Default end (exclusive) of a sweep, um.
pub const SWEEP_STOP: f64 = 200.0;
/// Default separation step, um.
pub const SWEEP_STEP: f64 = 0.5;
