//! Fresnel reflection at the waveguide entrance face.
//!
//! Light leaving the laser diode crosses a single planar interface between
//! the surrounding medium and the waveguide core. Only normal incidence is
//! modelled: the beam divergence is accounted for separately by the angular
//! factor, so the polarisation-averaged power reflectance reduces to
//! `R = ((n2 - n1) / (n2 + n1))^2`.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_media_reflects_nothing() {
        assert_eq!(normal_reflectance(1.31, 1.31), 0.0);
        assert_eq!(normal_transmittance(1.31, 1.31), 1.0);
    }

    #[test]
    fn air_to_glass() {
        let r = normal_reflectance(1.0, 1.5);
        assert!((r - 0.04).abs() < 1e-12);
    }

    #[test]
    fn reflectance_is_reciprocal() {
        let forward = normal_reflectance(1.0, 1.51);
        let backward = normal_reflectance(1.51, 1.0);
        assert!((forward - backward).abs() < f64::EPSILON);
    }

    #[test]
    fn energy_is_conserved() {
        for n2 in [1.0, 1.33, 1.51, 2.4, 3.5] {
            let sum = normal_reflectance(1.0, n2) + normal_transmittance(1.0, n2);
            assert!((sum - 1.0).abs() < 1e-15, "n2 = {n2}");
        }
    }
}

/// Power reflectance at normal incidence from a medium of index `n1` into a
/// medium of index `n2`.
pub fn normal_reflectance(n1: f64, n2: f64) -> f64 {
    ((n2 - n1) / (n2 + n1)).powi(2)
}

/// Power transmittance at normal incidence, `1 - R` for a lossless interface.
pub fn normal_transmittance(n1: f64, n2: f64) -> f64 {
    1.0 - normal_reflectance(n1, n2)
}
