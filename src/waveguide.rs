//! Square-core step-index waveguide.
//!
//! The waveguide is described by its core and cladding refractive indices and
//! the edge length of its square core. The only derived quantity is the
//! acceptance half-angle, obtained from the numerical aperture
//! `NA = sqrt(n_core^2 - n_clad^2)` and fixed at construction.

use log::debug;
use serde::Serialize;

use crate::errors::{finite, CouplingError};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn af32_on_silica() {
        let wg = Waveguide::new(1.51, 1.465, 50.0, 1.0).unwrap();
        assert_relative_eq!(wg.theta(), 0.374_588_213_460_844_6, max_relative = 1e-12);
        assert_relative_eq!(
            wg.numerical_aperture(),
            (1.51_f64 * 1.51 - 1.465 * 1.465).sqrt(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn acceptance_angle_within_quarter_turn() {
        let pairs = [
            (1.01, 1.0),
            (1.45, 1.44),
            (1.51, 1.465),
            (1.6, 1.3),
            (1.4, 0.98),
            (1.5, 1.5),
        ];
        for (n_core, n_clad) in pairs {
            let theta = Waveguide::new(n_core, n_clad, 10.0, 1.0).unwrap().theta();
            assert!((0.0..=FRAC_PI_2).contains(&theta), "theta = {theta}");
        }
    }

    #[test]
    fn larger_index_contrast_opens_the_cone() {
        let narrow = Waveguide::new(1.46, 1.45, 10.0, 1.0).unwrap();
        let wide = Waveguide::new(1.6, 1.45, 10.0, 1.0).unwrap();
        assert!(wide.theta() > narrow.theta());
    }

    #[test]
    fn cladding_above_core_is_rejected() {
        let err = Waveguide::new(1.45, 1.51, 50.0, 1.0).unwrap_err();
        assert!(matches!(err, CouplingError::NumericalAperture { .. }));
    }

    #[test]
    fn numerical_aperture_above_one_is_rejected() {
        // 2.0^2 - 1.2^2 = 2.56
        let err = Waveguide::new(2.0, 1.2, 50.0, 1.0).unwrap_err();
        match err {
            CouplingError::NumericalAperture { na_squared, .. } => {
                assert!((na_squared - 2.56).abs() < 1e-12)
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn nan_index_is_rejected() {
        assert!(Waveguide::new(f64::NAN, 1.465, 50.0, 1.0).is_err());
        assert!(Waveguide::new(1.51, 1.465, f64::INFINITY, 1.0).is_err());
    }
}

/// A waveguide with a square cross section.
///
/// Thicknesses are in micrometres. The cladding thickness is carried for
/// completeness but does not enter any efficiency factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waveguide {
    n_core: f64,
    n_clad: f64,
    core_thickness: f64,
    clad_thickness: f64,
    theta: f64, // acceptance half-angle, rad
}

impl Waveguide {
    /// Creates a waveguide and derives its acceptance angle.
    ///
    /// Fails if any input is not finite, or if `n_core^2 - n_clad^2` lies
    /// outside `[0, 1]`. Physically unreasonable but well-defined inputs (a
    /// negative thickness, say) are not rejected here.
    pub fn new(
        n_core: f64,
        n_clad: f64,
        core_thickness: f64,
        clad_thickness: f64,
    ) -> Result<Self, CouplingError> {
        let n_core = finite("n_core", n_core)?;
        let n_clad = finite("n_clad", n_clad)?;
        let core_thickness = finite("core_thickness", core_thickness)?;
        let clad_thickness = finite("clad_thickness", clad_thickness)?;

        let theta = acceptance_angle(n_core, n_clad)?;
        debug!(
            "waveguide n_core={n_core} n_clad={n_clad} core={core_thickness}um: acceptance angle {:.4} deg",
            theta.to_degrees()
        );

        Ok(Self {
            n_core,
            n_clad,
            core_thickness,
            clad_thickness,
            theta,
        })
    }

    pub fn n_core(&self) -> f64 {
        self.n_core
    }

    pub fn n_clad(&self) -> f64 {
        self.n_clad
    }

    /// Edge length of the square core, um.
    pub fn core_thickness(&self) -> f64 {
        self.core_thickness
    }

    pub fn clad_thickness(&self) -> f64 {
        self.clad_thickness
    }

    /// Acceptance half-angle in radians.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn numerical_aperture(&self) -> f64 {
        (self.n_core * self.n_core - self.n_clad * self.n_clad).sqrt()
    }
}

/// Computes the acceptance half-angle `asin(sqrt(n_core^2 - n_clad^2))`.
///
/// No clamping is applied: an imaginary numerical aperture or one greater
/// than unity is an error.
pub fn acceptance_angle(n_core: f64, n_clad: f64) -> Result<f64, CouplingError> {
    let na_squared = n_core * n_core - n_clad * n_clad;
    if !(0.0..=1.0).contains(&na_squared) {
        return Err(CouplingError::NumericalAperture {
            n_core,
            n_clad,
            na_squared,
        });
    }
    Ok(na_squared.sqrt().asin())
}
