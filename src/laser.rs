//! Edge-emitting laser diode source model.
//!
//! A laser diode emits an elliptical, astigmatic beam whose divergence is
//! usually quoted as the full width at half maximum (FWHM) along two
//! orthogonal axes: the narrow *slow* axis (parallel to the junction) and the
//! wide *fast* axis (perpendicular to it). Each axis is treated independently
//! and provides:
//! - a power distribution exponent `m` for a `cos^m` radiance profile
//! - the Gaussian beam half-divergence angle
//! - the beam waist and Rayleigh range derived from the wavelength
//!
//! Everything is derived once at construction; the beam half-width at a
//! given propagation distance is computed on demand.

use std::f64::consts::{LN_2, PI, SQRT_2};
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::errors::{finite, CouplingError};

/// One of the two principal axes of the emitted beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    /// Narrow divergence, parallel to the junction plane.
    Slow,
    /// Wide divergence, perpendicular to the junction plane.
    Fast,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Slow => write!(f, "slow"),
            Axis::Fast => write!(f, "fast"),
        }
    }
}

/// Gaussian beam parameters along a single axis.
///
/// Lengths are in micrometres, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaussianBeam {
    pub half_divergence: f64,
    pub waist: f64,
    pub rayleigh_range: f64,
}

impl GaussianBeam {
    /// Derives the beam parameters from a FWHM divergence angle.
    ///
    /// **Context**: Datasheets give the far-field divergence as an intensity
    /// FWHM, while the Gaussian beam expansion law needs the 1/e^2
    /// half-divergence, the waist and the Rayleigh range.
    ///
    /// **How it Works**: Converts the FWHM to a half-divergence angle
    /// `theta = sqrt(2) * fwhm / (2 * sqrt(ln 2))`, then uses the far-field
    /// relation `w0 = lambda / (pi * theta)` and `x0 = pi * w0^2 / lambda`,
    /// with the wavelength converted from nm to um.
    pub fn from_fwhm(wavelength_nm: f64, fwhm_deg: f64) -> Self {
        let fwhm_rad = fwhm_deg.to_radians();
        let half_divergence = (SQRT_2 * fwhm_rad) / (2.0 * LN_2.sqrt());

        let lda_um = wavelength_nm * 1e-3;
        let waist = lda_um / (PI * half_divergence);
        let rayleigh_range = PI * waist.powi(2) / lda_um;

        Self {
            half_divergence,
            waist,
            rayleigh_range,
        }
    }

    /// Beam half-width at an axial distance `x` (um) from the waist.
    pub fn half_width(&self, x: f64) -> f64 {
        self.waist * (1.0 + (x / self.rayleigh_range).powi(2)).sqrt()
    }
}

/// Computes the exponent `m` of a `cos^m` radiance profile with the given
/// FWHM (degrees).
///
/// `m = floor(ln(0.5) / ln(cos(fwhm / 2)))`. The result is undefined unless
/// `cos(fwhm / 2)` lies strictly between 0 and 1, i.e. unless the FWHM is
/// strictly between 0 and 180 degrees.
pub fn power_distribution_coefficient(fwhm_deg: f64) -> Result<u64, CouplingError> {
    let cos_half = (fwhm_deg.to_radians() / 2.0).cos();
    if !(fwhm_deg > 0.0 && fwhm_deg < 180.0 && cos_half > 0.0 && cos_half < 1.0) {
        return Err(CouplingError::Divergence { fwhm: fwhm_deg });
    }

    let m = 0.5_f64.ln() / cos_half.ln();
    if !m.is_finite() || m < 0.0 {
        return Err(CouplingError::Divergence { fwhm: fwhm_deg });
    }

    // saturates for vanishing divergence
    Ok(m.floor() as u64)
}

/// A laser diode characterised by its wavelength and per-axis divergence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaserDiode {
    wavelength: f64, // nm
    fwhm_slow: f64,  // deg
    fwhm_fast: f64,  // deg
    m_slow: u64,
    m_fast: u64,
    slow: GaussianBeam,
    fast: GaussianBeam,
}

impl LaserDiode {
    /// Creates a laser diode from its wavelength (nm) and the slow and fast
    /// axis FWHM divergence angles (degrees).
    pub fn new(wavelength: f64, fwhm_slow: f64, fwhm_fast: f64) -> Result<Self, CouplingError> {
        let wavelength = finite("wavelength", wavelength)?;
        let fwhm_slow = finite("fwhm_slow", fwhm_slow)?;
        let fwhm_fast = finite("fwhm_fast", fwhm_fast)?;
        if wavelength <= 0.0 {
            return Err(CouplingError::Wavelength { wavelength });
        }

        let m_slow = power_distribution_coefficient(fwhm_slow)?;
        let m_fast = power_distribution_coefficient(fwhm_fast)?;
        let slow = GaussianBeam::from_fwhm(wavelength, fwhm_slow);
        let fast = GaussianBeam::from_fwhm(wavelength, fwhm_fast);

        debug!(
            "laser {wavelength} nm: m = ({m_slow}, {m_fast}), w0 = ({:.4}, {:.4}) um, x0 = ({:.4}, {:.4}) um",
            slow.waist, fast.waist, slow.rayleigh_range, fast.rayleigh_range
        );

        Ok(Self {
            wavelength,
            fwhm_slow,
            fwhm_fast,
            m_slow,
            m_fast,
            slow,
            fast,
        })
    }

    /// Wavelength in nm.
    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// FWHM divergence along `axis`, degrees.
    pub fn fwhm(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Slow => self.fwhm_slow,
            Axis::Fast => self.fwhm_fast,
        }
    }

    /// Power distribution exponent along `axis`.
    pub fn exponent(&self, axis: Axis) -> u64 {
        match axis {
            Axis::Slow => self.m_slow,
            Axis::Fast => self.m_fast,
        }
    }

    pub fn beam(&self, axis: Axis) -> &GaussianBeam {
        match axis {
            Axis::Slow => &self.slow,
            Axis::Fast => &self.fast,
        }
    }

    /// Beam half-widths `(w_slow, w_fast)` in um at a distance `x` (um)
    /// from the emitting facet.
    pub fn beam_half_width(&self, x: f64) -> (f64, f64) {
        (self.slow.half_width(x), self.fast.half_width(x))
    }
}
