//! Error types raised while deriving physical parameters.
//!
//! All of these are construction-time failures: once a [`Waveguide`] or a
//! [`LaserDiode`] exists, every efficiency computation on it is infallible.
//!
//! [`Waveguide`]: crate::waveguide::Waveguide
//! [`LaserDiode`]: crate::laser::LaserDiode

use thiserror::Error;

/// Failure to derive a physical quantity from the supplied inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CouplingError {
    /// The squared numerical aperture falls outside `[0, 1]`, so the
    /// acceptance angle `asin(NA)` is undefined.
    #[error(
        "numerical aperture undefined for n_core = {n_core}, n_clad = {n_clad} \
         (n_core^2 - n_clad^2 = {na_squared}, expected a value in [0, 1])"
    )]
    NumericalAperture {
        n_core: f64,
        n_clad: f64,
        na_squared: f64,
    },
    /// cos(fwhm / 2) is not strictly between 0 and 1, so the power
    /// distribution exponent has no finite value.
    #[error("divergence angle {fwhm} deg is outside (0, 180) deg")]
    Divergence { fwhm: f64 },
    /// Wavelength must be finite and positive for the beam waist to exist.
    #[error("wavelength {wavelength} nm must be finite and positive")]
    Wavelength { wavelength: f64 },
    /// A physical input was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}

/// Returns `value` if it is finite, otherwise a [`CouplingError::NonFinite`].
pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, CouplingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CouplingError::NonFinite { name, value })
    }
}
