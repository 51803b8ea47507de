//! Coupling efficiency between a laser diode and a square-core waveguide.
//!
//! The efficiency at a free-space separation `x` is the product of a
//! geometric overlap factor, a Fresnel transmission factor and an angular
//! acceptance factor:
//!
//! ```
//! use ldcouple::{calculator::CouplingCalculator, laser::LaserDiode, waveguide::Waveguide};
//!
//! let waveguide = Waveguide::new(1.51, 1.465, 50.0, 1.0)?;
//! let laser = LaserDiode::new(405.0, 9.0, 26.0)?;
//! let calc = CouplingCalculator::new(waveguide, laser);
//!
//! let eta = calc.total_efficiency(0.0);
//! assert!(eta > 0.88 && eta < 0.89);
//! # Ok::<(), ldcouple::errors::CouplingError>(())
//! ```

/// Efficiency factors and their product.
pub mod calculator;
/// Shared constants.
pub mod config;
/// Error types for invalid physical inputs.
pub mod errors;
/// Normal-incidence Fresnel reflection.
pub mod fresnel;
/// Laser diode beam model.
pub mod laser;
/// Writers for sweep results.
pub mod output;
/// Runtime configuration.
pub mod settings;
/// Separation sweeps over waveguide and laser pairings.
pub mod sweep;
/// Square-core waveguide model.
pub mod waveguide;
