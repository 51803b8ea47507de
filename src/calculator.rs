//! Coupling efficiency between a laser diode and a square-core waveguide.
//!
//! The efficiency is modelled as the product of three independent factors:
//! - **geometric**: how much of the elliptical spot lands on the square core
//! - **Fresnel**: power transmitted through the core entrance face
//! - **angular**: how much of the `cos^m` radiance falls inside the
//!   acceptance cone of the waveguide
//!
//! Only the geometric factor depends on the separation between the laser
//! facet and the waveguide.
//!
//! # Approximations
//!
//! The geometric overlap compares the core edge against each beam half-width
//! instead of clipping the ellipse against the square, and the angular factor
//! is the geometric mean of two one-dimensional captures. Both are kept as
//! closed forms.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::config::MEDIUM_REFR_INDEX;
use crate::fresnel;
use crate::laser::{Axis, LaserDiode};
use crate::waveguide::Waveguide;

/// How the beam spot compares with the core at a given separation.
///
/// An axis counts as captured when the core edge is at least as large as the
/// beam half-width along it, so exact equality resolves to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overlap {
    /// Core at least as large as the spot along both axes.
    FullCapture,
    /// Spot larger than the core along both axes.
    AreaRatio,
    /// Spot overfills the core along the slow axis only.
    SlowAxisClipped,
    /// Spot overfills the core along the fast axis only.
    FastAxisClipped,
}

impl Overlap {
    /// Classifies a core of edge `edge` against beam half-widths `(w_slow, w_fast)`.
    pub fn classify(edge: f64, w_slow: f64, w_fast: f64) -> Self {
        match (edge >= w_slow, edge >= w_fast) {
            (true, true) => Overlap::FullCapture,
            (false, false) => Overlap::AreaRatio,
            (false, true) => Overlap::SlowAxisClipped,
            (true, false) => Overlap::FastAxisClipped,
        }
    }

    /// Fraction of the spot collected by the core for this overlap.
    pub fn factor(&self, edge: f64, w_slow: f64, w_fast: f64) -> f64 {
        match self {
            Overlap::FullCapture => 1.0,
            Overlap::AreaRatio => edge.powi(2) / (PI * w_slow * w_fast),
            Overlap::SlowAxisClipped => edge / w_slow,
            Overlap::FastAxisClipped => edge / w_fast,
        }
    }
}

/// Breakdown of the coupling efficiency at one separation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Efficiency {
    pub distance: f64,
    pub overlap: Overlap,
    pub geometric: f64,
    pub fresnel: f64,
    pub angular: f64,
    pub total: f64,
}

impl fmt::Display for Efficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Efficiency at x = {:.3} um:", self.distance)?;
        writeln!(f, "  Overlap:          {:?}", self.overlap)?;
        writeln!(f, "  Geometric:        {:.6}", self.geometric)?;
        writeln!(f, "  Fresnel:          {:.6}", self.fresnel)?;
        writeln!(f, "  Angular:          {:.6}", self.angular)?;
        writeln!(f, "  Total:            {:.6}", self.total)
    }
}

/// Combines a waveguide and a laser diode into efficiency figures.
///
/// **Context**: The waveguide and the source are built independently from
/// their physical parameters; the calculator only reads their derived
/// quantities. Both are small immutable values, so the calculator keeps its
/// own copies and can be shared freely across threads.
///
/// **How it Works**: Each factor is a pure function of the two components
/// and, for the geometric factor, of the separation `x` in micrometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CouplingCalculator {
    waveguide: Waveguide,
    laser: LaserDiode,
}

impl CouplingCalculator {
    pub fn new(waveguide: Waveguide, laser: LaserDiode) -> Self {
        Self { waveguide, laser }
    }

    pub fn waveguide(&self) -> &Waveguide {
        &self.waveguide
    }

    pub fn laser(&self) -> &LaserDiode {
        &self.laser
    }

    /// Classifies the spot against the core at separation `x`.
    pub fn overlap(&self, x: f64) -> Overlap {
        let (w_slow, w_fast) = self.laser.beam_half_width(x);
        Overlap::classify(self.waveguide.core_thickness(), w_slow, w_fast)
    }

    /// Geometric coupling factor at a separation of `x` um.
    ///
    /// The spot is an ellipse with semi-axes `(w_slow, w_fast)` and area
    /// `pi * w_slow * w_fast`; see [`Overlap`] for the four cases.
    pub fn geometrical_losses(&self, x: f64) -> f64 {
        let edge = self.waveguide.core_thickness();
        let (w_slow, w_fast) = self.laser.beam_half_width(x);
        Overlap::classify(edge, w_slow, w_fast).factor(edge, w_slow, w_fast)
    }

    /// Geometric coupling factor with the waveguide butted against the facet.
    pub fn geometrical_losses_at_origin(&self) -> f64 {
        self.geometrical_losses(0.0)
    }

    /// Fresnel coupling factor for the entrance face of the core.
    pub fn fresnel_losses(&self) -> f64 {
        fresnel::normal_transmittance(MEDIUM_REFR_INDEX, self.waveguide.n_core())
    }

    /// Angular coupling factor.
    ///
    /// Integrating a `cos^m` radiance over a cone of half-angle `theta`
    /// captures `1 - cos(theta)^(m + 1)` of the power. The slow and fast axis
    /// captures are combined through their geometric mean.
    pub fn angular_losses(&self) -> f64 {
        let cos_theta = self.waveguide.theta().cos();
        let capture = |axis: Axis| 1.0 - cos_theta.powf(self.laser.exponent(axis) as f64 + 1.0);

        (capture(Axis::Slow) * capture(Axis::Fast)).sqrt()
    }

    /// Total coupling efficiency at a separation of `x` um.
    pub fn total_efficiency(&self, x: f64) -> f64 {
        self.geometrical_losses(x) * self.fresnel_losses() * self.angular_losses()
    }

    /// All factors at a separation of `x` um.
    pub fn efficiency(&self, x: f64) -> Efficiency {
        let geometric = self.geometrical_losses(x);
        let fresnel = self.fresnel_losses();
        let angular = self.angular_losses();
        Efficiency {
            distance: x,
            overlap: self.overlap(x),
            geometric,
            fresnel,
            angular,
            total: geometric * fresnel * angular,
        }
    }
}
