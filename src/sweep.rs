//! Coupling efficiency sweeps over the laser-to-waveguide separation.
//!
//! A sweep samples one [`CouplingCalculator`] over an array of separations.
//! [`MultiSweep`] runs a sweep for every waveguide and laser pairing listed in
//! the [`Settings`], in parallel, and writes the results to disk.
//!
//! # Key Features
//!
//! - [`SweepResult`]: per-distance beam widths and efficiency factors
//! - Peak and working-distance summaries
//! - Parallel execution with a progress bar

use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use itertools::iproduct;
use log::{info, warn};
use ndarray::Array1;
use rayon::prelude::*;

use crate::{
    calculator::CouplingCalculator,
    laser::{Axis, LaserDiode},
    output,
    settings::Settings,
    waveguide::Waveguide,
};

/// Efficiency of one waveguide and laser pairing across a range of separations.
///
/// Distances and beam half-widths are in um. The Fresnel and angular factors
/// do not depend on the separation and are stored once.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub waveguide: String,
    pub laser: String,
    pub wavelength: f64,
    pub core_thickness: f64,
    pub fresnel: f64,
    pub angular: f64,
    pub distances: Array1<f64>,
    pub w_slow: Array1<f64>,
    pub w_fast: Array1<f64>,
    pub geometric: Array1<f64>,
    pub total: Array1<f64>,
}

impl SweepResult {
    /// Samples `calculator` at every separation in `distances`.
    pub fn compute(
        waveguide: &str,
        laser: &str,
        calculator: &CouplingCalculator,
        distances: &Array1<f64>,
    ) -> Self {
        let ld = calculator.laser();
        let w_slow = distances.mapv(|x| ld.beam(Axis::Slow).half_width(x));
        let w_fast = distances.mapv(|x| ld.beam(Axis::Fast).half_width(x));
        let geometric = distances.mapv(|x| calculator.geometrical_losses(x));
        let total = distances.mapv(|x| calculator.total_efficiency(x));

        Self {
            waveguide: waveguide.to_string(),
            laser: laser.to_string(),
            wavelength: ld.wavelength(),
            core_thickness: calculator.waveguide().core_thickness(),
            fresnel: calculator.fresnel_losses(),
            angular: calculator.angular_losses(),
            distances: distances.clone(),
            w_slow,
            w_fast,
            geometric,
            total,
        }
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Legend text in the form `lambda = 405 nm, t = 50 um`.
    pub fn label(&self) -> String {
        format!(
            "lambda = {} nm, t = {} um",
            self.wavelength, self.core_thickness
        )
    }

    /// Separation and value of the highest sampled total efficiency. The
    /// closest separation wins when several samples share the maximum.
    pub fn peak(&self) -> Option<(f64, f64)> {
        let best = self.total.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        self.total
            .iter()
            .position(|&eta| eta == best)
            .map(|i| (self.distances[i], best))
    }

    /// Largest sampled separation up to which the total efficiency stays at
    /// or above `threshold`.
    ///
    /// Returns `None` if the first sample is already below the threshold.
    pub fn working_distance(&self, threshold: f64) -> Option<f64> {
        self.distances
            .iter()
            .zip(self.total.iter())
            .take_while(|&(_, &eta)| eta >= threshold)
            .last()
            .map(|(&x, _)| x)
    }
}

/// A named waveguide and laser combination to be swept.
#[derive(Debug, Clone, PartialEq)]
pub struct Pairing {
    pub waveguide: String,
    pub laser: String,
    pub calculator: CouplingCalculator,
}

/// Coupling sweeps over every waveguide and laser in the settings.
///
/// **Context**: Comparing sources and waveguides means evaluating the same
/// separation range for many combinations. Each combination is independent of
/// the others.
///
/// **How it Works**: Builds every waveguide and laser once, pairs them
/// waveguide-major, and sweeps the pairings in parallel with rayon. Results
/// keep the pairing order.
#[derive(Debug)]
pub struct MultiSweep {
    pub settings: Settings,
    pub distances: Array1<f64>,
    pub pairings: Vec<Pairing>,
    pub results: Vec<SweepResult>,
}

impl MultiSweep {
    /// Builds the components described by `settings`.
    ///
    /// Fails on the first waveguide or laser whose parameters are not
    /// physically defined.
    pub fn new(settings: Settings) -> Result<Self> {
        let waveguides: Vec<(String, Waveguide)> = settings
            .waveguides
            .iter()
            .map(|spec| {
                spec.build()
                    .map(|wg| (spec.name.clone(), wg))
                    .with_context(|| format!("invalid waveguide '{}'", spec.name))
            })
            .collect::<Result<_>>()?;
        let lasers: Vec<(String, LaserDiode)> = settings
            .lasers
            .iter()
            .map(|spec| {
                spec.build()
                    .map(|ld| (spec.name.clone(), ld))
                    .with_context(|| format!("invalid laser '{}'", spec.name))
            })
            .collect::<Result<_>>()?;

        let pairings = iproduct!(waveguides.iter(), lasers.iter())
            .map(|((wg_name, wg), (ld_name, ld))| Pairing {
                waveguide: wg_name.clone(),
                laser: ld_name.clone(),
                calculator: CouplingCalculator::new(*wg, *ld),
            })
            .collect();
        let distances = settings.sweep.distances();

        Ok(Self {
            settings,
            distances,
            pairings,
            results: Vec::new(),
        })
    }

    /// Runs every sweep, replacing any previous results.
    pub fn solve(&mut self) {
        let start = Instant::now();
        info!(
            "sweeping {} pairings over {} separations",
            self.pairings.len(),
            self.distances.len()
        );

        let pb = ProgressBar::new(self.pairings.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.green/blue} {pos:>5}/{len:5} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▇▆▅▄▃▂▁"),
        );
        pb.set_message("pairing".to_string());

        let distances = &self.distances;
        self.results = self
            .pairings
            .par_iter()
            .map(|pairing| {
                let result = SweepResult::compute(
                    &pairing.waveguide,
                    &pairing.laser,
                    &pairing.calculator,
                    distances,
                );
                pb.inc(1);
                result
            })
            .collect();
        pb.finish_and_clear();

        for result in self.results.iter().filter(|r| r.peak().is_none()) {
            warn!("sweep {} / {} sampled no separations", result.waveguide, result.laser);
        }
        info!("time taken: {:.2?}", start.elapsed());
    }

    /// One line per pairing with the fixed factors and the efficiency at the
    /// first and last sampled separation.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{:<16} {:<16} {:>8} {:>8} {:>10} {:>10}",
            "waveguide", "laser", "fresnel", "angular", "first", "last"
        )];
        for r in &self.results {
            let first = r.total.iter().next().copied().unwrap_or(f64::NAN);
            let last = r.total.iter().last().copied().unwrap_or(f64::NAN);
            lines.push(format!(
                "{:<16} {:<16} {:>8.4} {:>8.4} {:>10.4} {:>10.4}",
                r.waveguide, r.laser, r.fresnel, r.angular, first, last
            ));
        }
        lines.join("\n")
    }

    /// Writes one table per pairing to the output directory, plus a JSON file
    /// with all sweeps if enabled, plus the resolved settings.
    pub fn writeup(&self) -> Result<()> {
        let dir = &self.settings.output_dir;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;

        for result in &self.results {
            let path = dir.join(output::sweep_file_name(result));
            output::write_sweep_table(&path, result)?;
        }
        if self.settings.json {
            output::write_sweeps_json(&dir.join("sweeps.json"), &self.results)?;
        }
        output::write_settings(&dir.join("settings.toml"), &self.settings)?;

        info!("wrote {} sweeps to {}", self.results.len(), dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SweepSpec;
    use approx::assert_relative_eq;

    fn blue_on_af32() -> CouplingCalculator {
        CouplingCalculator::new(
            Waveguide::new(1.51, 1.465, 50.0, 1.0).unwrap(),
            LaserDiode::new(405.0, 9.0, 26.0).unwrap(),
        )
    }

    #[test]
    fn sweep_matches_direct_calls() {
        let calc = blue_on_af32();
        let distances = SweepSpec::default().distances();
        let sweep = SweepResult::compute("wg", "ld", &calc, &distances);

        assert_eq!(sweep.len(), 398);
        for (i, &x) in distances.iter().enumerate() {
            assert_eq!(sweep.total[i], calc.total_efficiency(x));
            assert_eq!(sweep.geometric[i], calc.geometrical_losses(x));
            assert_eq!((sweep.w_slow[i], sweep.w_fast[i]), calc.laser().beam_half_width(x));
        }
        assert_eq!(sweep.fresnel, calc.fresnel_losses());
        assert_eq!(sweep.angular, calc.angular_losses());
    }

    #[test]
    fn peak_is_at_the_closest_separation() {
        let calc = blue_on_af32();
        let sweep = SweepResult::compute("wg", "ld", &calc, &SweepSpec::default().distances());
        let (x, eta) = sweep.peak().unwrap();
        // full capture near the facet, so the first maximal sample wins
        assert_eq!(x, 1.0);
        assert_relative_eq!(eta, 0.887_181_407_184_320_9, max_relative = 1e-10);
    }

    #[test]
    fn working_distance() {
        let calc = blue_on_af32();
        let sweep = SweepResult::compute("wg", "ld", &calc, &SweepSpec::default().distances());
        let full = calc.total_efficiency(0.0);

        let x = sweep.working_distance(full).unwrap();
        assert!(x > 1.0 && x < 199.5, "x = {x}");
        assert_eq!(calc.total_efficiency(x), full);
        assert!(calc.total_efficiency(x + 0.5) < full);

        assert_eq!(sweep.working_distance(0.0), Some(199.5));
        assert_eq!(sweep.working_distance(0.99), None);
    }

    #[test]
    fn empty_sweep() {
        let calc = blue_on_af32();
        let sweep = SweepResult::compute("wg", "ld", &calc, &Array1::zeros(0));
        assert!(sweep.is_empty());
        assert_eq!(sweep.peak(), None);
        assert_eq!(sweep.working_distance(0.5), None);
    }

    #[test]
    fn label_mentions_wavelength_and_core() {
        let calc = blue_on_af32();
        let sweep = SweepResult::compute("wg", "ld", &calc, &Array1::zeros(1));
        assert_eq!(sweep.label(), "lambda = 405 nm, t = 50 um");
    }

    #[test]
    fn multisweep_pairs_waveguide_major() {
        let settings = crate::settings::load_default_config().unwrap();
        let mut multisweep = MultiSweep::new(settings).unwrap();
        assert_eq!(multisweep.pairings.len(), 8);
        assert_eq!(multisweep.pairings[0].waveguide, "af32-50um");
        assert_eq!(multisweep.pairings[0].laser, "blue-405");
        assert_eq!(multisweep.pairings[1].laser, "ir-980");
        assert_eq!(multisweep.pairings[4].waveguide, "af32-30um");

        multisweep.solve();
        assert_eq!(multisweep.results.len(), 8);
        for (pairing, result) in multisweep.pairings.iter().zip(&multisweep.results) {
            assert_eq!(pairing.waveguide, result.waveguide);
            assert_eq!(pairing.laser, result.laser);
            assert_eq!(result.len(), 398);
        }
        assert_eq!(multisweep.summary().lines().count(), 9);
    }

    #[test]
    fn invalid_component_is_reported_by_name() {
        let mut settings = crate::settings::load_default_config().unwrap();
        settings.lasers[2].fwhm_fast = 181.0;
        let err = MultiSweep::new(settings).unwrap_err();
        assert!(format!("{err:#}").contains("red-655"), "{err:#}");
    }
}
