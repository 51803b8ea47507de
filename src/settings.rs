use anyhow::{ensure, Context, Result};
use clap::Parser;
use config::{Config, Environment, File};
use itertools::Itertools;
use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{SWEEP_START, SWEEP_STEP, SWEEP_STOP};
use crate::errors::CouplingError;
use crate::laser::LaserDiode;
use crate::waveguide::Waveguide;

/// Physical description of a waveguide as it appears in a configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WaveguideSpec {
    pub name: String,
    pub n_core: f64,
    pub n_clad: f64,
    /// Edge length of the square core, um.
    pub core_thickness: f64,
    /// Cladding thickness, um.
    #[serde(default = "default_clad_thickness")]
    pub clad_thickness: f64,
}

impl WaveguideSpec {
    pub fn build(&self) -> std::result::Result<Waveguide, CouplingError> {
        Waveguide::new(
            self.n_core,
            self.n_clad,
            self.core_thickness,
            self.clad_thickness,
        )
    }
}

fn default_clad_thickness() -> f64 {
    1.0
}

/// Physical description of a laser diode as it appears in a configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LaserSpec {
    pub name: String,
    /// Emission wavelength, nm.
    pub wavelength: f64,
    /// Slow axis FWHM divergence, deg.
    pub fwhm_slow: f64,
    /// Fast axis FWHM divergence, deg.
    pub fwhm_fast: f64,
}

impl LaserSpec {
    pub fn build(&self) -> std::result::Result<LaserDiode, CouplingError> {
        LaserDiode::new(self.wavelength, self.fwhm_slow, self.fwhm_fast)
    }
}

/// Separations sampled by a sweep, `start..stop` in steps of `step` (um).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct SweepSpec {
    #[serde(default = "default_start")]
    pub start: f64,
    #[serde(default = "default_stop")]
    pub stop: f64,
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_start() -> f64 {
    SWEEP_START
}

fn default_stop() -> f64 {
    SWEEP_STOP
}

fn default_step() -> f64 {
    SWEEP_STEP
}

impl Default for SweepSpec {
    fn default() -> Self {
        Self {
            start: SWEEP_START,
            stop: SWEEP_STOP,
            step: SWEEP_STEP,
        }
    }
}

impl SweepSpec {
    /// The sampled separations. `stop` is excluded.
    pub fn distances(&self) -> Array1<f64> {
        Array1::range(self.start, self.stop, self.step)
    }
}

/// Runtime configuration for the application.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub sweep: SweepSpec,
    pub waveguides: Vec<WaveguideSpec>,
    pub lasers: Vec<LaserSpec>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Loads the configuration shipped in `config/default.toml`, without
/// environment or command-line overrides.
pub fn load_default_config() -> Result<Settings> {
    let root = retrieve_project_root()?;
    let config = read_config_file(&root.join("config/default.toml"), false)?;
    validate_config(&config)?;
    Ok(config)
}

/// Loads the configuration for the binary: config file, then `LDCOUPLE_*`
/// environment variables, then command-line flags.
pub fn load_config() -> Result<Settings> {
    load_config_with(CliArgs::parse())
}

/// As [`load_config`], with already parsed command-line arguments.
pub fn load_config_with(args: CliArgs) -> Result<Settings> {
    let config_file = match &args.config {
        Some(path) => path.clone(),
        None => {
            let root = retrieve_project_root()?;
            let default_config_file = root.join("config/default.toml");
            let local_config = root.join("config/local.toml");

            // Check if local config exists, if not use default
            if local_config.exists() {
                local_config
            } else {
                default_config_file
            }
        }
    };
    info!("using configuration: {}", config_file.display());

    let mut config = read_config_file(&config_file, true)?;

    if let Some(start) = args.start {
        config.sweep.start = start;
    }
    if let Some(stop) = args.stop {
        config.sweep.stop = stop;
    }
    if let Some(step) = args.step {
        config.sweep.step = step;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if args.json {
        config.json = true;
    }

    validate_config(&config)?;

    Ok(config)
}

fn read_config_file(path: &Path, with_env: bool) -> Result<Settings> {
    let mut builder = Config::builder().add_source(File::from(path.to_path_buf()).required(true));
    if with_env {
        builder = builder.add_source(
            Environment::with_prefix("ldcouple")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
    }

    let settings = builder
        .build()
        .with_context(|| format!("error loading configuration {}", path.display()))?;

    settings
        .try_deserialize()
        .with_context(|| format!("error deserializing configuration {}", path.display()))
}

/// Retrieve the project root directory.
/// This function tries to find the project root directory in different ways:
/// 1. If the CARGO_MANIFEST_DIR environment variable is set, use it.
/// 2. If the LDCOUPLE_ROOT_DIR environment variable is set, use it.
/// 3. If the "config" subdirectory is found in the executable directory or any of its parents, use it.
fn retrieve_project_root() -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        return Ok(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var("LDCOUPLE_ROOT_DIR") {
        return Ok(PathBuf::from(path));
    }

    let exe_path = env::current_exe().context("failed to get current executable path")?;
    exe_path
        .ancestors()
        .skip(1)
        .find(|dir| dir.join("config").is_dir())
        .map(Path::to_path_buf)
        .context("could not find a project root containing a config directory")
}

/// Rejects configurations that are well-formed but physically meaningless.
pub fn validate_config(config: &Settings) -> Result<()> {
    ensure!(!config.waveguides.is_empty(), "at least one waveguide is required");
    ensure!(!config.lasers.is_empty(), "at least one laser is required");
    ensure!(
        config.waveguides.iter().map(|w| &w.name).all_unique(),
        "waveguide names must be unique"
    );
    ensure!(
        config.lasers.iter().map(|l| &l.name).all_unique(),
        "laser names must be unique"
    );

    for wg in &config.waveguides {
        ensure!(
            wg.core_thickness > 0.0,
            "waveguide '{}': core thickness must be greater than 0",
            wg.name
        );
        ensure!(
            wg.clad_thickness >= 0.0,
            "waveguide '{}': cladding thickness must not be negative",
            wg.name
        );
        ensure!(
            wg.n_clad > 0.0 && wg.n_core > wg.n_clad,
            "waveguide '{}': expected 0 < n_clad < n_core",
            wg.name
        );
    }
    for ld in &config.lasers {
        ensure!(
            ld.wavelength > 0.0,
            "laser '{}': wavelength must be greater than 0",
            ld.name
        );
    }

    let sweep = &config.sweep;
    ensure!(sweep.start >= 0.0, "sweep start must not be negative");
    ensure!(sweep.step > 0.0, "sweep step must be greater than 0");
    ensure!(sweep.stop > sweep.start, "sweep stop must exceed sweep start");

    Ok(())
}

#[derive(Parser, Debug, Default)]
#[command(version, about = "ldcouple - laser diode to waveguide coupling efficiency")]
pub struct CliArgs {
    /// Configuration file. Defaults to config/local.toml if present, otherwise
    /// config/default.toml, under the project root.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First separation between laser facet and waveguide, in um.
    #[arg(long)]
    pub start: Option<f64>,

    /// End of the separation sweep (exclusive), in um.
    #[arg(long)]
    pub stop: Option<f64>,

    /// Separation step, in um.
    #[arg(long)]
    pub step: Option<f64>,

    /// Directory for the output files.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write all sweeps to a single JSON file.
    #[arg(long)]
    pub json: bool,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settings:")?;
        writeln!(f, "  - Waveguides:")?;
        for wg in &self.waveguides {
            writeln!(
                f,
                "    - {}: n_core {:.4}, n_clad {:.4}, core {} um",
                wg.name, wg.n_core, wg.n_clad, wg.core_thickness
            )?;
        }
        writeln!(f, "  - Lasers:")?;
        for ld in &self.lasers {
            writeln!(
                f,
                "    - {}: {} nm, FWHM {} / {} deg",
                ld.name, ld.wavelength, ld.fwhm_slow, ld.fwhm_fast
            )?;
        }
        writeln!(
            f,
            "  - Sweep: {} to {} um, step {} um",
            self.sweep.start, self.sweep.stop, self.sweep.step
        )?;
        writeln!(f, "  - Output: {}", self.output_dir.display())
    }
}
