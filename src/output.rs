use std::{fs::File, io::BufWriter, io::Write, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{settings::Settings, sweep::SweepResult};


/// Lower-case `name`, with every run of non-alphanumeric characters replaced
/// by a single underscore.
fn slug(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// File name for the table of a sweep: `efficiency_<waveguide>_<laser>`.
pub fn sweep_file_name(result: &SweepResult) -> String {
    format!(
        "efficiency_{}_{}",
        slug(&result.waveguide),
        slug(&result.laser)
    )
}

/// Write a sweep as whitespace separated columns
/// `x w_slow w_fast geometric total`, preceded by `#` comment lines.
pub fn write_sweep_table(path: &Path, result: &SweepResult) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# waveguide: {}", result.waveguide)?;
    writeln!(writer, "# laser: {}", result.laser)?;
    writeln!(writer, "# {}", result.label())?;
    writeln!(writer, "# fresnel: {}", result.fresnel)?;
    writeln!(writer, "# angular: {}", result.angular)?;
    writeln!(writer, "# x w_slow w_fast geometric total")?;

    for i in 0..result.len() {
        writeln!(
            writer,
            "{} {} {} {} {}",
            result.distances[i],
            result.w_slow[i],
            result.w_fast[i],
            result.geometric[i],
            result.total[i]
        )?;
    }
    writer.flush()?;

    Ok(())
}

#[derive(Serialize)]
struct SweepRecord<'a> {
    waveguide: &'a str,
    laser: &'a str,
    label: String,
    wavelength: f64,
    core_thickness: f64,
    fresnel: f64,
    angular: f64,
    peak: Option<(f64, f64)>,
    distances: Vec<f64>,
    w_slow: Vec<f64>,
    w_fast: Vec<f64>,
    geometric: Vec<f64>,
    total: Vec<f64>,
}

impl<'a> From<&'a SweepResult> for SweepRecord<'a> {
    fn from(result: &'a SweepResult) -> Self {
        Self {
            waveguide: &result.waveguide,
            laser: &result.laser,
            label: result.label(),
            wavelength: result.wavelength,
            core_thickness: result.core_thickness,
            fresnel: result.fresnel,
            angular: result.angular,
            peak: result.peak(),
            distances: result.distances.to_vec(),
            w_slow: result.w_slow.to_vec(),
            w_fast: result.w_fast.to_vec(),
            geometric: result.geometric.to_vec(),
            total: result.total.to_vec(),
        }
    }
}

/// Write every sweep to a single JSON array.
pub fn write_sweeps_json(path: &Path, results: &[SweepResult]) -> Result<()> {
    let records: Vec<SweepRecord> = results.iter().map(SweepRecord::from).collect();
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()?;
    Ok(())
}

/// Write the resolved settings next to the results so a run can be repeated.
pub fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    let text = toml::to_string(settings).context("failed to serialize settings")?;
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
