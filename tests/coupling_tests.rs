use std::{fs::File, io::BufReader, path::Path};

use approx::assert_relative_eq;
use ldcouple::{
    calculator::{CouplingCalculator, Overlap},
    laser::{Axis, LaserDiode},
    settings::SweepSpec,
    sweep::SweepResult,
    waveguide::Waveguide,
};

// Relative tolerance against the reference tables
const TOL: f64 = 1e-9;

fn blue_on_af32() -> CouplingCalculator {
    CouplingCalculator::new(
        Waveguide::new(1.51, 1.465, 50.0, 1.0).unwrap(),
        LaserDiode::new(405.0, 9.0, 26.0).unwrap(),
    )
}

#[test]
fn blue_diode_into_af32_at_facet() {
    let calc = blue_on_af32();

    assert_eq!(calc.laser().exponent(Axis::Slow), 224);
    assert_eq!(calc.laser().exponent(Axis::Fast), 26);

    let (w_slow, w_fast) = calc.laser().beam_half_width(0.0);
    assert!(w_slow < 1.0 && w_fast < 1.0);
    assert_eq!(calc.overlap(0.0), Overlap::FullCapture);
    assert_eq!(calc.geometrical_losses_at_origin(), 1.0);

    let fresnel = calc.fresnel_losses();
    assert!((fresnel - 0.9590).abs() < 5e-4, "fresnel = {fresnel}");
    assert_relative_eq!(fresnel, 0.958_714_941_032_682_1, max_relative = 1e-12);

    let theta = calc.waveguide().theta();
    let expected_angular = ((1.0 - theta.cos().powf(225.0)) * (1.0 - theta.cos().powf(27.0))).sqrt();
    assert_eq!(calc.angular_losses(), expected_angular);

    let total = calc.total_efficiency(0.0);
    assert_eq!(total, 1.0 * fresnel * expected_angular);
    assert_relative_eq!(total, 0.887_181_407_184_320_9, max_relative = 1e-10);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let calc = blue_on_af32();
    for x in [0.0, 12.5, 199.5, 750.0] {
        assert_eq!(calc.geometrical_losses(x).to_bits(), calc.geometrical_losses(x).to_bits());
        assert_eq!(calc.total_efficiency(x).to_bits(), calc.total_efficiency(x).to_bits());
    }
    assert_eq!(calc.angular_losses().to_bits(), calc.angular_losses().to_bits());
    assert_eq!(calc.fresnel_losses().to_bits(), calc.fresnel_losses().to_bits());
}

#[test]
fn shared_across_threads() {
    let calc = blue_on_af32();
    let expected: Vec<f64> = (0..100).map(|i| calc.total_efficiency(i as f64 * 5.0)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(move || {
                (0..100)
                    .map(|i| calc.total_efficiency(i as f64 * 5.0))
                    .collect::<Vec<f64>>()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn blue405_af32_50um_reference() {
    let calc = blue_on_af32();
    let reference = load_reference("blue405_af32_50um").unwrap();
    compare_with_reference(&calc, &reference, TOL);
}

#[test]
fn ir980_af32_30um_reference() {
    let calc = CouplingCalculator::new(
        Waveguide::new(1.51, 1.465, 30.0, 1.0).unwrap(),
        LaserDiode::new(980.0, 13.0, 30.0).unwrap(),
    );
    let reference = load_reference("ir980_af32_30um").unwrap();
    compare_with_reference(&calc, &reference, TOL);
}

#[test]
fn sweep_reproduces_reference() {
    let calc = blue_on_af32();
    let distances = SweepSpec {
        start: 0.0,
        stop: 1025.0,
        step: 25.0,
    }
    .distances();
    let sweep = SweepResult::compute("af32-50um", "blue-405", &calc, &distances);
    let reference = load_reference("blue405_af32_50um").unwrap();

    assert_eq!(sweep.len(), reference.len());
    for (i, row) in reference.iter().enumerate() {
        assert_eq!(sweep.distances[i], row[0]);
        assert_relative_eq!(sweep.total[i], row[4], max_relative = TOL);
    }
}

/// Rows of `x w_slow w_fast geometric total`.
fn load_reference(filename: &str) -> Result<Vec<Vec<f64>>, Box<dyn std::error::Error>> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test_data")
        .join(filename);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut data = Vec::new();

    for line in std::io::BufRead::lines(reader) {
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|s| s.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()?;
        data.push(row);
    }

    Ok(data)
}

fn compare_with_reference(calc: &CouplingCalculator, reference: &[Vec<f64>], tolerance: f64) {
    assert!(!reference.is_empty());
    for row in reference {
        let x = row[0];
        let (w_slow, w_fast) = calc.laser().beam_half_width(x);
        assert_relative_eq!(w_slow, row[1], max_relative = tolerance);
        assert_relative_eq!(w_fast, row[2], max_relative = tolerance);
        assert_relative_eq!(calc.geometrical_losses(x), row[3], max_relative = tolerance);
        assert_relative_eq!(calc.total_efficiency(x), row[4], max_relative = tolerance);
    }
}
