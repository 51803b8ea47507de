use ldcouple::{
    calculator::CouplingCalculator,
    errors::CouplingError,
    laser::{Axis, LaserDiode},
    waveguide::Waveguide,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_py_err(err: CouplingError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// A waveguide with a squared cross section.
#[pyclass(frozen, name = "SquaredWaveguide")]
#[derive(Clone)]
struct PyWaveguide(Waveguide);

#[pymethods]
impl PyWaveguide {
    #[new]
    fn py_new(n_core: f64, n_clad: f64, core_thickness: f64, clad_thickness: f64) -> PyResult<Self> {
        Waveguide::new(n_core, n_clad, core_thickness, clad_thickness)
            .map(Self)
            .map_err(to_py_err)
    }

    #[getter]
    fn n_core(&self) -> f64 {
        self.0.n_core()
    }

    #[getter]
    fn n_clad(&self) -> f64 {
        self.0.n_clad()
    }

    #[getter]
    fn core_thickness(&self) -> f64 {
        self.0.core_thickness()
    }

    #[getter]
    fn clad_thickness(&self) -> f64 {
        self.0.clad_thickness()
    }

    /// Acceptance angle in rad.
    #[getter]
    fn theta(&self) -> f64 {
        self.0.theta()
    }
}

/// A laser diode object.
#[pyclass(frozen, name = "LaserDiode")]
#[derive(Clone)]
struct PyLaserDiode(LaserDiode);

#[pymethods]
impl PyLaserDiode {
    #[new]
    fn py_new(lda: f64, fwhm_slow: f64, fwhm_fast: f64) -> PyResult<Self> {
        LaserDiode::new(lda, fwhm_slow, fwhm_fast)
            .map(Self)
            .map_err(to_py_err)
    }

    #[getter]
    fn lda(&self) -> f64 {
        self.0.wavelength()
    }

    #[getter]
    fn l_coefficient(&self) -> u64 {
        self.0.exponent(Axis::Slow)
    }

    #[getter]
    fn t_coefficient(&self) -> u64 {
        self.0.exponent(Axis::Fast)
    }

    /// (half divergence angle, waist, Rayleigh range) of the slow axis.
    #[getter]
    fn slow_axis(&self) -> (f64, f64, f64) {
        let beam = self.0.beam(Axis::Slow);
        (beam.half_divergence, beam.waist, beam.rayleigh_range)
    }

    /// (half divergence angle, waist, Rayleigh range) of the fast axis.
    #[getter]
    fn fast_axis(&self) -> (f64, f64, f64) {
        let beam = self.0.beam(Axis::Fast);
        (beam.half_divergence, beam.waist, beam.rayleigh_range)
    }

    fn calculate_beam_width(&self, x: f64) -> (f64, f64) {
        self.0.beam_half_width(x)
    }
}

/// Calculate coupling efficiency between a laser diode and a squared waveguide.
///
/// Passing anything other than a SquaredWaveguide and a LaserDiode raises
/// TypeError during argument extraction.
#[pyclass(frozen, name = "Calculator")]
struct PyCalculator(CouplingCalculator);

#[pymethods]
impl PyCalculator {
    #[new]
    fn py_new(waveguide: PyWaveguide, laserdiode: PyLaserDiode) -> Self {
        Self(CouplingCalculator::new(waveguide.0, laserdiode.0))
    }

    #[pyo3(signature = (x = 0.0))]
    fn geometrical_losses(&self, x: f64) -> f64 {
        self.0.geometrical_losses(x)
    }

    fn fresnel_losses(&self) -> f64 {
        self.0.fresnel_losses()
    }

    fn angular_losses(&self) -> f64 {
        self.0.angular_losses()
    }

    fn total_efficiency(&self, x: f64) -> f64 {
        self.0.total_efficiency(x)
    }

    /// Total efficiency sampled at every distance in `xs`.
    fn sweep(&self, xs: Vec<f64>) -> Vec<f64> {
        xs.into_iter().map(|x| self.0.total_efficiency(x)).collect()
    }
}

#[pymodule]
fn _ldcouple_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyWaveguide>()?;
    m.add_class::<PyLaserDiode>()?;
    m.add_class::<PyCalculator>()?;
    Ok(())
}
