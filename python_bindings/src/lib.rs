use std::path::PathBuf;

use lib_conserve::{
    alignment::ungapped,
    color::{Color, ColorScheme},
    error::{Error, Result},
    mapper::{ConservationMapper, MapperConfig},
    renderer::{Renderer, ResidueSpec},
};
use log::debug;
use pyo3::{exceptions::PyRuntimeError, prelude::*};
use pythonize::pythonize;

/// Issues commands to a running PyMOL session through `pymol.cmd`.
struct PymolRenderer<'py> {
    cmd: Bound<'py, PyAny>,
}

impl<'py> PymolRenderer<'py> {
    fn new(py: Python<'py>) -> PyResult<Self> {
        let cmd = PyModule::import(py, "pymol")?.getattr("cmd")?;
        Ok(Self { cmd })
    }

    fn color(&self, color: Color, selection: &str) -> Result<()> {
        self.cmd
            .call_method1("color", (color.to_string(), selection))
            .map(|_| ())
            .map_err(renderer_error)
    }
}

fn renderer_error(error: PyErr) -> Error {
    Error::Renderer(error.to_string())
}

impl Renderer for PymolRenderer<'_> {
    fn structure_sequence(&mut self, selection: &str) -> Result<String> {
        let fasta: String = self
            .cmd
            .call_method1("get_fastastr", (selection,))
            .and_then(|fasta| fasta.extract())
            .map_err(renderer_error)?;

        // One record per chain; their sequences are concatenated.
        let sequence = fasta
            .lines()
            .filter(|line| !line.starts_with('>'))
            .map(str::trim)
            .collect::<String>();
        Ok(ungapped(&sequence))
    }

    fn clone_object(&mut self, selection: &str, new_name: &str) -> Result<()> {
        debug!("create {new_name}, {selection}");
        self.cmd
            .call_method1("create", (new_name, selection))
            .map(|_| ())
            .map_err(renderer_error)
    }

    fn color_object(&mut self, name: &str, color: Color) -> Result<()> {
        self.color(color, name)
    }

    fn color_residues(&mut self, name: &str, residues: ResidueSpec, color: Color) -> Result<()> {
        self.color(color, &residues.selection(name))
    }
}

/// Color a copy of a structure selection by the conservation of an alignment
///
/// The copy is called `<selection>_conservation_profile`.
/// Residue `i` of the selection must correspond to the `i`th non-gap residue of the reference.
/// Returns the conservation report as a dictionary.
#[pyfunction]
#[pyo3(name = "conserve", signature = (selection, reference, alignment, color_scheme="reds"))]
fn map_conservation<'py>(
    py: Python<'py>,
    selection: &str,
    reference: &str,
    alignment: PathBuf,
    color_scheme: &str,
) -> PyResult<Bound<'py, PyAny>> {
    let color_scheme: ColorScheme = color_scheme.parse().map_err(PyRuntimeError::new_err)?;
    let config =
        MapperConfig::new(selection, reference, alignment).with_color_scheme(color_scheme);
    let renderer = PymolRenderer::new(py)?;

    let report = ConservationMapper::new(config, renderer)
        .run()
        .map_err(|error| PyRuntimeError::new_err(error.to_string()))?;

    py.import("builtins")?
        .call_method1("print", (report.to_string(),))?;
    Ok(pythonize(py, &report)?)
}

/// Register `conserve` as a PyMOL command.
#[pyfunction]
fn register(py: Python<'_>) -> PyResult<()> {
    let command = wrap_pyfunction!(map_conservation, py)?;
    PyModule::import(py, "pymol")?
        .getattr("cmd")?
        .call_method1("extend", ("conserve", command))?;
    Ok(())
}

/// Bindings for the `lib_conserve` library.
#[pymodule]
fn conserve_pymol(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();
    m.add_function(wrap_pyfunction!(map_conservation, m)?)?;
    m.add_function(wrap_pyfunction!(register, m)?)?;
    Ok(())
}
