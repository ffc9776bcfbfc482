//! Python bindings for the structure analyzer.

use std::path::PathBuf;

use pyo3::prelude::*;

/// Statistics for one structure file.
#[pyclass(frozen, name = "AnalysisResult")]
pub struct PyAnalysisResult {
    #[pyo3(get)]
    total_atoms: usize,
    #[pyo3(get)]
    total_residues: usize,
    #[pyo3(get)]
    chains: Vec<String>,
    #[pyo3(get)]
    helix_residue_count: u64,
    #[pyo3(get)]
    sheet_residue_count: u64,
    #[pyo3(get)]
    helix_percent: f64,
    #[pyo3(get)]
    sheet_percent: f64,
    #[pyo3(get)]
    coil_percent: f64,
    #[pyo3(get)]
    structure_type: String,
    #[pyo3(get)]
    predominant_structure: String,
}

impl From<crate::AnalysisResult> for PyAnalysisResult {
    fn from(r: crate::AnalysisResult) -> Self {
        Self {
            structure_type: r.structure_type().to_string(),
            predominant_structure: r.predominant_structure().to_string(),
            total_atoms: r.total_atoms,
            total_residues: r.total_residues,
            chains: r.chains,
            helix_residue_count: r.helix_residue_count,
            sheet_residue_count: r.sheet_residue_count,
            helix_percent: r.helix_percent,
            sheet_percent: r.sheet_percent,
            coil_percent: r.coil_percent,
        }
    }
}

#[pymethods]
impl PyAnalysisResult {
    fn __repr__(&self) -> String {
        format!(
            "AnalysisResult(total_atoms={}, total_residues={}, chains={:?}, helix={:.1}%, sheet={:.1}%, coil={:.1}%)",
            self.total_atoms,
            self.total_residues,
            self.chains,
            self.helix_percent,
            self.sheet_percent,
            self.coil_percent
        )
    }
}

#[pyfunction]
fn analyze(py: Python<'_>, text: String) -> PyAnalysisResult {
    py.detach(|| crate::analyze(&text)).into()
}

#[pyfunction]
#[pyo3(signature = (path, use_mmap=false))]
fn analyze_file(py: Python<'_>, path: PathBuf, use_mmap: bool) -> PyResult<PyAnalysisResult> {
    py.detach(|| crate::analyze_file(&path, use_mmap, None))
        .map(Into::into)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
}

#[pymodule]
fn pdbstat(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAnalysisResult>()?;
    m.add_function(wrap_pyfunction!(analyze, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_file, m)?)?;
    Ok(())
}
