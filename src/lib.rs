//! Structural statistics for PDB coordinate files: atom, residue and
//! chain counts plus helix/sheet/coil composition taken from the
//! HELIX and SHEET annotations.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

pub mod analysis;
pub mod error;
pub mod input;
pub mod record;
pub mod report;

#[cfg(feature = "python")]
mod python;

pub use analysis::{AnalysisResult, StructureClass, StructureType, analyze};
pub use error::{Error, Result};
pub use report::{OutputFormat, Report};

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub use_mmap: bool,
    pub max_bytes: Option<u64>,
}

/// Outcome of a batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub analyzed: usize,
    pub failed: usize,
}

/// Reads and analyzes a single structure file.
pub fn analyze_file(path: &Path, use_mmap: bool, max_bytes: Option<u64>) -> Result<AnalysisResult> {
    let text = input::read_structure(path, use_mmap, max_bytes)?;
    Ok(analyze(&text))
}

/// Analyzes every input in parallel and writes reports in input order.
///
/// Unreadable inputs, and inputs whose report file another input already
/// claimed, are logged and counted; only output failures abort the run.
pub fn run(config: &Config) -> Result<Summary> {
    if config.inputs.is_empty() {
        return Err(Error::NoInput);
    }
    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir).map_err(|source| Error::Write {
            path: dir.clone(),
            source,
        })?;
    }

    let outcomes: Vec<Result<AnalysisResult>> = config
        .inputs
        .par_iter()
        .map(|path| analyze_file(path, config.use_mmap, config.max_bytes))
        .collect();

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let mut summary = Summary::default();
    let mut written: HashSet<PathBuf> = HashSet::new();
    for (path, outcome) in config.inputs.iter().zip(outcomes) {
        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!("{err}");
                summary.failed += 1;
                continue;
            }
        };
        let report = Report::new(path.display().to_string(), result);

        match &config.output_dir {
            Some(dir) => {
                let out_path = report_path(dir, path, config.format);
                if !written.insert(out_path.clone()) {
                    let err = Error::OutputCollision {
                        input: path.clone(),
                        output: out_path,
                    };
                    tracing::warn!("{err}");
                    summary.failed += 1;
                    continue;
                }
                write_report(&report, config.format, &out_path)?;
                tracing::info!(input = %path.display(), output = %out_path.display(), "wrote report");
            }
            None => {
                if summary.analyzed > 0 {
                    writeln!(stdout)?;
                }
                report::render(&report, config.format, &mut stdout)?;
            }
        }
        summary.analyzed += 1;
    }
    stdout.flush()?;

    tracing::debug!(analyzed = summary.analyzed, failed = summary.failed, "run complete");
    Ok(summary)
}

fn write_report(report: &Report, format: OutputFormat, out_path: &Path) -> Result<()> {
    let write_err = |source: io::Error| Error::Write {
        path: out_path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(out_path).map_err(write_err)?);
    report::render(report, format, &mut w).map_err(write_err)?;
    w.flush().map_err(write_err)
}

fn report_path(dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .filter(|s| !s.is_empty())
        .unwrap_or("structure".into());
    dir.join(format!("{stem}.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDB: &str = concat!(
        "HELIX    1   1 ALA A    1  ALA A    2  1                                   2\n",
        "ATOM      1  N   ALA A   1      11.104  13.207   2.100  1.00 20.00           N\n",
        "ATOM      2  CA  ALA A   1      11.504  13.607   2.500  1.00 20.00           C\n",
        "ATOM      3  N   ALA A   2      12.304  14.407   3.300  1.00 20.00           N\n",
        "ATOM      4  N   GLY B   1      13.504  15.607   4.500  1.00 20.00           N\n",
        "END\n",
    );

    #[test]
    fn report_path_uses_input_stem() {
        let path = report_path(Path::new("out"), Path::new("data/1abc.pdb"), OutputFormat::Json);
        assert_eq!(path, Path::new("out/1abc.stats.json"));
        let path = report_path(Path::new("out"), Path::new("x.txt"), OutputFormat::Text);
        assert_eq!(path, Path::new("out/x.stats.txt"));
    }

    #[test]
    fn run_without_inputs_fails() {
        let err = run(&Config::default()).unwrap_err();
        assert!(matches!(err, Error::NoInput));
    }

    #[test]
    fn run_writes_reports_and_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("1abc.pdb");
        fs::write(&input, PDB).unwrap();
        let out_dir = dir.path().join("reports");

        let config = Config {
            inputs: vec![input, dir.path().join("missing.pdb"), dir.path().join("x.cif")],
            output_dir: Some(out_dir.clone()),
            format: OutputFormat::Json,
            ..Config::default()
        };
        let summary = run(&config).unwrap();
        assert_eq!(summary, Summary { analyzed: 1, failed: 2 });

        let json = fs::read_to_string(out_dir.join("1abc.stats.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalAtoms"], 4);
        assert_eq!(value["totalResidues"], 3);
        assert_eq!(value["helixResidueCount"], 2);
        assert_eq!(value["chains"], serde_json::json!(["A", "B"]));
    }

    #[test]
    fn run_refuses_to_overwrite_a_report_with_the_same_stem() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("1abc.pdb");
        let second = dir.path().join("1abc.txt");
        fs::write(&first, PDB).unwrap();
        fs::write(&second, "ATOM      1  N   ALA C   7\n").unwrap();
        let out_dir = dir.path().join("reports");

        let config = Config {
            inputs: vec![first, second],
            output_dir: Some(out_dir.clone()),
            format: OutputFormat::Json,
            ..Config::default()
        };
        let summary = run(&config).unwrap();
        assert_eq!(summary, Summary { analyzed: 1, failed: 1 });

        let written: Vec<_> = fs::read_dir(&out_dir).unwrap().collect();
        assert_eq!(written.len(), 1);
        let json = fs::read_to_string(out_dir.join("1abc.stats.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalAtoms"], 4);
    }

    #[test]
    fn unwritable_output_dir_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("1abc.pdb");
        fs::write(&input, PDB).unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let config = Config {
            inputs: vec![input],
            output_dir: Some(blocker.clone()),
            ..Config::default()
        };
        match run(&config).unwrap_err() {
            Error::Write { path, .. } => assert_eq!(path, blocker),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn analyze_file_matches_in_memory_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("s.txt");
        fs::write(&input, PDB).unwrap();
        assert_eq!(analyze_file(&input, true, None).unwrap(), analyze(PDB));
    }
}
