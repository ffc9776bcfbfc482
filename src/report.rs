use std::io::{self, Write};
use std::str::FromStr;

use serde::Serialize;

use crate::analysis::{AnalysisResult, StructureClass, StructureType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "stats.txt",
            OutputFormat::Json => "stats.json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format '{s}'. Valid values: text, json")),
        }
    }
}

/// One analyzed file, ready to render.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub file: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
    #[serde(serialize_with = "as_label")]
    pub structure_type: StructureType,
    #[serde(serialize_with = "as_label")]
    pub predominant_structure: StructureClass,
}

fn as_label<T: ToString, S: serde::Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.to_string())
}

impl Report {
    pub fn new(file: impl Into<String>, result: AnalysisResult) -> Self {
        Self {
            file: file.into(),
            structure_type: result.structure_type(),
            predominant_structure: result.predominant_structure(),
            result,
        }
    }
}

pub fn render<W: Write>(report: &Report, format: OutputFormat, w: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_text(report, w),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, report)?;
            writeln!(w)
        }
    }
}

fn write_text<W: Write>(report: &Report, w: &mut W) -> io::Result<()> {
    let r = &report.result;
    writeln!(w, "# File: {}", report.file)?;
    writeln!(w)?;
    writeln!(w, "Total Atoms\t{}", r.total_atoms)?;
    writeln!(w, "Total Residues\t{}", r.total_residues)?;
    writeln!(w, "Chain Count\t{}", r.chain_count())?;
    let chains: Vec<String> = r.chains.iter().map(|c| format!("Chain {c}")).collect();
    writeln!(w, "Chains\t{}", chains.join(", "))?;
    writeln!(w)?;
    writeln!(w, "α-Helix\t{:.1}%", r.helix_percent)?;
    writeln!(w, "β-Sheet\t{:.1}%", r.sheet_percent)?;
    writeln!(w, "Random Coil\t{:.1}%", r.coil_percent)?;
    writeln!(w)?;
    writeln!(w, "Structure Type\t{}", report.structure_type)?;
    writeln!(w, "Predominant Structure\t{}", report.predominant_structure)?;
    Ok(())
}
