use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::record::{self, ATOM_CHAIN_ID, ATOM_RESIDUE_SEQ, RecordKind};

/// Statistics extracted from one structure file.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub total_atoms: usize,
    pub total_residues: usize,
    /// Distinct non-empty chain identifiers, sorted.
    pub chains: Vec<String>,
    pub helix_residue_count: u64,
    pub sheet_residue_count: u64,
    pub helix_percent: f64,
    pub sheet_percent: f64,
    pub coil_percent: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StructureClass {
    HelixDominant,
    SheetDominant,
    Mixed,
}

impl StructureClass {
    pub fn label(self) -> &'static str {
        match self {
            StructureClass::HelixDominant => "α-Helix Dominant",
            StructureClass::SheetDominant => "β-Sheet Dominant",
            StructureClass::Mixed => "Mixed Structure",
        }
    }
}

impl fmt::Display for StructureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StructureType {
    Experimental,
    Unknown,
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureType::Experimental => f.write_str("Experimental"),
            StructureType::Unknown => f.write_str("Unknown"),
        }
    }
}

impl AnalysisResult {
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Compares helix and sheet content; a tie is `Mixed`.
    pub fn predominant_structure(&self) -> StructureClass {
        if self.helix_percent > self.sheet_percent {
            StructureClass::HelixDominant
        } else if self.sheet_percent > self.helix_percent {
            StructureClass::SheetDominant
        } else {
            StructureClass::Mixed
        }
    }

    pub fn structure_type(&self) -> StructureType {
        if self.total_atoms > 0 {
            StructureType::Experimental
        } else {
            StructureType::Unknown
        }
    }
}

/// Computes atom, residue and chain counts plus helix/sheet/coil
/// composition from the full text of a PDB file.
///
/// Never fails. Short or malformed lines contribute empty fields or
/// nothing at all, and unrecognised records are skipped.
///
/// Residues are keyed by `(chain id, residue seq)` so the same number in
/// two chains counts twice. An ATOM line without a chain id still adds a
/// residue under the empty chain id.
///
/// Helix and sheet percentages are clamped independently and never
/// reconciled against each other, so overlapping annotations can leave
/// the three percentages summing to more than 100. With no residues all
/// three are 0, coil included.
pub fn analyze(text: &str) -> AnalysisResult {
    let mut total_atoms = 0usize;
    let mut chains: HashSet<&str> = HashSet::new();
    let mut residues: HashSet<(&str, &str)> = HashSet::new();
    let mut helix_residue_count = 0u64;
    let mut sheet_residue_count = 0u64;
    let mut skipped_spans = 0usize;

    for line in text.lines() {
        let Some(kind) = RecordKind::classify(line) else {
            continue;
        };
        match kind {
            RecordKind::Atom => {
                total_atoms += 1;
                let chain_id = ATOM_CHAIN_ID.slice(line);
                let residue_seq = ATOM_RESIDUE_SEQ.slice(line);
                if !chain_id.is_empty() {
                    chains.insert(chain_id);
                }
                residues.insert((chain_id, residue_seq));
            }
            RecordKind::Helix | RecordKind::Sheet => {
                let Some((start, end)) = record::parse_span(kind, line) else {
                    skipped_spans += 1;
                    continue;
                };
                let span = record::span_length(start, end);
                if kind == RecordKind::Helix {
                    helix_residue_count += span;
                } else {
                    sheet_residue_count += span;
                }
            }
        }
    }

    let total_residues = residues.len();
    let helix_percent = percent_of(helix_residue_count, total_residues);
    let sheet_percent = percent_of(sheet_residue_count, total_residues);
    let coil_percent = if total_residues == 0 {
        0.0
    } else {
        clamp_percent((100.0 - helix_percent - sheet_percent).max(0.0))
    };

    let mut chains: Vec<String> = chains.into_iter().map(str::to_owned).collect();
    chains.sort_unstable();

    tracing::debug!(
        total_atoms,
        total_residues,
        chains = chains.len(),
        helix_residue_count,
        sheet_residue_count,
        skipped_spans,
        "analyzed structure"
    );

    AnalysisResult {
        total_atoms,
        total_residues,
        chains,
        helix_residue_count,
        sheet_residue_count,
        helix_percent,
        sheet_percent,
        coil_percent,
    }
}

fn percent_of(count: u64, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    clamp_percent(100.0 * count as f64 / total as f64)
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
