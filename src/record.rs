//! Fixed-column record layout for PDB coordinate files.
//!
//! Every offset the analyzer reads is declared here once. Ranges are
//! 0-indexed and half-open, counted in characters.

/// A half-open column range `[start, end)` within a record line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Columns {
    pub start: usize,
    pub end: usize,
}

impl Columns {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Trimmed text of this range. Short lines give whatever part of the
    /// range exists, possibly `""`.
    pub fn slice(self, line: &str) -> &str {
        if line.is_ascii() {
            let from = self.start.min(line.len());
            let to = self.end.min(line.len()).max(from);
            return line[from..to].trim();
        }

        let byte_at = |n: usize| {
            line.char_indices()
                .nth(n)
                .map(|(i, _)| i)
                .unwrap_or(line.len())
        };
        let from = byte_at(self.start);
        let to = byte_at(self.end).max(from);
        line[from..to].trim()
    }
}

pub const ATOM_CHAIN_ID: Columns = Columns::new(21, 22);
pub const ATOM_RESIDUE_SEQ: Columns = Columns::new(22, 27);
pub const HELIX_START: Columns = Columns::new(21, 25);
pub const HELIX_END: Columns = Columns::new(33, 37);
pub const SHEET_START: Columns = Columns::new(22, 26);
pub const SHEET_END: Columns = Columns::new(33, 37);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Atom,
    Helix,
    Sheet,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Atom, RecordKind::Helix, RecordKind::Sheet];

    pub fn keyword(self) -> &'static str {
        match self {
            RecordKind::Atom => "ATOM",
            RecordKind::Helix => "HELIX",
            RecordKind::Sheet => "SHEET",
        }
    }

    /// Classifies a line by its leading keyword. Case-sensitive prefix
    /// match only; anything else is `None` and ignored by the analyzer.
    pub fn classify(line: &str) -> Option<RecordKind> {
        Self::ALL
            .into_iter()
            .find(|kind| line.starts_with(kind.keyword()))
    }

    /// Start/end residue columns of a secondary-structure range record.
    pub fn span_columns(self) -> Option<(Columns, Columns)> {
        match self {
            RecordKind::Atom => None,
            RecordKind::Helix => Some((HELIX_START, HELIX_END)),
            RecordKind::Sheet => Some((SHEET_START, SHEET_END)),
        }
    }
}

/// Parses a residue sequence number the lenient way PDB tooling in
/// browsers does: optional sign, at least one digit, and anything after
/// the digits (an insertion code, say) is ignored.
pub fn parse_seq_number(token: &str) -> Option<i64> {
    let token = token.trim();
    let (negative, rest) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = rest[..digits].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Residues covered by an annotated range, inclusive at both ends and
/// independent of the order the ends were written in.
pub fn span_length(start: i64, end: i64) -> u64 {
    end.abs_diff(start) + 1
}

/// Extracts the residue span of a HELIX or SHEET line. `None` when
/// either end fails to parse.
pub fn parse_span(kind: RecordKind, line: &str) -> Option<(i64, i64)> {
    let (start_cols, end_cols) = kind.span_columns()?;
    let start = parse_seq_number(start_cols.slice(line))?;
    let end = parse_seq_number(end_cols.slice(line))?;
    Some((start, end))
}
