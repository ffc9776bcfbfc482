use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures at the file boundary. Analysis itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: not a PDB file (expected .pdb or .txt)", path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("{}: {size} bytes exceeds the {limit} byte limit", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("no input files given")]
    NoInput,

    #[error("{}: report would overwrite {}", input.display(), output.display())]
    OutputCollision { input: PathBuf, output: PathBuf },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
