use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use memmap2::MmapOptions;

use crate::error::{Error, Result};

const EXTENSIONS: [&str; 2] = ["pdb", "txt"];
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn is_supported_extension(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    EXTENSIONS.contains(&ext.as_str())
}

/// Loads a structure file into memory as text.
///
/// Invalid UTF-8 is replaced rather than rejected and a leading byte order
/// mark is dropped. `max_bytes` is checked
/// against the file size before anything is read.
pub fn read_structure(path: &Path, use_mmap: bool, max_bytes: Option<u64>) -> Result<String> {
    if !is_supported_extension(path) {
        return Err(Error::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }

    let io_err = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let size = file.metadata().map_err(io_err)?.len();
    if let Some(limit) = max_bytes
        && size > limit
    {
        return Err(Error::TooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }

    // Mapping a zero-length file fails on some platforms.
    if use_mmap && size > 0 {
        let mmap = unsafe { MmapOptions::new().map(&file).map_err(io_err)? };
        tracing::debug!(path = %path.display(), size, "mapped structure file");
        return Ok(decode(&mmap));
    }

    let mut bytes = Vec::with_capacity(size as usize);
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(io_err)?;
    tracing::debug!(path = %path.display(), size, "read structure file");
    Ok(decode(&bytes))
}

/// UTF-8 decode with replacement characters, dropping a leading byte
/// order mark.
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn extension_filter() {
        assert!(is_supported_extension(Path::new("1abc.pdb")));
        assert!(is_supported_extension(Path::new("1abc.PDB")));
        assert!(is_supported_extension(Path::new("dir/notes.txt")));
        assert!(!is_supported_extension(Path::new("1abc.cif")));
        assert!(!is_supported_extension(Path::new("pdb")));
    }

    #[test]
    fn rejects_unsupported_extension_without_reading() {
        let err = read_structure(Path::new("missing.cif"), false, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedExtension { .. }));
    }

    #[test]
    fn reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_structure(&dir.path().join("nope.pdb"), false, None).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn buffered_and_mapped_reads_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.pdb", b"ATOM      1  N   ALA A   1\nEND\n");
        let buffered = read_structure(&path, false, None).unwrap();
        let mapped = read_structure(&path, true, None).unwrap();
        assert_eq!(buffered, mapped);
        assert!(buffered.starts_with("ATOM"));
    }

    #[test]
    fn empty_file_maps_to_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "empty.txt", b"");
        assert_eq!(read_structure(&path, true, None).unwrap(), "");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.pdb", b"REMARK \xff\nATOM");
        let text = read_structure(&path, false, None).unwrap();
        assert!(text.contains('\u{FFFD}'));
        assert!(text.ends_with("ATOM"));
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let pdb = b"\xEF\xBB\xBFATOM      1  N   ALA A   1\nATOM      2  CA  ALA A   1\n";
        let path = write_file(dir.path(), "bom.pdb", pdb);
        for use_mmap in [false, true] {
            let text = read_structure(&path, use_mmap, None).unwrap();
            assert!(text.starts_with("ATOM"));
            assert_eq!(crate::analyze(&text).total_atoms, 2);
        }
    }

    #[test]
    fn enforces_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "big.pdb", &[b'X'; 64]);
        let err = read_structure(&path, false, Some(10)).unwrap_err();
        assert!(matches!(err, Error::TooLarge { size: 64, limit: 10, .. }));
        assert!(read_structure(&path, false, Some(64)).is_ok());
    }
}
