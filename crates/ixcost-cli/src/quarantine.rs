use ixcost_core::error::CostError;
use std::fs;
use std::path::{Path, PathBuf};

/// Move a source file into the quarantine directory, creating it if needed.
///
/// Falls back to copy-and-delete when a rename crosses filesystems.
pub fn relocate(source: &Path, dir: &Path) -> Result<PathBuf, CostError> {
    fs::create_dir_all(dir)?;
    let name = source.file_name().ok_or_else(|| {
        CostError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} has no file name", source.display()),
        ))
    })?;
    let target = dir.join(name);

    if fs::rename(source, &target).is_err() {
        fs::copy(source, &target)?;
        fs::remove_file(source)?;
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_creates_directory_and_moves_file() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("old-study.pdf");
        fs::write(&source, b"%PDF-1.4").unwrap();
        let dir = tmp.path().join("not extracted");

        let target = relocate(&source, &dir).unwrap();

        assert_eq!(target, dir.join("old-study.pdf"));
        assert!(target.exists());
        assert!(!source.exists());
        assert_eq!(fs::read(&target).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_relocate_missing_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = relocate(&tmp.path().join("gone.pdf"), &tmp.path().join("q"));
        assert!(err.is_err());
    }
}
