//! Output writing.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Write `contents` to `path` atomically.
///
/// The data goes to a temporary file in the destination directory which is
/// then renamed over the target, so readers never see a partial file.
pub fn write_output_atomic<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;

    log::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_output_atomic_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.html");
        std::fs::write(&target, "old").unwrap();

        write_output_atomic(&target, "<html></html>").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "<html></html>");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_output_atomic_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.html");
        assert!(matches!(
            write_output_atomic(&target, "x"),
            Err(Error::Io(_))
        ));
    }
}
