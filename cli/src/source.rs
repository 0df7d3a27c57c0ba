use std::fs;
use std::io;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Read a script file. A missing file is `Ok(None)`; other I/O failures
/// are errors.
pub fn read_source(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// [`read_source`] for commands: absence becomes an error naming the path.
pub fn require_source(path: &Path) -> Result<String> {
    read_source(path)
        .with_context(|| format!("failed to read {}", path.display()))?
        .ok_or_else(|| anyhow!("file not found: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.shark");
        assert!(read_source(&path).unwrap().is_none());
        let err = require_source(&path).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn reads_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "x = 1").unwrap();
        assert_eq!(read_source(file.path()).unwrap().as_deref(), Some("x = 1"));
    }
}
