use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Files on local disk. Relative paths resolve against `base_path`;
/// absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(Path::new(path))
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        Ok(fs::read(full_path)?)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::debug!("Writing {} bytes to {}", data.len(), full_path.display());
        fs::write(full_path, data)?;
        Ok(())
    }

    // fs::read_to_string already reports bad UTF-8 as InvalidData.
    fn read_to_string(&self, path: &str) -> Result<String> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        Ok(fs::read_to_string(full_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CvError;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("nested/dir/resume.docx", b"data").unwrap();
        assert_eq!(storage.read_file("nested/dir/resume.docx").unwrap(), b"data");
    }

    #[test]
    fn test_absolute_paths_ignore_base() {
        let temp_dir = TempDir::new().unwrap();
        let absolute = temp_dir.path().join("Experience.md");
        fs::write(&absolute, "### Skills\n").unwrap();

        let storage = LocalStorage::new("does-not-exist");
        let text = storage.read_to_string(&absolute.to_string_lossy()).unwrap();
        assert_eq!(text, "### Skills\n");
    }

    #[test]
    fn test_non_utf8_text_is_invalid_data() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Experience.md"), [0xff, 0xfe, b'#']).unwrap();

        let storage = LocalStorage::new(temp_dir.path());
        match storage.read_to_string("Experience.md").unwrap_err() {
            CvError::IoError(e) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
