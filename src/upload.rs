//! Scoped staging of uploaded files.
//!
//! A [`StagedUpload`] owns a named temporary file. The file is removed when the
//! value is dropped, whichever way the analysis that used it ends.

use crate::config::UploadConfig;
use crate::error::{AdvisorError, Result};
use log::debug;
use std::env;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Extensions accepted by default, lowercase and without the dot.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "geojson", "json"];

/// Limits applied before an upload touches the disk.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    pub temp_dir: PathBuf,
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            temp_dir: config.temp_dir.clone().unwrap_or_else(env::temp_dir),
            max_file_size: config.max_file_size,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    /// Lowercased extension of `name` if it is allowed.
    fn accepted_extension(&self, name: &str) -> Result<String> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| {
                AdvisorError::UploadRejected(format!("'{}' has no file extension", name))
            })?;
        if self.allowed_extensions.iter().any(|a| *a == extension) {
            Ok(extension)
        } else {
            Err(AdvisorError::UploadRejected(format!(
                "file type '.{}' is not allowed (allowed: {})",
                extension,
                self.allowed_extensions.join(", ")
            )))
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

/// An uploaded payload written to a temporary file.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    original_name: String,
    extension: String,
}

impl StagedUpload {
    /// Checks `bytes` against `policy` and writes them to a temporary file that keeps
    /// the original extension.
    ///
    /// # Errors
    /// [`AdvisorError::UploadRejected`] for an empty name, a disallowed extension or
    /// an oversized payload; [`AdvisorError::Io`] if the file cannot be written.
    pub fn stage(original_name: &str, bytes: &[u8], policy: &UploadPolicy) -> Result<Self> {
        let original_name = original_name.trim();
        if original_name.is_empty() {
            return Err(AdvisorError::UploadRejected("file name is empty".into()));
        }
        let extension = policy.accepted_extension(original_name)?;
        if bytes.len() as u64 > policy.max_file_size {
            return Err(AdvisorError::UploadRejected(format!(
                "'{}' is {} bytes, limit is {}",
                original_name,
                bytes.len(),
                policy.max_file_size
            )));
        }

        let mut file = Builder::new()
            .prefix("netadvisor-upload-")
            .suffix(&format!(".{}", extension))
            .tempfile_in(&policy.temp_dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!(
            "staged '{}' ({} bytes) at {}",
            original_name,
            bytes.len(),
            file.path().display()
        );

        Ok(Self {
            file,
            original_name: original_name.to_owned(),
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Lowercase, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// A fresh reader over the staged bytes.
    pub fn open(&self) -> Result<BufReader<File>> {
        Ok(BufReader::new(File::open(self.path())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Read;

    fn policy(dir: &Path) -> UploadPolicy {
        UploadPolicy {
            temp_dir: dir.to_path_buf(),
            max_file_size: 16,
            allowed_extensions: vec!["csv".into(), "geojson".into()],
        }
    }

    #[test]
    fn test_stage_keeps_extension_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let upload = StagedUpload::stage("Stats.CSV", b"a,b\n1,2\n", &policy(dir.path())).unwrap();
        assert_eq!(upload.extension(), "csv");
        assert_eq!(upload.original_name(), "Stats.CSV");
        assert!(upload.path().to_string_lossy().ends_with(".csv"));

        let mut content = String::new();
        upload.open().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "a,b\n1,2\n");
    }

    #[test]
    fn test_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let upload = StagedUpload::stage("x.geojson", b"{}", &policy(dir.path())).unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.exists());
        drop(upload);
        assert!(!path.exists());
    }

    #[test]
    fn test_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let policy = policy(dir.path());
        for (name, bytes) in [
            ("", &b"1"[..]),
            ("notes.txt", &b"1"[..]),
            ("noext", &b"1"[..]),
            ("big.csv", &[b'x'; 17][..]),
        ] {
            let err = StagedUpload::stage(name, bytes, &policy).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UploadRejected, "{}", name);
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_default_policy() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.max_file_size, 10 * 1024 * 1024);
        assert!(policy.allowed_extensions.contains(&"geojson".to_string()));
    }
}
