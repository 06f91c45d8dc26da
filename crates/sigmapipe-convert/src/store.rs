//! On-disk signature and rule store

use crate::ConvertResult;
use sigmapipe_core::Attribute;
use std::path::{Path, PathBuf};

/// Writes signatures and converted rules into their well-known
/// directories. Files are overwritten when the same name reappears,
/// so a re-delivered attribute never accumulates duplicates.
#[derive(Debug, Clone)]
pub struct SignatureStore {
    signature_dir: PathBuf,
    alert_dir: PathBuf,
}

impl SignatureStore {
    pub fn new(signature_dir: impl Into<PathBuf>, alert_dir: impl Into<PathBuf>) -> Self {
        Self {
            signature_dir: signature_dir.into(),
            alert_dir: alert_dir.into(),
        }
    }

    /// Create both directories if they do not exist yet.
    pub fn ensure_directories(&self) -> ConvertResult<()> {
        std::fs::create_dir_all(&self.signature_dir)?;
        std::fs::create_dir_all(&self.alert_dir)?;
        Ok(())
    }

    /// Persist an attribute's signature text as `Sigma_<id>.yml`.
    /// Returns the filename the signature was stored under.
    pub fn write_signature(&self, attribute: &Attribute) -> ConvertResult<String> {
        let filename = attribute.signature_filename();
        std::fs::write(self.signature_dir.join(&filename), &attribute.value)?;
        Ok(filename)
    }

    /// Persist a converted rule into the alert directory.
    pub fn write_rule(&self, filename: &str, content: &str) -> ConvertResult<PathBuf> {
        let path = self.alert_dir.join(filename);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Full path of a stored signature file.
    pub fn signature_path(&self, filename: &str) -> PathBuf {
        self.signature_dir.join(filename)
    }

    pub fn signature_dir(&self) -> &Path {
        &self.signature_dir
    }

    pub fn alert_dir(&self) -> &Path {
        &self.alert_dir
    }
}
