//! Local output file with a single-generation backup.
//!
//! ## Layout
//!
//! ```text
//! {dir}/
//! ├── data.json        # Latest run, pretty-printed JSON array
//! └── prev_data.json   # Previous run, replaced on every write
//! ```

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::PersistError;
use crate::models::Listing;

type Result<T> = std::result::Result<T, PersistError>;

/// Prefix of the backup file name.
pub const BACKUP_PREFIX: &str = "prev_";

/// The JSON output file handed to the external tool.
#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path holding the previous output.
    pub fn backup_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output.json".to_string());
        self.path.with_file_name(format!("{BACKUP_PREFIX}{name}"))
    }

    /// Write `listings`, moving any existing file to the backup path.
    ///
    /// The new content is fully written to a temp file before the current
    /// output is touched, so a failed write leaves it in place.
    pub async fn write(&self, listings: &[Listing]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(listings)?;
        let tmp = self.write_temp(&bytes).await?;

        if self.backup().await? {
            log::debug!("Previous output moved to {}", self.backup_path().display());
        }
        tokio::fs::rename(&tmp, &self.path).await?;

        log::info!(
            "Wrote {} listing(s) to {}",
            listings.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Read the current output, returning `None` if it doesn't exist.
    pub async fn read(&self) -> Result<Option<Vec<Listing>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Rename the existing output to its backup path. Returns whether a
    /// file was moved.
    async fn backup(&self) -> Result<bool> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(false);
        }

        let backup = self.backup_path();
        match tokio::fs::remove_file(&backup).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tokio::fs::rename(&self.path, &backup).await?;
        Ok(true)
    }

    /// Write bytes to the sibling temp file and return its path.
    async fn write_temp(&self, bytes: &[u8]) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        Ok(tmp)
    }
}
