//! File-based print bridge.
//!
//! Each queue is a subdirectory of the spool root; a job is one `.pdf` file
//! named after its submission time. Existing jobs are never overwritten. The root must already exist, the same way
//! a print service must already be running.

use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{PrintBridge, PrintError};

/// Print bridge writing jobs into `<root>/<queue>/<timestamp>.pdf`.
#[derive(Debug, Clone)]
pub struct SpoolBridge {
    root: PathBuf,
}

impl SpoolBridge {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The spool root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn ensure_root(&self) -> Result<(), PrintError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(PrintError::BridgeUnavailable(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(e) => Err(unavailable(&self.root, &e)),
        }
    }
}

/// Queue names map to one path component; separators and dot-names are replaced.
fn queue_dir_name(queue: &str) -> String {
    let name: String = queue
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    if name.is_empty() || name == "." || name == ".." {
        "_".to_string()
    } else {
        name
    }
}

/// Create a new job file in `dir`, never replacing an existing one.
///
/// A job whose `stamp` is already taken gets a `-1`, `-2`, ... suffix.
async fn create_job_file(dir: &Path, stamp: &str) -> Result<(PathBuf, File), PrintError> {
    let mut attempt = 0_u32;
    loop {
        let name = if attempt == 0 {
            format!("{stamp}.pdf")
        } else {
            format!("{stamp}-{attempt}.pdf")
        };
        let path = dir.join(name);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(unavailable(&path, &e)),
        }
    }
}

fn unavailable(path: &Path, err: &io::Error) -> PrintError {
    PrintError::BridgeUnavailable(format!("{}: {err}", path.display()))
}

impl PrintBridge for SpoolBridge {
    async fn printers(&self) -> Result<Vec<String>, PrintError> {
        self.ensure_root().await?;

        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| unavailable(&self.root, &e))?;
        let mut queues = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| unavailable(&self.root, &e))?
        {
            let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
            if is_dir && let Some(name) = entry.file_name().to_str() {
                queues.push(name.to_string());
            }
        }
        queues.sort();
        Ok(queues)
    }

    async fn submit(&self, queue: &str, pdf_base64: &str) -> Result<(), PrintError> {
        self.ensure_root().await?;

        let pdf = STANDARD
            .decode(pdf_base64)
            .map_err(|e| PrintError::SerializationFailed(e.to_string()))?;

        let dir = self.root.join(queue_dir_name(queue));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| unavailable(&dir, &e))?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6fZ").to_string();
        let (path, mut file) = create_job_file(&dir, &stamp).await?;
        file.write_all(&pdf)
            .await
            .map_err(|e| unavailable(&path, &e))?;
        file.flush().await.map_err(|e| unavailable(&path, &e))?;

        debug!(path = %path.display(), bytes = pdf.len(), "Spooled print job");
        Ok(())
    }
}
