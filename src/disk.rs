//! Changing managed disks
//!
//! Each operation is one remote command. When the tool rejects it, the
//! tool's own message comes back as the error.

use crate::{errors::CatalogError, executor::CommandExecutor};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Where a snapshot of `src` named `dst` will be written
///
/// A relative destination goes next to the source, and a destination
/// without an extension takes the source's extension.
pub fn snapshot_destination(src: &Path, dst: &Path) -> PathBuf {
    let mut dst = if dst.is_absolute() {
        dst.to_path_buf()
    } else {
        match src.parent() {
            Some(dir) => dir.join(dst),
            None => dst.to_path_buf(),
        }
    };
    if dst.extension().is_none() {
        if let Some(ext) = src.extension() {
            dst.set_extension(ext);
        }
    }
    dst
}

/// Mutating disk operations, issued through a [CommandExecutor]
pub struct Disks<E> {
    executor: E,
}

impl<E: CommandExecutor> Disks<E> {
    pub fn new(executor: E) -> Self {
        Disks { executor }
    }

    /// Merge a disk's changes into its backing image
    pub async fn commit(&self, path: &Path) -> Result<(), CatalogError> {
        self.issue(format!("disk commit {}", checked_arg(path)?))
            .await
    }

    /// Create a new disk backed by `src`
    ///
    /// Returns the path the snapshot was written to.
    pub async fn snapshot(&self, src: &Path, dst: &Path) -> Result<PathBuf, CatalogError> {
        let dst = snapshot_destination(src, dst);
        self.issue(format!(
            "disk snapshot {} {}",
            checked_arg(src)?,
            checked_arg(&dst)?
        ))
        .await?;
        Ok(dst)
    }

    /// Point `src` at a new backing image `dst`
    ///
    /// A safe rebase rewrites `src` so its content is unchanged. An unsafe one
    /// only rewrites the backing file reference.
    pub async fn rebase(&self, src: &Path, dst: &Path, unsafe_rebase: bool) -> Result<(), CatalogError> {
        let verb = if unsafe_rebase { "set-backing" } else { "rebase" };
        self.issue(format!(
            "disk {} {} {}",
            verb,
            checked_arg(src)?,
            checked_arg(dst)?
        ))
        .await
    }

    /// Copy a disk
    pub async fn clone_disk(&self, src: &Path, dst: &Path) -> Result<(), CatalogError> {
        self.issue(format!("shell cp {} {}", checked_arg(src)?, checked_arg(dst)?))
            .await
    }

    /// Rename a disk
    pub async fn rename(&self, src: &Path, dst: &Path) -> Result<(), CatalogError> {
        self.issue(format!("shell mv {} {}", checked_arg(src)?, checked_arg(dst)?))
            .await
    }

    /// Delete a disk from managed storage
    pub async fn delete(&self, path: &Path) -> Result<(), CatalogError> {
        self.issue(format!("file delete {}", checked_arg(path)?))
            .await
    }

    async fn issue(&self, command: String) -> Result<(), CatalogError> {
        log::info!("{}", command);
        self.executor.run(&command).await?;
        Ok(())
    }
}

/// Paths are passed unquoted on the remote command line
fn checked_arg(path: &Path) -> Result<String, CatalogError> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r#"^[^\s"'`;|&$]+$"#).unwrap();
    }
    let s = path.to_string_lossy();
    if RE.is_match(&s) {
        Ok(s.into_owned())
    } else {
        Err(CatalogError::InvalidDiskPath(s.into_owned()))
    }
}
