//! Listing every file in managed storage, across the whole cluster

use crate::{
    errors::CatalogError,
    executor::{field, CommandExecutor, Row},
};
use futures_util::future::try_join;
use std::path::{Path, PathBuf};

/// Lists files on the control node only
pub const LOCAL_LIST_COMMAND: &str = "file list";

/// Lists files on every mesh-connected node
pub const MESH_LIST_COMMAND: &str = "mesh send all file list";

/// One row of a storage listing
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListedFile {
    pub name: String,
    /// Subdirectory the entry lives in; empty for the storage root itself
    pub dir: String,
    pub size: String,
    pub host: String,
}

impl ListedFile {
    fn from_row(row: &Row) -> Self {
        ListedFile {
            name: field(row, "name").to_owned(),
            dir: field(row, "dir").to_owned(),
            size: field(row, "size").to_owned(),
            host: field(row, "host").to_owned(),
        }
    }

    /// Absolute path of this file inside the managed storage root
    pub fn path(&self, files_dir: &Path) -> PathBuf {
        files_dir.join(&self.name)
    }
}

/// List the files in the root of managed storage, control node first
///
/// Both listings are issued together, but results always come back with the
/// control node's rows ahead of the mesh rows. Entries inside subdirectories
/// are dropped: managed images live in a flat namespace. Either listing
/// failing fails the whole call.
pub async fn list_managed_files<E>(executor: &E) -> Result<Vec<ListedFile>, CatalogError>
where
    E: CommandExecutor + ?Sized,
{
    let (local, mesh) = try_join(
        executor.run(LOCAL_LIST_COMMAND),
        executor.run(MESH_LIST_COMMAND),
    )
    .await?;

    let mut files = Vec::new();
    for row in local.iter().chain(mesh.iter()) {
        let file = ListedFile::from_row(row);
        if !file.dir.is_empty() {
            log::debug!("{}: skipping {:?} in subdirectory {:?}", file.host, file.name, file.dir);
            continue;
        }
        files.push(file);
    }
    log::debug!(
        "listed {} files from {} local and {} mesh rows",
        files.len(),
        local.len(),
        mesh.len()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{listing, ScriptedExecutor};

    #[tokio::test]
    async fn local_first_and_flat() {
        let executor = ScriptedExecutor::new()
            .reply(
                MESH_LIST_COMMAND,
                vec![listing("mesh.qcow2", "", "node2"), listing("sub", "<dir>", "node2")],
            )
            .reply(
                LOCAL_LIST_COMMAND,
                vec![listing("base.qcow2", "", "head"), listing("nested.iso", "isos", "head")],
            );
        let files = list_managed_files(&executor).await.unwrap();
        let names: Vec<(&str, &str)> = files
            .iter()
            .map(|f| (f.name.as_str(), f.host.as_str()))
            .collect();
        assert_eq!(names, vec![("base.qcow2", "head"), ("mesh.qcow2", "node2")]);
        assert_eq!(
            files[0].path(Path::new("/tmp/minimega/files")),
            PathBuf::from("/tmp/minimega/files/base.qcow2")
        );
    }

    #[tokio::test]
    async fn mesh_failure_fails_listing() {
        let executor = ScriptedExecutor::new()
            .reply(LOCAL_LIST_COMMAND, vec![listing("base.qcow2", "", "head")])
            .fail(MESH_LIST_COMMAND, "node7: connection refused");
        let err = list_managed_files(&executor).await.unwrap_err();
        assert!(err.is_command_error());
        assert_eq!(err.to_string(), "node7: connection refused");
    }
}
