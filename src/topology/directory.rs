use crate::{
    errors::CatalogError,
    topology::{Topology, TopologyProvider, TopologySummary},
};
use async_trait::async_trait;
use regex::Regex;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Topologies stored as `<name>.json` documents in one directory
///
/// A directory that doesn't exist holds no topologies.
#[derive(Clone, Debug)]
pub struct TopologyDirectory {
    path: PathBuf,
}

impl TopologyDirectory {
    pub fn new(path: &Path) -> Self {
        TopologyDirectory {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn document_path(&self, name: &str) -> Option<PathBuf> {
        lazy_static! {
            static ref RE: Regex = Regex::new(r"^[a-zA-Z0-9]+[a-zA-Z0-9_\.\-]*$").unwrap();
        }
        if RE.is_match(name) {
            Some(self.path.join(format!("{}.json", name)))
        } else {
            None
        }
    }

    async fn load(&self, name: &str, path: &Path) -> Result<Topology, CatalogError> {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CatalogError::TopologyNotFound(name.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut topology: Topology =
            serde_json::from_slice(&data).map_err(|source| CatalogError::InvalidTopology {
                name: name.to_owned(),
                source,
            })?;
        if topology.name.is_empty() {
            topology.name = name.to_owned();
        }
        Ok(topology)
    }
}

#[async_trait]
impl TopologyProvider for TopologyDirectory {
    async fn get(&self, name: &str) -> Result<Topology, CatalogError> {
        match self.document_path(name) {
            None => Err(CatalogError::TopologyNotFound(name.to_owned())),
            Some(path) => self.load(name, &path).await,
        }
    }

    async fn list(&self) -> Result<Vec<TopologySummary>, CatalogError> {
        let mut entries = match tokio::fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no topology directory at {:?}", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                log::debug!("skipping {:?}, not a regular file", path);
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) if self.document_path(stem).is_some() => names.push(stem.to_owned()),
                _ => log::debug!("skipping {:?}, not a valid experiment name", path),
            }
        }
        names.sort();
        Ok(names
            .into_iter()
            .map(|name| TopologySummary { name })
            .collect())
    }
}
