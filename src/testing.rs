//! In-memory executor and topology provider for unit tests

use crate::{
    errors::CatalogError,
    executor::{CommandExecutor, Row},
    topology::{Drive, Hardware, Node, Topology, TopologyProvider, TopologySummary},
};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Mutex};

/// Build a [Row] from field/value pairs
pub fn row(fields: &[(&str, &str)]) -> Row {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// One row of recursive `disk info` output
pub fn info(image: &str, format: &str, inuse: &str) -> Row {
    row(&[
        ("image", image),
        ("disksize", "1G"),
        ("virtualsize", "10G"),
        ("format", format),
        ("inuse", inuse),
        ("host", "head"),
    ])
}

/// One row of `file list` output
pub fn listing(name: &str, dir: &str, host: &str) -> Row {
    row(&[("name", name), ("dir", dir), ("size", "100"), ("host", host)])
}

/// Answers commands from a fixed script and records what was asked
///
/// Unscripted `disk info` commands answer with no rows; any other
/// unscripted command fails.
#[derive(Default)]
pub struct ScriptedExecutor {
    replies: HashMap<String, Result<Vec<Row>, String>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        ScriptedExecutor::default()
    }

    pub fn reply(mut self, command: &str, rows: Vec<Row>) -> Self {
        self.replies.insert(command.to_owned(), Ok(rows));
        self
    }

    pub fn fail(mut self, command: &str, message: &str) -> Self {
        self.replies
            .insert(command.to_owned(), Err(message.to_owned()));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn run(&self, command: &str) -> Result<Vec<Row>, CatalogError> {
        self.log.lock().unwrap().push(command.to_owned());
        match self.replies.get(command) {
            Some(Ok(rows)) => Ok(rows.clone()),
            Some(Err(message)) => Err(CatalogError::CommandFailed {
                command: command.to_owned(),
                message: message.clone(),
            }),
            None if command.starts_with("disk info ") => Ok(Vec::new()),
            None => Err(CatalogError::CommandFailed {
                command: command.to_owned(),
                message: format!("unscripted command {:?}", command),
            }),
        }
    }
}

/// Topologies held in memory
#[derive(Default)]
pub struct StaticTopologies {
    topologies: Vec<Topology>,
    broken: Vec<String>,
}

impl StaticTopologies {
    pub fn new() -> Self {
        StaticTopologies::default()
    }

    /// Add an experiment with one node per drive image
    pub fn with(mut self, name: &str, images: &[&str]) -> Self {
        self.topologies.push(Topology {
            name: name.to_owned(),
            nodes: images
                .iter()
                .enumerate()
                .map(|(i, image)| Node {
                    hostname: format!("{}-{}", name, i),
                    hardware: Hardware {
                        drives: vec![Drive {
                            image: Some(image.to_string()),
                        }],
                    },
                })
                .collect(),
        });
        self
    }

    /// List an experiment whose lookup fails
    pub fn broken(mut self, name: &str) -> Self {
        self.broken.push(name.to_owned());
        self
    }
}

#[async_trait]
impl TopologyProvider for StaticTopologies {
    async fn get(&self, name: &str) -> Result<Topology, CatalogError> {
        if self.broken.iter().any(|broken| broken == name) {
            return Err(CatalogError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "topology store unavailable",
            )));
        }
        self.topologies
            .iter()
            .find(|topology| topology.name == name)
            .cloned()
            .ok_or_else(|| CatalogError::TopologyNotFound(name.to_owned()))
    }

    async fn list(&self) -> Result<Vec<TopologySummary>, CatalogError> {
        Ok(self
            .topologies
            .iter()
            .map(Topology::summary)
            .chain(self.broken.iter().map(|name| TopologySummary {
                name: name.clone(),
            }))
            .collect())
    }
}
