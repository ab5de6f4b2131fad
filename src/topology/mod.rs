//! Experiment topologies, as far as disk images are concerned
//!
//! Topologies are owned by a separate subsystem. This module only describes
//! the part of one that references disk images (nodes, their drives, and each
//! drive's image path) and the [TopologyProvider] seam used to look them up.


mod directory;

pub use directory::TopologyDirectory;

use crate::errors::CatalogError;
use async_trait::async_trait;

/// Source of experiment topologies
#[async_trait]
pub trait TopologyProvider: Send + Sync {
    /// Fetch one topology by experiment name
    ///
    /// A name with no topology is [CatalogError::TopologyNotFound].
    async fn get(&self, name: &str) -> Result<Topology, CatalogError>;

    /// Summaries of every known experiment
    async fn list(&self) -> Result<Vec<TopologySummary>, CatalogError>;
}

/// The disk-relevant part of an experiment's topology
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct Topology {
    /// Filled in from the lookup name when the document leaves it out
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// Identifies a known experiment
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct TopologySummary {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct Node {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub hardware: Hardware,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct Hardware {
    #[serde(default)]
    pub drives: Vec<Drive>,
}

/// A storage attachment on a node
///
/// The image path may be absolute, or relative to the managed storage root.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct Drive {
    #[serde(default)]
    pub image: Option<String>,
}

impl Topology {
    pub fn summary(&self) -> TopologySummary {
        TopologySummary {
            name: self.name.clone(),
        }
    }

    /// Every non-empty drive image path, in node and drive order
    pub fn drive_images(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .flat_map(|node| node.hardware.drives.iter())
            .filter_map(|drive| drive.image.as_deref())
            .filter(|image| !image.is_empty())
    }
}
