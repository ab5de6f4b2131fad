//! Catalog of the VM disks, container filesystems and ISOs in a cluster's
//! managed storage
//!
//! A [Resolver] lists every file in managed storage across the cluster, adds
//! the images experiment topologies reference, reconstructs each image's
//! copy-on-write backing chain, and marks images in use when they, or any
//! image built on top of them, are attached to a running VM. The resulting
//! [Catalog] is rebuilt for every request.

#[macro_use] extern crate lazy_static;
#[macro_use] extern crate serde;

pub mod catalog;
pub mod chain;
pub mod disk;
pub mod errors;
pub mod executor;
pub mod image;
pub mod lister;
pub mod references;
pub mod resolver;
pub mod topology;

#[cfg(test)] mod testing;

pub use crate::{
    catalog::Catalog,
    disk::Disks,
    errors::CatalogError,
    executor::{CommandExecutor, MinimegaClient, Row},
    image::{ImageRecord, Kind, KindSet},
    resolver::{Resolver, ResolverBuilder},
    topology::{TopologyDirectory, TopologyProvider},
};
