//! Managed image files and their kinds

#[cfg(test)] mod tests;

mod kind;

pub use kind::{Kind, KindSet};

use std::path::Path;

/// Filename suffix of container root filesystem archives
pub const CONTAINER_SUFFIX: &str = "_rootfs.tgz";

/// Filename suffixes that may hold an image
///
/// Anything else in managed storage is ignored by the catalog.
pub const KNOWN_IMAGE_SUFFIXES: &[&str] = &[".qcow2", ".qc2", CONTAINER_SUFFIX, ".hdd", ".iso"];

/// Does this path end in a recognized image suffix?
pub fn is_known_image(path: &str) -> bool {
    KNOWN_IMAGE_SUFFIXES
        .iter()
        .any(|suffix| path.ends_with(suffix))
}

/// Determine an image's kind
///
/// The format reported by the inspection tool wins; `qcow2` is always a VM
/// disk. Otherwise the filename suffix decides.
pub fn classify(name: &str, format: Option<&str>) -> Kind {
    if format == Some("qcow2") {
        Kind::VM
    } else if name.ends_with(CONTAINER_SUFFIX) {
        Kind::Container
    } else if name.ends_with(".hdd") {
        Kind::VM
    } else if name.ends_with(".iso") {
        Kind::ISO
    } else {
        Kind::Unknown
    }
}

/// Last component of a path, which is what the catalog is keyed on
pub fn base_name(path: &str) -> String {
    match Path::new(path).file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_owned(),
    }
}

/// One managed storage file, as it appears in the catalog
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub kind: Kind,
    pub name: String,
    pub full_path: String,
    /// Cluster node the file was observed on, if the scan tracked that
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Size as reported by the inspection tool, kept verbatim
    pub size: String,
    /// Virtual size as reported by the inspection tool, kept verbatim
    pub virtual_size: String,
    /// Experiment whose topology referenced this image
    pub experiment: Option<String>,
    /// Ancestor names, nearest first
    #[serde(default)]
    pub backing_images: Vec<String>,
    pub in_use: bool,
}
