//! Image paths referenced by experiment topologies

use crate::{errors::CatalogError, topology::TopologyProvider};
use std::path::{Path, PathBuf};

/// A drive image referenced by an experiment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DriveReference {
    pub experiment: String,
    /// Absolute path; relative drive paths are resolved against the managed
    /// storage root
    pub path: PathBuf,
}

/// Collect drive image references for one experiment, or for all of them
///
/// Naming an experiment that doesn't exist is
/// [CatalogError::TopologyNotFound]. When enumerating every experiment, any
/// one lookup failing fails the whole call, rather than quietly hiding the
/// images only that experiment references.
pub async fn extract_references<T>(
    topologies: &T,
    files_dir: &Path,
    experiment: Option<&str>,
) -> Result<Vec<DriveReference>, CatalogError>
where
    T: TopologyProvider + ?Sized,
{
    let names = match experiment {
        Some(name) => vec![name.to_owned()],
        None => topologies
            .list()
            .await?
            .into_iter()
            .map(|summary| summary.name)
            .collect(),
    };

    let mut references = Vec::new();
    for name in names {
        let topology = topologies.get(&name).await.map_err(|err| {
            log::warn!("unable to retrieve experiment {:?}: {}", name, err);
            err
        })?;
        for image in topology.drive_images() {
            references.push(DriveReference {
                experiment: name.clone(),
                path: resolve_drive_path(files_dir, image),
            });
        }
    }
    Ok(references)
}

/// Resolve a drive image path against the managed storage root
pub fn resolve_drive_path(files_dir: &Path, image: &str) -> PathBuf {
    let path = Path::new(image);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        files_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticTopologies;

    fn root() -> &'static Path {
        Path::new("/tmp/minimega/files")
    }

    #[tokio::test]
    async fn named_experiment() {
        let topologies = StaticTopologies::new()
            .with("exp1", &["golden.qcow2", "/srv/images/ubuntu.iso"])
            .with("exp2", &["other.qcow2"]);
        let references = extract_references(&topologies, root(), Some("exp1"))
            .await
            .unwrap();
        assert_eq!(
            references,
            vec![
                DriveReference {
                    experiment: "exp1".to_owned(),
                    path: PathBuf::from("/tmp/minimega/files/golden.qcow2"),
                },
                DriveReference {
                    experiment: "exp1".to_owned(),
                    path: PathBuf::from("/srv/images/ubuntu.iso"),
                },
            ]
        );
    }

    #[tokio::test]
    async fn all_experiments() {
        let topologies = StaticTopologies::new()
            .with("exp1", &["golden.qcow2"])
            .with("exp2", &["other.qcow2", ""]);
        let references = extract_references(&topologies, root(), None).await.unwrap();
        let tagged: Vec<(&str, &Path)> = references
            .iter()
            .map(|r| (r.experiment.as_str(), r.path.as_path()))
            .collect();
        assert_eq!(
            tagged,
            vec![
                ("exp1", Path::new("/tmp/minimega/files/golden.qcow2")),
                ("exp2", Path::new("/tmp/minimega/files/other.qcow2")),
            ]
        );
    }

    #[tokio::test]
    async fn missing_experiment() {
        let topologies = StaticTopologies::new().with("exp1", &["golden.qcow2"]);
        let err = extract_references(&topologies, root(), Some("missing-exp"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn one_broken_experiment_aborts() {
        let topologies = StaticTopologies::new()
            .with("exp1", &["golden.qcow2"])
            .broken("exp2");
        assert!(extract_references(&topologies, root(), None).await.is_err());
    }
}
