//! Building the image catalog for a request


use crate::{
    catalog::Catalog,
    chain::resolve_image,
    errors::CatalogError,
    executor::CommandExecutor,
    image::{base_name, ImageRecord},
    lister::list_managed_files,
    references::extract_references,
    topology::TopologyProvider,
};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Builder for configuring a [Resolver]
pub struct ResolverBuilder<E, T> {
    executor: E,
    topologies: T,
    files_dir: Option<PathBuf>,
    headnode: Option<String>,
}

impl<E, T> ResolverBuilder<E, T>
where
    E: CommandExecutor,
    T: TopologyProvider,
{
    /// Change the managed storage root
    ///
    /// The default can be determined with [Resolver::default_files_dir()]
    pub fn files_dir(mut self, dir: &Path) -> Self {
        self.files_dir = Some(dir.to_path_buf());
        self
    }

    /// Record this host on images found through experiment topologies
    ///
    /// Those paths are resolved by the control node. Without a headnode,
    /// records from the topology scan carry no host.
    pub fn headnode(mut self, name: &str) -> Self {
        self.headnode = Some(name.to_owned());
        self
    }

    /// Construct a Resolver using the parameters from this Builder
    pub fn build(self) -> Result<Resolver<E, T>, CatalogError> {
        let files_dir = match self.files_dir {
            Some(dir) => dir,
            None => Resolver::<E, T>::default_files_dir()?,
        };
        log::debug!("using managed storage root {:?}", files_dir);
        Ok(Resolver {
            executor: self.executor,
            topologies: self.topologies,
            files_dir,
            headnode: self.headnode,
        })
    }
}

/// Reconciles the cluster file listing with experiment topologies
///
/// Nothing is cached between calls: every [Resolver::catalog()] starts from an
/// empty catalog, so concurrent requests share no state beyond the executor
/// and topology provider they were constructed with.
pub struct Resolver<E, T> {
    executor: E,
    topologies: T,
    files_dir: PathBuf,
    headnode: Option<String>,
}

impl<E, T> Resolver<E, T>
where
    E: CommandExecutor,
    T: TopologyProvider,
{
    /// Start configuring a resolver around its two collaborators
    pub fn builder(executor: E, topologies: T) -> ResolverBuilder<E, T> {
        ResolverBuilder {
            executor,
            topologies,
            files_dir: None,
            headnode: None,
        }
    }

    /// Determine the managed storage root used if no other is specified
    ///
    /// This is `$DISKCATALOG_FILES_DIR` if set, otherwise `files` inside
    /// `$MINIMEGA_BASE`, falling back to `/tmp/minimega/files`.
    pub fn default_files_dir() -> Result<PathBuf, CatalogError> {
        let dir = match env::var("DISKCATALOG_FILES_DIR") {
            Ok(s) => PathBuf::from(s),
            Err(_) => match env::var("MINIMEGA_BASE") {
                Ok(s) => Path::new(&s).join("files"),
                Err(_) => PathBuf::from("/tmp/minimega/files"),
            },
        };
        if dir.is_absolute() {
            Ok(dir)
        } else {
            Err(CatalogError::NoDefaultFilesDir)
        }
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }

    /// Build the catalog: every image in managed storage plus every image the
    /// experiment (or all experiments, if none is named) references
    ///
    /// The cluster scan is merged completely before any topology record, so
    /// a name found by both keeps its cluster-scan record. Usage is
    /// propagated to ancestors last. Any failure fails the whole request.
    pub async fn catalog(&self, experiment: Option<&str>) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::new();

        let files = list_managed_files(&self.executor).await?;
        for file in &files {
            if catalog.contains(&file.name) {
                continue;
            }
            let path = file.path(&self.files_dir);
            let records =
                resolve_image(&self.executor, &path.to_string_lossy(), Some(file.host.as_str()), None)
                    .await?;
            catalog.merge(records);
        }
        log::info!("cluster scan cataloged {} images", catalog.len());

        let references = extract_references(&self.topologies, &self.files_dir, experiment).await?;
        for reference in &references {
            let path = reference.path.to_string_lossy();
            if catalog.contains(&base_name(&path)) {
                continue;
            }
            let records = resolve_image(
                &self.executor,
                &path,
                self.headnode.as_deref(),
                Some(reference.experiment.as_str()),
            )
            .await?;
            catalog.merge(records);
        }
        log::info!(
            "cataloged {} images after {} topology references",
            catalog.len(),
            references.len()
        );

        catalog.propagate_usage();
        Ok(catalog)
    }

    /// The catalog as a list of records, in no particular order
    pub async fn images(&self, experiment: Option<&str>) -> Result<Vec<ImageRecord>, CatalogError> {
        Ok(self.catalog(experiment).await?.into_records())
    }
}
