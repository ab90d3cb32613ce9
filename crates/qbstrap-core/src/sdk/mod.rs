pub use package::Package;

pub mod package;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::{
    config::default_root_path,
    consts::QBS_DIR,
    downloads::{Fetcher, HttpFetcher},
    version::VersionNumberError,
};

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("unable to resolve a default install root on this platform")]
    UnsupportedPlatform,

    #[error(transparent)]
    InvalidVersion(#[from] VersionNumberError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Handles the install as well as the removal of the SDK packages.
///
/// One [`Package`] is built per version string, order preserved. `install`
/// only touches the packages whose target directory is missing on disk; there
/// is no other record of the installed state.
pub struct Sdk {
    install_root: PathBuf,
    packages: Vec<Package>,
    fetcher: Arc<dyn Fetcher>,
}

impl Sdk {
    /// Builds an [`Sdk`] over `versions`, installing under `install_root`.
    ///
    /// Without an explicit root, the platform configuration directory is
    /// used; [`SdkError::UnsupportedPlatform`] is returned when the platform
    /// does not provide one.
    pub fn new<S>(versions: &[S], install_root: Option<PathBuf>) -> Result<Self, SdkError>
    where
        S: AsRef<str>,
    {
        let install_root = match install_root {
            Some(path) => path,
            None => default_root_path().ok_or(SdkError::UnsupportedPlatform)?,
        };

        let qbs_root = install_root.join(QBS_DIR);
        let packages = versions
            .iter()
            .map(|version| Package::new(version.as_ref(), &qbs_root))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            install_root,
            packages,
            fetcher: Arc::new(HttpFetcher),
        })
    }

    /// Replaces the transport the download stage goes through.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Root path under which the SDK files are installed.
    pub fn install_root_path(&self) -> &Path {
        &self.install_root
    }

    /// Qbs root path located within the install root directory.
    pub fn qbs_root_path(&self) -> PathBuf {
        self.install_root.join(QBS_DIR)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Packages whose target directory is currently missing on disk.
    pub fn noninstalled_packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter().filter(|p| !p.is_installed())
    }

    /// Removes every installed package.
    pub fn clean(&self) -> Result<(), SdkError> {
        let qbs_root = self.qbs_root_path();

        if qbs_root.exists() {
            std::fs::remove_dir_all(&qbs_root)?;
        }

        Ok(())
    }

    /// Installs the packages that are not already installed.
    ///
    /// The pipeline runs in three stages: download, extract, move. Each stage
    /// fans out over all remaining packages and completes before the next one
    /// starts. A package failing a stage is logged and dropped from the
    /// cycle; it never blocks its siblings and is retried by a later call.
    pub async fn install(&self) -> Result<(), SdkError> {
        let pending: Vec<Package> = self.noninstalled_packages().cloned().collect();

        if pending.is_empty() {
            info!("No packages to install");
            return Ok(());
        }

        // Shared by every package of this cycle, removed with its contents
        // when dropped, whatever the outcome of the stages.
        let tempdir = tempfile::Builder::new().prefix("qbstrap").tempdir()?;

        let downloaded = self.download_packages(pending, tempdir.path()).await;
        let extracted = Self::extract_packages(downloaded).await;
        Self::move_packages(extracted).await;

        Ok(())
    }

    async fn download_packages(&self, packages: Vec<Package>, dir: &Path) -> Vec<Package> {
        let mut set = JoinSet::new();

        for package in packages {
            let fetcher = Arc::clone(&self.fetcher);
            let dir = dir.to_path_buf();
            set.spawn(async move { package.download(fetcher.as_ref(), &dir).await });
        }

        Self::join_stage(set).await
    }

    async fn extract_packages(packages: Vec<Package>) -> Vec<Package> {
        let mut set = JoinSet::new();

        for package in packages {
            set.spawn(package.extract());
        }

        Self::join_stage(set).await
    }

    async fn move_packages(packages: Vec<Package>) {
        let mut set = JoinSet::new();

        for package in packages {
            set.spawn(package.install_files());
        }

        while let Some(result) = set.join_next().await {
            if let Err(err) = result {
                error!("An install task failed: {err}");
            }
        }
    }

    /// Waits for every task of a stage, keeping the packages that made it
    /// through.
    async fn join_stage(mut set: JoinSet<Option<Package>>) -> Vec<Package> {
        let mut packages = Vec::new();

        while let Some(result) = set.join_next().await {
            match result {
                Ok(Some(package)) => packages.push(package),
                Ok(None) => {}
                Err(err) => error!("A stage task failed: {err}"),
            }
        }

        packages
    }
}
