use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{error, info, warn};

use crate::{
    archive,
    consts::SDK_ARCHIVE_URL,
    downloads::Fetcher,
    version::{VersionNumber, VersionNumberError},
};

/// Suffix every SDK package archive is published with.
const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// One installable, versioned SDK archive and its target location.
///
/// The descriptor is built once per version string. Its temporary artifact is
/// attached during the download stage and dropped after a successful install;
/// whether the package is installed is re-checked on disk every time.
#[derive(Debug, Clone)]
pub struct Package {
    url: String,
    version: VersionNumber,
    target: PathBuf,
    temp: Option<TempPackage>,
}

impl Package {
    pub(crate) fn new(version: &str, qbs_root: &Path) -> Result<Self, VersionNumberError> {
        let parsed: VersionNumber = version.parse()?;

        Ok(Self {
            url: SDK_ARCHIVE_URL.replace("{version}", version),
            // the target directory is named after the normalized version, so
            // "1.1" and "1.1.0" resolve to the same installation
            target: qbs_root.join(parsed.to_string()),
            version: parsed,
            temp: None,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Last path segment of the URL.
    pub fn filename(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }

    /// Filename without the archive suffix.
    pub fn name(&self) -> &str {
        self.filename()
            .strip_suffix(ARCHIVE_SUFFIX)
            .unwrap_or_else(|| self.filename())
    }

    pub fn version(&self) -> VersionNumber {
        self.version
    }

    /// Path the package is installed to.
    pub fn path(&self) -> &Path {
        &self.target
    }

    pub fn is_installed(&self) -> bool {
        self.target.exists()
    }

    /// Fetches the archive into `dir`.
    ///
    /// A download failure drops the package from the current install cycle;
    /// it stays non-installed and is picked up again by a later one.
    pub(crate) async fn download(mut self, fetcher: &dyn Fetcher, dir: &Path) -> Option<Self> {
        info!("Downloading {} ...", self.url);

        let filepath = dir.join(self.filename());

        match fetcher.fetch(&self.url, &filepath).await {
            Ok(()) => {
                self.temp = Some(TempPackage::new(filepath));
                Some(self)
            }
            Err(err) => {
                warn!("Unable to download the package {}: {err}", self.name());
                None
            }
        }
    }

    /// Extracts the downloaded archive next to it.
    pub(crate) async fn extract(mut self) -> Option<Self> {
        let Some(mut temp) = self.temp.take() else {
            warn!(
                "Unable to extract the package {}, because it was not downloaded",
                self.name()
            );
            return None;
        };

        let filepath = temp.filepath().to_path_buf();

        if !filepath.exists() {
            warn!(
                "Unable to extract the package {}, because it doesn't exists",
                self.name()
            );
            return None;
        }

        // The archive sits directly inside the shared temporary directory.
        let dest = filepath.parent()?.to_path_buf();

        let result = tokio::task::spawn_blocking(move || archive::extract_share(&filepath, &dest));

        match result.await {
            Ok(Ok(share_root)) => {
                temp.set_extracted_root(share_root);
                self.temp = Some(temp);
                Some(self)
            }
            Ok(Err(err)) => {
                warn!("Unable to extract the package {}: {err}", self.name());
                None
            }
            Err(err) => {
                error!("Extraction of the package {} failed: {err}", self.name());
                None
            }
        }
    }

    /// Copies the extracted content into the target install path.
    ///
    /// Copy errors leave the already-copied entries in place.
    pub(crate) async fn install_files(mut self) {
        let Some(temp) = self.temp.take() else {
            warn!(
                "Unable to install the package {}, because it was not extracted",
                self.name()
            );
            return;
        };

        let Some(share_root) = temp.extracted_root().map(Path::to_path_buf) else {
            warn!(
                "Unable to install the package {}, because it was not extracted",
                self.name()
            );
            return;
        };

        info!("Installing {}", self.version);

        let target = self.target.clone();
        let result = tokio::task::spawn_blocking(move || copy_tree(&share_root, &target));

        match result.await {
            Ok(Ok(())) => info!("The package {} was successfully installed", self.version),
            Ok(Err(err)) => error!("Unable to install the package {}: {err}", self.name()),
            Err(err) => error!("Install of the package {} failed: {err}", self.name()),
        }
    }
}

/// Recursive copy of every entry under `src` into `dest`.
fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dest)?;

    for entry in src.read_dir()? {
        let entry = entry?;
        let to = dest.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &to)?;
        } else {
            std::fs::copy(entry.path(), &to)?;
        }
    }

    Ok(())
}

/// Downloaded archive and the location of its extracted content, scoped to
/// one install cycle.
#[derive(Debug, Clone)]
pub(crate) struct TempPackage {
    filepath: PathBuf,
    extracted_root: Option<PathBuf>,
}

impl TempPackage {
    pub(crate) fn new(filepath: PathBuf) -> Self {
        Self {
            filepath,
            extracted_root: None,
        }
    }

    pub(crate) fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub(crate) fn extracted_root(&self) -> Option<&Path> {
        self.extracted_root.as_deref()
    }

    pub(crate) fn set_extracted_root(&mut self, path: PathBuf) {
        self.extracted_root = Some(path);
    }
}
