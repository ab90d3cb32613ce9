use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::version::VersionNumber;

/// Qbs executable found on the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qbs {
    filepath: PathBuf,
    version: VersionNumber,
}

impl Qbs {
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub fn version(&self) -> VersionNumber {
        self.version
    }
}

/// Scans `QBS_HOME`, then `PATH`, for a Qbs executable of at least the
/// minimum version.
#[derive(Debug, Clone)]
pub struct Scanner {
    minimum_version: VersionNumber,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            minimum_version: VersionNumber::new(1, 5, 0),
        }
    }

    pub fn with_minimum_version(minimum_version: VersionNumber) -> Self {
        Self { minimum_version }
    }

    pub fn minimum_version(&self) -> VersionNumber {
        self.minimum_version
    }

    /// Looks for the Qbs executable.
    ///
    /// `QBS_HOME` has a higher priority than `PATH`, so it is checked first;
    /// `PATH` is only walked when it yielded no suitable candidate.
    pub async fn scan(&self) -> Option<Qbs> {
        let appname = if cfg!(windows) { "qbs.exe" } else { "qbs" };

        if let Some(home) = std::env::var_os("QBS_HOME") {
            let app = Path::new(&home).join("bin").join(appname);

            if app.is_file() {
                if let Some(qbs) = self.probe(&app).await {
                    return Some(qbs);
                }
            } else {
                let dir = app.parent().unwrap_or_else(|| app.as_path());
                warn!("{appname} was not found in the {} directory", dir.display());
            }
        }

        let paths = std::env::var_os("PATH")?;

        for dir in std::env::split_paths(&paths) {
            let app = dir.join(appname);

            if app.is_file() {
                if let Some(qbs) = self.probe(&app).await {
                    return Some(qbs);
                }
            }
        }

        None
    }

    /// Runs `qbs --version` and keeps the candidate when its version
    /// satisfies the minimum.
    async fn probe(&self, executable: &Path) -> Option<Qbs> {
        let output = tokio::process::Command::new(executable)
            .arg("--version")
            .output()
            .await
            .map_err(|err| warn!("Unable to run {}: {err}", executable.display()))
            .ok()?;

        // Qbs prints its version number followed by an OS dependant newline.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let version: VersionNumber = stdout.trim().parse().ok()?;

        if version >= self.minimum_version {
            Some(Qbs {
                filepath: executable.to_path_buf(),
                version,
            })
        } else {
            debug!(
                "{} is version {version}, expected at least {}",
                executable.display(),
                self.minimum_version
            );
            None
        }
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    fn fake_qbs(dir: &Path, version: &str) -> PathBuf {
        let bin = dir.join("bin");
        std::fs::create_dir_all(&bin).unwrap();

        let app = bin.join("qbs");
        std::fs::write(&app, format!("#!/bin/sh\necho {version}\n")).unwrap();
        std::fs::set_permissions(&app, std::fs::Permissions::from_mode(0o755)).unwrap();

        app
    }

    #[tokio::test]
    async fn probe_accepts_a_recent_executable() {
        let dir = tempfile::tempdir().unwrap();
        let app = fake_qbs(dir.path(), "1.6.0");

        let qbs = Scanner::new().probe(&app).await.unwrap();

        assert_eq!(qbs.filepath(), app);
        assert_eq!(qbs.version(), VersionNumber::new(1, 6, 0));
    }

    #[tokio::test]
    async fn probe_rejects_an_old_executable() {
        let dir = tempfile::tempdir().unwrap();
        let app = fake_qbs(dir.path(), "1.4.2");

        assert_eq!(Scanner::new().probe(&app).await, None);
    }

    #[tokio::test]
    async fn probe_rejects_garbage_output() {
        let dir = tempfile::tempdir().unwrap();
        let app = fake_qbs(dir.path(), "not-a-version");

        assert_eq!(Scanner::new().probe(&app).await, None);
    }
}
