use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    consts::{CONFIG_FILENAME, ROOT_DIR},
    fs::{read_toml_config, write_toml_config},
};

/// Options of one configuration section.
pub type Section = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to resolve a configuration directory on this platform")]
    UnsupportedPlatform,

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Default root path where the configuration file and the SDK files live.
///
/// `$HOME/.config/qbstrap` on GNU/Linux, `%APPDATA%/qbstrap` on Windows.
pub fn default_root_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(ROOT_DIR))
}

/// Sectioned configuration store backed by a toml file.
///
/// ```no_run
/// # use qbstrap_core::config::{Config, Section};
/// # async fn example() -> anyhow::Result<()> {
/// let mut config = Config::with_default_path()?;
/// config.open().await?;
///
/// if let Some(qbs) = config.read("qbs") {
///     // do something with the section ...
/// }
///
/// config.update("qbs", Section::new(), false);
/// config.save().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    sections: BTreeMap<String, Section>,
}

impl Config {
    /// Builds a store rooted at `path`, creating the directory if needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(ConfigError::NotADirectory(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            sections: BTreeMap::new(),
        })
    }

    pub fn with_default_path() -> Result<Self, ConfigError> {
        let path = default_root_path().ok_or(ConfigError::UnsupportedPlatform)?;
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filepath(&self) -> PathBuf {
        self.path.join(CONFIG_FILENAME)
    }

    /// Loads the configuration file. A missing file leaves the store empty.
    pub async fn open(&mut self) -> anyhow::Result<()> {
        let filepath = self.filepath();

        if filepath.exists() {
            self.sections = read_toml_config(&filepath).await?;
        }

        Ok(())
    }

    /// Returns the options of `section`, or `None` if there is no such
    /// section.
    pub fn read(&self, section: &str) -> Option<&Section> {
        self.sections.get(section)
    }

    pub fn sections(&self) -> &BTreeMap<String, Section> {
        &self.sections
    }

    /// Merges `data` into `section`, creating it if needed. With `reset`, the
    /// previous options of the section are discarded first.
    pub fn update(&mut self, section: &str, data: Section, reset: bool) {
        let options = self.sections.entry(section.to_string()).or_default();

        if reset {
            options.clear();
        }

        options.extend(data);
    }

    /// Writes the store back to disk, pruning empty sections.
    pub async fn save(&mut self) -> anyhow::Result<()> {
        self.sections.retain(|_, options| !options.is_empty());
        write_toml_config(&self.sections, self.filepath()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qbs_section() -> Section {
        Section::from([
            ("filepath".to_string(), "/usr/bin/qbs".to_string()),
            ("version".to_string(), "1.5.0".to_string()),
        ])
    }

    #[tokio::test]
    async fn save_and_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = Config::new(dir.path()).unwrap();
        config.update("qbs", qbs_section(), false);
        config.save().await.unwrap();

        let mut config = Config::new(dir.path()).unwrap();
        config.open().await.unwrap();

        assert_eq!(config.read("qbs"), Some(&qbs_section()));
        assert_eq!(config.read("qt"), None);
    }

    #[tokio::test]
    async fn update_merges_and_resets() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = Config::new(dir.path()).unwrap();
        config.update("qbs", qbs_section(), false);
        config.update(
            "qbs",
            Section::from([("version".to_string(), "1.6.0".to_string())]),
            false,
        );

        let section = config.read("qbs").unwrap();
        assert_eq!(section.get("version").unwrap(), "1.6.0");
        assert_eq!(section.get("filepath").unwrap(), "/usr/bin/qbs");

        config.update(
            "qbs",
            Section::from([("version".to_string(), "1.7.0".to_string())]),
            true,
        );

        let section = config.read("qbs").unwrap();
        assert_eq!(section.get("version").unwrap(), "1.7.0");
        assert_eq!(section.get("filepath"), None);
    }

    #[tokio::test]
    async fn empty_sections_are_pruned_on_save() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = Config::new(dir.path()).unwrap();
        config.update("qbs", qbs_section(), false);
        config.update("qt", Section::new(), false);
        config.save().await.unwrap();

        let mut config = Config::new(dir.path()).unwrap();
        config.open().await.unwrap();

        assert!(config.read("qbs").is_some());
        assert!(config.read("qt").is_none());
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("qbstrap");

        let config = Config::new(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(config.filepath(), root.join(CONFIG_FILENAME));
    }
}
