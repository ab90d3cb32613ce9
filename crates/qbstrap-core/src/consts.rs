pub const PROJECT_NAME: &str = "qbstrap";
pub const QBSTRAP_VERSION: &str = "0.1.0";

/// SDK versions this release of the tool knows how to install.
pub const SUPPORTED_VERSIONS: &[&str] = &["0.1.0"];

/// Location of one SDK release archive. `{version}` is substituted with the
/// version string.
pub const SDK_ARCHIVE_URL: &str = "https://github.com/qbstrap/qbs-sdk/archive/{version}.tar.gz";

/// Name of the configuration file within the root directory.
pub const CONFIG_FILENAME: &str = "Config.toml";

/// Subdirectory of the install root under which the packages are installed.
///
/// # Example
///
/// ```rust
/// # use std::path::Path;
/// # use qbstrap_core::QBS_DIR;
/// let target = Path::new("/home/user/.config/qbstrap").join(QBS_DIR).join("0.1.0");
/// ```
pub const QBS_DIR: &str = "qbs";

/// Directory name under the platform's configuration directory.
pub const ROOT_DIR: &str = "qbstrap";
