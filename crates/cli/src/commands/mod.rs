use qbstrap_core::{
    config::{Config, Section},
    scanner::Scanner,
    sdk::Sdk,
    PROJECT_NAME, SUPPORTED_VERSIONS,
};
use tracing::info;

use crate::{
    args::{Cli, Command},
    error::Error,
};

pub async fn process_args(args: &Cli) -> anyhow::Result<()> {
    match &args.command {
        Command::Init { force } => init(*force).await,
        Command::Config { list, key, value } => {
            config(*list, key.as_deref(), value.as_deref()).await
        }
    }
}

/// Installs the missing SDK packages, then scans the system for the Qbs
/// executable and stores what was found.
pub async fn init(force: bool) -> anyhow::Result<()> {
    let mut config = Config::with_default_path()?;
    config.open().await?;

    let sdk = Sdk::new(SUPPORTED_VERSIONS, None)?;

    let count = SUPPORTED_VERSIONS.len();
    if count > 1 {
        info!("There are {count} supported versions of {PROJECT_NAME}");
    } else {
        info!("There is {count} supported version of {PROJECT_NAME}");
    }

    if force {
        info!(
            "Cleaning all packages installed in {}",
            sdk.install_root_path().display()
        );
        sdk.clean()?;
    }

    info!("Downloading and installing the packages");
    sdk.install().await?;

    info!("Searching for the Qbs executable");
    let scanner = Scanner::new();

    if let Some(qbs) = scanner.scan().await {
        info!("Updating {}", config.filepath().display());

        let data = Section::from([
            (
                "filepath".to_string(),
                qbs.filepath().display().to_string(),
            ),
            ("version".to_string(), qbs.version().to_string()),
        ]);

        config.update("qbs", data, false);
        config.save().await?;
    }

    Ok(())
}

pub async fn config(list: bool, key: Option<&str>, value: Option<&str>) -> anyhow::Result<()> {
    let mut config = Config::with_default_path()?;
    config.open().await?;

    if list {
        for (name, options) in config.sections() {
            for (option, value) in options {
                println!("{name}.{option} = {value}");
            }
        }
        return Ok(());
    }

    let Some(key) = key else {
        return Err(Error::MissingKey.into());
    };

    let (section, option) = key
        .split_once('.')
        .ok_or_else(|| Error::InvalidKey(key.to_string()))?;

    match value {
        Some(value) => {
            config.update(
                section,
                Section::from([(option.to_string(), value.to_string())]),
                false,
            );
            config.save().await?;
        }
        None => match config.read(section).and_then(|options| options.get(option)) {
            Some(value) => println!("{value}"),
            None => return Err(Error::UnknownOption(key.to_string()).into()),
        },
    }

    Ok(())
}
