use std::{
    fs::File,
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use tar::Archive;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("the archive is empty")]
    EmptyArchive,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Extracts the regular files located under the archive's
/// `<top-level-dir>/share/` subtree into `dest`.
///
/// Returns the path of the extracted `share` directory. Packages are
/// published with a single top-level directory, so everything of interest
/// lives under `<top-level-dir>/share/`.
pub fn extract_share(archive_path: &Path, dest: &Path) -> Result<PathBuf, ExtractError> {
    let share_root = top_level_dir(archive_path)?.join("share");

    let tar = GzDecoder::new(File::open(archive_path)?);
    let mut archive = Archive::new(tar);

    for entry in archive.entries()? {
        let mut entry = entry?;

        if !entry.header().entry_type().is_file() {
            continue;
        }

        if entry.path()?.starts_with(&share_root) {
            entry.unpack_in(dest)?;
        }
    }

    Ok(dest.join(share_root))
}

fn top_level_dir(archive_path: &Path) -> Result<PathBuf, ExtractError> {
    let tar = GzDecoder::new(File::open(archive_path)?);
    let mut archive = Archive::new(tar);

    let first = archive
        .entries()?
        .next()
        .ok_or(ExtractError::EmptyArchive)??;

    first
        .path()?
        .components()
        .next()
        .map(|component| PathBuf::from(component.as_os_str()))
        .ok_or(ExtractError::EmptyArchive)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::{write::GzEncoder, Compression};

    use super::*;

    fn append_file(builder: &mut tar::Builder<GzEncoder<Vec<u8>>>, path: &str, contents: &[u8]) {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, contents).unwrap();
    }

    fn fixture_archive() -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        append_file(
            &mut builder,
            "qbs-sdk-1.1.0/share/Items/Application.qbs",
            b"Product {}\n",
        );
        append_file(
            &mut builder,
            "qbs-sdk-1.1.0/share/Modules/utils/utils.qbs",
            b"Module {}\n",
        );
        append_file(&mut builder, "qbs-sdk-1.1.0/README.md", b"skipped\n");

        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn extracts_only_the_share_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("1.1.0.tar.gz");

        let mut file = File::create(&archive_path).unwrap();
        file.write_all(&fixture_archive()).unwrap();

        let share = extract_share(&archive_path, dir.path()).unwrap();

        assert_eq!(share, dir.path().join("qbs-sdk-1.1.0").join("share"));
        assert_eq!(
            std::fs::read(share.join("Items").join("Application.qbs")).unwrap(),
            b"Product {}\n"
        );
        assert_eq!(
            std::fs::read(share.join("Modules").join("utils").join("utils.qbs")).unwrap(),
            b"Module {}\n"
        );
        assert!(!dir.path().join("qbs-sdk-1.1.0").join("README.md").exists());
    }

    #[test]
    fn empty_archive_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("empty.tar.gz");

        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let builder = tar::Builder::new(encoder);
        let bytes = builder.into_inner().unwrap().finish().unwrap();
        std::fs::write(&archive_path, bytes).unwrap();

        assert!(matches!(
            extract_share(&archive_path, dir.path()),
            Err(ExtractError::EmptyArchive)
        ));
    }
}
