use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::ExportError;

/// Directory next to the archive that holds its extracted contents.
pub const EXTRACT_DIR_NAME: &str = "unzipped_data";

/// Resolve the archive path to an absolute one and check it is a `.zip` file.
pub fn validate_archive_path(path: &Path) -> Result<PathBuf, ExportError> {
    let resolved =
        fs::canonicalize(path).map_err(|_| ExportError::ArchiveNotFound(path.to_path_buf()))?;
    if !resolved.is_file() {
        return Err(ExportError::NotAFile(resolved));
    }
    let is_zip = resolved
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return Err(ExportError::NotAZip(resolved));
    }
    Ok(resolved)
}

/// Extract `archive` into `<archive-dir>/unzipped_data`, once.
///
/// A non-empty extraction directory is taken as a previous successful run
/// and left alone. Fresh extractions go to a temporary sibling first and are
/// renamed into place only when complete.
pub fn stage_archive(archive: &Path) -> Result<PathBuf, ExportError> {
    let parent = archive
        .parent()
        .ok_or_else(|| ExportError::NotAFile(archive.to_path_buf()))?;
    let target = parent.join(EXTRACT_DIR_NAME);

    if is_populated(&target)? {
        debug!(
            "Output directory {} already exists and is not empty. Skipping extraction.",
            target.display()
        );
        return Ok(target);
    }

    let staging = tempfile::Builder::new()
        .prefix(".unzipped_data-")
        .tempdir_in(parent)?;

    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|source| ExportError::Extraction {
        path: archive.to_path_buf(),
        source,
    })?;
    zip.extract(staging.path())
        .map_err(|source| ExportError::Extraction {
            path: archive.to_path_buf(),
            source,
        })?;

    if target.exists() {
        // Known empty from the check above.
        fs::remove_dir(&target)?;
    }
    fs::rename(staging.path(), &target)?;
    debug!("Extracted {} to {}", archive.display(), target.display());

    Ok(target)
}

fn is_populated(dir: &Path) -> std::io::Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    Ok(fs::read_dir(dir)?.next().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            validate_archive_path(&dir.path().join("nope.zip")),
            Err(ExportError::ArchiveNotFound(_))
        ));
        assert!(matches!(
            validate_archive_path(dir.path()),
            Err(ExportError::NotAFile(_))
        ));
        let txt = dir.path().join("export.txt");
        fs::write(&txt, "x").unwrap();
        assert!(matches!(validate_archive_path(&txt), Err(ExportError::NotAZip(_))));

        let upper = dir.path().join("EXPORT.ZIP");
        fs::write(&upper, "x").unwrap();
        assert!(validate_archive_path(&upper).unwrap().is_absolute());
    }

    #[test]
    fn extracts_once() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("export.zip");
        write_zip(&archive, &[("conversations.json", "[]"), ("chat.html", "<html/>")]);

        let target = stage_archive(&archive).unwrap();
        assert_eq!(target, dir.path().join(EXTRACT_DIR_NAME));
        assert_eq!(fs::read_to_string(target.join("conversations.json")).unwrap(), "[]");

        fs::write(target.join("conversations.json"), "[1]").unwrap();
        stage_archive(&archive).unwrap();
        assert_eq!(fs::read_to_string(target.join("conversations.json")).unwrap(), "[1]");
    }

    #[test]
    fn empty_target_dir_is_refilled() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("export.zip");
        write_zip(&archive, &[("conversations.json", "[]")]);
        fs::create_dir(dir.path().join(EXTRACT_DIR_NAME)).unwrap();

        let target = stage_archive(&archive).unwrap();
        assert!(target.join("conversations.json").is_file());
    }

    #[test]
    fn corrupt_archive_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("export.zip");
        fs::write(&archive, "definitely not a zip").unwrap();

        assert!(matches!(
            stage_archive(&archive),
            Err(ExportError::Extraction { .. })
        ));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("export.zip")]);
    }
}
