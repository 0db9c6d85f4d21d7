//! KMZ packaging.
//!
//! A KMZ is a zip of one directory: `doc.kml` at the root and the images it
//! references below it. Entry names are relative to that directory and
//! always use `/` separators, whatever the host platform.
//!
//! The archive is first written to a temporary file beside the destination
//! and only renamed into place once complete, so a failed run never leaves
//! a truncated `.kmz` behind.

mod error;

pub use error::{ArchiveError, ArchiveResult};

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A finished KMZ on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmzArchive {
    /// Final archive path.
    pub path: PathBuf,
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
}

/// Zip every file under `root` into `output`.
///
/// Files are visited in file-name order so `doc.kml` precedes the `tiles/`
/// directory and tiles stay in raster order. Directories get no entries of
/// their own.
pub fn build_kmz(root: &Path, output: &Path) -> ArchiveResult<KmzArchive> {
    if !root.is_dir() {
        return Err(ArchiveError::MissingRoot(root.to_path_buf()));
    }

    let output_dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&output_dir).map_err(|e| ArchiveError::Io {
        path: output_dir.clone(),
        source: e,
    })?;

    let staging = tempfile::Builder::new()
        .prefix(".kmztiler-")
        .suffix(".kmz.part")
        .tempfile_in(&output_dir)
        .map_err(|e| ArchiveError::Io {
            path: output_dir.clone(),
            source: e,
        })?;

    let mut writer = ZipWriter::new(staging);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry_name(root, entry.path())?;
        debug!(entry = %name, "Adding archive entry");

        writer
            .start_file(name.clone(), options)
            .map_err(|e| ArchiveError::Zip {
                entry: name.clone(),
                source: e,
            })?;
        let file = File::open(entry.path()).map_err(|e| ArchiveError::Io {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        io::copy(&mut BufReader::new(file), &mut writer).map_err(|e| ArchiveError::Io {
            path: entry.path().to_path_buf(),
            source: e,
        })?;

        entries.push(name);
    }

    let staging = writer.finish().map_err(|e| ArchiveError::Zip {
        entry: "<central directory>".to_string(),
        source: e,
    })?;
    staging
        .persist(output)
        .map_err(|e| ArchiveError::Persist {
            path: output.to_path_buf(),
            source: e.error,
        })?;

    info!(
        archive = %output.display(),
        entries = entries.len(),
        "KMZ written"
    );

    Ok(KmzArchive {
        path: output.to_path_buf(),
        entries,
    })
}

/// Archive entry name of `path` relative to `root`, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> ArchiveResult<String> {
    let relative = path.strip_prefix(root).map_err(|_| ArchiveError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path is outside archive root"),
    })?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn populate(root: &Path) {
        fs::create_dir_all(root.join("tiles")).unwrap();
        fs::write(root.join("doc.kml"), "<kml/>").unwrap();
        fs::write(root.join("tiles/m_tile_001.jpg"), b"second").unwrap();
        fs::write(root.join("tiles/m_tile_000.jpg"), b"first").unwrap();
    }

    fn read_names(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(String::from).collect()
    }

    #[test]
    fn test_entries_are_relative_to_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("stage").join("m");
        populate(&root);
        let output = temp.path().join("out").join("m.kmz");

        let kmz = build_kmz(&root, &output).unwrap();

        assert_eq!(
            kmz.entries,
            vec!["doc.kml", "tiles/m_tile_000.jpg", "tiles/m_tile_001.jpg"]
        );
        let mut names = read_names(&output);
        names.sort();
        assert_eq!(names, kmz.entries);
    }

    #[test]
    fn test_entry_contents_round_trip() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("m");
        populate(&root);
        let output = temp.path().join("m.kmz");

        build_kmz(&root, &output).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut doc = String::new();
        archive
            .by_name("doc.kml")
            .unwrap()
            .read_to_string(&mut doc)
            .unwrap();
        assert_eq!(doc, "<kml/>");

        let mut tile = Vec::new();
        archive
            .by_name("tiles/m_tile_000.jpg")
            .unwrap()
            .read_to_end(&mut tile)
            .unwrap();
        assert_eq!(tile, b"first");
    }

    #[test]
    fn test_missing_root_leaves_no_output() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("m.kmz");

        let result = build_kmz(&temp.path().join("absent"), &output);

        assert!(matches!(result, Err(ArchiveError::MissingRoot(_))));
        assert!(!output.exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("m");
        populate(&root);
        let out_dir = temp.path().join("out");
        let output = out_dir.join("m.kmz");

        build_kmz(&root, &output).unwrap();

        let leftovers: Vec<_> = fs::read_dir(&out_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("m.kmz")]);
    }

    #[test]
    fn test_overwrites_existing_archive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("m");
        populate(&root);
        let output = temp.path().join("m.kmz");
        fs::write(&output, b"stale").unwrap();

        build_kmz(&root, &output).unwrap();

        assert_eq!(read_names(&output).len(), 3);
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let root = Path::new("/stage/m");
        let path = root.join("tiles").join("m_tile_000.jpg");
        assert_eq!(entry_name(root, &path).unwrap(), "tiles/m_tile_000.jpg");
    }
}
