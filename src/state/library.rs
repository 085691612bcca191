use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::data::{EntryMetadata, GalleryEntry};
use crate::error::GalleryError;

/// Manifest file that describes a gallery's entries and their metadata
pub const MANIFEST_FILE: &str = "gallery.json";

/// Image extensions picked up when a gallery has no manifest
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

#[derive(Debug, Deserialize)]
struct Manifest {
    entries: Vec<ManifestEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ManifestEntry {
    src: Option<PathBuf>,
    deferred_src: Option<PathBuf>,
    title: String,
    film: String,
    camera: String,
    location: String,
    caption: String,
}

/// Import a gallery directory in the background
pub async fn import_gallery(
    dir: PathBuf,
    eager_count: usize,
) -> Result<Vec<GalleryEntry>, GalleryError> {
    tokio::task::spawn_blocking(move || load_gallery(&dir, eager_count))
        .await
        .map_err(|e| GalleryError::Task(e.to_string()))?
}

/// Build the ordered entry list for a gallery directory
///
/// Uses `gallery.json` when present. Otherwise walks the directory for image
/// files: the first `eager_count` get a direct source, the rest a deferred one.
pub fn load_gallery(dir: &Path, eager_count: usize) -> Result<Vec<GalleryEntry>, GalleryError> {
    if !dir.is_dir() {
        return Err(GalleryError::NotFound(dir.to_path_buf()));
    }

    let manifest_path = dir.join(MANIFEST_FILE);
    let entries = if manifest_path.is_file() {
        load_manifest(dir, &manifest_path)?
    } else {
        scan_directory(dir, eager_count)
    };

    info!(dir = %dir.display(), count = entries.len(), "gallery imported");
    Ok(entries)
}

fn load_manifest(dir: &Path, manifest_path: &Path) -> Result<Vec<GalleryEntry>, GalleryError> {
    let contents = std::fs::read_to_string(manifest_path).map_err(|e| GalleryError::Io {
        path: manifest_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let manifest: Manifest = serde_json::from_str(&contents).map_err(|e| GalleryError::Json {
        path: manifest_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let entries = manifest
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if item.src.is_none() && item.deferred_src.is_none() {
                warn!(index, title = %item.title, "manifest entry has no image source");
            }

            GalleryEntry::new(
                index,
                item.src.map(|p| dir.join(p)),
                item.deferred_src.map(|p| dir.join(p)),
                EntryMetadata {
                    title: item.title,
                    film: item.film,
                    camera: item.camera,
                    location: item.location,
                    caption: item.caption,
                },
            )
        })
        .collect();

    Ok(entries)
}

fn scan_directory(dir: &Path, eager_count: usize) -> Vec<GalleryEntry> {
    debug!(dir = %dir.display(), "no manifest, scanning for images");

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_supported_image(path))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| {
            let title = path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            let metadata = EntryMetadata {
                title,
                ..EntryMetadata::default()
            };

            if index < eager_count {
                GalleryEntry::new(index, Some(path), None, metadata)
            } else {
                GalleryEntry::new(index, None, Some(path), metadata)
            }
        })
        .collect()
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_manifest_defines_order_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{
                "entries": [
                    { "src": "pier.jpg", "title": "Pier", "film": "Portra 400",
                      "camera": "Nikon FM2", "location": "Brighton", "caption": "Low tide" },
                    { "deferred_src": "dunes.jpg", "title": "Dunes" },
                    { "title": "Lost negative" }
                ]
            }"#,
        )
        .unwrap();

        let entries = load_gallery(dir.path(), 3).unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].src, Some(dir.path().join("pier.jpg")));
        assert_eq!(entries[0].deferred_src, None);
        assert_eq!(entries[0].metadata.film, "Portra 400");
        assert_eq!(entries[0].metadata.caption, "Low tide");

        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[1].deferred_src, Some(dir.path().join("dunes.jpg")));
        assert_eq!(entries[1].metadata.camera, "");

        assert!(entries[2].source().is_none());
    }

    #[test]
    fn test_scan_splits_eager_and_deferred() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["d.png", "a.jpg", "c.JPEG", "b.webp", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let entries = load_gallery(dir.path(), 3).unwrap();
        let titles: Vec<&str> = entries.iter().map(|e| e.metadata.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c", "d"]);

        assert!(entries[..3].iter().all(|e| e.src.is_some() && e.deferred_src.is_none()));
        assert!(entries[3].src.is_none());
        assert_eq!(entries[3].deferred_src, Some(dir.path().join("d.png")));
    }

    #[test]
    fn test_missing_directory() {
        let err = load_gallery(Path::new("/definitely/not/a/gallery"), 3).unwrap_err();
        assert!(matches!(err, GalleryError::NotFound(_)));
    }

    #[test]
    fn test_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{ \"entries\": [ {").unwrap();

        let err = load_gallery(dir.path(), 3).unwrap_err();
        assert!(matches!(err, GalleryError::Json { .. }));
    }

    #[tokio::test]
    async fn test_import_gallery_runs_in_background() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("only.png"), b"").unwrap();

        let entries = import_gallery(dir.path().to_path_buf(), 3).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].src.is_some());
    }
}
