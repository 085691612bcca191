/// Image fetching
///
/// Reads the file on the async runtime and decodes it on a blocking thread so
/// the UI loop never waits on disk or the decoder.
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::FetchError;
use crate::state::data::Picture;

/// Read and decode an image into an RGBA picture
pub async fn fetch_image(path: PathBuf) -> Result<Picture, FetchError> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| FetchError::Read {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    // Spawn blocking because decoding is CPU-intensive
    task::spawn_blocking(move || decode_blocking(&path, &bytes))
        .await
        .map_err(|e| FetchError::Task(e.to_string()))?
}

fn decode_blocking(path: &Path, bytes: &[u8]) -> Result<Picture, FetchError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| FetchError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Picture::from_rgba(width, height, rgba.into_raw()))
}
