/// Shared data structures for the gallery
///
/// These structs represent the data model that flows between
/// the library importer, the loader and the UI layer.
use iced::widget::image::Handle;
use iced::Size;
use std::fmt;
use std::path::{Path, PathBuf};

/// Free-text metadata shown in the fullscreen view, rendered verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub title: String,
    /// Film stock, e.g. "Kodak Portra 400"
    pub film: String,
    pub camera: String,
    pub location: String,
    pub caption: String,
}

/// Load progress of a single entry
///
/// Transitions only go forward: Pending -> Loading -> Loaded | Failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Pending,
    Loading,
    Loaded,
    /// Fetch failed; the entry stays inert for the rest of the session
    Failed(String),
}

impl LoadState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Pending => write!(f, "Pending"),
            LoadState::Loading => write!(f, "Loading"),
            LoadState::Loaded => write!(f, "Loaded"),
            LoadState::Failed(reason) => write!(f, "Failed: {}", reason),
        }
    }
}

/// A decoded image ready for display
#[derive(Debug, Clone)]
pub struct Picture {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

impl Picture {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            handle: Handle::from_rgba(width, height, pixels),
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// One gallery thumbnail plus its metadata
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    /// Position in gallery order
    pub index: usize,
    /// Source assigned directly, loaded without waiting for visibility
    pub src: Option<PathBuf>,
    /// Source withheld until the entry nears the viewport
    pub deferred_src: Option<PathBuf>,
    pub metadata: EntryMetadata,
    pub(crate) displayed: Option<Picture>,
    pub(crate) load_state: LoadState,
}

impl GalleryEntry {
    pub fn new(
        index: usize,
        src: Option<PathBuf>,
        deferred_src: Option<PathBuf>,
        metadata: EntryMetadata,
    ) -> Self {
        Self {
            index,
            src,
            deferred_src,
            metadata,
            displayed: None,
            load_state: LoadState::Pending,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Decoded image, present once the entry is Loaded
    pub fn displayed(&self) -> Option<&Picture> {
        self.displayed.as_ref()
    }

    /// The path a fetch reads from: the deferred source if set, else the direct one
    pub fn source(&self) -> Option<&Path> {
        self.deferred_src.as_deref().or(self.src.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_pending() {
        let entry = GalleryEntry::new(0, None, None, EntryMetadata::default());
        assert!(entry.load_state().is_pending());
        assert!(entry.displayed().is_none());
        assert!(entry.source().is_none());
    }

    #[test]
    fn test_source_prefers_deferred() {
        let entry = GalleryEntry::new(
            4,
            Some(PathBuf::from("low.jpg")),
            Some(PathBuf::from("full.jpg")),
            EntryMetadata::default(),
        );
        assert_eq!(entry.source(), Some(Path::new("full.jpg")));

        let entry = GalleryEntry::new(0, Some(PathBuf::from("a.jpg")), None, EntryMetadata::default());
        assert_eq!(entry.source(), Some(Path::new("a.jpg")));
    }

    #[test]
    fn test_load_state_display() {
        assert_eq!(LoadState::Loading.to_string(), "Loading");
        assert_eq!(
            LoadState::Failed("no such file".to_string()).to_string(),
            "Failed: no such file"
        );
    }
}
