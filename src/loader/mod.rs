/// Lazy-loading engine
///
/// This module handles:
/// - Eager fetching of the first few entries at registration
/// - Visibility-triggered fetching of the rest (fetch.rs, visibility.rs)
/// - Per-entry load state, applied once per completion event
///
/// An entry is "observed" while it is Pending and has a deferred source. Starting
/// its fetch moves it to Loading, which ends observation.
pub mod fetch;
pub mod visibility;

use iced::Rectangle;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::LoaderSettings;
use crate::error::FetchError;
use crate::state::data::{GalleryEntry, LoadState, Picture};
use visibility::GridLayout;

/// A fetch the caller must start
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Registration the request belongs to
    pub generation: u64,
    pub index: usize,
    pub source: PathBuf,
}

/// Owns the gallery entries and drives their load state
#[derive(Debug, Default)]
pub struct Loader {
    settings: LoaderSettings,
    entries: Vec<GalleryEntry>,
    generation: u64,
}

impl Loader {
    pub fn new(settings: LoaderSettings) -> Self {
        Self {
            settings,
            entries: Vec::new(),
            generation: 0,
        }
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&GalleryEntry> {
        self.entries.get(index)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the gallery and start the fetches that do not wait for visibility
    ///
    /// The first `eager_count` entries load immediately. Later entries without a
    /// deferred source load immediately when they have a direct source. All
    /// remaining entries are left under observation.
    pub fn register(&mut self, entries: Vec<GalleryEntry>) -> Vec<FetchRequest> {
        self.entries = entries;
        self.generation += 1;

        let eager_count = self.settings.eager_count;
        let mut requests = Vec::new();

        for index in 0..self.entries.len() {
            let entry = &self.entries[index];
            let immediate = index < eager_count || entry.deferred_src.is_none();
            if immediate {
                requests.extend(self.begin(index));
            }
        }

        info!(
            generation = self.generation,
            entries = self.entries.len(),
            eager = requests.len(),
            observed = self.observed_count(),
            "gallery registered"
        );

        requests
    }

    /// Whether an entry is still waiting for visibility
    pub fn is_observed(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(|e| e.load_state.is_pending() && e.deferred_src.is_some())
    }

    pub fn observed_count(&self) -> usize {
        (0..self.entries.len()).filter(|&i| self.is_observed(i)).count()
    }

    /// Start fetching every observed entry that is visible in `viewport`
    pub fn observe(&mut self, layout: &GridLayout, viewport: Rectangle) -> Vec<FetchRequest> {
        let LoaderSettings {
            margin, threshold, ..
        } = self.settings;

        let visible: Vec<usize> = (0..self.entries.len())
            .filter(|&i| self.is_observed(i))
            .filter(|&i| visibility::is_visible(layout.tile_bounds(i), viewport, margin, threshold))
            .collect();

        visible.into_iter().filter_map(|i| self.begin(i)).collect()
    }

    /// Apply a fetch completion
    ///
    /// Returns false when the event was ignored: stale generation, unknown
    /// index, or an entry that is not Loading.
    pub fn complete(
        &mut self,
        generation: u64,
        index: usize,
        result: Result<Picture, FetchError>,
    ) -> bool {
        if generation != self.generation {
            debug!(generation, index, "ignoring completion from a replaced gallery");
            return false;
        }

        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };

        if !entry.load_state.is_loading() {
            debug!(index, state = %entry.load_state, "ignoring duplicate completion");
            return false;
        }

        match result {
            Ok(picture) => {
                entry.displayed = Some(picture);
                entry.load_state = LoadState::Loaded;
                debug!(index, "image loaded");
            }
            Err(error) => {
                warn!(index, %error, "image failed to load");
                entry.load_state = LoadState::Failed(error.to_string());
            }
        }

        true
    }

    /// Counts of (loaded, failed) entries
    pub fn progress(&self) -> (usize, usize) {
        self.entries.iter().fold((0, 0), |(loaded, failed), e| {
            (
                loaded + e.load_state.is_loaded() as usize,
                failed + e.load_state.is_failed() as usize,
            )
        })
    }

    /// Pending -> Loading, if the entry has anything to fetch
    fn begin(&mut self, index: usize) -> Option<FetchRequest> {
        let entry = self.entries.get_mut(index)?;
        if !entry.load_state.is_pending() {
            return None;
        }

        let source = entry.source()?.to_path_buf();
        entry.load_state = LoadState::Loading;
        debug!(index, path = %source.display(), "fetch started");

        Some(FetchRequest {
            generation: self.generation,
            index,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSettings;
    use crate::state::data::EntryMetadata;

    fn deferred(index: usize) -> GalleryEntry {
        GalleryEntry::new(
            index,
            None,
            Some(PathBuf::from(format!("{}.jpg", index))),
            EntryMetadata::default(),
        )
    }

    fn gallery(count: usize) -> Vec<GalleryEntry> {
        (0..count).map(deferred).collect()
    }

    /// One column of 100px tiles, 10px apart, 10px padding
    fn layout() -> GridLayout {
        let grid = GridSettings {
            tile_width: 100.0,
            tile_height: 100.0,
            spacing: 10.0,
            padding: 10.0,
        };
        GridLayout::new(&grid, 120.0)
    }

    fn viewport(y: f32, height: f32) -> Rectangle {
        Rectangle {
            x: 0.0,
            y,
            width: 120.0,
            height,
        }
    }

    fn pixel() -> Picture {
        Picture::from_rgba(1, 1, vec![0, 0, 0, 255])
    }

    #[test]
    fn test_register_loads_first_three_eagerly() {
        let mut loader = Loader::new(LoaderSettings::default());
        let requests = loader.register(gallery(10));

        let indices: Vec<usize> = requests.iter().map(|r| r.index).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert!(loader.entries()[..3].iter().all(|e| e.load_state().is_loading()));
        assert!(loader.entries()[3..].iter().all(|e| e.load_state().is_pending()));
        assert_eq!(loader.observed_count(), 7);
    }

    #[test]
    fn test_entries_without_deferred_source_are_not_observed() {
        let mut entries = gallery(6);
        // Direct source only: loaded straight away
        entries[4].deferred_src = None;
        entries[4].src = Some(PathBuf::from("direct.jpg"));
        // No source at all: stays Pending forever
        entries[5].deferred_src = None;

        let mut loader = Loader::new(LoaderSettings::default());
        let requests = loader.register(entries);

        let indices: Vec<usize> = requests.iter().map(|r| r.index).collect();
        assert_eq!(indices, [0, 1, 2, 4]);
        assert!(loader.is_observed(3));
        assert!(!loader.is_observed(4));
        assert!(!loader.is_observed(5));

        let requests = loader.observe(&layout(), viewport(0.0, 10_000.0));
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].index, 3);
        assert!(loader.entry(5).unwrap().load_state().is_pending());
    }

    #[test]
    fn test_eager_entry_uses_direct_source() {
        let mut entries = gallery(1);
        entries[0].deferred_src = None;
        entries[0].src = Some(PathBuf::from("cover.jpg"));

        let mut loader = Loader::new(LoaderSettings::default());
        let requests = loader.register(entries);
        assert_eq!(requests[0].source, PathBuf::from("cover.jpg"));
    }

    #[test]
    fn test_visibility_pass_starts_each_entry_once() {
        let mut loader = Loader::new(LoaderSettings::default());
        loader.register(gallery(20));

        // Tiles are 110px apart starting at y=10. A 300px viewport plus the
        // 50px margin reaches y=350: entries 0..=3 intersect.
        let requests = loader.observe(&layout(), viewport(0.0, 300.0));
        let indices: Vec<usize> = requests.iter().map(|r| r.index).collect();
        assert_eq!(indices, [3]);
        assert!(!loader.is_observed(3));

        // Same viewport again: nothing new
        assert!(loader.observe(&layout(), viewport(0.0, 300.0)).is_empty());

        // Scroll back and forth: entry 3 is never requested again
        loader.observe(&layout(), viewport(2000.0, 300.0));
        let again = loader.observe(&layout(), viewport(0.0, 300.0));
        assert!(again.iter().all(|r| r.index != 3));
    }

    #[test]
    fn test_far_entries_stay_pending() {
        let mut loader = Loader::new(LoaderSettings::default());
        loader.register(gallery(20));
        loader.observe(&layout(), viewport(0.0, 300.0));

        assert!(loader.entry(10).unwrap().load_state().is_pending());
        assert!(loader.is_observed(10));
    }

    #[test]
    fn test_completion_success_and_failure() {
        let mut loader = Loader::new(LoaderSettings::default());
        loader.register(gallery(3));
        let generation = loader.generation();

        assert!(loader.complete(generation, 0, Ok(pixel())));
        let entry = loader.entry(0).unwrap();
        assert!(entry.load_state().is_loaded());
        assert!(entry.displayed().is_some());

        let error = FetchError::Read {
            path: PathBuf::from("1.jpg"),
            reason: "permission denied".to_string(),
        };
        assert!(loader.complete(generation, 1, Err(error)));
        let entry = loader.entry(1).unwrap();
        assert!(entry.load_state().is_failed());
        assert!(entry.displayed().is_none());

        assert_eq!(loader.progress(), (1, 1));
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut loader = Loader::new(LoaderSettings::default());
        loader.register(gallery(3));
        let generation = loader.generation();

        let error = FetchError::Task("cancelled".to_string());
        assert!(loader.complete(generation, 0, Err(error.clone())));
        assert!(!loader.complete(generation, 0, Ok(pixel())));
        assert!(loader.entry(0).unwrap().load_state().is_failed());

        assert!(loader.complete(generation, 1, Ok(pixel())));
        assert!(!loader.complete(generation, 1, Err(error)));
        assert!(loader.entry(1).unwrap().load_state().is_loaded());
    }

    #[test]
    fn test_completion_for_pending_or_unknown_entry_is_ignored() {
        let mut loader = Loader::new(LoaderSettings::default());
        loader.register(gallery(5));
        let generation = loader.generation();

        assert!(!loader.complete(generation, 4, Ok(pixel())));
        assert!(loader.entry(4).unwrap().load_state().is_pending());
        assert!(!loader.complete(generation, 99, Ok(pixel())));
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut loader = Loader::new(LoaderSettings::default());
        loader.register(gallery(3));
        let stale = loader.generation();
        loader.register(gallery(3));

        assert!(!loader.complete(stale, 0, Ok(pixel())));
        assert!(loader.entry(0).unwrap().load_state().is_loading());
        assert!(loader.complete(loader.generation(), 0, Ok(pixel())));
    }

    #[test]
    fn test_custom_eager_count() {
        let settings = LoaderSettings {
            eager_count: 0,
            ..LoaderSettings::default()
        };
        let mut loader = Loader::new(settings);
        assert!(loader.register(gallery(4)).is_empty());
        assert_eq!(loader.observed_count(), 4);
    }
}
