/// Fullscreen viewer state
///
/// The viewer is the single owner of the modal state and the gallery scroll
/// lock. It starts closed and returns to that state on every close.
use iced::widget::scrollable::AbsoluteOffset;
use tracing::{debug, trace};

use crate::loader::Loader;

/// Snapshot of the modal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerState {
    pub is_open: bool,
    /// Index of the entry shown fullscreen
    pub active_entry: Option<usize>,
}

/// Gallery scroll suppression while the modal is open
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollLock {
    held_at: Option<AbsoluteOffset>,
}

impl ScrollLock {
    /// Offset the gallery must stay at, if the lock is held
    pub fn held_at(&self) -> Option<AbsoluteOffset> {
        self.held_at
    }

    pub fn is_held(&self) -> bool {
        self.held_at.is_some()
    }
}

#[derive(Debug, Default)]
pub struct Viewer {
    state: ViewerState,
    scroll_lock: ScrollLock,
}

impl Viewer {
    pub fn state(&self) -> ViewerState {
        self.state
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    #[cfg(test)]
    pub fn active_entry(&self) -> Option<usize> {
        self.state.active_entry
    }

    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll_lock
    }

    /// Show entry `index` fullscreen
    ///
    /// Does nothing unless the entry is Loaded. `offset` is the current gallery
    /// scroll position, held until the viewer closes.
    pub fn open(&mut self, loader: &Loader, index: usize, offset: AbsoluteOffset) -> bool {
        let loaded = loader
            .entry(index)
            .is_some_and(|e| e.load_state().is_loaded());
        if !loaded {
            trace!(index, "entry not loaded, ignoring open");
            return false;
        }

        self.state = ViewerState {
            is_open: true,
            active_entry: Some(index),
        };
        if !self.scroll_lock.is_held() {
            self.scroll_lock.held_at = Some(offset);
        }

        debug!(index, "viewer opened");
        true
    }

    /// Hide the modal and release the scroll lock; safe to call when closed
    pub fn close(&mut self) -> bool {
        if !self.state.is_open {
            return false;
        }

        debug!(index = ?self.state.active_entry, "viewer closed");
        self.state = ViewerState::default();
        self.scroll_lock = ScrollLock::default();
        true
    }
}
