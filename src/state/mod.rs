/// State management module
///
/// This module handles all application state, including:
/// - Gallery entries and their metadata (data.rs)
/// - Importing a gallery directory (library.rs)
/// - The fullscreen viewer and scroll lock (viewer.rs)

pub mod data;
pub mod library;
pub mod viewer;
