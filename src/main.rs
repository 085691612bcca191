use iced::widget::scrollable::{self, AbsoluteOffset, Viewport};
use iced::widget::{column, stack};
use iced::{
    event, keyboard, window, Element, Event, Point, Rectangle, Size, Subscription, Task, Theme,
};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{error, trace};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod loader;
mod state;
mod ui;

use config::Settings;
use error::{FetchError, GalleryError};
use loader::visibility::GridLayout;
use loader::{fetch, FetchRequest, Loader};
use state::data::{GalleryEntry, Picture};
use state::library;
use state::viewer::{Viewer, ViewerState};

const WINDOW_SIZE: Size = Size::new(1200.0, 800.0);

const GALLERY_SCROLL_ID: &str = "gallery";

/// Main application state
struct FilmGallery {
    settings: Settings,
    /// Gallery entries and their load state
    loader: Loader,
    /// Fullscreen modal and scroll lock
    viewer: Viewer,
    /// Visible part of the grid in content coordinates
    viewport: Rectangle,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the "Open Gallery" button
    OpenGallery,
    /// Background import finished
    GalleryImported(Result<Vec<GalleryEntry>, GalleryError>),
    /// Gallery grid scrolled
    Scrolled(Viewport),
    WindowResized(Size),
    /// An image fetch completed
    ImageFetched {
        generation: u64,
        index: usize,
        result: Result<Picture, FetchError>,
    },
    /// User clicked a gallery tile
    EntryPressed(usize),
    /// User clicked the image inside the fullscreen view
    ImagePressed,
    BackPressed,
    /// User clicked outside the image in the fullscreen view
    BackdropPressed,
    /// Escape key
    CancelPressed,
}

impl FilmGallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let mut app = Self::with_settings(Settings::load());

        let task = match app.settings.gallery_dir.clone() {
            Some(dir) => app.import(dir),
            None => Task::none(),
        };

        (app, task)
    }

    fn with_settings(settings: Settings) -> Self {
        Self {
            loader: Loader::new(settings.loader),
            viewer: Viewer::default(),
            viewport: Rectangle {
                x: 0.0,
                y: 0.0,
                width: WINDOW_SIZE.width,
                height: WINDOW_SIZE.height - ui::HEADER_HEIGHT,
            },
            status: "Open a gallery folder to begin.".to_string(),
            settings,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenGallery => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Gallery Folder")
                    .pick_folder();

                match folder {
                    Some(dir) => self.import(dir),
                    None => Task::none(),
                }
            }
            Message::GalleryImported(Ok(entries)) => {
                self.viewer.close();
                let eager = self.loader.register(entries);
                self.refresh_status();

                // Entries already on screen load without waiting for a scroll
                Task::batch([Self::fetch(eager), self.observe_viewport()])
            }
            Message::GalleryImported(Err(err)) => {
                error!(error = %err, "gallery import failed");
                self.status = format!("Import failed: {}", err);
                Task::none()
            }
            Message::Scrolled(viewport) => {
                self.scrolled(viewport.absolute_offset(), viewport.bounds().size())
            }
            Message::WindowResized(size) => self.set_viewport(Rectangle {
                width: size.width,
                height: (size.height - ui::HEADER_HEIGHT).max(0.0),
                ..self.viewport
            }),
            Message::ImageFetched {
                generation,
                index,
                result,
            } => {
                if self.loader.complete(generation, index, result) {
                    self.refresh_status();
                }
                Task::none()
            }
            Message::EntryPressed(index) => {
                let offset = AbsoluteOffset {
                    x: self.viewport.x,
                    y: self.viewport.y,
                };
                self.viewer.open(&self.loader, index, offset);
                Task::none()
            }
            Message::ImagePressed => {
                trace!("image pressed, viewer stays open");
                Task::none()
            }
            Message::BackPressed | Message::BackdropPressed | Message::CancelPressed => {
                self.viewer.close();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let gallery = column![
            ui::header(self.status.clone()),
            ui::grid::view(self.loader.entries(), &self.layout(), gallery_scroll_id()),
        ];

        let ViewerState {
            is_open,
            active_entry,
        } = self.viewer.state();
        let overlay = active_entry
            .filter(|_| is_open)
            .and_then(|index| self.loader.entry(index))
            .and_then(ui::fullscreen::view);

        match overlay {
            Some(overlay) => stack![gallery, overlay].into(),
            None => gallery.into(),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let keys = keyboard::on_key_press(|key, _modifiers| match key {
            keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::CancelPressed),
            _ => None,
        });

        let windows = event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::Opened { size, .. })
            | Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
            _ => None,
        });

        Subscription::batch([keys, windows])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn import(&mut self, dir: PathBuf) -> Task<Message> {
        self.status = format!("Importing from {}...", dir.display());

        Task::perform(
            library::import_gallery(dir, self.settings.loader.eager_count),
            Message::GalleryImported,
        )
    }

    fn layout(&self) -> GridLayout {
        GridLayout::new(&self.settings.grid, self.viewport.width)
    }

    /// Gallery scrolled to `offset`; held in place while the viewer is open
    fn scrolled(&mut self, offset: AbsoluteOffset, size: Size) -> Task<Message> {
        if let Some(held) = self.viewer.scroll_lock().held_at() {
            if offset.x != held.x || offset.y != held.y {
                return scrollable::scroll_to(gallery_scroll_id(), held);
            }
            return Task::none();
        }

        self.set_viewport(Rectangle::new(Point::new(offset.x, offset.y), size))
    }

    fn set_viewport(&mut self, viewport: Rectangle) -> Task<Message> {
        self.viewport = viewport;
        self.observe_viewport()
    }

    fn observe_viewport(&mut self) -> Task<Message> {
        let layout = self.layout();
        let requests = self.loader.observe(&layout, self.viewport);
        Self::fetch(requests)
    }

    fn fetch(requests: Vec<FetchRequest>) -> Task<Message> {
        Task::batch(requests.into_iter().map(|request| {
            let FetchRequest {
                generation,
                index,
                source,
            } = request;

            Task::perform(fetch::fetch_image(source), move |result| {
                Message::ImageFetched {
                    generation,
                    index,
                    result,
                }
            })
        }))
    }

    fn refresh_status(&mut self) {
        let (loaded, failed) = self.loader.progress();
        self.status = format!(
            "{} photos · {} loaded · {} failed",
            self.loader.entries().len(),
            loaded,
            failed
        );
    }
}

fn gallery_scroll_id() -> scrollable::Id {
    scrollable::Id::new(GALLERY_SCROLL_ID)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("film_gallery=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

fn main() -> iced::Result {
    init_tracing();

    iced::application("Film Gallery", FilmGallery::update, FilmGallery::view)
        .subscription(FilmGallery::subscription)
        .theme(FilmGallery::theme)
        .window_size(WINDOW_SIZE)
        .centered()
        .run_with(FilmGallery::new)
}
