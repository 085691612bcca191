use iced::widget::{column, container, image, mouse_area, row, scrollable, text, Column, Row};
use iced::{Alignment, ContentFit, Element, Length};

use crate::loader::visibility::GridLayout;
use crate::state::data::{GalleryEntry, LoadState};
use crate::Message;

/// Scrollable grid of fixed-size tiles
///
/// Rows and spacing mirror `GridLayout` exactly so visibility checks line up
/// with what is drawn.
pub fn view<'a>(
    entries: &'a [GalleryEntry],
    layout: &GridLayout,
    scroll_id: scrollable::Id,
) -> Element<'a, Message> {
    let rows: Vec<Element<Message>> = entries
        .chunks(layout.columns)
        .map(|chunk| {
            Row::with_children(chunk.iter().map(|entry| tile(entry, layout)))
                .spacing(layout.spacing)
                .into()
        })
        .collect();

    let grid = Column::with_children(rows)
        .spacing(layout.spacing)
        .padding(layout.padding);

    scrollable(grid)
        .id(scroll_id)
        .on_scroll(Message::Scrolled)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// How a tile's frame is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileFrame {
    /// Bordered, marks a loaded entry
    Loaded,
    Placeholder,
}

fn tile_frame(state: &LoadState) -> TileFrame {
    if state.is_loaded() {
        TileFrame::Loaded
    } else {
        TileFrame::Placeholder
    }
}

/// Placeholder text for the tile, or `None` once the picture is shown
fn tile_label(entry: &GalleryEntry) -> Option<&'static str> {
    match (entry.load_state(), entry.displayed()) {
        (LoadState::Loaded, Some(_)) => None,
        (LoadState::Failed(_), _) => Some("Image unavailable"),
        // Nothing will ever be fetched for it
        (LoadState::Pending, _) if entry.source().is_none() => Some("No image"),
        _ => Some("Loading…"),
    }
}

fn tile<'a>(entry: &'a GalleryEntry, layout: &GridLayout) -> Element<'a, Message> {
    let content: Element<Message> = match (tile_label(entry), entry.displayed()) {
        (None, Some(picture)) => column![
            image(picture.handle.clone())
                .content_fit(ContentFit::Cover)
                .width(Length::Fill)
                .height(Length::Fill),
            text(entry.metadata.title.as_str()).size(13),
        ]
        .spacing(4)
        .into(),
        (label, _) => placeholder(label.unwrap_or_default()),
    };

    let frame = container(content)
        .width(Length::Fixed(layout.tile_width))
        .height(Length::Fixed(layout.tile_height))
        .padding(6);
    let frame = match tile_frame(entry.load_state()) {
        TileFrame::Loaded => frame.style(container::bordered_box),
        TileFrame::Placeholder => frame.style(container::rounded_box),
    };

    mouse_area(frame)
        .on_press(Message::EntryPressed(entry.index))
        .into()
}

fn placeholder<'a>(label: &'a str) -> Element<'a, Message> {
    container(row![text(label).size(14)].align_y(Alignment::Center))
        .center(Length::Fill)
        .into()
}
