/// View layer
///
/// - Gallery grid with per-tile load placeholders (grid.rs)
/// - Fullscreen detail overlay (fullscreen.rs)
/// - Header bar with status and the folder picker button
pub mod fullscreen;
pub mod grid;

use iced::widget::{button, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length};

use crate::Message;

/// Fixed height of the header bar above the grid
pub const HEADER_HEIGHT: f32 = 64.0;

pub fn header(status: String) -> Element<'static, Message> {
    let bar = row![
        text("Film Gallery").size(28),
        horizontal_space(),
        text(status).size(14),
        button("Open Gallery…").on_press(Message::OpenGallery).padding(10),
    ]
    .spacing(20)
    .align_y(Alignment::Center);

    container(bar)
        .padding([0, 16])
        .center_y(Length::Fixed(HEADER_HEIGHT))
        .width(Length::Fill)
        .into()
}
