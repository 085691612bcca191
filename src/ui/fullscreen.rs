use iced::widget::{button, center, column, container, image, mouse_area, opaque, responsive, text};
use iced::{Color, ContentFit, Element, Length, Point, Rectangle, Size, Theme};

use crate::state::data::GalleryEntry;
use crate::Message;

/// Fullscreen overlay for one loaded entry
///
/// Presses on the backdrop close the viewer. The image and the detail text
/// capture their own presses so they never reach the backdrop.
pub fn view(entry: &GalleryEntry) -> Option<Element<'_, Message>> {
    let picture = entry.displayed()?.clone();
    let metadata = &entry.metadata;

    let back = button(text("← Back")).on_press(Message::BackPressed).padding(10);

    // The press target is sized to the drawn pixels, so the letterbox around
    // the picture still belongs to the backdrop
    let frame = responsive(move |area| {
        let bounds = picture_bounds(picture.size(), area);
        center(
            mouse_area(
                image(picture.handle.clone())
                    .content_fit(ContentFit::Fill)
                    .width(Length::Fixed(bounds.width))
                    .height(Length::Fixed(bounds.height)),
            )
            .on_press(Message::ImagePressed),
        )
        .into()
    });

    let details = opaque(
        column![
            text(metadata.title.as_str()).size(28),
            text(metadata.film.as_str()).size(16),
            text(metadata.camera.as_str()).size(16),
            text(metadata.location.as_str()).size(16),
            text(metadata.caption.as_str()).size(14),
        ]
        .spacing(6),
    );

    let panel = column![opaque(back), frame, details]
        .spacing(16)
        .padding(32)
        .width(Length::Fill)
        .height(Length::Fill);

    let backdrop = mouse_area(center(panel).style(backdrop_style)).on_press(Message::BackdropPressed);

    Some(opaque(backdrop))
}

/// Where an image of size `image` lands when scaled to fit `area`, centred
fn picture_bounds(image: Size, area: Size) -> Rectangle {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rectangle::new(Point::new(area.width / 2.0, area.height / 2.0), Size::ZERO);
    }

    let scale = (area.width / image.width).min(area.height / image.height);
    let size = Size::new(image.width * scale, image.height * scale);

    Rectangle::new(
        Point::new((area.width - size.width) / 2.0, (area.height - size.height) / 2.0),
        size,
    )
}

fn backdrop_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(
            Color {
                a: 0.92,
                ..Color::BLACK
            }
            .into(),
        ),
        text_color: Some(Color::WHITE),
        ..container::Style::default()
    }
}
