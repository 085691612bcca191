/// Grid geometry and viewport intersection
///
/// The grid uses fixed-size tiles, so the bounds of any entry can be computed
/// from its index and the viewport width without asking the widget tree.
use iced::Rectangle;

use crate::config::GridSettings;

/// Resolved tile layout for a given viewport width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub tile_width: f32,
    pub tile_height: f32,
    pub spacing: f32,
    pub padding: f32,
    pub columns: usize,
}

impl GridLayout {
    pub fn new(grid: &GridSettings, width: f32) -> Self {
        let usable = width - 2.0 * grid.padding + grid.spacing;
        let columns = (usable / (grid.tile_width + grid.spacing)).floor().max(1.0) as usize;

        Self {
            tile_width: grid.tile_width,
            tile_height: grid.tile_height,
            spacing: grid.spacing,
            padding: grid.padding,
            columns,
        }
    }

    /// Bounds of tile `index` in content coordinates
    pub fn tile_bounds(&self, index: usize) -> Rectangle {
        let row = index / self.columns;
        let column = index % self.columns;

        Rectangle {
            x: self.padding + column as f32 * (self.tile_width + self.spacing),
            y: self.padding + row as f32 * (self.tile_height + self.spacing),
            width: self.tile_width,
            height: self.tile_height,
        }
    }
}

/// Fraction of `tile` inside `viewport` grown by `margin` on every side
pub fn intersection_ratio(tile: Rectangle, viewport: Rectangle, margin: f32) -> f32 {
    let area = tile.width * tile.height;
    if area <= 0.0 {
        return 0.0;
    }

    let left = tile.x.max(viewport.x - margin);
    let top = tile.y.max(viewport.y - margin);
    let right = (tile.x + tile.width).min(viewport.x + viewport.width + margin);
    let bottom = (tile.y + tile.height).min(viewport.y + viewport.height + margin);

    if right <= left || bottom <= top {
        return 0.0;
    }

    ((right - left) * (bottom - top)) / area
}

/// Whether a tile counts as visible for lazy loading
pub fn is_visible(tile: Rectangle, viewport: Rectangle, margin: f32, threshold: f32) -> bool {
    let ratio = intersection_ratio(tile, viewport, margin);
    ratio > 0.0 && ratio >= threshold
}
