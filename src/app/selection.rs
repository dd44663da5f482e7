use eframe::egui::{Pos2, Rect, Vec2};

use super::motion::AnimatedPosition;

/// Topmost symbol whose box, centered on its current animated position and
/// sized to its rendered extent, contains `pointer`. Later symbols are drawn
/// on top, so the scan runs back to front and the last-drawn box wins.
/// Symbols without an extent are not drawn and never hit.
pub(crate) fn hit_test(positions: &[AnimatedPosition], extents: &[Option<Vec2>], pointer: Pos2) -> Option<usize> {
    positions
        .iter()
        .zip(extents)
        .enumerate()
        .rev()
        .find(|(_, (position, extent))| {
            extent.is_some_and(|extent| Rect::from_center_size(position.current, extent).contains(pointer))
        })
        .map(|(index, _)| index)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    selected: Option<usize>,
}

impl Selection {
    pub(crate) fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub(crate) fn click(&mut self, hit: Option<usize>) {
        self.selected = hit;
    }
}
