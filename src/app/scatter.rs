use eframe::egui::{Color32, Pos2, Rect, Vec2, vec2};
use rand::Rng;

use crate::config::Settings;
use crate::dataset::{DatasetError, MetricBatch, MetricStore, RelatedSet, RelationshipGraph, ReloadSummary};

use super::axes::{Axis, AxisController, AxisSelection};
use super::layout::{compute_target, drawable_area};
use super::motion::AnimatedPosition;
use super::render_utils::symbol_color;
use super::selection::hit_test;

/// Symbols, their animated positions and the active axes. Every change to
/// the axes, ranges or canvas retargets all symbols before returning.
pub(crate) struct Scatter {
    store: MetricStore,
    relations: RelationshipGraph,
    axes: AxisController,
    positions: Vec<AnimatedPosition>,
    extents: Vec<Option<Vec2>>,
    colors: Vec<Color32>,
    canvas: Rect,
    margin: f32,
    damping: f32,
}

impl Scatter {
    pub(crate) fn new<R: Rng>(
        store: MetricStore,
        relations: RelationshipGraph,
        settings: &Settings,
        canvas: Rect,
        rng: &mut R,
    ) -> Self {
        let positions = (0..store.len())
            .map(|_| AnimatedPosition::scattered(rng, settings.initial_spread))
            .collect();
        let extents = vec![Some(vec2(settings.glyph_height, settings.glyph_height)); store.len()];
        let colors = (0..store.len()).map(|index| symbol_color(&store, index)).collect();
        let axes = AxisController::new(AxisSelection::initial(&store));

        let mut scatter = Self {
            store,
            relations,
            axes,
            positions,
            extents,
            colors,
            canvas,
            margin: settings.margin,
            damping: settings.damping,
        };
        scatter.retarget_all();
        scatter
    }

    pub(crate) fn store(&self) -> &MetricStore {
        &self.store
    }

    pub(crate) fn axes(&self) -> AxisSelection {
        self.axes.selection()
    }

    pub(crate) fn positions(&self) -> &[AnimatedPosition] {
        &self.positions
    }

    pub(crate) fn color(&self, index: usize) -> Color32 {
        self.colors[index]
    }

    pub(crate) fn drawable(&self) -> Rect {
        drawable_area(self.canvas, self.margin)
    }

    pub(crate) fn set_canvas(&mut self, canvas: Rect) -> bool {
        if canvas == self.canvas {
            return false;
        }
        self.canvas = canvas;
        self.retarget_all();
        true
    }

    pub(crate) fn set_extent(&mut self, index: usize, extent: Option<Vec2>) {
        if let Some(slot) = self.extents.get_mut(index) {
            *slot = extent;
        }
    }

    pub(crate) fn cycle_axis(&mut self, axis: Axis) -> bool {
        let changed = self.axes.cycle_axis(axis, &self.store);
        if changed {
            self.log_axes("cycled");
            self.retarget_all();
        }
        changed
    }

    pub(crate) fn random_switch<R: Rng>(&mut self, rng: &mut R) -> Option<Axis> {
        let axis = self.axes.random_switch(&self.store, rng)?;
        self.log_axes("auto-switched");
        self.retarget_all();
        Some(axis)
    }

    pub(crate) fn reload(
        &mut self,
        batch: MetricBatch,
        volatile_keys: &[String],
    ) -> Result<ReloadSummary, DatasetError> {
        let summary = self.store.replace_values(batch, volatile_keys)?;
        for (index, color) in self.colors.iter_mut().enumerate() {
            *color = symbol_color(&self.store, index);
        }
        self.retarget_all();
        Ok(summary)
    }

    pub(crate) fn advance(&mut self) {
        for position in &mut self.positions {
            position.advance(self.damping);
        }
    }

    pub(crate) fn hit_test(&self, pointer: Pos2) -> Option<usize> {
        hit_test(&self.positions, &self.extents, pointer)
    }

    pub(crate) fn related(&self, selected: usize) -> RelatedSet {
        match self.store.symbols().get(selected) {
            Some(symbol) => self.relations.resolve_related(&symbol.key, &self.store),
            None => RelatedSet::default(),
        }
    }

    pub(crate) fn search_matches(&self, query: &str) -> Vec<bool> {
        self.store
            .symbols()
            .iter()
            .map(|symbol| !query.is_empty() && query.contains(symbol.key.as_str()))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, index: usize, position: Pos2) {
        let target = self.positions[index].target;
        self.positions[index] = AnimatedPosition::at(position);
        self.positions[index].retarget(target);
    }

    fn retarget_all(&mut self) {
        let area = self.drawable();
        let axes = self.axes.selection();
        for (symbol, position) in self.store.symbols().iter().zip(&mut self.positions) {
            position.retarget(compute_target(symbol, axes, &self.store, area));
        }
    }

    fn log_axes(&self, reason: &str) {
        let axes = self.axes.selection();
        tracing::debug!(
            reason,
            x = self.store.key_name(axes.x()),
            y = self.store.key_name(axes.y()),
            "axes changed"
        );
    }
}
