use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Color32, FontId, Galley, Painter, Pos2, Rect, Stroke, StrokeKind};

use super::super::render_utils::{LINK, RELATED, SEARCH_BORDER, SEARCH_GLOW};
use super::super::scatter::Scatter;
use super::super::scene::{Scene, SymbolView};

const SEARCH_GLOW_RADIUS: f32 = 20.0;

pub(in crate::app) struct GlyphCache {
    font: FontId,
    galleys: Vec<Option<Arc<Galley>>>,
    skipped: HashSet<usize>,
}

impl GlyphCache {
    pub(in crate::app) fn new(glyph_height: f32) -> Self {
        Self {
            font: FontId::proportional(glyph_height),
            galleys: Vec::new(),
            skipped: HashSet::new(),
        }
    }

    pub(in crate::app) fn reset(&mut self) {
        self.galleys.clear();
        self.skipped.clear();
    }

    pub(in crate::app) fn measure(&mut self, painter: &Painter, scatter: &mut Scatter) {
        let count = scatter.store().len();
        if self.galleys.len() == count {
            return;
        }

        let font = &self.font;
        self.galleys = scatter
            .store()
            .symbols()
            .iter()
            .map(|symbol| {
                let covered = painter.ctx().fonts_mut(|fonts| fonts.has_glyphs(font, &symbol.key));
                covered.then(|| painter.layout_no_wrap(symbol.key.clone(), font.clone(), Color32::PLACEHOLDER))
            })
            .collect();

        for (index, galley) in self.galleys.iter().enumerate() {
            match galley {
                Some(galley) => scatter.set_extent(index, Some(galley.size())),
                None => {
                    scatter.set_extent(index, None);
                    if self.skipped.insert(index) {
                        tracing::warn!(
                            symbol = scatter.store().symbols()[index].key.as_str(),
                            "glyph missing from loaded fonts, skipping"
                        );
                    }
                }
            }
        }
    }

    fn galley(&self, index: usize) -> Option<&Arc<Galley>> {
        self.galleys.get(index).and_then(Option::as_ref)
    }
}

fn glyph_rect(symbol: &SymbolView<'_>, galley: &Galley) -> Rect {
    Rect::from_center_size(symbol.position, galley.size())
}

fn paint_glyph(painter: &Painter, galley: &Arc<Galley>, center: Pos2, color: Color32) {
    let top_left = center - galley.size() * 0.5;
    painter.galley(top_left, Arc::clone(galley), color);
}

pub(in crate::app) fn paint_symbols(painter: &Painter, scene: &Scene<'_>, glyphs: &GlyphCache) {
    for symbol in &scene.symbols {
        let Some(galley) = glyphs.galley(symbol.index) else {
            continue;
        };

        if symbol.search_match {
            painter.circle_filled(symbol.position, SEARCH_GLOW_RADIUS, SEARCH_GLOW);
        }
        paint_glyph(painter, galley, symbol.position, symbol.color);
        if symbol.search_match {
            painter.rect_stroke(
                glyph_rect(symbol, galley),
                0.0,
                Stroke::new(1.0, SEARCH_BORDER),
                StrokeKind::Outside,
            );
        }
    }

    let link_stroke = Stroke::new(1.0, LINK);
    for &(from, to) in &scene.links {
        painter.line_segment([from, to], link_stroke);
    }

    for symbol in scene.symbols.iter().filter(|symbol| symbol.related) {
        if let Some(galley) = glyphs.galley(symbol.index) {
            paint_glyph(painter, galley, symbol.position, RELATED);
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{self, LayerId, RawInput, pos2};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::Settings;
    use crate::dataset::{RelationshipGraph, mixed_store};

    fn scatter() -> Scatter {
        let mut rng = StdRng::seed_from_u64(9);
        Scatter::new(
            mixed_store(),
            RelationshipGraph::default(),
            &Settings::default(),
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1000.0, 800.0)),
            &mut rng,
        )
    }

    fn measure(glyphs: &mut GlyphCache, scatter: &mut Scatter) {
        let ctx = egui::Context::default();
        let _ = ctx.run(RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(LayerId::background());
            glyphs.measure(&painter, scatter);
        });
    }

    #[test]
    fn glyphs_missing_from_fonts_are_skipped_and_unhittable() {
        // default fonts carry Latin but no kanji
        let mut scatter = scatter();
        let mut glyphs = GlyphCache::new(24.0);
        measure(&mut glyphs, &mut scatter);

        assert!(glyphs.galley(0).is_some());
        assert!(glyphs.galley(1).is_none());
        assert_eq!(glyphs.skipped, HashSet::from([1]));

        let kanji = scatter.positions()[1].current;
        assert_ne!(scatter.hit_test(kanji), Some(1));
    }

    #[test]
    fn reset_rearms_the_skip_log() {
        let mut scatter = scatter();
        let mut glyphs = GlyphCache::new(24.0);
        measure(&mut glyphs, &mut scatter);
        measure(&mut glyphs, &mut scatter);
        assert_eq!(glyphs.skipped.len(), 1);

        glyphs.reset();
        assert!(glyphs.skipped.is_empty());
        measure(&mut glyphs, &mut scatter);
        assert_eq!(glyphs.skipped, HashSet::from([1]));
    }
}
