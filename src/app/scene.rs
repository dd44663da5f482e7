use std::ops::Range;

use eframe::egui::{Color32, Pos2, Rect};

use super::axes::Axis;
use super::input::TextInputState;
use super::scatter::Scatter;
use super::ui::{ButtonAction, ControlPanel, SEARCH_PLACEHOLDER, UiElement};

pub(crate) const INFO_PANEL_WIDTH: f32 = 300.0;

pub(crate) struct Scene<'a> {
    pub(crate) canvas: Rect,
    pub(crate) drawable: Rect,
    pub(crate) symbols: Vec<SymbolView<'a>>,
    pub(crate) links: Vec<(Pos2, Pos2)>,
    pub(crate) ui: Option<Vec<ElementView>>,
    pub(crate) tooltip: Option<Tooltip<'a>>,
    pub(crate) info: Option<InfoPanel<'a>>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct SymbolView<'a> {
    pub(crate) index: usize,
    pub(crate) glyph: &'a str,
    pub(crate) position: Pos2,
    pub(crate) color: Color32,
    pub(crate) search_match: bool,
    pub(crate) related: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ElementView {
    Button {
        rect: Rect,
        label: String,
        hovered: bool,
        active: bool,
    },
    TextField(TextFieldView),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextFieldView {
    pub(crate) rect: Rect,
    pub(crate) clear_rect: Rect,
    pub(crate) text: String,
    pub(crate) placeholder: bool,
    pub(crate) focused: bool,
    pub(crate) replace_highlight: bool,
    pub(crate) underline: Option<Range<usize>>,
    pub(crate) show_clear: bool,
    pub(crate) clear_hovered: bool,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Tooltip<'a> {
    pub(crate) glyph: &'a str,
    pub(crate) pointer: Pos2,
}

#[derive(Clone, Debug)]
pub(crate) struct InfoPanel<'a> {
    pub(crate) glyph: &'a str,
    pub(crate) rows: Vec<(&'a str, f64)>,
}

pub(crate) struct SceneInput<'a> {
    pub(crate) selected: Option<usize>,
    pub(crate) hovered: Option<usize>,
    pub(crate) pointer: Option<Pos2>,
    pub(crate) idle: bool,
    pub(crate) active_preset: usize,
    pub(crate) presets: &'a [String],
}

pub(crate) fn build_scene<'a>(
    scatter: &'a Scatter,
    panel: &ControlPanel,
    canvas: Rect,
    input: SceneInput<'_>,
) -> Scene<'a> {
    let store = scatter.store();
    let query = panel.text().committed();
    let matches = scatter.search_matches(query);
    let related = input.selected.map(|selected| scatter.related(selected));

    let symbols = store
        .symbols()
        .iter()
        .zip(scatter.positions())
        .enumerate()
        .map(|(index, (symbol, position))| SymbolView {
            index,
            glyph: symbol.key.as_str(),
            position: position.current,
            color: scatter.color(index),
            search_match: matches[index],
            related: related.as_ref().is_some_and(|set| set.contains(index)),
        })
        .collect();

    let links = match (input.selected, &related) {
        (Some(selected), Some(set)) => {
            let origin = scatter.positions()[selected].current;
            set.links
                .iter()
                .map(|&index| (origin, scatter.positions()[index].current))
                .collect()
        }
        _ => Vec::new(),
    };

    let ui = (!input.idle).then(|| element_views(scatter, panel, &input));

    let info = input.selected.and_then(|selected| {
        let symbol = store.symbols().get(selected)?;
        Some(InfoPanel {
            glyph: symbol.key.as_str(),
            rows: store
                .keys()
                .map(|key| (store.label(key), symbol.value(key)))
                .collect(),
        })
    });

    let tooltip = match (input.hovered, input.pointer) {
        (Some(hovered), Some(pointer)) => {
            let over_panel = info.is_some() && pointer.x > canvas.right() - INFO_PANEL_WIDTH;
            store
                .symbols()
                .get(hovered)
                .filter(|_| !over_panel)
                .map(|symbol| Tooltip {
                    glyph: symbol.key.as_str(),
                    pointer,
                })
        }
        _ => None,
    };

    Scene {
        canvas,
        drawable: scatter.drawable(),
        symbols,
        links,
        ui,
        tooltip,
        info,
    }
}

fn element_views(scatter: &Scatter, panel: &ControlPanel, input: &SceneInput<'_>) -> Vec<ElementView> {
    let store = scatter.store();
    let axes = scatter.axes();
    let text = panel.text();

    panel
        .elements()
        .iter()
        .map(|element| match element {
            UiElement::Button(button) => {
                let (label, active) = match panel.action(button.action) {
                    Some(ButtonAction::CycleAxis(axis)) => (axis_label(axis, store.label(axes.get(axis))), false),
                    Some(ButtonAction::SelectPreset(preset)) => (
                        input.presets.get(preset).cloned().unwrap_or_default(),
                        preset == input.active_preset,
                    ),
                    None => (String::new(), false),
                };
                ElementView::Button {
                    rect: button.rect,
                    label,
                    hovered: button.hovered,
                    active,
                }
            }
            UiElement::TextField(field) => {
                let display = text.display_text();
                ElementView::TextField(TextFieldView {
                    rect: field.rect,
                    clear_rect: field.clear_rect,
                    placeholder: display.is_empty(),
                    text: if display.is_empty() {
                        SEARCH_PLACEHOLDER.to_string()
                    } else {
                        display
                    },
                    focused: text.is_focused(),
                    replace_highlight: text.state() == TextInputState::FocusedReplaceAll
                        && !text.committed().is_empty(),
                    underline: text.composition_span(),
                    show_clear: text.has_text(),
                    clear_hovered: field.clear_hovered,
                })
            }
        })
        .collect()
}

fn axis_label(axis: Axis, metric: &str) -> String {
    format!("{}: {}", axis.label(), metric)
}
