mod view;

pub(in crate::app) use view::{GlyphCache, paint_symbols};
