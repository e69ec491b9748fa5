use crate::colors::ColorToken;
use once_cell::unsync::OnceCell;
use serde::Serialize;

const STROKE: &str = "rgba(0,0,0,0.7)";
const LABEL_COLOR: &str = "rgba(0,0,255,1)";
const LABEL_FONT: &str = "14px \"Open Sans\", \"Arial Unicode MS\", \"sans-serif\"";

/// Visual style shared by every village in the same color bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: f32,
    pub label_font: &'static str,
    pub label_color: &'static str,
}

impl Style {
    fn for_token(token: ColorToken) -> Self {
        Style {
            fill: token.rgba(),
            stroke: STROKE,
            stroke_width: 1.0,
            label_font: LABEL_FONT,
            label_color: LABEL_COLOR,
        }
    }
}

/// Builds each bucket's [`Style`] at most once and hands out shared references.
///
/// Owned by a single renderer; it holds no dataset state so it survives reloads.
#[derive(Debug, Default)]
pub struct StyleCache {
    slots: [OnceCell<Style>; ColorToken::COUNT],
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, token: ColorToken) -> &Style {
        self.slots[token.index()].get_or_init(|| Style::for_token(token))
    }

    /// Number of styles built so far.
    pub fn built(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }
}
