use crate::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightColor(&'static str);

/// The pastel colours offered by the colour picker, in display order.
pub const PALETTE: [HighlightColor; 8] = [
    HighlightColor("#FA9189"),
    HighlightColor("#FCAE7C"),
    HighlightColor("#FFE699"),
    HighlightColor("#F9FFB5"),
    HighlightColor("#B3F5BC"),
    HighlightColor("#D6F6FF"),
    HighlightColor("#E2CBF7"),
    HighlightColor("#D1BDFF"),
];

impl HighlightColor {
    pub fn hex(&self) -> &'static str {
        self.0
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let digits = self.0.trim_start_matches('#');
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .unwrap_or(0)
        };
        (channel(0), channel(2), channel(4))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub color: HighlightColor,
}

/// Highlights over the current chapter's rendered text. Spans never overlap
/// and are kept sorted by start offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightTable {
    highlights: Vec<Highlight>,
}

impl HighlightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Paint `selection` with `color`, replacing whatever covered it before.
    /// Returns false and changes nothing when the selection is empty.
    pub fn apply(&mut self, selection: Selection, color: HighlightColor) -> bool {
        if selection.is_empty() {
            return false;
        }
        self.remove(selection);
        self.highlights.push(Highlight {
            start: selection.start,
            end: selection.end,
            color,
        });
        self.highlights.sort_by_key(|h| h.start);
        true
    }

    /// Clear highlighting inside `selection`, trimming or splitting any
    /// highlight that extends past it.
    pub fn remove(&mut self, selection: Selection) {
        if selection.is_empty() {
            return;
        }
        let mut kept = Vec::with_capacity(self.highlights.len() + 1);
        for h in self.highlights.drain(..) {
            if h.end <= selection.start || h.start >= selection.end {
                kept.push(h);
                continue;
            }
            if h.start < selection.start {
                kept.push(Highlight {
                    end: selection.start,
                    ..h
                });
            }
            if h.end > selection.end {
                kept.push(Highlight {
                    start: selection.end,
                    ..h
                });
            }
        }
        self.highlights = kept;
    }

    pub fn color_at(&self, offset: usize) -> Option<HighlightColor> {
        self.highlights
            .iter()
            .find(|h| h.start <= offset && offset < h.end)
            .map(|h| h.color)
    }
}
