use crate::renderer::RenderedChapter;
use std::ops::Range;

/// Character span of the user's selection in the rendered chapter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Build a selection from two ends in either order.
    pub fn new(anchor: usize, cursor: usize) -> Self {
        Self {
            start: anchor.min(cursor),
            end: anchor.max(cursor),
        }
    }

    /// Selection covering `anchor..=cursor`, the way a visual-mode cursor
    /// includes the character it sits on.
    pub fn inclusive(anchor: usize, cursor: usize, text_len: usize) -> Self {
        let start = anchor.min(cursor);
        let end = (anchor.max(cursor) + 1).min(text_len);
        Self::new(start.min(end), end)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn clamp_to(self, text_len: usize) -> Self {
        Self::new(self.start.min(text_len), self.end.min(text_len))
    }

    pub fn text(&self, chapter: &RenderedChapter) -> String {
        chapter.slice(self.clamp_to(chapter.char_len()).range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StyledRun;

    #[test]
    fn ends_are_normalised() {
        let selection = Selection::new(9, 3);
        assert_eq!(selection.range(), 3..9);
        assert_eq!(selection.len(), 6);
    }

    #[test]
    fn collapsed_selection_is_empty() {
        assert!(Selection::new(4, 4).is_empty());
        assert!(Selection::default().is_empty());
    }

    #[test]
    fn inclusive_covers_cursor_character() {
        let selection = Selection::inclusive(5, 2, 100);
        assert_eq!(selection.range(), 2..6);
        let at_end = Selection::inclusive(9, 9, 10);
        assert_eq!(at_end.range(), 9..10);
        let beyond = Selection::inclusive(12, 12, 10);
        assert!(beyond.is_empty());
    }

    #[test]
    fn text_is_read_from_the_rendered_chapter() {
        let chapter = RenderedChapter::from_runs(vec![
            StyledRun::heading1("Title"),
            StyledRun::paragraph("The quick brown fox"),
        ]);
        assert_eq!(Selection::new(11, 16).text(&chapter), "quick");
        assert_eq!(Selection::new(23, 500).text(&chapter), "fox\n\n");
    }
}
