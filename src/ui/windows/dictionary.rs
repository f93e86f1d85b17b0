use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph},
};
use textwrap::{Options, WordSplitter};

/// Popup for dictionary definitions and translations.
pub struct LookupWindow;

impl LookupWindow {
    pub fn max_scroll_offset(area: Rect, body: &str) -> u16 {
        let popup_area = super::centered_popup_area(area, 70, 80);
        let inner_width = popup_area.width.saturating_sub(2) as usize;
        let inner_height = popup_area.height.saturating_sub(2) as usize;
        let total_lines = Self::reflow(body, inner_width).lines().count();

        total_lines
            .saturating_sub(inner_height)
            .min(u16::MAX as usize) as u16
    }

    pub fn render(frame: &mut Frame, area: Rect, title: &str, body: &str, scroll_offset: u16) {
        let popup_area = super::centered_popup_area(area, 70, 80);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(title.to_string())
            .title_bottom("Esc to close")
            .borders(Borders::ALL);

        // Inner width = popup width minus 2 for borders
        let inner_width = popup_area.width.saturating_sub(2) as usize;
        let paragraph = Paragraph::new(Self::reflow(body, inner_width))
            .block(block)
            .scroll((scroll_offset, 0));

        frame.render_widget(paragraph, popup_area);
    }

    /// Wrap every line of `text` to `width` columns, keeping blank lines and
    /// hanging continuation lines under a `Label: ` prefix.
    fn reflow(text: &str, width: usize) -> String {
        if width == 0 {
            return text.to_string();
        }

        let mut result = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                result.push(String::new());
                continue;
            }
            let hang = match line.split_once(": ") {
                Some((label, _)) if label.len() < 12 && !label.contains(' ') => label.len() + 2,
                _ => 0,
            };
            let indent = " ".repeat(hang);
            let options = Options::new(width)
                .subsequent_indent(&indent)
                .word_splitter(WordSplitter::NoHyphenation);
            for wrapped in textwrap::wrap(line, &options) {
                result.push(wrapped.trim_end().to_string());
            }
        }

        result.join("\n")
    }
}
