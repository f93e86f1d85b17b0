use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::highlight::HighlightTable;
use crate::images::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::models::RunKind;
use crate::renderer::RenderedChapter;
use crate::selection::Selection;

/// One screen line of a laid-out chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLine {
    pub kind: Option<RunKind>,
    pub text: String,
    /// Character offset of the first character in the chapter text, for
    /// lines that show chapter text.
    pub start: Option<usize>,
    /// Run index of the decoded image this line stands for.
    pub image: Option<usize>,
}

impl BoardLine {
    fn blank() -> Self {
        Self {
            kind: None,
            text: String::new(),
            start: None,
            image: None,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start
            .is_some_and(|start| start <= offset && offset <= start + self.char_len())
    }
}

/// Greedy word wrap returning `(start, end)` char ranges into `chars`.
/// The break character (whitespace) is not part of either line.
fn wrap_ranges(chars: &[char], width: usize) -> Vec<(usize, usize)> {
    let width = width.max(1);
    let mut ranges = Vec::new();
    let mut line_start = 0;

    if chars.is_empty() {
        return vec![(0, 0)];
    }

    while line_start < chars.len() {
        if chars.len() - line_start <= width {
            ranges.push((line_start, chars.len()));
            break;
        }
        let limit = line_start + width;
        let break_at = (line_start + 1..=limit)
            .rev()
            .find(|&i| chars[i].is_whitespace());
        match break_at {
            Some(i) => {
                ranges.push((line_start, i));
                line_start = i + 1;
            }
            None => {
                ranges.push((line_start, limit));
                line_start = limit;
            }
        }
    }

    ranges
}

/// Lay a rendered chapter out in lines of at most `width` characters. Every
/// run is followed by a blank line.
pub fn layout(chapter: &RenderedChapter, width: usize) -> Vec<BoardLine> {
    let mut lines = Vec::new();

    for (index, run) in chapter.runs.iter().enumerate() {
        match chapter.spans.get(index).cloned().flatten() {
            Some(span) => {
                let chars: Vec<char> = run.content.chars().collect();
                for (from, to) in wrap_ranges(&chars, width) {
                    lines.push(BoardLine {
                        kind: Some(run.kind),
                        text: chars[from..to].iter().collect(),
                        start: Some(span.start + from),
                        image: None,
                    });
                }
            }
            None => {
                let decoded = chapter.images.contains_key(&index);
                let text = if decoded {
                    format!("[Image {DISPLAY_WIDTH}x{DISPLAY_HEIGHT}: {}]", run.content)
                } else {
                    format!("[Image unavailable: {}]", run.content)
                };
                lines.push(BoardLine {
                    kind: Some(RunKind::Image),
                    text,
                    start: None,
                    image: decoded.then_some(index),
                });
            }
        }
        lines.push(BoardLine::blank());
    }

    lines
}

/// Index of the line showing chapter offset `offset`.
pub fn line_of_offset(lines: &[BoardLine], offset: usize) -> Option<usize> {
    lines.iter().position(|line| line.contains(offset))
}

pub fn base_style(kind: Option<RunKind>) -> Style {
    match kind {
        Some(RunKind::Heading1) => Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::UNDERLINED),
        Some(RunKind::Heading2) => Style::default().add_modifier(Modifier::BOLD),
        Some(RunKind::Image) => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        Some(RunKind::Paragraph) | None => Style::default(),
    }
}

/// Everything the board needs to paint one frame.
pub struct BoardView<'a> {
    pub lines: &'a [BoardLine],
    pub highlights: &'a HighlightTable,
    pub selection: Option<Selection>,
    pub cursor: Option<usize>,
    pub scroll: usize,
}

impl BoardView<'_> {
    fn char_style(&self, base: Style, offset: usize) -> Style {
        let mut style = base;
        if let Some(color) = self.highlights.color_at(offset) {
            let (r, g, b) = color.rgb();
            style = style.bg(Color::Rgb(r, g, b)).fg(Color::Black);
        }
        if self
            .selection
            .is_some_and(|s| s.start <= offset && offset < s.end)
        {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if self.cursor == Some(offset) {
            style = style.add_modifier(Modifier::REVERSED | Modifier::SLOW_BLINK);
        }
        style
    }

    fn styled_line(&self, line: &BoardLine) -> Line<'static> {
        let base = base_style(line.kind);
        let Some(start) = line.start else {
            return Line::from(Span::styled(line.text.clone(), base));
        };

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut current = String::new();
        let mut current_style = base;
        for (i, ch) in line.text.chars().enumerate() {
            let style = self.char_style(base, start + i);
            if style != current_style && !current.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut current), current_style));
            }
            current_style = style;
            current.push(ch);
        }
        if !current.is_empty() {
            spans.push(Span::styled(current, current_style));
        }

        // A cursor parked on the line break shows as a trailing block.
        let end = start + line.char_len();
        if self.cursor == Some(end) {
            spans.push(Span::styled(" ", self.char_style(base, end)));
        }

        Line::from(spans)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let height = area.height as usize;
        let visible: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(|line| self.styled_line(line))
            .collect();

        if visible.is_empty() {
            let empty = Paragraph::new("This chapter has no readable content")
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
            frame.render_widget(empty, area);
            return;
        }

        frame.render_widget(Paragraph::new(visible), area);
    }
}
