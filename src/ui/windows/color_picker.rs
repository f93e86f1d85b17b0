use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear},
};

use crate::highlight::PALETTE;

pub const COLUMNS: usize = 4;
const CELL_WIDTH: u16 = 4;
const CELL_HEIGHT: u16 = 2;
const GAP: u16 = 1;

/// Borderless grid of the highlight palette, four swatches per row.
pub struct ColorPickerWindow;

impl ColorPickerWindow {
    /// Move the selection within the grid, staying on the same row/column
    /// at the edges.
    pub fn step(selected: usize, dx: isize, dy: isize) -> usize {
        let rows = PALETTE.len().div_ceil(COLUMNS) as isize;
        let col = (selected % COLUMNS) as isize;
        let row = (selected / COLUMNS) as isize;
        let col = (col + dx).clamp(0, COLUMNS as isize - 1);
        let row = (row + dy).clamp(0, rows - 1);
        ((row * COLUMNS as isize + col) as usize).min(PALETTE.len() - 1)
    }

    pub fn render(frame: &mut Frame, area: Rect, selected: usize) {
        let rows = PALETTE.len().div_ceil(COLUMNS) as u16;
        let width = COLUMNS as u16 * (CELL_WIDTH + GAP) + GAP;
        let height = rows * (CELL_HEIGHT + GAP) + GAP;
        let popup_area = super::centered_fixed_area(area, width, height);
        frame.render_widget(Clear, popup_area);

        for (i, color) in PALETTE.iter().enumerate() {
            let col = (i % COLUMNS) as u16;
            let row = (i / COLUMNS) as u16;
            let cell = Rect::new(
                popup_area.x + GAP + col * (CELL_WIDTH + GAP),
                popup_area.y + GAP + row * (CELL_HEIGHT + GAP),
                CELL_WIDTH,
                CELL_HEIGHT,
            )
            .intersection(popup_area);
            let (r, g, b) = color.rgb();
            let mut swatch = Block::default().style(Style::default().bg(Color::Rgb(r, g, b)));
            if i == selected {
                swatch = swatch
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Black));
            }
            frame.render_widget(swatch, cell);
        }
    }
}
