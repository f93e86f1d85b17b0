use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use std::path::Path;

use crate::models::BookEntry;

pub struct LibraryWindow;

impl LibraryWindow {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        folder: &Path,
        books: &[BookEntry],
        selected: usize,
    ) {
        let [title_area, list_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

        let title = Paragraph::new(vec![
            Line::from("My Library").style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from(folder.display().to_string()).style(Style::default().fg(Color::DarkGray)),
        ])
        .centered();
        frame.render_widget(title, title_area);

        let block = Block::default().title("Book Name").borders(Borders::ALL);
        if books.is_empty() {
            let empty = Paragraph::new("No .epub files here. Press o to open another folder.")
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
                .block(block);
            frame.render_widget(empty, list_area);
            return;
        }

        let items: Vec<ListItem> = books
            .iter()
            .map(|book| ListItem::new(book.file_name.clone()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    /// Single-line prompt for typing a folder path.
    pub fn render_folder_prompt(frame: &mut Frame, area: Rect, input: &str) {
        let popup_area = super::centered_fixed_area(area, area.width.saturating_sub(8).max(20), 3);
        frame.render_widget(Clear, popup_area);
        let prompt = Paragraph::new(format!("{input}_"))
            .block(Block::default().title("Open Folder").borders(Borders::ALL));
        frame.render_widget(prompt, popup_area);
    }
}
