use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use crate::images::RenderedImage;

pub struct ImagesWindow;

impl ImagesWindow {
    /// One entry per decoded image: the board line it sits on and the image.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        images: &[(usize, &RenderedImage)],
        selected_index: usize,
    ) {
        let popup_area = super::centered_popup_area(area, 60, 60);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = images
            .iter()
            .map(|(line, image)| {
                let filename = std::path::Path::new(&image.path)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(&image.path);
                ListItem::new(Line::from(format!(
                    "Line {}: {} ({}x{})",
                    line + 1,
                    filename,
                    image.width,
                    image.height
                )))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Images in Chapter")
                    .borders(Borders::ALL),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
        let mut state = ListState::default().with_selected(Some(selected_index));
        frame.render_stateful_widget(list, popup_area, &mut state);
    }
}
