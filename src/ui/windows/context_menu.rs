use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Highlight,
    Unhighlight,
    Translate,
    Dictionary,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::Highlight,
        MenuAction::Unhighlight,
        MenuAction::Translate,
        MenuAction::Dictionary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Highlight => "Highlight",
            MenuAction::Unhighlight => "Unhighlight",
            MenuAction::Translate => "Translate",
            MenuAction::Dictionary => "Dictionary",
        }
    }
}

pub struct ContextMenuWindow;

impl ContextMenuWindow {
    pub fn render(frame: &mut Frame, area: Rect, selected: usize) {
        let popup_area = super::centered_fixed_area(area, 20, MenuAction::ALL.len() as u16 + 2);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = MenuAction::ALL
            .iter()
            .map(|action| ListItem::new(action.label()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, popup_area, &mut state);
    }
}
