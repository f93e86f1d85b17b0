use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};

use crate::config::Config;
use crate::dictionary::{DictionaryLookup, FreeDictionaryClient};
use crate::ebook::Ebook;
use crate::error::LookupError;
use crate::highlight::{HighlightTable, PALETTE};
use crate::images::{self, RenderedImage};
use crate::library;
use crate::logging;
use crate::models::{BookEntry, Direction, WindowType};
use crate::renderer::RenderedChapter;
use crate::selection::Selection;
use crate::session::ReadingSession;
use crate::settings::Keymap;
use crate::translate::{self, GoogleTranslator, Translator};
use crate::ui::board::{self, BoardLine, BoardView};
use crate::ui::windows::{
    color_picker::ColorPickerWindow,
    context_menu::{ContextMenuWindow, MenuAction},
    dictionary::LookupWindow,
    images::ImagesWindow,
    library::LibraryWindow,
};

const MESSAGE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Error,
}

/// Which window is up, plus the transient state of the popups.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub active_window: WindowType,
    pub library_selected: usize,
    pub folder_input: String,
    pub menu_selected: usize,
    pub color_selected: usize,
    pub images_selected: usize,
    pub popup_title: String,
    pub popup_body: String,
    pub popup_scroll: u16,
    pub message: Option<String>,
    pub message_type: MessageType,
    pub message_time: Option<Instant>,
}

impl UiState {
    pub fn set_message(&mut self, message: impl Into<String>, message_type: MessageType) {
        self.message = Some(message.into());
        self.message_type = message_type;
        self.message_time = Some(Instant::now());
    }

    pub fn message_expired(&self) -> bool {
        self.message_time
            .is_some_and(|time| time.elapsed() >= MESSAGE_TTL)
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_time = None;
    }
}

struct OpenBook {
    book: Box<dyn Ebook>,
    session: ReadingSession,
    title: String,
}

/// The chapter on screen and everything tied to it. Replaced wholesale on
/// every chapter change, which is what discards highlights.
#[derive(Debug, Default)]
struct Page {
    chapter: RenderedChapter,
    chars: Vec<char>,
    lines: Vec<BoardLine>,
    highlights: HighlightTable,
    scroll: usize,
    visual: bool,
    cursor: usize,
    anchor: Option<usize>,
    /// Selection waiting for a colour from the picker.
    pending: Selection,
}

struct ReaderLayout {
    header: Rect,
    progress: Rect,
    body: Rect,
    footer: Rect,
}

fn reader_layout(area: Rect, show_progress: bool) -> ReaderLayout {
    let [header, progress, _gap, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(u16::from(show_progress)),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let padding = if body.width <= 20 { 0 } else { 2 };
    let body = Rect {
        x: body.x + padding,
        width: body.width.saturating_sub(padding * 2),
        ..body
    };

    ReaderLayout {
        header,
        progress,
        body,
        footer,
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '\''
}

fn bound(binding: &str, code: KeyCode) -> bool {
    matches!(code, KeyCode::Char(c) if Keymap::matches(binding, c))
}

pub struct Reader {
    config: Config,
    target_language: String,
    dictionary: Box<dyn DictionaryLookup>,
    translator: Box<dyn Translator>,
    folder: PathBuf,
    books: Vec<BookEntry>,
    open: Option<OpenBook>,
    page: Page,
    ui: UiState,
    viewport: Rect,
    should_quit: bool,
}

impl Reader {
    /// Build the reader with the HTTP dictionary and translation clients
    /// configured in `config`.
    pub fn new(config: Config, folder: PathBuf, target_language: Option<String>) -> Self {
        let timeout = config.request_timeout();
        let dictionary = Box::new(FreeDictionaryClient::new(
            config.settings.dictionary_endpoint.clone(),
            timeout,
        ));
        let translator = Box::new(GoogleTranslator::new(
            config.settings.translation_endpoint.clone(),
            timeout,
        ));
        Self::with_services(config, folder, target_language, dictionary, translator)
    }

    pub fn with_services(
        config: Config,
        folder: PathBuf,
        target_language: Option<String>,
        dictionary: Box<dyn DictionaryLookup>,
        translator: Box<dyn Translator>,
    ) -> Self {
        let target_language =
            target_language.unwrap_or_else(|| config.settings.target_language.clone());
        let mut reader = Self {
            config,
            target_language,
            dictionary,
            translator,
            folder: folder.clone(),
            books: Vec::new(),
            open: None,
            page: Page::default(),
            ui: UiState::default(),
            viewport: Rect::new(0, 0, 80, 24),
            should_quit: false,
        };
        reader.open_folder(folder);
        reader
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn books(&self) -> &[BookEntry] {
        &self.books
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn session(&self) -> Option<&ReadingSession> {
        self.open.as_ref().map(|open| &open.session)
    }

    pub fn highlights(&self) -> &HighlightTable {
        &self.page.highlights
    }

    /// List the books in `folder`. On failure the current list is kept and
    /// the error is shown.
    pub fn open_folder(&mut self, folder: PathBuf) {
        match library::scan_folder(&folder) {
            Ok(books) => {
                self.folder = folder;
                self.books = books;
                self.ui.library_selected = 0;
            }
            Err(err) => {
                log::warn!("{err:#}");
                self.ui.set_message(err.to_string(), MessageType::Error);
            }
        }
    }

    fn open_selected_book(&mut self) {
        let Some(entry) = self.books.get(self.ui.library_selected).cloned() else {
            return;
        };
        match ReadingSession::load(&entry.path) {
            Ok((session, epub)) => self.show_book(Box::new(epub), session),
            Err(err) => {
                log::warn!("Could not open {}: {err}", entry.path.display());
                self.ui.set_message(
                    format!("Could not open {}: {err}", entry.file_name),
                    MessageType::Error,
                );
            }
        }
    }

    /// Switch to the reader on the session's current chapter.
    pub fn show_book(&mut self, mut book: Box<dyn Ebook>, session: ReadingSession) {
        let chapter = Self::render_or_report(&mut self.ui, book.as_mut(), &session);
        let title = book.get_meta().title.clone().unwrap_or_else(|| {
            session
                .book_path()
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        self.open = Some(OpenBook {
            book,
            session,
            title,
        });
        self.set_chapter(chapter);
        self.ui.active_window = WindowType::Reader;
    }

    fn close_book(&mut self) {
        self.open = None;
        self.page = Page::default();
        self.ui.active_window = WindowType::Library;
    }

    /// Move one chapter. A chapter that fails to render shows as an empty
    /// page so the chapters after it stay reachable.
    fn navigate(&mut self, direction: Direction) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        let moved = match direction {
            Direction::Forward => open.session.clone().next_chapter(),
            Direction::Backward => open.session.clone().previous_chapter(),
        };
        if moved == open.session {
            return;
        }
        open.session = moved;
        let chapter = Self::render_or_report(&mut self.ui, open.book.as_mut(), &open.session);
        self.set_chapter(chapter);
    }

    fn render_or_report(
        ui: &mut UiState,
        book: &mut dyn Ebook,
        session: &ReadingSession,
    ) -> RenderedChapter {
        session.render(book).unwrap_or_else(|err| {
            log::warn!("{err}");
            ui.set_message(err.to_string(), MessageType::Error);
            RenderedChapter::empty()
        })
    }

    fn set_chapter(&mut self, chapter: RenderedChapter) {
        self.page = Page {
            chars: chapter.text.chars().collect(),
            chapter,
            ..Page::default()
        };
        self.relayout();
    }

    fn layout_areas(&self) -> ReaderLayout {
        reader_layout(self.viewport, self.config.settings.show_progress_indicator)
    }

    fn body_height(&self) -> usize {
        (self.layout_areas().body.height as usize).max(1)
    }

    fn relayout(&mut self) {
        let width = self.layout_areas().body.width as usize;
        self.page.lines = board::layout(&self.page.chapter, width);
        self.page.scroll = self.page.scroll.min(self.max_scroll());
        if self.page.visual {
            self.ensure_cursor_visible();
        }
    }

    pub fn set_viewport(&mut self, area: Rect) {
        if area != self.viewport {
            self.viewport = area;
            self.relayout();
        }
    }

    fn max_scroll(&self) -> usize {
        self.page.lines.len().saturating_sub(self.body_height())
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.max_scroll() as isize;
        self.page.scroll = (self.page.scroll as isize + delta).clamp(0, max) as usize;
    }

    fn line_of_cursor(&self) -> Option<usize> {
        board::line_of_offset(&self.page.lines, self.page.cursor)
    }

    fn ensure_cursor_visible(&mut self) {
        let Some(line) = self.line_of_cursor() else {
            return;
        };
        let height = self.body_height();
        if line < self.page.scroll {
            self.page.scroll = line;
        } else if line >= self.page.scroll + height {
            self.page.scroll = line + 1 - height;
        }
    }

    fn enter_visual(&mut self) {
        let lines = &self.page.lines;
        let first = lines
            .iter()
            .skip(self.page.scroll)
            .find_map(|line| line.start)
            .or_else(|| lines.iter().find_map(|line| line.start));
        let Some(start) = first else {
            self.ui
                .set_message("Nothing to select in this chapter", MessageType::Info);
            return;
        };
        self.page.visual = true;
        self.page.cursor = start;
        self.page.anchor = None;
        self.ensure_cursor_visible();
    }

    fn exit_visual(&mut self) {
        self.page.visual = false;
        self.page.anchor = None;
    }

    /// The word touching `offset`, or an empty selection between words.
    fn word_at(&self, offset: usize) -> Selection {
        let chars = &self.page.chars;
        if offset >= chars.len() || !is_word_char(chars[offset]) {
            return Selection::default();
        }
        let mut start = offset;
        while start > 0 && is_word_char(chars[start - 1]) {
            start -= 1;
        }
        let mut end = offset;
        while end < chars.len() && is_word_char(chars[end]) {
            end += 1;
        }
        Selection::new(start, end)
    }

    /// Anchor-to-cursor span in selection mode, otherwise the word under the
    /// cursor.
    pub fn current_selection(&self) -> Selection {
        match self.page.anchor {
            Some(anchor) => Selection::inclusive(anchor, self.page.cursor, self.page.chars.len()),
            None => self.word_at(self.page.cursor),
        }
    }

    fn move_char(&mut self, direction: Direction) {
        let len = self.page.chars.len();
        let lines = &self.page.lines;
        let mut next = self.page.cursor;
        loop {
            next = match direction {
                Direction::Forward if next + 1 < len => next + 1,
                Direction::Backward if next > 0 => next - 1,
                _ => return,
            };
            if board::line_of_offset(lines, next).is_some() {
                break;
            }
        }
        self.page.cursor = next;
        self.ensure_cursor_visible();
    }

    fn move_word(&mut self, direction: Direction) {
        let chars = &self.page.chars;
        let mut i = self.page.cursor;
        match direction {
            Direction::Forward => {
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                while i < chars.len() && !is_word_char(chars[i]) {
                    i += 1;
                }
                if i >= chars.len() {
                    return;
                }
            }
            Direction::Backward => {
                while i > 0 && !is_word_char(chars[i - 1]) {
                    i -= 1;
                }
                while i > 0 && is_word_char(chars[i - 1]) {
                    i -= 1;
                }
            }
        }
        self.page.cursor = i;
        self.ensure_cursor_visible();
    }

    /// Move the cursor `delta` text lines, keeping its column where the
    /// target line is long enough.
    fn move_line(&mut self, delta: isize) {
        let Some(current) = self.line_of_cursor() else {
            return;
        };
        let lines = &self.page.lines;
        let Some(current_start) = lines[current].start else {
            return;
        };
        let column = self.page.cursor - current_start;

        let mut target = current;
        let mut index = current;
        let mut remaining = delta.unsigned_abs();
        while remaining > 0 {
            index = if delta > 0 {
                index + 1
            } else {
                match index.checked_sub(1) {
                    Some(i) => i,
                    None => break,
                }
            };
            let Some(line) = lines.get(index) else {
                break;
            };
            if line.start.is_some() {
                target = index;
                remaining -= 1;
            }
        }
        if target == current {
            return;
        }

        let line = &lines[target];
        if let Some(start) = line.start {
            self.page.cursor = start + column.min(line.char_len().saturating_sub(1));
        }
        self.ensure_cursor_visible();
    }

    fn show_popup(&mut self, window: WindowType, title: String, body: String) {
        self.ui.popup_title = title;
        self.ui.popup_body = body;
        self.ui.popup_scroll = 0;
        self.ui.active_window = window;
    }

    fn finish_selection(&mut self) {
        self.page.anchor = None;
        self.ui.active_window = WindowType::Reader;
    }

    fn run_menu_action(&mut self, action: MenuAction) {
        let selection = self.current_selection();
        match action {
            MenuAction::Highlight => {
                if selection.is_empty() {
                    self.ui.set_message("Nothing selected", MessageType::Info);
                    self.finish_selection();
                    return;
                }
                self.page.pending = selection;
                self.ui.color_selected = 0;
                self.ui.active_window = WindowType::ColorPicker;
            }
            MenuAction::Unhighlight => {
                self.page.highlights.remove(selection);
                self.finish_selection();
            }
            MenuAction::Translate => self.translate(selection),
            MenuAction::Dictionary => self.define(selection),
        }
    }

    fn apply_color(&mut self, index: usize) {
        let color = PALETTE[index.min(PALETTE.len() - 1)];
        if self.page.highlights.apply(self.page.pending, color) {
            log::debug!(
                "highlighted {:?} in {}",
                self.page.pending.range(),
                color.hex()
            );
        }
        self.finish_selection();
    }

    fn translate(&mut self, selection: Selection) {
        let text = selection.text(&self.page.chapter);
        let text = text.trim();
        if text.is_empty() {
            self.ui.set_message("Nothing selected", MessageType::Info);
            self.finish_selection();
            return;
        }
        match translate::translate_selection(self.translator.as_ref(), text, &self.target_language)
        {
            Ok(translated) => {
                let title = format!("Translation ({})", self.target_language);
                self.show_popup(WindowType::Translation, title, translated);
            }
            Err(err) => {
                log::warn!("{err}");
                self.ui
                    .set_message(format!("Translation failed: {err}"), MessageType::Error);
                self.finish_selection();
            }
        }
    }

    fn define(&mut self, selection: Selection) {
        let text = selection.text(&self.page.chapter);
        let word = text.trim();
        if word.is_empty() {
            self.ui.set_message("Nothing selected", MessageType::Info);
            self.finish_selection();
            return;
        }
        match self.dictionary.lookup(word) {
            Ok(entry) => {
                let title = format!("Dictionary: {word}");
                self.show_popup(WindowType::Dictionary, title, entry.display_text());
            }
            Err(LookupError::NotFound(_)) => {
                self.ui
                    .set_message(format!("No definition found for \"{word}\""), MessageType::Info);
                self.finish_selection();
            }
            Err(err) => {
                log::warn!("{err}");
                self.ui.set_message(err.to_string(), MessageType::Error);
                self.finish_selection();
            }
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.ui.active_window {
            WindowType::Library => self.handle_library_keys(key.code),
            WindowType::FolderPrompt => self.handle_folder_prompt_keys(key.code),
            WindowType::Reader => self.handle_reader_keys(key.code),
            WindowType::ContextMenu => self.handle_context_menu_keys(key.code),
            WindowType::ColorPicker => self.handle_color_picker_keys(key.code),
            WindowType::Dictionary | WindowType::Translation => self.handle_popup_keys(key.code),
            WindowType::Images => self.handle_images_keys(key.code),
        }
    }

    fn handle_library_keys(&mut self, code: KeyCode) {
        let keymap = &self.config.keymap;
        if bound(&keymap.quit, code) || code == KeyCode::Esc {
            self.should_quit = true;
        } else if bound(&keymap.open_folder, code) {
            self.ui.folder_input = self.folder.display().to_string();
            self.ui.active_window = WindowType::FolderPrompt;
        } else {
            match code {
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.ui.library_selected + 1 < self.books.len() {
                        self.ui.library_selected += 1;
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.ui.library_selected = self.ui.library_selected.saturating_sub(1);
                }
                KeyCode::Enter => self.open_selected_book(),
                _ => {}
            }
        }
    }

    fn handle_folder_prompt_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.ui.active_window = WindowType::Library,
            KeyCode::Enter => {
                let folder = PathBuf::from(self.ui.folder_input.trim());
                self.ui.active_window = WindowType::Library;
                self.open_folder(folder);
            }
            KeyCode::Backspace => {
                self.ui.folder_input.pop();
            }
            KeyCode::Char(c) => self.ui.folder_input.push(c),
            _ => {}
        }
    }

    fn handle_reader_keys(&mut self, code: KeyCode) {
        let keymap = self.config.keymap.clone();
        let page_rows = self.body_height() as isize;

        if bound(&keymap.next_chapter, code) {
            self.navigate(Direction::Forward);
        } else if bound(&keymap.prev_chapter, code) {
            self.navigate(Direction::Backward);
        } else if self.page.visual {
            self.handle_visual_keys(code, &keymap);
        } else if bound(&keymap.quit, code) {
            self.close_book();
        } else if bound(&keymap.select, code) {
            self.enter_visual();
        } else if bound(&keymap.show_images, code) {
            self.open_images_window();
        } else if bound(&keymap.scroll_down, code) || code == KeyCode::Down {
            self.scroll_by(1);
        } else if bound(&keymap.scroll_up, code) || code == KeyCode::Up {
            self.scroll_by(-1);
        } else if bound(&keymap.context_menu, code) || code == KeyCode::Enter {
            self.ui.set_message(
                format!("Press {} to select text first", keymap.select),
                MessageType::Info,
            );
        } else {
            match code {
                KeyCode::Right => self.navigate(Direction::Forward),
                KeyCode::Left => self.navigate(Direction::Backward),
                KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(page_rows),
                KeyCode::PageUp => self.scroll_by(-page_rows),
                _ => {}
            }
        }
    }

    fn handle_visual_keys(&mut self, code: KeyCode, keymap: &Keymap) {
        if code == KeyCode::Esc {
            if self.page.anchor.is_some() {
                self.page.anchor = None;
            } else {
                self.exit_visual();
            }
        } else if bound(&keymap.quit, code) {
            self.exit_visual();
        } else if bound(&keymap.select, code) {
            self.page.anchor = match self.page.anchor {
                Some(_) => None,
                None => Some(self.page.cursor),
            };
        } else if bound(&keymap.context_menu, code) || code == KeyCode::Enter {
            self.ui.menu_selected = 0;
            self.ui.active_window = WindowType::ContextMenu;
        } else if bound(&keymap.scroll_down, code) || code == KeyCode::Down {
            self.move_line(1);
        } else if bound(&keymap.scroll_up, code) || code == KeyCode::Up {
            self.move_line(-1);
        } else {
            match code {
                KeyCode::Char('h') | KeyCode::Left => self.move_char(Direction::Backward),
                KeyCode::Char('l') | KeyCode::Right => self.move_char(Direction::Forward),
                KeyCode::Char('w') => self.move_word(Direction::Forward),
                KeyCode::Char('b') => self.move_word(Direction::Backward),
                _ => {}
            }
        }
    }

    fn handle_context_menu_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.ui.active_window = WindowType::Reader,
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui.menu_selected = (self.ui.menu_selected + 1).min(MenuAction::ALL.len() - 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui.menu_selected = self.ui.menu_selected.saturating_sub(1);
            }
            KeyCode::Enter => self.run_menu_action(MenuAction::ALL[self.ui.menu_selected]),
            _ => {}
        }
    }

    fn handle_color_picker_keys(&mut self, code: KeyCode) {
        let selected = self.ui.color_selected;
        match code {
            KeyCode::Esc => self.ui.active_window = WindowType::Reader,
            KeyCode::Left | KeyCode::Char('h') => {
                self.ui.color_selected = ColorPickerWindow::step(selected, -1, 0);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.ui.color_selected = ColorPickerWindow::step(selected, 1, 0);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui.color_selected = ColorPickerWindow::step(selected, 0, -1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui.color_selected = ColorPickerWindow::step(selected, 0, 1);
            }
            KeyCode::Char(c @ '1'..='8') => self.apply_color(c as usize - '1' as usize),
            KeyCode::Enter => self.apply_color(selected),
            _ => {}
        }
    }

    fn handle_popup_keys(&mut self, code: KeyCode) {
        let max_scroll = LookupWindow::max_scroll_offset(self.viewport, &self.ui.popup_body);
        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui.popup_scroll = (self.ui.popup_scroll + 1).min(max_scroll);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui.popup_scroll = self.ui.popup_scroll.saturating_sub(1);
            }
            KeyCode::Esc | KeyCode::Enter => self.finish_selection(),
            code if bound(&self.config.keymap.quit, code) => self.finish_selection(),
            _ => {}
        }
    }

    fn handle_images_keys(&mut self, code: KeyCode) {
        let count = self.chapter_images().len();
        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.ui.images_selected + 1 < count {
                    self.ui.images_selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui.images_selected = self.ui.images_selected.saturating_sub(1);
            }
            KeyCode::Enter => self.open_selected_image(),
            KeyCode::Esc => self.ui.active_window = WindowType::Reader,
            code if bound(&self.config.keymap.quit, code) => {
                self.ui.active_window = WindowType::Reader;
            }
            _ => {}
        }
    }

    /// Decoded images of the chapter in reading order, with the board line
    /// each one sits on.
    fn chapter_images(&self) -> Vec<(usize, &RenderedImage)> {
        self.page
            .lines
            .iter()
            .enumerate()
            .filter_map(|(line, board_line)| {
                let image = self.page.chapter.images.get(&board_line.image?)?;
                Some((line, image))
            })
            .collect()
    }

    fn open_images_window(&mut self) {
        if self.chapter_images().is_empty() {
            self.ui.set_message("No images in this chapter", MessageType::Info);
            return;
        }
        self.ui.images_selected = 0;
        self.ui.active_window = WindowType::Images;
    }

    fn open_selected_image(&mut self) {
        let Some(&(_, image)) = self.chapter_images().get(self.ui.images_selected) else {
            return;
        };
        let result = images::write_png(image, &std::env::temp_dir())
            .map_err(eyre::Report::from)
            .and_then(|path| self.open_image_viewer(&path));

        match result {
            Ok(()) => {
                self.ui.set_message("Opened image", MessageType::Info);
                self.ui.active_window = WindowType::Reader;
            }
            Err(err) => {
                log::warn!("{err}");
                self.ui.set_message(format!("Failed to open image: {err}"), MessageType::Error);
            }
        }
    }

    fn open_image_viewer(&self, path: &Path) -> eyre::Result<()> {
        let configured = self.config.settings.default_viewer.as_str();
        let viewers_to_try = if configured == "auto" {
            vec!["feh", "xdg-open"]
        } else {
            vec![configured, "feh", "xdg-open"]
        };

        for viewer in viewers_to_try {
            let status = std::process::Command::new(viewer).arg(path).status();
            if let Ok(status) = status
                && status.success()
            {
                log::debug!("Opened {} with {viewer}", path.display());
                return Ok(());
            }
        }

        Err(eyre::eyre!("no image viewer could open {}", path.display()))
    }

    /// Run the main application loop
    pub fn run(&mut self) -> eyre::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
        logging::set_screen_taken(true);

        let result = self.event_loop();

        logging::set_screen_taken(false);
        crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        crossterm::terminal::disable_raw_mode()?;
        result
    }

    fn event_loop(&mut self) -> eyre::Result<()> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;
        terminal.hide_cursor()?;

        while !self.should_quit {
            if self.ui.message_expired() {
                self.ui.clear_message();
            }

            let size = terminal.size()?;
            self.set_viewport(Rect::new(0, 0, size.width, size.height));
            terminal.draw(|frame| self.render(frame))?;

            // Wake up in time to clear an expiring message.
            let poll_timeout = match self.ui.message_time {
                Some(time) => MESSAGE_TTL
                    .saturating_sub(time.elapsed())
                    .max(Duration::from_millis(100)),
                None => Duration::from_secs(60),
            };
            if !crossterm::event::poll(poll_timeout)? {
                continue;
            }
            if let Event::Key(key) = crossterm::event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key_event(key);
            }
        }

        terminal.show_cursor()?;
        Ok(())
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        match self.ui.active_window {
            WindowType::Library | WindowType::FolderPrompt => LibraryWindow::render(
                frame,
                area,
                &self.folder,
                &self.books,
                self.ui.library_selected,
            ),
            _ => self.render_reader(frame),
        }

        match self.ui.active_window {
            WindowType::FolderPrompt => {
                LibraryWindow::render_folder_prompt(frame, area, &self.ui.folder_input)
            }
            WindowType::ContextMenu => {
                ContextMenuWindow::render(frame, area, self.ui.menu_selected)
            }
            WindowType::ColorPicker => {
                ColorPickerWindow::render(frame, area, self.ui.color_selected)
            }
            WindowType::Dictionary | WindowType::Translation => LookupWindow::render(
                frame,
                area,
                &self.ui.popup_title,
                &self.ui.popup_body,
                self.ui.popup_scroll,
            ),
            WindowType::Images => ImagesWindow::render(
                frame,
                area,
                &self.chapter_images(),
                self.ui.images_selected,
            ),
            WindowType::Library | WindowType::Reader => {}
        }

        if let Some(message) = &self.ui.message {
            Self::render_message(frame, message, self.ui.message_type);
        }
    }

    fn render_reader(&self, frame: &mut Frame) {
        let areas = self.layout_areas();
        let Some(open) = &self.open else {
            return;
        };
        let session = &open.session;

        let position = if session.total_chapters() == 0 {
            "No chapters".to_string()
        } else {
            format!(
                "Chapter {}/{}",
                session.current_chapter() + 1,
                session.total_chapters()
            )
        };
        let header = Self::build_header_line(&open.title, Some(&position), areas.header.width);
        frame.render_widget(
            Paragraph::new(Line::from(header)).style(Style::default().add_modifier(Modifier::BOLD)),
            areas.header,
        );

        if self.config.settings.show_progress_indicator {
            let progress = session.progress();
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(Color::Cyan))
                .percent(progress.round().clamp(0.0, 100.0) as u16)
                .label(format!("{progress:.0}%"));
            frame.render_widget(gauge, areas.progress);
        }

        let page = &self.page;
        let selection = page
            .anchor
            .filter(|_| page.visual)
            .map(|_| self.current_selection());
        BoardView {
            lines: &page.lines,
            highlights: &page.highlights,
            selection,
            cursor: page.visual.then_some(page.cursor),
            scroll: page.scroll,
        }
        .render(frame, areas.body);

        frame.render_widget(Paragraph::new(self.footer_line(session)), areas.footer);
    }

    fn footer_line(&self, session: &ReadingSession) -> Line<'static> {
        let keymap = &self.config.keymap;
        let hint = |enabled: bool, text: String| {
            let style = if enabled {
                Style::default()
            } else {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            };
            Span::styled(text, style)
        };
        let gap = || Span::raw("  ");

        let mut spans = vec![
            hint(
                session.can_go_previous(),
                format!("[{}] Prev chapter", keymap.prev_chapter),
            ),
            gap(),
            hint(
                session.can_go_next(),
                format!("[{}] Next chapter", keymap.next_chapter),
            ),
            gap(),
        ];
        if self.page.visual {
            let mode = if self.page.anchor.is_some() {
                "-- SELECTION --"
            } else {
                "-- CURSOR --"
            };
            spans.push(Span::styled(
                mode,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
            spans.push(gap());
            spans.push(Span::raw(format!(
                "h/l/w/b move  [{}] anchor  [{}] menu  Esc cancel",
                keymap.select, keymap.context_menu
            )));
        } else {
            spans.push(Span::raw(format!(
                "[{}] select  [{}] images  [{}] library",
                keymap.select, keymap.show_images, keymap.quit
            )));
        }
        Line::from(spans)
    }

    fn build_header_line(title: &str, right_text: Option<&str>, width: u16) -> String {
        let width = width as usize;
        if width == 0 {
            return String::new();
        }

        let mut buffer = vec![' '; width];
        let right_len = right_text.map(|text| text.chars().count()).unwrap_or(0);
        let content_width = if right_len > 0 {
            width.saturating_sub(right_len + 1)
        } else {
            width
        };

        let title: Vec<char> = title.chars().take(content_width).collect();
        let title_start = content_width.saturating_sub(title.len()) / 2;
        for (i, ch) in title.into_iter().enumerate() {
            if let Some(slot) = buffer.get_mut(title_start + i) {
                *slot = ch;
            }
        }

        if let Some(right_text) = right_text {
            let start = width.saturating_sub(right_len);
            for (i, ch) in right_text.chars().enumerate() {
                if let Some(slot) = buffer.get_mut(start + i) {
                    *slot = ch;
                }
            }
        }

        buffer.into_iter().collect()
    }

    fn render_message(frame: &mut Frame, message: &str, message_type: MessageType) {
        let color = match message_type {
            MessageType::Info => Color::Blue,
            MessageType::Error => Color::Red,
        };

        let frame_area = frame.area();
        if frame_area.width < 8 || frame_area.height < 5 {
            return;
        }
        let area = Rect {
            x: frame_area.x + 2,
            y: frame_area.y + 2,
            width: frame_area.width - 4,
            height: 3,
        };

        let message_paragraph = Paragraph::new(message.to_string())
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(Clear, area);
        frame.render_widget(message_paragraph, area);
    }
}
