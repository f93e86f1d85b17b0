use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Heading1,
    Heading2,
    Paragraph,
    Image,
}

/// One unit of rendered chapter content.
///
/// For text runs `content` is the element's text; for image runs it is the
/// `src` attribute as written in the chapter markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub kind: RunKind,
    pub content: String,
}

impl StyledRun {
    pub fn heading1(text: impl Into<String>) -> Self {
        Self {
            kind: RunKind::Heading1,
            content: text.into(),
        }
    }

    pub fn heading2(text: impl Into<String>) -> Self {
        Self {
            kind: RunKind::Heading2,
            content: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: RunKind::Paragraph,
            content: text.into(),
        }
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self {
            kind: RunKind::Image,
            content: src.into(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind != RunKind::Image
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub language: Option<String>,
}

/// A book discovered in the library folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DictionaryEntry {
    pub word: String,
    pub phonetic: String,
    pub origin: String,
    pub definition: String,
}

impl DictionaryEntry {
    pub fn display_text(&self) -> String {
        format!(
            "Word: {}\nPhonetic: {}\nOrigin: {}\nDefinition: {}",
            self.word, self.phonetic, self.origin, self.definition
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    #[default]
    Library,
    FolderPrompt,
    Reader,
    ContextMenu,
    ColorPicker,
    Dictionary,
    Translation,
    Images,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}
