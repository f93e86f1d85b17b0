use crate::ebook::{Ebook, Epub};
use crate::error::LoadError;
use crate::renderer::{self, RenderedChapter};
use std::path::{Path, PathBuf};

/// Where the reader is in the open book.
///
/// Navigation consumes the session and hands back the next one, so callers
/// always hold exactly one current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingSession {
    book_path: PathBuf,
    current_chapter: usize,
    total_chapters: usize,
}

impl ReadingSession {
    pub fn new(book_path: impl Into<PathBuf>, total_chapters: usize) -> Self {
        Self {
            book_path: book_path.into(),
            current_chapter: 0,
            total_chapters,
        }
    }

    /// Open a book and start at its first chapter.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, Epub), LoadError> {
        let path = path.as_ref();
        let book = Epub::open(path)?;
        let session = Self::new(path, book.chapter_count());
        log::info!(
            "opened {} with {} chapters",
            path.display(),
            session.total_chapters
        );
        Ok((session, book))
    }

    pub fn book_path(&self) -> &Path {
        &self.book_path
    }

    pub fn current_chapter(&self) -> usize {
        self.current_chapter
    }

    pub fn total_chapters(&self) -> usize {
        self.total_chapters
    }

    pub fn can_go_next(&self) -> bool {
        self.current_chapter + 1 < self.total_chapters
    }

    pub fn can_go_previous(&self) -> bool {
        self.total_chapters > 0 && self.current_chapter > 0
    }

    pub fn next_chapter(self) -> Self {
        if self.can_go_next() {
            Self {
                current_chapter: self.current_chapter + 1,
                ..self
            }
        } else {
            self
        }
    }

    pub fn previous_chapter(self) -> Self {
        if self.can_go_previous() {
            Self {
                current_chapter: self.current_chapter - 1,
                ..self
            }
        } else {
            self
        }
    }

    /// Percentage of the book reached, counting the current chapter as read.
    pub fn progress(&self) -> f64 {
        if self.total_chapters == 0 {
            return 0.0;
        }
        (self.current_chapter + 1) as f64 / self.total_chapters as f64 * 100.0
    }

    /// Render the current chapter. A book without chapters renders empty.
    pub fn render(&self, book: &mut dyn Ebook) -> Result<RenderedChapter, LoadError> {
        if self.total_chapters == 0 {
            return Ok(RenderedChapter::empty());
        }
        renderer::render_chapter(book, self.current_chapter)
    }
}
