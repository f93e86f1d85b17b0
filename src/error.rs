//! Typed errors for the reading core and its service collaborators.
//!
//! Application plumbing (configuration, the terminal loop, `main`) works in
//! `eyre::Result`; these convert into it through `?`.

use thiserror::Error;

/// The file could not be opened as an EPUB archive.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("Not a valid EPUB archive: {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Chapter {0} is out of range")]
    ChapterOutOfRange(usize),

    #[error("Chapter {0} could not be read")]
    ChapterUnreadable(usize),
}

/// An embedded image could not be located or decoded.
#[derive(Error, Debug)]
pub enum ImageDecodeError {
    #[error("Image not found in archive: {0}")]
    Missing(String),

    #[error("Could not decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not write image {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Dictionary service failures.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Word not found: {0}")]
    NotFound(String),

    #[error("Dictionary service unavailable: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport(err.to_string())
    }
}

/// Translation service failures.
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Translation service error: {0}")]
    Service(String),

    #[error("Translation service returned no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        TranslationError::Service(err.to_string())
    }
}
