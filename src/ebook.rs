use crate::error::LoadError;
use crate::models::BookMetadata;
use epub::doc::EpubDoc;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub trait Ebook {
    fn path(&self) -> &str;
    fn get_meta(&self) -> &BookMetadata;
    fn chapter_count(&self) -> usize;
    /// Archive path of the chapter document, used to resolve relative links.
    fn chapter_path(&self, index: usize) -> Option<&str>;

    fn chapter_markup(&mut self, index: usize) -> Result<String, LoadError>;
    fn resource_bytes(&mut self, path: &str) -> Option<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq)]
struct ChapterRef {
    idref: String,
    path: String,
}

pub struct Epub {
    path: String,
    doc: Option<EpubDoc<BufReader<File>>>,
    chapters: Vec<ChapterRef>,
    metadata: BookMetadata,
}

impl Epub {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            doc: None,
            chapters: Vec::new(),
            metadata: BookMetadata::default(),
        }
    }

    /// Open and index an archive in one step.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let mut epub = Self::new(&path.as_ref().to_string_lossy());
        epub.initialize()?;
        Ok(epub)
    }

    pub fn initialize(&mut self) -> Result<(), LoadError> {
        if !Path::new(&self.path).is_file() {
            return Err(LoadError::NotFound(self.path.clone()));
        }

        let doc = EpubDoc::new(&self.path).map_err(|err| LoadError::Malformed {
            path: self.path.clone(),
            reason: err.to_string(),
        })?;

        self.chapters = doc
            .spine
            .iter()
            .filter_map(|item| {
                let resource = doc.resources.get(&item.idref)?;
                // NCX (EPUB 2) and the nav document (EPUB 3) are tables of contents, not chapters
                if resource.mime == "application/x-dtbncx+xml" {
                    return None;
                }
                if let Some(properties) = &resource.properties {
                    if properties.split_whitespace().any(|p| p == "nav") {
                        return None;
                    }
                }
                Some(ChapterRef {
                    idref: item.idref.clone(),
                    path: resource.path.to_string_lossy().replace('\\', "/"),
                })
            })
            .collect();

        let mut metadata = BookMetadata::default();
        if let Some(title) = doc.mdata("title") {
            metadata.title = Some(title.value.clone());
        }
        if let Some(creator) = doc.mdata("creator") {
            metadata.creator = Some(creator.value.clone());
        }
        if let Some(language) = doc.mdata("language") {
            metadata.language = Some(language.value.clone());
        }
        self.metadata = metadata;
        self.doc = Some(doc);

        log::debug!("{}: {} chapters", self.path, self.chapters.len());
        Ok(())
    }
}

impl Ebook for Epub {
    fn path(&self) -> &str {
        &self.path
    }

    fn get_meta(&self) -> &BookMetadata {
        &self.metadata
    }

    fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    fn chapter_path(&self, index: usize) -> Option<&str> {
        self.chapters.get(index).map(|chapter| chapter.path.as_str())
    }

    fn chapter_markup(&mut self, index: usize) -> Result<String, LoadError> {
        let chapter = self
            .chapters
            .get(index)
            .ok_or(LoadError::ChapterOutOfRange(index))?;
        let doc = self
            .doc
            .as_mut()
            .ok_or(LoadError::ChapterUnreadable(index))?;
        // Chapters in a legacy encoding still render, with U+FFFD for bad bytes.
        doc.get_resource(&chapter.idref)
            .map(|(bytes, _mime)| String::from_utf8_lossy(&bytes).into_owned())
            .ok_or(LoadError::ChapterUnreadable(index))
    }

    fn resource_bytes(&mut self, path: &str) -> Option<Vec<u8>> {
        self.doc.as_mut()?.get_resource_by_path(path)
    }
}
