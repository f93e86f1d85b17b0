//! Builds small EPUB archives on disk for the integration tests.

#![allow(dead_code)]

use image::{ImageFormat, Rgba, RgbaImage};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

pub fn xhtml(title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{title}</title></head>
<body>
{body}
</body>
</html>"#
    )
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([30, 120, 200, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn media_type(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// An EPUB 2 book with chapters under `OEBPS/` and images under
/// `OEBPS/images/`.
pub struct EpubBuilder {
    title: String,
    chapters: Vec<Vec<u8>>,
    images: Vec<(String, Vec<u8>)>,
}

impl EpubBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            chapters: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Add a chapter; `body` is the markup inside `<body>`.
    pub fn chapter(mut self, body: &str) -> Self {
        let index = self.chapters.len();
        self.chapters
            .push(xhtml(&format!("Chapter {}", index + 1), body).into_bytes());
        self
    }

    /// Add a chapter document as raw bytes, which need not be UTF-8.
    pub fn chapter_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.chapters.push(bytes);
        self
    }

    pub fn image(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.images.push((name.to_string(), bytes));
        self
    }

    fn opf(&self) -> String {
        let mut manifest = String::from(
            r#"    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
"#,
        );
        let mut spine = String::new();
        for index in 0..self.chapters.len() {
            manifest.push_str(&format!(
                "    <item id=\"chapter{index}\" href=\"chapter{index}.xhtml\" media-type=\"application/xhtml+xml\"/>\n"
            ));
            spine.push_str(&format!("    <itemref idref=\"chapter{index}\"/>\n"));
        }
        for (index, (name, _)) in self.images.iter().enumerate() {
            manifest.push_str(&format!(
                "    <item id=\"image{index}\" href=\"images/{name}\" media-type=\"{}\"/>\n",
                media_type(name)
            ));
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="bookid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>{title}</dc:title>
    <dc:creator>Test Author</dc:creator>
    <dc:language>en</dc:language>
    <dc:identifier id="bookid">urn:uuid:0b7a3c58-6f1e-4c2a-9d1b-bookleaftest</dc:identifier>
  </metadata>
  <manifest>
{manifest}  </manifest>
  <spine toc="ncx">
{spine}  </spine>
</package>"#,
            title = self.title
        )
    }

    fn ncx(&self) -> String {
        let mut points = String::new();
        for index in 0..self.chapters.len() {
            points.push_str(&format!(
                r#"    <navPoint id="nav{index}" playOrder="{order}">
      <navLabel><text>Chapter {order}</text></navLabel>
      <content src="chapter{index}.xhtml"/>
    </navPoint>
"#,
                order = index + 1
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head><meta name="dtb:uid" content="urn:uuid:0b7a3c58-6f1e-4c2a-9d1b-bookleaftest"/></head>
  <docTitle><text>{title}</text></docTitle>
  <navMap>
{points}  </navMap>
</ncx>"#,
            title = self.title
        )
    }

    pub fn write_to(&self, path: &Path) -> zip::result::ZipResult<()> {
        let mut zip = ZipWriter::new(File::create(path)?);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;
        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML.as_bytes())?;
        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(self.opf().as_bytes())?;
        zip.start_file("OEBPS/toc.ncx", deflated)?;
        zip.write_all(self.ncx().as_bytes())?;

        for (index, chapter) in self.chapters.iter().enumerate() {
            zip.start_file(format!("OEBPS/chapter{index}.xhtml"), deflated)?;
            zip.write_all(chapter)?;
        }
        for (name, bytes) in &self.images {
            zip.start_file(format!("OEBPS/images/{name}"), stored)?;
            zip.write_all(bytes)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Write the book as `file_name` inside `dir` and return its path.
    pub fn write_in(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        self.write_to(&path).unwrap();
        path
    }
}

/// The three-chapter book most tests read.
pub fn sample_book() -> EpubBuilder {
    EpubBuilder::new("Sample Book")
        .chapter(
            r#"<h1>Chapter One</h1>
<p>It was a bright   cold day in April.</p>
<img src="images/map.png" alt="map"/>"#,
        )
        .chapter(
            r#"<h2>Part Two</h2>
<p>The clocks were striking thirteen.</p>"#,
        )
        .chapter(r#"<p>The end.</p>"#)
        .image("map.png", png_bytes(40, 20))
}
