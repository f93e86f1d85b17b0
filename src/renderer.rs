use crate::ebook::Ebook;
use crate::error::LoadError;
use crate::images::{self, RenderedImage};
use crate::models::{RunKind, StyledRun};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::OnceLock;

/// Every text run is terminated by a blank line.
pub const RUN_SEPARATOR: &str = "\n\n";

/// A chapter ready for presentation: its runs, the flattened text that
/// selections index into, and whichever images decoded successfully.
#[derive(Debug, Clone, Default)]
pub struct RenderedChapter {
    pub runs: Vec<StyledRun>,
    pub text: String,
    /// Character span of each run's content inside `text`; `None` for images.
    pub spans: Vec<Option<Range<usize>>>,
    /// Decoded images keyed by run index.
    pub images: HashMap<usize, RenderedImage>,
}

impl RenderedChapter {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_runs(runs: Vec<StyledRun>) -> Self {
        let mut text = String::new();
        let mut spans = Vec::with_capacity(runs.len());
        let mut offset = 0usize;

        for run in &runs {
            if run.is_text() {
                let len = run.content.chars().count();
                spans.push(Some(offset..offset + len));
                text.push_str(&run.content);
                text.push_str(RUN_SEPARATOR);
                offset += len + RUN_SEPARATOR.len();
            } else {
                spans.push(None);
            }
        }

        Self {
            runs,
            text,
            spans,
            images: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Length of `text` in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Characters `range.start..range.end` of the rendered text.
    pub fn slice(&self, range: Range<usize>) -> String {
        self.text
            .chars()
            .skip(range.start)
            .take(range.end.saturating_sub(range.start))
            .collect()
    }
}

fn self_closing_tags() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<(title|script|style|textarea|div|span|p|a|h1|h2)(\s[^>]*?)?\s*/>")
            .expect("self-closing tag pattern is valid")
    })
}

/// XHTML allows `<title/>`, which an HTML parser reads as an open raw-text
/// element swallowing the rest of the document.
fn expand_self_closing(markup: &str) -> String {
    self_closing_tags()
        .replace_all(markup, "<${1}${2}></${1}>")
        .into_owned()
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map chapter markup to styled runs in document order.
///
/// Only `h1`, `h2`, `p` and `img` produce output. Nested matches each yield
/// their own run, so `<p><img></p>` becomes a paragraph followed by an image.
pub fn render_markup(markup: &str) -> Vec<StyledRun> {
    let document = Html::parse_document(&expand_self_closing(markup));
    let mut runs = Vec::new();

    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        match element.value().name() {
            "h1" => runs.push(StyledRun::heading1(element_text(&element))),
            "h2" => runs.push(StyledRun::heading2(element_text(&element))),
            "p" => runs.push(StyledRun::paragraph(element_text(&element))),
            "img" => {
                if let Some(src) = element.value().attr("src") {
                    runs.push(StyledRun::image(src));
                }
            }
            _ => {}
        }
    }

    runs
}

/// Render chapter `index` of `book`, decoding its images.
///
/// Images that cannot be found or decoded are logged and left out.
pub fn render_chapter(book: &mut dyn Ebook, index: usize) -> Result<RenderedChapter, LoadError> {
    let markup = book.chapter_markup(index)?;
    let chapter_path = book.chapter_path(index).unwrap_or_default().to_string();
    let mut chapter = RenderedChapter::from_runs(render_markup(&markup));

    for (run_index, run) in chapter.runs.iter().enumerate() {
        if run.kind != RunKind::Image {
            continue;
        }
        match images::load_image(book, &chapter_path, &run.content) {
            Ok(image) => {
                chapter.images.insert(run_index, image);
            }
            Err(err) => log::warn!("Error rendering image: {err}"),
        }
    }

    log::debug!(
        "rendered chapter {} ({} runs, {} images)",
        index,
        chapter.runs.len(),
        chapter.images.len()
    );
    Ok(chapter)
}

/// Plain-text rendition used by `--dump`.
pub fn runs_to_plain_text(runs: &[StyledRun]) -> String {
    let mut out = String::new();
    for run in runs {
        match run.kind {
            RunKind::Heading1 => out.push_str(&format!("# {}", run.content)),
            RunKind::Heading2 => out.push_str(&format!("## {}", run.content)),
            RunKind::Paragraph => out.push_str(&run.content),
            RunKind::Image => out.push_str(&format!("[Image: {}]", run.content)),
        }
        out.push_str(RUN_SEPARATOR);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_paragraph_image_in_order() {
        let markup = r#"<html><body>
            <h1>Chapter One</h1>
            <p>It was a bright cold day.</p>
            <img src="../images/map.png" alt="map"/>
        </body></html>"#;
        let runs = render_markup(markup);
        assert_eq!(
            runs,
            vec![
                StyledRun::heading1("Chapter One"),
                StyledRun::paragraph("It was a bright cold day."),
                StyledRun::image("../images/map.png"),
            ]
        );
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let markup = "<body><h3>Minor</h3><div>loose text</div><ul><li>item</li></ul><h2>Part</h2></body>";
        let runs = render_markup(markup);
        assert_eq!(runs, vec![StyledRun::heading2("Part")]);
    }

    #[test]
    fn nested_matches_each_produce_a_run() {
        let markup = r#"<body><p>Figure <img src="fig.png"/></p></body>"#;
        let runs = render_markup(markup);
        assert_eq!(
            runs,
            vec![StyledRun::paragraph("Figure"), StyledRun::image("fig.png")]
        );
    }

    #[test]
    fn img_without_src_is_skipped() {
        let runs = render_markup(r#"<body><img alt="nothing"/><p>after</p></body>"#);
        assert_eq!(runs, vec![StyledRun::paragraph("after")]);
    }

    #[test]
    fn paragraph_text_whitespace_is_collapsed() {
        let runs = render_markup("<body><p>one\n   <em>two</em>\tthree</p></body>");
        assert_eq!(runs, vec![StyledRun::paragraph("one two three")]);
    }

    #[test]
    fn self_closing_title_does_not_swallow_body() {
        let markup = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title/></head>
<body><h1>Still here</h1></body></html>"#;
        let runs = render_markup(markup);
        assert_eq!(runs, vec![StyledRun::heading1("Still here")]);
    }

    #[test]
    fn flattened_text_separates_runs_with_blank_lines() {
        let chapter = RenderedChapter::from_runs(vec![
            StyledRun::heading1("Title"),
            StyledRun::image("a.png"),
            StyledRun::paragraph("Body"),
        ]);
        assert_eq!(chapter.text, "Title\n\nBody\n\n");
        assert_eq!(chapter.spans, vec![Some(0..5), None, Some(7..11)]);
        assert_eq!(chapter.slice(7..11), "Body");
    }

    #[test]
    fn spans_count_characters_not_bytes() {
        let chapter = RenderedChapter::from_runs(vec![
            StyledRun::paragraph("Tiếng Việt"),
            StyledRun::paragraph("xin chào"),
        ]);
        assert_eq!(chapter.spans[0], Some(0..10));
        assert_eq!(chapter.spans[1], Some(12..20));
        assert_eq!(chapter.slice(12..20), "xin chào");
        assert_eq!(chapter.char_len(), 22);
    }

    #[test]
    fn empty_markup_renders_nothing() {
        let chapter = RenderedChapter::from_runs(render_markup(""));
        assert!(chapter.is_empty());
        assert_eq!(chapter.char_len(), 0);
    }

    #[test]
    fn dump_marks_headings_and_images() {
        let text = runs_to_plain_text(&[
            StyledRun::heading1("Book"),
            StyledRun::heading2("Part"),
            StyledRun::paragraph("Text"),
            StyledRun::image("img/x.png"),
        ]);
        assert_eq!(text, "# Book\n\n## Part\n\nText\n\n[Image: img/x.png]\n\n");
    }
}
