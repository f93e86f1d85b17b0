mod common;

use bookleaf::error::LoadError;
use bookleaf::models::{RunKind, StyledRun};
use bookleaf::session::ReadingSession;
use common::EpubBuilder;

#[test]
fn test_load_starts_at_first_chapter() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::sample_book().write_in(dir.path(), "sample.epub");

    let (session, _book) = ReadingSession::load(&path).unwrap();
    assert_eq!(session.book_path(), path.as_path());
    assert_eq!(session.current_chapter(), 0);
    assert_eq!(session.total_chapters(), 3);
    assert!(!session.can_go_previous());
    assert!(session.can_go_next());
}

#[test]
fn test_render_heading_paragraph_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::sample_book().write_in(dir.path(), "sample.epub");
    let (session, mut book) = ReadingSession::load(&path).unwrap();

    let chapter = session.render(&mut book).unwrap();
    assert_eq!(
        chapter.runs,
        vec![
            StyledRun::heading1("Chapter One"),
            StyledRun::paragraph("It was a bright cold day in April."),
            StyledRun::image("images/map.png"),
        ]
    );
    assert_eq!(
        chapter.text,
        "Chapter One\n\nIt was a bright cold day in April.\n\n"
    );
    assert!(chapter.images.contains_key(&2));
}

#[test]
fn test_navigation_walks_the_spine() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::sample_book().write_in(dir.path(), "sample.epub");
    let (session, mut book) = ReadingSession::load(&path).unwrap();

    let session = session.next_chapter();
    let chapter = session.render(&mut book).unwrap();
    assert_eq!(chapter.runs[0].kind, RunKind::Heading2);
    assert_eq!(chapter.runs[0].content, "Part Two");

    let session = session.next_chapter();
    assert_eq!(session.current_chapter(), 2);
    assert!(!session.can_go_next());
    assert!((session.progress() - 100.0).abs() < f64::EPSILON);

    // Past the end is a no-op.
    let session = session.next_chapter();
    assert_eq!(session.current_chapter(), 2);

    let session = session.previous_chapter().previous_chapter().previous_chapter();
    assert_eq!(session.current_chapter(), 0);
}

#[test]
fn test_non_utf8_chapter_does_not_block_the_rest() {
    let latin1: Vec<u8> = common::xhtml("Chapter 2", "<p>Caf@ au lait</p>")
        .bytes()
        .map(|byte| if byte == b'@' { 0xE9 } else { byte })
        .collect();
    let dir = tempfile::tempdir().unwrap();
    let path = EpubBuilder::new("Mixed Encodings")
        .chapter("<p>First.</p>")
        .chapter_bytes(latin1)
        .chapter("<p>Last.</p>")
        .write_in(dir.path(), "mixed.epub");
    let (session, mut book) = ReadingSession::load(&path).unwrap();

    let session = session.next_chapter();
    assert_eq!(session.current_chapter(), 1);
    let chapter = session.render(&mut book).unwrap();
    assert_eq!(chapter.runs[0].content, "Caf\u{FFFD} au lait");

    let session = session.next_chapter();
    assert_eq!(session.current_chapter(), 2);
    let chapter = session.render(&mut book).unwrap();
    assert_eq!(chapter.runs[0].content, "Last.");
}

#[test]
fn test_empty_book_renders_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = EpubBuilder::new("Empty").write_in(dir.path(), "empty.epub");
    let (session, mut book) = ReadingSession::load(&path).unwrap();

    assert_eq!(session.total_chapters(), 0);
    assert!(!session.can_go_next());
    assert!(!session.can_go_previous());
    assert_eq!(session.progress(), 0.0);
    assert!(session.render(&mut book).unwrap().is_empty());
}

#[test]
fn test_load_reports_missing_book() {
    let dir = tempfile::tempdir().unwrap();
    let result = ReadingSession::load(dir.path().join("nowhere.epub"));
    assert!(matches!(result, Err(LoadError::NotFound(_))));
}
