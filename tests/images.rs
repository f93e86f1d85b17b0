mod common;

use bookleaf::ebook::Epub;
use bookleaf::images::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use bookleaf::models::RunKind;
use bookleaf::renderer::render_chapter;
use common::EpubBuilder;

fn book_with_images(dir: &std::path::Path) -> Epub {
    let path = EpubBuilder::new("Pictures")
        .chapter(
            r#"<p>Before the pictures.</p>
<img src="images/good.png"/>
<img src="images/broken.jpg"/>
<img src="images/absent.png"/>
<p>After the pictures.</p>"#,
        )
        .image("good.png", common::png_bytes(64, 48))
        .image("broken.jpg", b"definitely not a jpeg".to_vec())
        .write_in(dir, "pictures.epub");
    Epub::open(&path).unwrap()
}

#[test]
fn test_valid_image_is_scaled_to_display_size() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = book_with_images(dir.path());

    let chapter = render_chapter(&mut book, 0).unwrap();
    let image = chapter.images.get(&1).expect("good.png decoded");
    assert_eq!(image.path, "OEBPS/images/good.png");
    assert_eq!((image.width, image.height), (DISPLAY_WIDTH, DISPLAY_HEIGHT));
    assert_eq!(image.pixels.dimensions(), (800, 600));
}

#[test]
fn test_bad_images_are_skipped_without_losing_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = book_with_images(dir.path());

    let chapter = render_chapter(&mut book, 0).unwrap();
    let kinds: Vec<RunKind> = chapter.runs.iter().map(|run| run.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RunKind::Paragraph,
            RunKind::Image,
            RunKind::Image,
            RunKind::Image,
            RunKind::Paragraph,
        ]
    );
    assert_eq!(chapter.images.len(), 1);
    assert!(!chapter.images.contains_key(&2));
    assert!(!chapter.images.contains_key(&3));
    assert_eq!(
        chapter.text,
        "Before the pictures.\n\nAfter the pictures.\n\n"
    );
}
