use crate::models::BookEntry;
use eyre::{Result, WrapErr};
use std::fs;
use std::path::Path;

fn is_epub(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".epub")
}

/// List the `.epub` files directly inside `folder`, sorted by file name.
pub fn scan_folder(folder: &Path) -> Result<Vec<BookEntry>> {
    let entries = fs::read_dir(folder)
        .wrap_err_with(|| format!("Could not open folder {}", folder.display()))?;

    let mut books = Vec::new();
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !is_epub(&file_name) || !entry.file_type()?.is_file() {
            continue;
        }
        books.push(BookEntry {
            file_name,
            path: entry.path(),
        });
    }

    books.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    log::info!("{} books in {}", books.len(), folder.display());
    Ok(books)
}
