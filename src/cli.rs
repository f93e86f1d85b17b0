use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "bookleaf",
    version,
    about = "Read EPUB books in the terminal, with highlights, dictionary lookups and translation.",
    long_about = None
)]
pub struct Cli {
    /// Print every chapter of the ebook as plain text and exit
    #[clap(short, long, value_name = "EBOOK")]
    pub dump: Option<PathBuf>,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Translate into this language instead of the configured one
    #[clap(short = 't', long = "to", value_name = "LANG")]
    pub target_language: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,

    /// Write log lines to this file
    #[clap(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Folder to list books from
    #[clap(name = "FOLDER")]
    pub folder: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_folder_and_flags() {
        let cli = Cli::parse_from(["bookleaf", "-vv", "--to", "fr", "/books"]);
        assert_eq!(cli.folder, Some(PathBuf::from("/books")));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.target_language.as_deref(), Some("fr"));
        assert!(cli.dump.is_none());
    }

    #[test]
    fn dump_takes_a_book_path() {
        let cli = Cli::parse_from(["bookleaf", "--dump", "novel.epub"]);
        assert_eq!(cli.dump, Some(PathBuf::from("novel.epub")));
        assert_eq!(cli.folder, None);
    }
}
