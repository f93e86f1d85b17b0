use bookleaf::{
    cli::Cli,
    config::Config,
    ebook::{Ebook, Epub},
    logging, renderer,
    ui::reader::Reader,
};

use clap::Parser;
use eyre::{Result, WrapErr};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(
        logging::level_for(cli.verbose, cli.debug),
        cli.log_file.as_deref(),
    )?;

    if let Some(ebook) = &cli.dump {
        return dump_content(ebook);
    }

    let config = match Config::new(cli.config.clone()) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Could not load configuration: {err}; starting with default settings");
            Config::default()
        }
    };

    let folder = match cli.folder.clone().or_else(|| config.settings.library_folder.clone()) {
        Some(folder) => folder,
        None => std::env::current_dir().wrap_err("Could not determine the current directory")?,
    };
    run_tui(config, folder, cli.target_language)
}

fn run_tui(config: Config, folder: PathBuf, target_language: Option<String>) -> Result<()> {
    let mut reader = Reader::new(config, folder, target_language);
    reader.run()
}

/// Print every chapter as plain text.
fn dump_content(filepath: &Path) -> Result<()> {
    let mut book = Epub::open(filepath)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for index in 0..book.chapter_count() {
        let markup = book.chapter_markup(index)?;
        let runs = renderer::render_markup(&markup);
        out.write_all(renderer::runs_to_plain_text(&runs).as_bytes())?;
    }
    out.flush()?;
    Ok(())
}
