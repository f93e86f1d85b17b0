pub mod cli;
pub mod config;
pub mod dictionary;
pub mod ebook;
pub mod error;
pub mod highlight;
pub mod http;
pub mod images;
pub mod library;
pub mod logging;
pub mod models;
pub mod renderer;
pub mod selection;
pub mod session;
pub mod settings;
pub mod translate;
pub mod ui;
