pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod language;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod suite;
pub mod templates;
