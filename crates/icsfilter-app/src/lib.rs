//! The `icsfilter` command: filters calendar files with a JSON rule file.

pub mod cli;
pub mod commands;
pub mod error;
pub mod rules_file;
