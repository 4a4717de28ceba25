use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Input or output path that stands for stdin/stdout.
pub const STDIO: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "icsfilter", bin_name = "icsfilter", version)]
#[command(about = "Filter iCalendar files with JSON rules and add reminders", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter a calendar file
    Filter(FilterArgs),

    /// Inspect or replace the rule file
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Name of the calendar the input belongs to
    #[arg(short, long)]
    pub label: String,

    /// Rule document to use instead of the rule file
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Calendar file, `-` for stdin
    pub input: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Print the rule document
    Show {
        /// Rule document to show instead of the rule file
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// Print where the rule file is
    Path,

    /// Check a rule document and make it the rule file
    Write {
        /// Rule document, `-` for stdin
        source: PathBuf,
    },
}
