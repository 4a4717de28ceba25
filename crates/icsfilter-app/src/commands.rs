//! Command handlers.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use icsfilter_core::config::Settings;
use icsfilter_core::constants::RULES_MIN_LEN;
use icsfilter_rfc::{FilterDocument, IcsFilter};

use crate::cli::{Cli, Command, FilterArgs, RulesCommand, STDIO};
use crate::error::AppResult;
use crate::rules_file::RulesFile;

/// ## Summary
/// Runs one command.
///
/// ## Errors
/// Returns an error for unreadable input, unwritable output, an unusable
/// rule file location, or an invalid rule document given to `rules write`.
/// Problems found while filtering are logged, never returned.
pub fn run(cli: &Cli, settings: &Settings) -> AppResult<()> {
    match &cli.command {
        Command::Filter(args) => filter(args, settings),
        Command::Rules { command } => rules(command, settings),
    }
}

#[tracing::instrument(skip(args, settings), fields(label = %args.label))]
fn filter(args: &FilterArgs, settings: &Settings) -> AppResult<()> {
    let raw = read_input(&args.input)?;

    let mut rules = match &args.rules {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };
    if rules.trim().chars().count() < RULES_MIN_LEN {
        rules = RulesFile::locate(&settings.rules)?.read()?;
    }

    let engine = IcsFilter::from_config(&settings.engine);
    let filtered = engine.filter(&args.label, &raw, Some(&rules));

    tracing::info!(input = raw.len(), output = filtered.len(), "Calendar filtered");
    write_output(args.output.as_deref(), &filtered)
}

fn rules(command: &RulesCommand, settings: &Settings) -> AppResult<()> {
    let file = RulesFile::locate(&settings.rules)?;

    match command {
        RulesCommand::Show { rules } => {
            let text = match rules {
                Some(path) => RulesFile::from_path(path)?.read()?,
                None => file.read()?,
            };
            write_output(None, text.as_bytes())
        }
        RulesCommand::Path => {
            writeln!(io::stdout().lock(), "{}", file.path().display())?;
            Ok(())
        }
        RulesCommand::Write { source } => {
            let text = String::from_utf8_lossy(&read_input(source)?).into_owned();
            let document = FilterDocument::parse(&text)?;
            tracing::debug!(calendars = document.calendars.len(), "Rule document is valid");

            file.overwrite(&text)?;
            writeln!(io::stdout().lock(), "{}", file.path().display())?;
            Ok(())
        }
    }
}

fn read_input(path: &Path) -> AppResult<Vec<u8>> {
    if path == Path::new(STDIO) {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    Ok(fs::read(path)?)
}

fn write_output(path: Option<&Path>, data: &[u8]) -> AppResult<()> {
    match path {
        Some(path) if path != Path::new(STDIO) => fs::write(path, data)?,
        _ => {
            let mut out = io::stdout().lock();
            out.write_all(data)?;
            out.flush()?;
        }
    }
    Ok(())
}
