//! Command-line interface for inspecting SW Maps project archives.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod config;
mod error;
mod inspect;
mod media;

pub use error::CliError;

use inspect::{InspectArgs, run_inspect};
use media::{MediaArgs, run_media};

pub(crate) const ARG_ARCHIVE: &str = "archive";
pub(crate) const ARG_WORK_ROOT: &str = "work-root";
pub(crate) const ARG_RANDOMISE_WORK_DIR: &str = "randomise-work-dir";
pub(crate) const ENV_INSPECT_ARCHIVE: &str = "SWMAPS_CMDS_INSPECT_ARCHIVE";
pub(crate) const ENV_MEDIA_ARCHIVE: &str = "SWMAPS_CMDS_MEDIA_ARCHIVE";

/// Run the SW Maps CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid, configuration cannot be
/// merged, the archive cannot be read or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Inspect(args) => run_inspect(args, writer),
        Command::Media(args) => run_media(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "swmaps",
    about = "Read SW Maps survey project archives",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a JSON summary of a project archive.
    Inspect(InspectArgs),
    /// List media files referenced by a project archive.
    Media(MediaArgs),
}

#[cfg(test)]
mod tests;
