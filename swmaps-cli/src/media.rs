//! Media command: list the media files a project references.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use swmaps_data::ReadOptions;

use crate::config::ArchiveConfig;
use crate::{ARG_RANDOMISE_WORK_DIR, ARG_WORK_ROOT, CliError, ENV_MEDIA_ARCHIVE};

/// CLI arguments for the `media` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "media",
    long_about = "Unpack a project archive and print every photo, audio and \
                 video file its features and photo points reference that \
                 exists on disk, one path per line.",
    about = "List media files referenced by a project archive"
)]
#[ortho_config(prefix = "SWMAPS")]
pub(crate) struct MediaArgs {
    /// Path to the `.swmz` project archive.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) archive: Option<Utf8PathBuf>,
    /// Directory under which archives are unpacked.
    #[arg(long = ARG_WORK_ROOT, value_name = "dir")]
    #[serde(default)]
    pub(crate) work_root: Option<Utf8PathBuf>,
    /// Unpack into a fresh uniquely named directory.
    #[arg(long = ARG_RANDOMISE_WORK_DIR)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) randomise_work_dir: bool,
}

impl MediaArgs {
    pub(crate) fn into_config(self) -> Result<ArchiveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ArchiveConfig::try_from(merged)
    }
}

impl TryFrom<MediaArgs> for ArchiveConfig {
    type Error = CliError;

    fn try_from(args: MediaArgs) -> Result<Self, Self::Error> {
        Self::resolve(
            args.archive,
            args.work_root,
            args.randomise_work_dir,
            ENV_MEDIA_ARCHIVE,
        )
    }
}

pub(crate) fn run_media(args: MediaArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    execute_media(&config, writer)
}

pub(crate) fn execute_media(config: &ArchiveConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let (_, project) = config.read_project(ReadOptions::default())?;
    for path in project.media_files_on_disk() {
        writeln!(writer, "{path}").map_err(CliError::WriteOutput)?;
    }
    Ok(())
}
