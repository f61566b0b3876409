//! Inspect command implementation for the SW Maps CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Rect;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use swmaps_core::Project;
use swmaps_data::{ReadOptions, SchemaVariant};

use crate::config::ArchiveConfig;
use crate::{ARG_RANDOMISE_WORK_DIR, ARG_WORK_ROOT, CliError, ENV_INSPECT_ARCHIVE};

/// CLI arguments for the `inspect` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "inspect",
    long_about = "Unpack a project archive, read and normalise its database \
                 and print a JSON summary of its contents. Paths can come \
                 from CLI flags, configuration files, or environment \
                 variables.",
    about = "Summarise a project archive as JSON"
)]
#[ortho_config(prefix = "SWMAPS")]
pub(crate) struct InspectArgs {
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

impl InspectArgs {
    pub(crate) fn into_config(self) -> Result<ArchiveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ArchiveConfig::try_from(merged)
    }
}

impl TryFrom<InspectArgs> for ArchiveConfig {
    type Error = CliError;

    fn try_from(args: InspectArgs) -> Result<Self, Self::Error> {
        Self::resolve(
            args.archive,
            args.work_root,
            args.randomise_work_dir,
            ENV_INSPECT_ARCHIVE,
        )
    }
}

/// JSON document printed by `swmaps inspect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct InspectSummary {
    pub(crate) archive: Utf8PathBuf,
    pub(crate) variant: String,
    pub(crate) template_name: String,
    pub(crate) template_author: String,
    pub(crate) layers: usize,
    pub(crate) features: usize,
    pub(crate) tracks: usize,
    pub(crate) photo_points: usize,
    pub(crate) project_attributes: usize,
    pub(crate) raw_files: Vec<Utf8PathBuf>,
    pub(crate) media_files: Vec<Utf8PathBuf>,
    pub(crate) bounds: Option<Rect<f64>>,
}

impl InspectSummary {
    pub(crate) fn new(archive: Utf8PathBuf, variant: SchemaVariant, project: &Project) -> Self {
        Self {
            archive,
            variant: variant.to_string(),
            template_name: project.template_name().to_owned(),
            template_author: project.template_author().to_owned(),
            layers: project.feature_layers.len(),
            features: project.features.len(),
            tracks: project.tracks.len(),
            photo_points: project.photo_points.len(),
            project_attributes: project.project_attributes.len(),
            raw_files: project.raw_data_files.clone(),
            media_files: project.media_files_on_disk(),
            bounds: project.bounds(),
        }
    }
}

pub(crate) fn run_inspect(args: InspectArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_inspect_config(args)?;
    execute_inspect(&config, writer)
}

fn resolve_inspect_config(args: InspectArgs) -> Result<ArchiveConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_inspect(
    config: &ArchiveConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let (variant, project) = config.read_project(ReadOptions::default())?;
    let summary = InspectSummary::new(config.archive.clone(), variant, &project);
    write_summary(writer, &summary)
}

fn write_summary(writer: &mut dyn Write, summary: &InspectSummary) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(summary).map_err(CliError::SerialiseSummary)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ArchiveConfig, CliError> {
    let merged = InspectArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ArchiveConfig::try_from(merged)
}
