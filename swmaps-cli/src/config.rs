//! Archive selection shared by every subcommand.

use camino::{Utf8Path, Utf8PathBuf};
use swmaps_core::Project;
use swmaps_data::{
    ExtractOptions, ProjectArchive, ReadOptions, ReadProjectError, SchemaVariant, WorkDirNaming,
};

use crate::{ARG_ARCHIVE, CliError};

/// Resolved archive location and extraction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArchiveConfig {
    /// Project archive to read.
    pub(crate) archive: Utf8PathBuf,
    /// Where and how the archive is unpacked.
    pub(crate) extract: ExtractOptions,
}

impl ArchiveConfig {
    /// Build the configuration from merged argument values.
    pub(crate) fn resolve(
        archive: Option<Utf8PathBuf>,
        work_root: Option<Utf8PathBuf>,
        randomise_work_dir: bool,
        env: &'static str,
    ) -> Result<Self, CliError> {
        let archive = archive.ok_or(CliError::MissingArgument {
            field: ARG_ARCHIVE,
            env,
        })?;
        let mut extract = work_root.map_or_else(ExtractOptions::default, |root| {
            ExtractOptions::with_work_root(root)
        });
        if randomise_work_dir {
            extract.naming = WorkDirNaming::Randomised;
        }
        Ok(Self { archive, extract })
    }

    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.archive, ARG_ARCHIVE)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match swmaps_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Unpack, read and normalise the configured archive.
    pub(crate) fn read_project(
        &self,
        options: ReadOptions,
    ) -> Result<(SchemaVariant, Project), CliError> {
        let read_error = |source: ReadProjectError| CliError::ReadArchive {
            path: self.archive.clone(),
            source,
        };
        let archive = ProjectArchive::extract(&self.archive, &self.extract)
            .map_err(|source| read_error(source.into()))?;
        let project = archive.read(options).map_err(read_error)?;
        Ok((archive.variant(), project))
    }
}
