//! Unpack `.swmz` project archives and locate the embedded database.
//!
//! An archive is a zip container. Its top level holds one database directory
//! (`Projects/` for the current schema, `MapProjects/` for the legacy one),
//! optionally a `Photos/` media directory and optionally a `RawFiles/`
//! directory of receiver logs.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use swmaps_fs::{ensure_dir, list_dirs, list_files, open_utf8_file, recreate_dir};
use zip::ZipArchive;

use crate::schema::{PHOTOS_DIR, SchemaVariant};

mod error;

pub use error::{ArchiveError, ExtractionError, VariantDetectionError};

/// Directory of raw receiver logs inside an archive.
pub const RAW_FILES_DIR: &str = "RawFiles";

/// Name of the directory created under the system temp dir by default.
pub const DEFAULT_WORK_DIR_NAME: &str = "SW_Maps";

const RANDOMISED_PREFIX: &str = "swmz-";

/// How the per-archive working directory is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkDirNaming {
    /// `<work_root>/<archive file stem>`; re-extracting replaces it.
    #[default]
    ArchiveStem,
    /// A fresh uniquely named directory under the work root.
    Randomised,
}

/// Where and how archives are unpacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Parent of every working directory.
    pub work_root: Utf8PathBuf,
    /// Naming mode for the working directory.
    pub naming: WorkDirNaming,
}

impl ExtractOptions {
    /// Options that unpack below `work_root` using archive-stem naming.
    #[must_use]
    pub fn with_work_root(work_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            work_root: work_root.into(),
            naming: WorkDirNaming::ArchiveStem,
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::with_work_root(default_work_root())
    }
}

/// `<system temp dir>/SW_Maps`, falling back to a relative `SW_Maps` when
/// the temp dir is not valid UTF-8.
#[must_use]
pub fn default_work_root() -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(std::env::temp_dir())
        .unwrap_or_default()
        .join(DEFAULT_WORK_DIR_NAME)
}

/// An unpacked archive with its detected schema variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectArchive {
    work_dir: Utf8PathBuf,
    variant: SchemaVariant,
    database_path: Utf8PathBuf,
    photos_dir: Option<Utf8PathBuf>,
    raw_files_dir: Option<Utf8PathBuf>,
}

impl ProjectArchive {
    /// Unpack `archive_path` into a fresh working directory and detect the
    /// schema variant.
    ///
    /// With [`WorkDirNaming::ArchiveStem`] any previous contents of the
    /// working directory are removed first, so extracting the same archive
    /// twice yields the same tree. Callers must not extract into the same
    /// working directory concurrently.
    ///
    /// # Errors
    /// Returns [`ArchiveError::Extraction`] when the archive cannot be opened
    /// or unpacked and [`ArchiveError::VariantDetection`] when it holds no
    /// recognised database.
    pub fn extract(archive_path: &Utf8Path, options: &ExtractOptions) -> Result<Self, ArchiveError> {
        let work_dir = prepare_work_dir(archive_path, options)?;
        unpack(archive_path, &work_dir)?;
        Self::from_work_dir(work_dir)
    }

    /// Inspect an already unpacked archive.
    ///
    /// # Errors
    /// Returns [`ArchiveError::Extraction`] when the directory cannot be
    /// listed and [`ArchiveError::VariantDetection`] when it holds no
    /// recognised database.
    pub fn from_work_dir(work_dir: impl Into<Utf8PathBuf>) -> Result<Self, ArchiveError> {
        let work_dir = work_dir.into();
        let dirs = list_dirs(&work_dir).map_err(|source| ExtractionError::ScanWorkDir {
            path: work_dir.clone(),
            source,
        })?;
        let (variant, database_path) = detect_database(&work_dir, &dirs)?;
        debug!("Detected {variant} schema database {database_path}");
        let subdir = |name: &str| dirs.iter().find(|dir| dir.file_name() == Some(name)).cloned();
        Ok(Self {
            photos_dir: subdir(PHOTOS_DIR),
            raw_files_dir: subdir(RAW_FILES_DIR),
            work_dir,
            variant,
            database_path,
        })
    }

    /// Directory the archive was unpacked into.
    #[must_use]
    pub fn work_dir(&self) -> &Utf8Path {
        &self.work_dir
    }

    /// Detected schema variant.
    #[must_use]
    pub const fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// Path of the embedded project database.
    #[must_use]
    pub fn database_path(&self) -> &Utf8Path {
        &self.database_path
    }

    /// The `Photos` directory, when the archive has one.
    #[must_use]
    pub fn photos_dir(&self) -> Option<&Utf8Path> {
        self.photos_dir.as_deref()
    }

    /// The `RawFiles` directory, when the archive has one.
    #[must_use]
    pub fn raw_files_dir(&self) -> Option<&Utf8Path> {
        self.raw_files_dir.as_deref()
    }
}

fn prepare_work_dir(
    archive_path: &Utf8Path,
    options: &ExtractOptions,
) -> Result<Utf8PathBuf, ExtractionError> {
    match options.naming {
        WorkDirNaming::ArchiveStem => {
            let stem = archive_path
                .file_stem()
                .map(str::trim)
                .filter(|stem| !stem.is_empty())
                .ok_or_else(|| ExtractionError::InvalidArchivePath {
                    path: archive_path.to_path_buf(),
                })?;
            let work_dir = options.work_root.join(stem);
            recreate_dir(&work_dir).map_err(|source| ExtractionError::PrepareWorkDir {
                path: work_dir.clone(),
                source,
            })?;
            Ok(work_dir)
        }
        WorkDirNaming::Randomised => {
            let prepare_error = |source| ExtractionError::PrepareWorkDir {
                path: options.work_root.clone(),
                source,
            };
            ensure_dir(&options.work_root).map_err(prepare_error)?;
            let kept = tempfile::Builder::new()
                .prefix(RANDOMISED_PREFIX)
                .tempdir_in(&options.work_root)
                .map_err(prepare_error)?
                .keep();
            Utf8PathBuf::from_path_buf(kept).map_err(|path| {
                prepare_error(std::io::Error::other(format!(
                    "working directory {} is not valid UTF-8",
                    path.display()
                )))
            })
        }
    }
}

fn unpack(archive_path: &Utf8Path, work_dir: &Utf8Path) -> Result<(), ExtractionError> {
    let file = open_utf8_file(archive_path)
        .map_err(|source| ExtractionError::OpenArchive {
            path: archive_path.to_path_buf(),
            source,
        })?
        .into_std();
    let unpack_error = |source| ExtractionError::Unpack {
        path: archive_path.to_path_buf(),
        source,
    };
    let mut archive = ZipArchive::new(file).map_err(unpack_error)?;
    debug!(
        "Extracting {} entries from {archive_path} into {work_dir}",
        archive.len()
    );
    archive.extract(work_dir).map_err(unpack_error)
}

/// Current-schema databases win when both layouts are present; within a
/// layout the first database in name order is used.
fn detect_database(
    work_dir: &Utf8Path,
    dirs: &[Utf8PathBuf],
) -> Result<(SchemaVariant, Utf8PathBuf), ArchiveError> {
    for variant in [SchemaVariant::Current, SchemaVariant::Legacy] {
        let Some(dir) = dirs
            .iter()
            .find(|dir| dir.file_name() == Some(variant.directory()))
        else {
            continue;
        };
        let files = list_files(dir).map_err(|source| ExtractionError::ScanWorkDir {
            path: dir.clone(),
            source,
        })?;
        let mut candidates = files
            .into_iter()
            .filter(|file| has_extension(file, variant.extension()));
        if let Some(database) = candidates.next() {
            let ignored = candidates.count();
            if ignored > 0 {
                warn!("Ignoring {ignored} further {variant} databases in {dir}; using {database}");
            }
            return Ok((variant, database));
        }
    }
    Err(VariantDetectionError {
        work_dir: work_dir.to_path_buf(),
    }
    .into())
}

fn has_extension(path: &Utf8Path, expected: &str) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(expected))
}

#[cfg(test)]
mod tests;
