//! Errors raised while unpacking a project archive.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// The archive could not be opened, unpacked or scanned.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The archive path has no file name to derive a working directory from.
    #[error("archive path {path} has no usable file name")]
    InvalidArchivePath {
        /// Offending archive path.
        path: Utf8PathBuf,
    },
    /// The working directory could not be cleared or created.
    #[error("failed to prepare working directory {path}")]
    PrepareWorkDir {
        /// Working directory being prepared.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: io::Error,
    },
    /// Opening the archive file failed.
    #[error("failed to open archive {path}")]
    OpenArchive {
        /// Archive location.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: io::Error,
    },
    /// The archive is not a readable zip file or an entry failed to unpack.
    #[error("failed to unpack archive {path}")]
    Unpack {
        /// Archive location.
        path: Utf8PathBuf,
        /// Source error returned by `zip`.
        #[source]
        source: zip::result::ZipError,
    },
    /// Listing the unpacked contents failed.
    #[error("failed to scan extracted directory {path}")]
    ScanWorkDir {
        /// Directory being listed.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: io::Error,
    },
}

/// Neither `Projects/*.swm2` nor `MapProjects/*.swmaps` was found.
#[derive(Debug, Error)]
#[error("no project database in {work_dir}: expected Projects/*.swm2 or MapProjects/*.swmaps")]
pub struct VariantDetectionError {
    /// Directory the archive was unpacked into.
    pub work_dir: Utf8PathBuf,
}

/// Failure to turn an archive into a located project database.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Unpacking failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// The unpacked contents hold no recognised database.
    #[error(transparent)]
    VariantDetection(#[from] VariantDetectionError),
}
