//! End-to-end read: unpack, read the schema, normalise, attach files.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use swmaps_core::Project;
use swmaps_fs::{list_files, read_bytes};
use thiserror::Error;

use crate::archive::{ArchiveError, ExtractOptions, ProjectArchive};
use crate::schema::SchemaReadError;

/// Switches for [`ProjectArchive::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    /// Load every file in `Photos/` into [`Project::media_files`].
    pub read_media_files: bool,
}

/// Any failure of the end-to-end read.
#[derive(Debug, Error)]
pub enum ReadProjectError {
    /// The archive could not be unpacked or held no database.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// The database could not be read.
    #[error(transparent)]
    Schema(#[from] SchemaReadError),
    /// An archive directory could not be listed.
    #[error("failed to list {path}")]
    ListDirectory {
        /// Directory being listed.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: io::Error,
    },
    /// A media file could not be loaded.
    #[error("failed to load media file {path}")]
    LoadMedia {
        /// Media file being read.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: io::Error,
    },
}

impl ProjectArchive {
    /// Read and normalise the unpacked project.
    ///
    /// Raw files under `RawFiles/` are always listed; `Photos/` contents are
    /// loaded into memory only when [`ReadOptions::read_media_files`] is set.
    ///
    /// # Errors
    /// Returns [`ReadProjectError::Schema`] when the database cannot be read
    /// and the I/O variants when archive directories cannot be listed or
    /// media files cannot be loaded.
    pub fn read(&self, options: ReadOptions) -> Result<Project, ReadProjectError> {
        let mut project = self.variant().read(self.database_path())?;
        project.normalise();

        if options.read_media_files
            && let Some(photos) = self.photos_dir()
        {
            for path in list_dir_files(photos)? {
                let bytes = read_bytes(&path).map_err(|source| ReadProjectError::LoadMedia {
                    path: path.clone(),
                    source,
                })?;
                if let Some(name) = path.file_name() {
                    project.media_files.insert(name.to_owned(), bytes);
                }
            }
            debug!("Loaded {} media files from {photos}", project.media_files.len());
        }
        if let Some(raw_files) = self.raw_files_dir() {
            project.raw_data_files = list_dir_files(raw_files)?;
        }
        Ok(project)
    }
}

fn list_dir_files(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ReadProjectError> {
    list_files(dir).map_err(|source| ReadProjectError::ListDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Unpack `archive_path`, read its database and normalise the result.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use swmaps_data::{ExtractOptions, ReadOptions, read_project_archive};
///
/// let project = read_project_archive(
///     Utf8Path::new("survey.swmz"),
///     &ExtractOptions::default(),
///     ReadOptions::default(),
/// )?;
/// println!("{} features", project.features.len());
/// # Ok::<(), swmaps_data::ReadProjectError>(())
/// ```
///
/// # Errors
/// Propagates [`ReadProjectError`] from extraction, schema reading and file
/// loading.
pub fn read_project_archive(
    archive_path: &Utf8Path,
    extract: &ExtractOptions,
    options: ReadOptions,
) -> Result<Project, ReadProjectError> {
    let archive = ProjectArchive::extract(archive_path, extract)?;
    let project = archive.read(options)?;
    info!(
        "Read {} project {archive_path} with {} features",
        archive.variant(),
        project.features.len()
    );
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{current_fixture_project, write_archive, write_current_database};
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
    }

    fn fixture_archive(root: &Utf8Path) -> Utf8PathBuf {
        let database = root.join("site.swm2");
        write_current_database(database.as_std_path(), &current_fixture_project())
            .expect("write database");
        let bytes = std::fs::read(&database).expect("read database");
        let archive = root.join("site.swmz");
        write_archive(
            archive.as_std_path(),
            &[
                ("Projects/site.swm2", bytes.as_slice()),
                ("Photos/IMG_0001.jpg", b"jpeg"),
                ("RawFiles/rover.ubx", b"raw"),
            ],
        )
        .expect("write archive");
        archive
    }

    #[rstest]
    #[case(false, 0)]
    #[case(true, 1)]
    fn media_files_load_on_request(#[case] read_media_files: bool, #[case] expected: usize) {
        let dir = TempDir::new().expect("create temp dir");
        let root = utf8(&dir);
        let archive = fixture_archive(&root);

        let project = read_project_archive(
            &archive,
            &ExtractOptions::with_work_root(root.join("work")),
            ReadOptions { read_media_files },
        )
        .expect("read archive");

        assert_eq!(project.media_files.len(), expected);
        assert_eq!(
            project.raw_data_files,
            vec![root.join("work/site/RawFiles/rover.ubx")]
        );
    }

    #[rstest]
    fn read_project_is_normalised() {
        let dir = TempDir::new().expect("create temp dir");
        let root = utf8(&dir);
        let archive = fixture_archive(&root);

        let project = read_project_archive(
            &archive,
            &ExtractOptions::with_work_root(root.join("work")),
            ReadOptions::default(),
        )
        .expect("read archive");

        let photo = project.photo_points.first().expect("photo point");
        assert_eq!(photo.location.as_ref().map(|point| point.seq), Some(0));
        assert_eq!(
            project.media_file_path("IMG_0001.jpg"),
            Some(root.join("work/site/Photos/IMG_0001.jpg"))
        );
    }
}
