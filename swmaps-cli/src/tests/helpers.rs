//! Test helpers for building project archives on disk.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use swmaps_data::test_support::{current_fixture_project, write_archive, write_current_database};
use tempfile::TempDir;

pub(super) struct Workspace {
    _dir: TempDir,
    pub(super) root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn work_root(&self) -> Utf8PathBuf {
        self.root.join("work")
    }

    /// Write the road survey fixture as `survey.swmz` with one photo on disk.
    pub(super) fn survey_archive(&self) -> Utf8PathBuf {
        let database = self.root.join("survey.swm2");
        write_current_database(database.as_std_path(), &current_fixture_project())
            .expect("write database");
        let bytes = fs::read(&database).expect("read database");
        let archive = self.root.join("survey.swmz");
        write_archive(
            archive.as_std_path(),
            &[
                ("Projects/survey.swm2", bytes.as_slice()),
                ("Photos/IMG_0001.jpg", b"jpeg".as_slice()),
                ("RawFiles/rover.ubx", b"raw".as_slice()),
            ],
        )
        .expect("write archive");
        archive
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).expect("write file");
}
