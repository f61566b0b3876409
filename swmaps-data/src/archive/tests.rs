//! Unit tests for archive extraction and variant detection.

use super::*;
use crate::test_support::write_archive;
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

struct Scratch {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Scratch {
    fn archive(&self, name: &str, entries: &[(&str, &[u8])]) -> Utf8PathBuf {
        let path = self.root.join(name);
        write_archive(path.as_std_path(), entries).expect("write archive");
        path
    }

    fn options(&self) -> ExtractOptions {
        ExtractOptions::with_work_root(self.root.join("work"))
    }
}

#[fixture]
fn scratch() -> Scratch {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    Scratch { _dir: dir, root }
}

#[rstest]
fn detects_current_schema(scratch: Scratch) {
    let archive = scratch.archive(
        "site.swmz",
        &[
            ("Projects/site.swm2", b"db"),
            ("Photos/IMG_0001.jpg", b"jpeg"),
            ("RawFiles/base.ubx", b"raw"),
        ],
    );

    let extracted = ProjectArchive::extract(&archive, &scratch.options()).expect("extract");

    assert_eq!(extracted.variant(), SchemaVariant::Current);
    assert_eq!(extracted.work_dir(), scratch.root.join("work/site"));
    assert_eq!(
        extracted.database_path(),
        scratch.root.join("work/site/Projects/site.swm2")
    );
    assert_eq!(
        extracted.photos_dir(),
        Some(scratch.root.join("work/site/Photos").as_path())
    );
    assert!(extracted.raw_files_dir().is_some());
}

#[rstest]
fn detects_legacy_schema_case_insensitively(scratch: Scratch) {
    let archive = scratch.archive("old.swmz", &[("MapProjects/OLD.SWMAPS", b"db")]);

    let extracted = ProjectArchive::extract(&archive, &scratch.options()).expect("extract");

    assert_eq!(extracted.variant(), SchemaVariant::Legacy);
    assert!(extracted.photos_dir().is_none());
    assert!(extracted.raw_files_dir().is_none());
}

#[rstest]
fn current_schema_wins_over_legacy(scratch: Scratch) {
    let archive = scratch.archive(
        "both.swmz",
        &[("MapProjects/a.swmaps", b"old"), ("Projects/b.swm2", b"new")],
    );

    let extracted = ProjectArchive::extract(&archive, &scratch.options()).expect("extract");

    assert_eq!(extracted.variant(), SchemaVariant::Current);
}

#[rstest]
fn first_database_in_name_order_is_used(scratch: Scratch) {
    let archive = scratch.archive(
        "many.swmz",
        &[("Projects/zeta.swm2", b"z"), ("Projects/alpha.swm2", b"a")],
    );

    let extracted = ProjectArchive::extract(&archive, &scratch.options()).expect("extract");

    assert_eq!(extracted.database_path().file_name(), Some("alpha.swm2"));
}

#[rstest]
#[case::empty(&[])]
#[case::wrong_extension(&[("Projects/site.sqlite", b"db".as_slice())])]
#[case::wrong_directory(&[("Data/site.swm2", b"db".as_slice())])]
fn missing_database_is_a_detection_error(scratch: Scratch, #[case] entries: &[(&str, &[u8])]) {
    let archive = scratch.archive("bad.swmz", entries);

    let err = ProjectArchive::extract(&archive, &scratch.options()).expect_err("no database");

    assert!(matches!(err, ArchiveError::VariantDetection(_)));
}

#[rstest]
fn corrupt_archive_is_an_extraction_error(scratch: Scratch) {
    let archive = scratch.root.join("corrupt.swmz");
    fs::write(&archive, b"not a zip file").expect("write corrupt archive");

    let err = ProjectArchive::extract(&archive, &scratch.options()).expect_err("corrupt");

    assert!(matches!(
        err,
        ArchiveError::Extraction(ExtractionError::Unpack { .. })
    ));
}

#[rstest]
fn missing_archive_is_an_extraction_error(scratch: Scratch) {
    let archive = scratch.root.join("absent.swmz");

    let err = ProjectArchive::extract(&archive, &scratch.options()).expect_err("missing");

    assert!(matches!(
        err,
        ArchiveError::Extraction(ExtractionError::OpenArchive { .. })
    ));
}

#[rstest]
fn re_extraction_replaces_previous_contents(scratch: Scratch) {
    let archive = scratch.archive("site.swmz", &[("Projects/site.swm2", b"db")]);
    let first = ProjectArchive::extract(&archive, &scratch.options()).expect("first extract");
    let stale = first.work_dir().join("stale.txt");
    fs::write(&stale, b"left over").expect("write stale file");

    let second = ProjectArchive::extract(&archive, &scratch.options()).expect("second extract");

    assert_eq!(first, second);
    assert!(!stale.exists());
    assert_eq!(fs::read(second.database_path()).expect("read database"), b"db");
}

#[rstest]
fn randomised_naming_creates_distinct_directories(scratch: Scratch) {
    let archive = scratch.archive("site.swmz", &[("Projects/site.swm2", b"db")]);
    let options = ExtractOptions {
        naming: WorkDirNaming::Randomised,
        ..scratch.options()
    };

    let first = ProjectArchive::extract(&archive, &options).expect("first extract");
    let second = ProjectArchive::extract(&archive, &options).expect("second extract");

    assert_ne!(first.work_dir(), second.work_dir());
    assert!(first.work_dir().starts_with(&options.work_root));
    assert!(first.database_path().exists());
    assert!(second.database_path().exists());
}

#[rstest]
fn archive_stem_is_trimmed(scratch: Scratch) {
    let archive = scratch.archive(" padded .swmz", &[("Projects/p.swm2", b"db")]);

    let extracted = ProjectArchive::extract(&archive, &scratch.options()).expect("extract");

    assert_eq!(extracted.work_dir(), scratch.root.join("work/padded"));
}

#[rstest]
fn default_options_use_system_temp_dir() {
    let options = ExtractOptions::default();

    assert_eq!(options.naming, WorkDirNaming::ArchiveStem);
    assert_eq!(options.work_root.file_name(), Some(DEFAULT_WORK_DIR_NAME));
}
