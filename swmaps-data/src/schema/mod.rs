//! Readers turning an embedded project database into a [`Project`].
//!
//! Two incompatible layouts exist: the current `.swm2` schema keyed by
//! UUID strings and the legacy `.swmaps` schema keyed by names and integer
//! row ids. Both sit behind [`SchemaReader`]; the container extractor picks
//! one through the [`SchemaVariant`] tag it detects.

use std::collections::{HashMap, HashSet};

use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use swmaps_core::{AttributeField, Project, ProjectAttribute, ProjectAttributeType, decode_choices};
use thiserror::Error;

mod current;
mod legacy;

pub use current::CurrentSchemaReader;
pub use legacy::LegacySchemaReader;

/// Name of the media directory that sits next to the database directory.
pub const PHOTOS_DIR: &str = "Photos";

/// Errors raised while reading a project database.
///
/// Every variant is fatal: no partially read project is returned.
#[derive(Debug, Error)]
pub enum SchemaReadError {
    /// Opening the SQLite database failed.
    #[error("failed to open project database at {path}")]
    OpenDatabase {
        /// Location of the database on disk.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A required table or column was missing, or a value had the wrong type.
    #[error("failed to read table {table}")]
    Table {
        /// Table being read.
        table: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

impl SchemaReadError {
    pub(crate) fn table(table: &'static str) -> impl Fn(rusqlite::Error) -> Self {
        move |source| Self::Table { table, source }
    }
}

/// Read one on-disk schema into the version-independent model.
///
/// Implementations return the raw model; sequence repair and field-name
/// backfill are applied afterwards by [`Project::normalise`].
pub trait SchemaReader {
    /// Read the database at `database_path`.
    ///
    /// # Errors
    /// Returns [`SchemaReadError`] when the database cannot be opened or a
    /// required table or column is missing or malformed.
    fn read(&self, database_path: &Utf8Path) -> Result<Project, SchemaReadError>;
}

/// Database layout detected inside a project archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVariant {
    /// `MapProjects/*.swmaps` databases.
    Legacy,
    /// `Projects/*.swm2` databases.
    Current,
}

impl SchemaVariant {
    /// Archive directory holding the database for this variant.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Legacy => "MapProjects",
            Self::Current => "Projects",
        }
    }

    /// Database file extension for this variant, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Legacy => "swmaps",
            Self::Current => "swm2",
        }
    }

    /// Read `database_path` with the matching reader.
    ///
    /// # Errors
    /// Propagates the reader's [`SchemaReadError`].
    pub fn read(self, database_path: &Utf8Path) -> Result<Project, SchemaReadError> {
        match self {
            Self::Legacy => LegacySchemaReader.read(database_path),
            Self::Current => CurrentSchemaReader.read(database_path),
        }
    }
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy",
            Self::Current => "current",
        })
    }
}

pub(crate) fn open_read_only(path: &Utf8Path) -> Result<Connection, SchemaReadError> {
    Connection::open_with_flags(
        path.as_std_path(),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| SchemaReadError::OpenDatabase {
        path: path.to_path_buf(),
        source,
    })
}

/// Media folder for a database stored one directory below the archive root.
pub(crate) fn media_folder_for(database_path: &Utf8Path) -> Utf8PathBuf {
    database_path
        .parent()
        .and_then(Utf8Path::parent)
        .unwrap_or_else(|| Utf8Path::new(""))
        .join(PHOTOS_DIR)
}

pub(crate) fn table_exists(
    connection: &Connection,
    table: &'static str,
) -> Result<bool, SchemaReadError> {
    connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1",
            [table],
            |_| Ok(true),
        )
        .optional()
        .map(|found| found.unwrap_or(false))
        .map_err(SchemaReadError::table(table))
}

/// Text cell; NULL reads as empty and numbers are rendered as text.
pub(crate) fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    let index = row.as_ref().column_index(column)?;
    match row.get_ref(index)? {
        ValueRef::Null => Ok(String::new()),
        ValueRef::Integer(value) => Ok(value.to_string()),
        ValueRef::Real(value) => Ok(value.to_string()),
        ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec()).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
        }),
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            index,
            column.to_owned(),
            Type::Blob,
        )),
    }
}

/// Optional text cell; NULL and empty strings read as `None`.
pub(crate) fn optional_text(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<String>> {
    text(row, column).map(|value| (!value.is_empty()).then_some(value))
}

/// Floating-point cell; NULL reads as zero.
pub(crate) fn real(row: &Row<'_>, column: &str) -> rusqlite::Result<f64> {
    row.get::<_, Option<f64>>(column).map(Option::unwrap_or_default)
}

/// Integer cell; NULL reads as zero.
pub(crate) fn integer(row: &Row<'_>, column: &str) -> rusqlite::Result<i64> {
    row.get::<_, Option<i64>>(column).map(Option::unwrap_or_default)
}

/// Boolean stored as an integer flag where `1` means true.
pub(crate) fn flag(row: &Row<'_>, column: &str) -> rusqlite::Result<bool> {
    integer(row, column).map(|value| value == 1)
}

/// Blob cell; NULL and empty blobs read as `None`.
pub(crate) fn blob(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<Vec<u8>>> {
    row.get::<_, Option<Vec<u8>>>(column)
        .map(|value| value.filter(|bytes| !bytes.is_empty()))
}

/// Read `project_info` into a key/value map. Later rows win on duplicate keys.
pub(crate) fn read_project_info(
    connection: &Connection,
) -> Result<HashMap<String, String>, SchemaReadError> {
    const TABLE: &str = "project_info";
    let mut statement = connection
        .prepare("SELECT * FROM project_info")
        .map_err(SchemaReadError::table(TABLE))?;
    let mut rows = statement.query([]).map_err(SchemaReadError::table(TABLE))?;
    let mut info = HashMap::new();
    while let Some(row) = rows.next().map_err(SchemaReadError::table(TABLE))? {
        let key = text(row, "attr").map_err(SchemaReadError::table(TABLE))?;
        let value = text(row, "value").map_err(SchemaReadError::table(TABLE))?;
        info.insert(key, value);
    }
    Ok(info)
}

/// Read `project_attributes`, decoding `||`-joined choice lists.
pub(crate) fn read_project_attributes(
    connection: &Connection,
) -> Result<Vec<ProjectAttribute>, SchemaReadError> {
    const TABLE: &str = "project_attributes";
    let mut statement = connection
        .prepare("SELECT * FROM project_attributes")
        .map_err(SchemaReadError::table(TABLE))?;
    let mut rows = statement.query([]).map_err(SchemaReadError::table(TABLE))?;
    let mut attributes = Vec::new();
    while let Some(row) = rows.next().map_err(SchemaReadError::table(TABLE))? {
        let attribute = project_attribute_from_row(row).map_err(SchemaReadError::table(TABLE))?;
        attributes.push(attribute);
    }
    Ok(attributes)
}

fn project_attribute_from_row(row: &Row<'_>) -> rusqlite::Result<ProjectAttribute> {
    Ok(ProjectAttribute {
        name: text(row, "attr")?,
        value: text(row, "value")?,
        is_required: flag(row, "required_field")?,
        data_type: ProjectAttributeType::from_code(&text(row, "data_type")?),
        choices: decode_choices(&text(row, "field_choices")?),
    })
}

/// Attribute fields collected across all layers with project-wide
/// identifier deduplication.
#[derive(Debug, Default)]
pub(crate) struct FieldRegistry {
    seen: HashSet<String>,
}

impl FieldRegistry {
    /// Append `field` unless its identifier was already registered.
    pub(crate) fn push(&mut self, fields: &mut Vec<AttributeField>, field: AttributeField) {
        if self.seen.insert(field.id.clone()) {
            fields.push(field);
        } else {
            warn!(
                "Skipped duplicate attribute field {} on layer {}",
                field.id, field.layer_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/work/site/Projects/site.swm2", "/work/site/Photos")]
    #[case("Projects/site.swm2", "Photos")]
    #[case("site.swm2", "Photos")]
    fn media_folder_sits_beside_database_directory(#[case] database: &str, #[case] expected: &str) {
        assert_eq!(media_folder_for(Utf8Path::new(database)), Utf8Path::new(expected));
    }

    #[rstest]
    fn variants_describe_their_layout() {
        assert_eq!(SchemaVariant::Current.directory(), "Projects");
        assert_eq!(SchemaVariant::Current.extension(), "swm2");
        assert_eq!(SchemaVariant::Legacy.directory(), "MapProjects");
        assert_eq!(SchemaVariant::Legacy.extension(), "swmaps");
        assert_eq!(SchemaVariant::Legacy.to_string(), "legacy");
    }

    #[rstest]
    fn cells_read_with_defaults() {
        let connection = Connection::open_in_memory().expect("open in-memory database");
        let row_values = connection
            .query_row(
                "SELECT NULL AS t, 42 AS n, NULL AS r, 1 AS f, NULL AS b, 2.5 AS x",
                [],
                |row| {
                    Ok((
                        text(row, "t")?,
                        text(row, "n")?,
                        real(row, "r")?,
                        flag(row, "f")?,
                        blob(row, "b")?,
                        real(row, "x")?,
                    ))
                },
            )
            .expect("read row");
        assert_eq!(row_values, (String::new(), "42".to_owned(), 0.0, true, None, 2.5));
    }

    #[rstest]
    fn missing_columns_are_errors() {
        let connection = Connection::open_in_memory().expect("open in-memory database");
        let outcome = connection.query_row("SELECT 1 AS present", [], |row| text(row, "absent"));
        assert!(matches!(outcome, Err(rusqlite::Error::InvalidColumnName(_))));
    }

    #[rstest]
    fn text_in_integer_column_is_an_error() {
        let connection = Connection::open_in_memory().expect("open in-memory database");
        let outcome = connection.query_row("SELECT 'abc' AS seq", [], |row| integer(row, "seq"));
        assert!(matches!(outcome, Err(rusqlite::Error::InvalidColumnType(..))));
    }

    #[rstest]
    fn duplicate_fields_keep_first_occurrence() {
        let mut registry = FieldRegistry::default();
        let mut fields = Vec::new();
        let field = |name: &str| AttributeField {
            id: "A1".into(),
            layer_id: "L1".into(),
            field_name: name.into(),
            ..AttributeField::default()
        };
        registry.push(&mut fields, field("first"));
        registry.push(&mut fields, field("second"));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.first().map(|f| f.field_name.as_str()), Some("first"));
    }
}
