//! Reader for the UUID-keyed `.swm2` schema.
//!
//! Foreign keys are UUID strings: `attribute_fields.layer_id`,
//! `features.layer_id`, `points.fid` (feature, track or photo owner) and
//! `attribute_values.item_id`. The SQLite `rowid` of `features` doubles as
//! the feature number.

use camino::Utf8Path;
use log::{debug, info, warn};
use rusqlite::{Connection, Row};
use swmaps_core::{
    AttributeField, AttributeType, AttributeValue, Feature, FeatureLayer, GeometryType, PhotoPoint,
    Point, PointShape, Project, Track, decode_choices,
};

use super::{
    FieldRegistry, SchemaReadError, SchemaReader, blob, flag, integer, media_folder_for,
    open_read_only, optional_text, read_project_attributes, read_project_info, real, text,
};

/// Reads databases stored as `Projects/*.swm2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentSchemaReader;

impl SchemaReader for CurrentSchemaReader {
    fn read(&self, database_path: &Utf8Path) -> Result<Project, SchemaReadError> {
        debug!("Reading current-schema database {database_path}");
        let connection = open_read_only(database_path)?;
        let mut project = Project::new(database_path, media_folder_for(database_path));

        project.project_info = read_project_info(&connection)?;
        project.feature_layers = read_feature_layers(&connection)?;
        project.features = read_features(&connection, &project)?;
        project.tracks = read_tracks(&connection)?;
        project.photo_points = read_photo_points(&connection)?;
        project.project_attributes = read_project_attributes(&connection)?;
        project.resolve_field_names();

        info!(
            "Read {} layers, {} features, {} tracks and {} photos from {database_path}",
            project.feature_layers.len(),
            project.features.len(),
            project.tracks.len(),
            project.photo_points.len()
        );
        Ok(project)
    }
}

fn read_feature_layers(connection: &Connection) -> Result<Vec<FeatureLayer>, SchemaReadError> {
    const TABLE: &str = "feature_layers";
    let mut statement = connection
        .prepare("SELECT * FROM feature_layers")
        .map_err(SchemaReadError::table(TABLE))?;
    let mut rows = statement.query([]).map_err(SchemaReadError::table(TABLE))?;
    let mut registry = FieldRegistry::default();
    let mut layers = Vec::new();
    while let Some(row) = rows.next().map_err(SchemaReadError::table(TABLE))? {
        let mut layer = layer_from_row(row).map_err(SchemaReadError::table(TABLE))?;
        for field in read_attribute_fields(connection, &layer.id)? {
            registry.push(&mut layer.attribute_fields, field);
        }
        layers.push(layer);
    }
    Ok(layers)
}

fn layer_from_row(row: &Row<'_>) -> rusqlite::Result<FeatureLayer> {
    Ok(FeatureLayer {
        id: text(row, "uuid")?,
        name: text(row, "name")?,
        group_name: text(row, "group_name")?,
        geometry_type: GeometryType::from_code(&text(row, "geom_type")?),
        point_shape: PointShape::from_code(&text(row, "point_symbol")?),
        color: integer(row, "color")?,
        fill_color: integer(row, "fill_color")?,
        line_width: real(row, "line_width")?,
        label_field_id: text(row, "label_field_id")?,
        active: flag(row, "active")?,
        drawn: flag(row, "drawn")?,
        png_symbol: blob(row, "png_symbol")?,
        z_index: integer(row, "z_index")?,
        attribute_fields: Vec::new(),
    })
}

fn read_attribute_fields(
    connection: &Connection,
    layer_id: &str,
) -> Result<Vec<AttributeField>, SchemaReadError> {
    const TABLE: &str = "attribute_fields";
    let mut statement = connection
        .prepare_cached("SELECT * FROM attribute_fields WHERE layer_id = ?1")
        .map_err(SchemaReadError::table(TABLE))?;
    let fields = statement
        .query_map([layer_id], |row| {
            Ok(AttributeField {
                id: text(row, "uuid")?,
                layer_id: text(row, "layer_id")?,
                field_name: text(row, "field_name")?,
                data_type: AttributeType::from_code(&text(row, "data_type")?),
                choices: decode_choices(&text(row, "field_choices")?),
            })
        })
        .map_err(SchemaReadError::table(TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(SchemaReadError::table(TABLE))?;
    Ok(fields)
}

fn read_features(
    connection: &Connection,
    project: &Project,
) -> Result<Vec<Feature>, SchemaReadError> {
    const TABLE: &str = "features";
    let mut statement = connection
        .prepare("SELECT rowid, * FROM features")
        .map_err(SchemaReadError::table(TABLE))?;
    let mut rows = statement.query([]).map_err(SchemaReadError::table(TABLE))?;
    let mut features = Vec::new();
    while let Some(row) = rows.next().map_err(SchemaReadError::table(TABLE))? {
        let mut feature = feature_from_row(row).map_err(SchemaReadError::table(TABLE))?;
        if project.layer(&feature.layer_id).is_none() {
            warn!(
                "Feature {} references unknown layer {}; treating it as a point",
                feature.id, feature.layer_id
            );
        }
        feature.geometry_type = project.geometry_type_for_layer(&feature.layer_id);
        feature.points = read_points(connection, &feature.id)?;
        feature.attribute_values = read_attribute_values(connection, &feature.id)?;
        features.push(feature);
    }
    Ok(features)
}

fn feature_from_row(row: &Row<'_>) -> rusqlite::Result<Feature> {
    Ok(Feature {
        id: text(row, "uuid")?,
        layer_id: text(row, "layer_id")?,
        name: text(row, "name")?,
        // `SELECT rowid, *` may label the first column `rowid`, `id` or an
        // alias primary key, so it is read by position.
        feature_number: row.get::<_, Option<i64>>(0)?.unwrap_or_default(),
        remarks: text(row, "remarks")?,
        ..Feature::default()
    })
}

/// Points owned by `owner_id`, ordered by the stored sequence column.
fn read_points(connection: &Connection, owner_id: &str) -> Result<Vec<Point>, SchemaReadError> {
    const TABLE: &str = "points";
    let mut statement = connection
        .prepare_cached("SELECT * FROM points WHERE fid = ?1 ORDER BY seq")
        .map_err(SchemaReadError::table(TABLE))?;
    statement
        .query_map([owner_id], point_from_row)
        .map_err(SchemaReadError::table(TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(SchemaReadError::table(TABLE))
}

fn point_from_row(row: &Row<'_>) -> rusqlite::Result<Point> {
    Ok(Point {
        id: text(row, "uuid")?,
        feature_id: text(row, "fid")?,
        seq: integer(row, "seq")?,
        latitude: real(row, "lat")?,
        longitude: real(row, "lon")?,
        elevation: real(row, "elv")?,
        ortho_height: real(row, "ortho_ht")?,
        time: integer(row, "time")?,
        start_time: integer(row, "start_time")?,
        instrument_height: real(row, "instrument_ht")?,
        fix_quality: integer(row, "fix_quality")?,
        speed: real(row, "speed")?,
        snap_id: optional_text(row, "snap_id")?,
        additional_data: text(row, "additional_data")?,
        bearing: real(row, "bearing")?,
        accuracy_h: real(row, "accuracy_h")?,
        accuracy_v: real(row, "accuracy_v")?,
        position_data: text(row, "pos_data")?,
    })
}

fn read_attribute_values(
    connection: &Connection,
    feature_id: &str,
) -> Result<Vec<AttributeValue>, SchemaReadError> {
    const TABLE: &str = "attribute_values";
    let mut statement = connection
        .prepare_cached("SELECT * FROM attribute_values WHERE item_id = ?1")
        .map_err(SchemaReadError::table(TABLE))?;
    statement
        .query_map([feature_id], |row| {
            Ok(AttributeValue {
                feature_id: text(row, "item_id")?,
                field_id: text(row, "field_id")?,
                value: text(row, "value")?,
                data_type: AttributeType::from_code(&text(row, "data_type")?),
                field_name: String::new(),
            })
        })
        .map_err(SchemaReadError::table(TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(SchemaReadError::table(TABLE))
}

fn read_tracks(connection: &Connection) -> Result<Vec<Track>, SchemaReadError> {
    const TABLE: &str = "tracks";
    let mut statement = connection
        .prepare("SELECT * FROM tracks")
        .map_err(SchemaReadError::table(TABLE))?;
    let mut rows = statement.query([]).map_err(SchemaReadError::table(TABLE))?;
    let mut tracks = Vec::new();
    while let Some(row) = rows.next().map_err(SchemaReadError::table(TABLE))? {
        let mut track = track_from_row(row).map_err(SchemaReadError::table(TABLE))?;
        track.vertices = read_points(connection, &track.id)?;
        tracks.push(track);
    }
    Ok(tracks)
}

fn track_from_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    Ok(Track {
        id: text(row, "uuid")?,
        name: text(row, "name")?,
        color: integer(row, "color")?,
        remarks: text(row, "description")?,
        vertices: Vec::new(),
    })
}

fn read_photo_points(connection: &Connection) -> Result<Vec<PhotoPoint>, SchemaReadError> {
    const TABLE: &str = "photos";
    let mut statement = connection
        .prepare("SELECT * FROM photos")
        .map_err(SchemaReadError::table(TABLE))?;
    let mut rows = statement.query([]).map_err(SchemaReadError::table(TABLE))?;
    let mut photos = Vec::new();
    while let Some(row) = rows.next().map_err(SchemaReadError::table(TABLE))? {
        let mut photo = PhotoPoint {
            id: text(row, "uuid").map_err(SchemaReadError::table(TABLE))?,
            remarks: text(row, "remarks").map_err(SchemaReadError::table(TABLE))?,
            file_name: text(row, "photo_path").map_err(SchemaReadError::table(TABLE))?,
            location: None,
        };
        photo.location = read_points(connection, &photo.id)?.into_iter().next();
        if photo.location.is_none() {
            warn!("Photo {} has no location point", photo.id);
        }
        photos.push(photo);
    }
    Ok(photos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{current_fixture_project, write_current_database};
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Database {
        _dir: TempDir,
        root: Utf8PathBuf,
        path: Utf8PathBuf,
    }

    impl Database {
        fn execute(&self, sql: &str) {
            let connection = Connection::open(&self.path).expect("open fixture database");
            connection.execute_batch(sql).expect("run fixture SQL");
        }
    }

    #[fixture]
    fn database() -> Database {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        let projects = root.join("Projects");
        std::fs::create_dir(&projects).expect("create Projects dir");
        let path = projects.join("site.swm2");
        write_current_database(path.as_std_path(), &current_fixture_project())
            .expect("write fixture database");
        Database {
            _dir: dir,
            root,
            path,
        }
    }

    #[rstest]
    fn reads_project_metadata_and_layers(database: Database) {
        let project = CurrentSchemaReader.read(&database.path).expect("read project");

        assert_eq!(project.template_name(), "Road survey");
        assert_eq!(project.database_path(), database.path.as_path());
        assert_eq!(project.media_folder_path(), database.root.join("Photos"));
        let layer = project.layer("L1").expect("layer L1");
        assert_eq!(layer.geometry_type, GeometryType::Line);
        assert_eq!(layer.point_shape, PointShape::Square);
        assert!(layer.active);
        assert!(!layer.drawn);
        let field = layer.attribute_field("A1").expect("field A1");
        assert_eq!(field.choices, vec!["Asphalt".to_owned(), "Gravel".to_owned()]);
    }

    #[rstest]
    fn features_carry_points_values_and_numbers(database: Database) {
        let project = CurrentSchemaReader.read(&database.path).expect("read project");

        let feature = project.feature("F1").expect("feature F1");
        assert_eq!(feature.feature_number, 1);
        assert_eq!(feature.geometry_type, GeometryType::Line);
        let seqs: Vec<i64> = feature.points.iter().map(|point| point.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        let names: Vec<&str> = feature
            .attribute_values
            .iter()
            .map(|value| value.field_name.as_str())
            .collect();
        assert_eq!(names, vec!["Surface", "Photo"]);
    }

    #[rstest]
    fn tracks_and_photos_are_read(database: Database) {
        let project = CurrentSchemaReader.read(&database.path).expect("read project");

        let track = project.tracks.first().expect("one track");
        assert_eq!(track.remarks, "Morning walk");
        assert_eq!(track.vertices.len(), 2);
        let photo = project.photo_points.first().expect("one photo");
        assert_eq!(photo.file_name, "IMG_0001.jpg");
        assert!(photo.location.is_some());
        assert_eq!(project.project_attributes.len(), 1);
    }

    #[rstest]
    fn unknown_layer_defaults_to_point(database: Database) {
        database.execute(
            "INSERT INTO features (uuid, layer_id, name, remarks) VALUES ('F9', 'missing', 'orphan', '');",
        );

        let project = CurrentSchemaReader.read(&database.path).expect("read project");

        let orphan = project.feature("F9").expect("orphan feature");
        assert_eq!(orphan.geometry_type, GeometryType::Point);
    }

    #[rstest]
    fn duplicate_field_rows_are_dropped(database: Database) {
        database.execute(
            "INSERT INTO attribute_fields (uuid, layer_id, field_name, data_type, field_choices) \
             VALUES ('A1', 'L1', 'Shadow', 'TEXT', '');",
        );

        let project = CurrentSchemaReader.read(&database.path).expect("read project");

        let layer = project.layer("L1").expect("layer L1");
        let matching: Vec<&AttributeField> = layer
            .attribute_fields
            .iter()
            .filter(|field| field.id == "A1")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching.first().map(|f| f.field_name.as_str()), Some("Surface"));
    }

    #[rstest]
    fn photo_without_location_reads_as_none(database: Database) {
        database.execute("DELETE FROM points WHERE fid = 'P1';");

        let project = CurrentSchemaReader.read(&database.path).expect("read project");

        assert!(project.photo_points.first().is_some_and(|photo| photo.location.is_none()));
    }

    #[rstest]
    fn missing_table_names_the_table(database: Database) {
        database.execute("DROP TABLE tracks;");

        let err = CurrentSchemaReader.read(&database.path).expect_err("tracks missing");

        assert!(matches!(err, SchemaReadError::Table { table: "tracks", .. }));
    }

    #[rstest]
    fn malformed_sequence_is_fatal(database: Database) {
        database.execute("UPDATE points SET seq = 'first' WHERE fid = 'F1';");

        let err = CurrentSchemaReader.read(&database.path).expect_err("seq malformed");

        assert!(matches!(err, SchemaReadError::Table { table: "points", .. }));
    }

    #[rstest]
    fn missing_database_fails_to_open() {
        let dir = TempDir::new().expect("create temp dir");
        let path =
            Utf8PathBuf::from_path_buf(dir.path().join("absent.swm2")).expect("utf-8 temp path");

        let err = CurrentSchemaReader.read(&path).expect_err("database missing");

        assert!(matches!(err, SchemaReadError::OpenDatabase { .. }));
    }
}
