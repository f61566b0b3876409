//! Fixture builders for project databases and archives.
//!
//! Shared between the unit tests and the integration tests, which include
//! this file by path, so it only refers to external crates.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rusqlite::{Connection, params};
use swmaps_core::{
    AttributeField, AttributeType, AttributeValue, CHOICE_SEPARATOR, Feature, FeatureLayer,
    GeometryType, PhotoPoint, Point, PointShape, Project, ProjectAttribute, ProjectAttributeType,
    Track,
};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const CURRENT_SCHEMA: &str = "
    CREATE TABLE project_info (attr TEXT, value TEXT);
    CREATE TABLE feature_layers (
        uuid TEXT, name TEXT, group_name TEXT, geom_type TEXT, point_symbol TEXT,
        color INTEGER, fill_color INTEGER, line_width REAL, label_field_id TEXT,
        active INTEGER, drawn INTEGER, png_symbol BLOB, z_index INTEGER
    );
    CREATE TABLE attribute_fields (
        uuid TEXT, layer_id TEXT, field_name TEXT, data_type TEXT, field_choices TEXT
    );
    CREATE TABLE features (uuid TEXT, layer_id TEXT, name TEXT, remarks TEXT);
    CREATE TABLE points (
        uuid TEXT, fid TEXT, seq INTEGER, lat REAL, lon REAL, elv REAL, ortho_ht REAL,
        time INTEGER, start_time INTEGER, instrument_ht REAL, fix_quality INTEGER,
        speed REAL, snap_id TEXT, additional_data TEXT, bearing REAL, accuracy_h REAL,
        accuracy_v REAL, pos_data TEXT
    );
    CREATE TABLE tracks (uuid TEXT, name TEXT, color INTEGER, description TEXT);
    CREATE TABLE photos (uuid TEXT, remarks TEXT, photo_path TEXT);
    CREATE TABLE attribute_values (item_id TEXT, field_id TEXT, value TEXT, data_type TEXT);
    CREATE TABLE project_attributes (
        attr TEXT, value TEXT, required_field INTEGER, data_type TEXT, field_choices TEXT
    );
";

const LEGACY_SCHEMA: &str = "
    CREATE TABLE project_info (attr TEXT, value TEXT);
    CREATE TABLE feature_layers (
        name TEXT, group_name TEXT, geom_type TEXT, point_symbol TEXT, color INTEGER,
        fill_color INTEGER, line_width REAL, label_field TEXT, active INTEGER,
        drawn INTEGER, png_symbol BLOB
    );
    CREATE TABLE attribute_fields (
        layer_name TEXT, field_name TEXT, data_type TEXT, field_choices TEXT
    );
    CREATE TABLE features (fid INTEGER PRIMARY KEY, layer_name TEXT, name TEXT, remarks TEXT);
    CREATE TABLE points (
        fid INTEGER, seq INTEGER, lat REAL, lon REAL, elv REAL, time INTEGER,
        instrument_ht REAL, fix_quality INTEGER, speed REAL
    );
    CREATE TABLE attribute_values (fid INTEGER, field_name TEXT, value TEXT);
    CREATE TABLE tracks (id INTEGER PRIMARY KEY, name TEXT, color INTEGER, description TEXT);
    CREATE TABLE track_points (
        track_id INTEGER, seq INTEGER, lat REAL, lon REAL, elv REAL, time INTEGER,
        speed REAL, fix_quality INTEGER
    );
    CREATE TABLE photos (
        id INTEGER PRIMARY KEY, remarks TEXT, photo_path TEXT, lat REAL, lon REAL,
        elv REAL, time INTEGER
    );
";

const LEGACY_PROJECT_ATTRIBUTES: &str = "
    CREATE TABLE project_attributes (
        attr TEXT, value TEXT, required_field INTEGER, data_type TEXT, field_choices TEXT
    );
";

/// Create the tables of the current `.swm2` schema.
pub fn create_current_schema(connection: &Connection) -> rusqlite::Result<()> {
    connection.execute_batch(CURRENT_SCHEMA)
}

/// Create the tables of the legacy `.swmaps` schema.
pub fn create_legacy_schema(
    connection: &Connection,
    with_project_attributes: bool,
) -> rusqlite::Result<()> {
    connection.execute_batch(LEGACY_SCHEMA)?;
    if with_project_attributes {
        connection.execute_batch(LEGACY_PROJECT_ATTRIBUTES)?;
    }
    Ok(())
}

/// Persist `project` at `path` using the current schema.
///
/// Points are written with their stored sequence numbers untouched, so
/// out-of-order fixtures survive the round trip into SQLite. A feature
/// number of zero lets SQLite assign the row id.
pub fn write_current_database(path: &Path, project: &Project) -> rusqlite::Result<()> {
    let mut connection = Connection::open(path)?;
    create_current_schema(&connection)?;
    let tx = connection.transaction()?;

    let mut info: Vec<(&String, &String)> = project.project_info.iter().collect();
    info.sort();
    for (key, value) in info {
        tx.execute(
            "INSERT INTO project_info (attr, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }
    for layer in &project.feature_layers {
        insert_layer(&tx, layer)?;
    }
    for feature in &project.features {
        insert_feature(&tx, feature)?;
    }
    for track in &project.tracks {
        tx.execute(
            "INSERT INTO tracks (uuid, name, color, description) VALUES (?1, ?2, ?3, ?4)",
            params![track.id, track.name, track.color, track.remarks],
        )?;
        for point in &track.vertices {
            insert_point(&tx, &track.id, point)?;
        }
    }
    for photo in &project.photo_points {
        tx.execute(
            "INSERT INTO photos (uuid, remarks, photo_path) VALUES (?1, ?2, ?3)",
            params![photo.id, photo.remarks, photo.file_name],
        )?;
        if let Some(location) = &photo.location {
            insert_point(&tx, &photo.id, location)?;
        }
    }
    for attribute in &project.project_attributes {
        tx.execute(
            "INSERT INTO project_attributes (attr, value, required_field, data_type, field_choices) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                attribute.name,
                attribute.value,
                i64::from(attribute.is_required),
                attribute.data_type.as_str(),
                attribute.choices.join(CHOICE_SEPARATOR),
            ],
        )?;
    }
    tx.commit()
}

fn insert_layer(connection: &Connection, layer: &FeatureLayer) -> rusqlite::Result<()> {
    connection.execute(
        "INSERT INTO feature_layers (uuid, name, group_name, geom_type, point_symbol, color, \
         fill_color, line_width, label_field_id, active, drawn, png_symbol, z_index) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            layer.id,
            layer.name,
            layer.group_name,
            layer.geometry_type.as_str(),
            layer.point_shape.as_str(),
            layer.color,
            layer.fill_color,
            layer.line_width,
            layer.label_field_id,
            i64::from(layer.active),
            i64::from(layer.drawn),
            layer.png_symbol,
            layer.z_index,
        ],
    )?;
    for field in &layer.attribute_fields {
        connection.execute(
            "INSERT INTO attribute_fields (uuid, layer_id, field_name, data_type, field_choices) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                field.id,
                layer.id,
                field.field_name,
                field.data_type.as_str(),
                field.choices.join(CHOICE_SEPARATOR),
            ],
        )?;
    }
    Ok(())
}

fn insert_feature(connection: &Connection, feature: &Feature) -> rusqlite::Result<()> {
    let row_id = (feature.feature_number > 0).then_some(feature.feature_number);
    connection.execute(
        "INSERT INTO features (rowid, uuid, layer_id, name, remarks) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![row_id, feature.id, feature.layer_id, feature.name, feature.remarks],
    )?;
    for point in &feature.points {
        insert_point(connection, &feature.id, point)?;
    }
    for value in &feature.attribute_values {
        connection.execute(
            "INSERT INTO attribute_values (item_id, field_id, value, data_type) \
             VALUES (?1, ?2, ?3, ?4)",
            params![feature.id, value.field_id, value.value, value.data_type.as_str()],
        )?;
    }
    Ok(())
}

fn insert_point(connection: &Connection, owner_id: &str, point: &Point) -> rusqlite::Result<()> {
    connection.execute(
        "INSERT INTO points (uuid, fid, seq, lat, lon, elv, ortho_ht, time, start_time, \
         instrument_ht, fix_quality, speed, snap_id, additional_data, bearing, accuracy_h, \
         accuracy_v, pos_data) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            point.id,
            owner_id,
            point.seq,
            point.latitude,
            point.longitude,
            point.elevation,
            point.ortho_height,
            point.time,
            point.start_time,
            point.instrument_height,
            point.fix_quality,
            point.speed,
            point.snap_id,
            point.additional_data,
            point.bearing,
            point.accuracy_h,
            point.accuracy_v,
            point.position_data,
        ],
    )?;
    Ok(())
}

fn fixture_point(id: &str, owner: &str, seq: i64, longitude: f64, latitude: f64) -> Point {
    Point {
        id: id.to_owned(),
        feature_id: owner.to_owned(),
        seq,
        latitude,
        longitude,
        time: 1_000 + seq,
        fix_quality: 4,
        ..Point::default()
    }
}

/// A small road survey in the current schema.
///
/// Layer `L1` is a line layer with an `OPTIONS` field `A1` ("Surface") and a
/// photo field `A2` ("Photo"). Feature `F1` stores its points with sequence
/// numbers `[2, 0, 1]`. Track `T1` has two vertices and photo `P1` has one
/// location row.
#[must_use]
pub fn current_fixture_project() -> Project {
    let mut project = Project::default();
    project.set_template_name("Road survey");
    project.set_template_author("Survey team");
    project.feature_layers.push(FeatureLayer {
        id: "L1".to_owned(),
        name: "Roads".to_owned(),
        group_name: "Transport".to_owned(),
        geometry_type: GeometryType::Line,
        point_shape: PointShape::Square,
        color: -16_776_961,
        line_width: 3.0,
        label_field_id: "A1".to_owned(),
        active: true,
        drawn: false,
        attribute_fields: vec![
            AttributeField {
                id: "A1".to_owned(),
                layer_id: "L1".to_owned(),
                field_name: "Surface".to_owned(),
                data_type: AttributeType::Options,
                choices: vec!["Asphalt".to_owned(), "Gravel".to_owned()],
            },
            AttributeField {
                id: "A2".to_owned(),
                layer_id: "L1".to_owned(),
                field_name: "Photo".to_owned(),
                data_type: AttributeType::Photo,
                choices: Vec::new(),
            },
        ],
        ..FeatureLayer::default()
    });
    project.features.push(Feature {
        id: "F1".to_owned(),
        layer_id: "L1".to_owned(),
        name: "High street".to_owned(),
        points: vec![
            fixture_point("F1-c", "F1", 2, -1.2, 51.2),
            fixture_point("F1-a", "F1", 0, -1.0, 51.0),
            fixture_point("F1-b", "F1", 1, -1.1, 51.1),
        ],
        attribute_values: vec![
            AttributeValue {
                feature_id: "F1".to_owned(),
                field_id: "A1".to_owned(),
                value: "Gravel".to_owned(),
                data_type: AttributeType::Options,
                field_name: String::new(),
            },
            AttributeValue {
                feature_id: "F1".to_owned(),
                field_id: "A2".to_owned(),
                value: "IMG_0001.jpg".to_owned(),
                data_type: AttributeType::Photo,
                field_name: String::new(),
            },
        ],
        ..Feature::default()
    });
    project.tracks.push(Track {
        id: "T1".to_owned(),
        name: "Walk".to_owned(),
        remarks: "Morning walk".to_owned(),
        vertices: vec![
            fixture_point("T1-a", "T1", 0, -1.3, 51.3),
            fixture_point("T1-b", "T1", 1, -1.4, 51.4),
        ],
        ..Track::default()
    });
    project.photo_points.push(PhotoPoint {
        id: "P1".to_owned(),
        remarks: "Junction".to_owned(),
        file_name: "IMG_0001.jpg".to_owned(),
        location: Some(fixture_point("P1-a", "P1", 3, -1.05, 51.05)),
    });
    project.project_attributes.push(ProjectAttribute {
        name: "Weather".to_owned(),
        value: "Dry".to_owned(),
        is_required: true,
        data_type: ProjectAttributeType::Options,
        choices: vec!["Dry".to_owned(), "Wet".to_owned()],
    });
    project
}

/// Write a zip archive holding `entries` as `(name, contents)` pairs.
pub fn write_archive(path: &Path, entries: &[(&str, &[u8])]) -> zip::result::ZipResult<()> {
    let mut writer = ZipWriter::new(File::create(path)?);
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        writer.start_file(*name, options)?;
        writer.write_all(contents)?;
    }
    writer.finish()?;
    Ok(())
}
