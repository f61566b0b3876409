//! Reader for the name-keyed `.swmaps` schema.
//!
//! The legacy layout has no UUID columns. Identifiers are derived so they
//! stay unique per collection and stable across reads:
//!
//! | entity    | derived identifier      |
//! |-----------|-------------------------|
//! | layer     | layer name              |
//! | field     | `<layer>/<field>`       |
//! | feature   | decimal `fid`           |
//! | point     | `<owner>:<rowid>`       |
//! | track     | `track-<id>`            |
//! | photo     | `photo-<id>`            |
//!
//! Inside a field identifier, `\` and `/` in either name are escaped with a
//! backslash, so distinct name pairs never join to the same identifier.
//!
//! Photo locations are stored inline on the `photos` row and track vertices
//! live in their own `track_points` table. `project_attributes` is optional.

use camino::Utf8Path;
use log::{debug, info, warn};
use rusqlite::{Connection, Row};
use swmaps_core::{
    AttributeField, AttributeType, AttributeValue, Feature, FeatureLayer, GeometryType, PhotoPoint,
    Point, PointShape, Project, Track, decode_choices,
};

use super::{
    FieldRegistry, SchemaReadError, SchemaReader, blob, flag, integer, media_folder_for,
    open_read_only, read_project_attributes, read_project_info, real, table_exists, text,
};

/// Reads databases stored as `MapProjects/*.swmaps`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySchemaReader;

impl SchemaReader for LegacySchemaReader {
    fn read(&self, database_path: &Utf8Path) -> Result<Project, SchemaReadError> {
        debug!("Reading legacy-schema database {database_path}");
        let connection = open_read_only(database_path)?;
        let mut project = Project::new(database_path, media_folder_for(database_path));

        project.project_info = read_project_info(&connection)?;
        project.feature_layers = read_feature_layers(&connection)?;
        project.features = read_features(&connection, &project)?;
        project.tracks = read_tracks(&connection)?;
        project.photo_points = read_photo_points(&connection)?;
        if table_exists(&connection, "project_attributes")? {
            project.project_attributes = read_project_attributes(&connection)?;
        }

        info!(
            "Read {} layers, {} features, {} tracks and {} photos from legacy {database_path}",
            project.feature_layers.len(),
            project.features.len(),
            project.tracks.len(),
            project.photo_points.len()
        );
        Ok(project)
    }
}

fn field_id(layer: &str, field: &str) -> String {
    format!("{}/{}", escape_name(layer), escape_name(field))
}

fn escape_name(name: &str) -> String {
    name.replace('\\', "\\\\").replace('/', "\\/")
}

fn point_id(owner: &str, rowid: i64) -> String {
    format!("{owner}:{rowid}")
}

fn read_feature_layers(connection: &Connection) -> Result<Vec<FeatureLayer>, SchemaReadError> {
    const TABLE: &str = "feature_layers";
    let mut statement = connection
        .prepare("SELECT * FROM feature_layers ORDER BY rowid")
        .map_err(SchemaReadError::table(TABLE))?;
    let mut rows = statement.query([]).map_err(SchemaReadError::table(TABLE))?;
    let mut registry = FieldRegistry::default();
    let mut layers = Vec::new();
    let mut z_index = 0_i64;
    while let Some(row) = rows.next().map_err(SchemaReadError::table(TABLE))? {
        let mut layer = layer_from_row(row, z_index).map_err(SchemaReadError::table(TABLE))?;
        for field in read_attribute_fields(connection, &layer.name)? {
            registry.push(&mut layer.attribute_fields, field);
        }
        layers.push(layer);
        z_index += 1;
    }
    Ok(layers)
}

fn layer_from_row(row: &Row<'_>, z_index: i64) -> rusqlite::Result<FeatureLayer> {
    let name = text(row, "name")?;
    let label_field = text(row, "label_field")?;
    Ok(FeatureLayer {
        id: name.clone(),
        group_name: text(row, "group_name")?,
        geometry_type: GeometryType::from_code(&text(row, "geom_type")?),
        point_shape: PointShape::from_code(&text(row, "point_symbol")?),
        color: integer(row, "color")?,
        fill_color: integer(row, "fill_color")?,
        line_width: real(row, "line_width")?,
        label_field_id: if label_field.is_empty() {
            String::new()
        } else {
            field_id(&name, &label_field)
        },
        active: flag(row, "active")?,
        drawn: flag(row, "drawn")?,
        png_symbol: blob(row, "png_symbol")?,
        z_index,
        attribute_fields: Vec::new(),
        name,
    })
}

fn read_attribute_fields(
    connection: &Connection,
    layer_name: &str,
) -> Result<Vec<AttributeField>, SchemaReadError> {
    const TABLE: &str = "attribute_fields";
    let mut statement = connection
        .prepare_cached("SELECT * FROM attribute_fields WHERE layer_name = ?1")
        .map_err(SchemaReadError::table(TABLE))?;
    statement
        .query_map([layer_name], |row| {
            let field_name = text(row, "field_name")?;
            Ok(AttributeField {
                id: field_id(layer_name, &field_name),
                layer_id: layer_name.to_owned(),
                data_type: AttributeType::from_code(&text(row, "data_type")?),
                choices: decode_choices(&text(row, "field_choices")?),
                field_name,
            })
        })
        .map_err(SchemaReadError::table(TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(SchemaReadError::table(TABLE))
}

fn read_features(
    connection: &Connection,
    project: &Project,
) -> Result<Vec<Feature>, SchemaReadError> {
    const TABLE: &str = "features";
    let mut statement = connection
        .prepare("SELECT * FROM features ORDER BY rowid")
        .map_err(SchemaReadError::table(TABLE))?;
    let mut rows = statement.query([]).map_err(SchemaReadError::table(TABLE))?;
    let mut features = Vec::new();
    while let Some(row) = rows.next().map_err(SchemaReadError::table(TABLE))? {
        let fid = integer(row, "fid").map_err(SchemaReadError::table(TABLE))?;
        let mut feature = feature_from_row(row, fid).map_err(SchemaReadError::table(TABLE))?;
        let layer = project.layer(&feature.layer_id);
        if layer.is_none() {
            warn!(
                "Feature {} references unknown layer {}; treating it as a point",
                feature.id, feature.layer_id
            );
        }
        feature.geometry_type = project.geometry_type_for_layer(&feature.layer_id);
        feature.points = read_points(connection, fid, &feature.id)?;
        feature.attribute_values = read_attribute_values(connection, fid, &feature, layer)?;
        features.push(feature);
    }
    Ok(features)
}

fn feature_from_row(row: &Row<'_>, fid: i64) -> rusqlite::Result<Feature> {
    Ok(Feature {
        id: fid.to_string(),
        layer_id: text(row, "layer_name")?,
        name: text(row, "name")?,
        feature_number: fid,
        remarks: text(row, "remarks")?,
        ..Feature::default()
    })
}

fn read_points(
    connection: &Connection,
    fid: i64,
    owner_id: &str,
) -> Result<Vec<Point>, SchemaReadError> {
    const TABLE: &str = "points";
    let mut statement = connection
        .prepare_cached("SELECT rowid, * FROM points WHERE fid = ?1 ORDER BY seq, rowid")
        .map_err(SchemaReadError::table(TABLE))?;
    statement
        .query_map([fid], |row| {
            let seq = integer(row, "seq")?;
            Ok(Point {
                id: point_id(owner_id, row.get(0)?),
                feature_id: owner_id.to_owned(),
                seq,
                latitude: real(row, "lat")?,
                longitude: real(row, "lon")?,
                elevation: real(row, "elv")?,
                time: integer(row, "time")?,
                instrument_height: real(row, "instrument_ht")?,
                fix_quality: integer(row, "fix_quality")?,
                speed: real(row, "speed")?,
                ..Point::default()
            })
        })
        .map_err(SchemaReadError::table(TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(SchemaReadError::table(TABLE))
}

/// Values are keyed by field name; the data type comes from the layer's
/// field definition and falls back to text for unknown fields.
fn read_attribute_values(
    connection: &Connection,
    fid: i64,
    feature: &Feature,
    layer: Option<&FeatureLayer>,
) -> Result<Vec<AttributeValue>, SchemaReadError> {
    const TABLE: &str = "attribute_values";
    let mut statement = connection
        .prepare_cached("SELECT * FROM attribute_values WHERE fid = ?1")
        .map_err(SchemaReadError::table(TABLE))?;
    statement
        .query_map([fid], |row| {
            let id = field_id(&feature.layer_id, &text(row, "field_name")?);
            let data_type = layer
                .and_then(|found| found.attribute_field(&id))
                .map_or(AttributeType::Text, |field| field.data_type);
            Ok(AttributeValue {
                feature_id: feature.id.clone(),
                field_id: id,
                value: text(row, "value")?,
                data_type,
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
        .prepare("SELECT * FROM tracks ORDER BY rowid")
        .map_err(SchemaReadError::table(TABLE))?;
    let mut rows = statement.query([]).map_err(SchemaReadError::table(TABLE))?;
    let mut tracks = Vec::new();
    while let Some(row) = rows.next().map_err(SchemaReadError::table(TABLE))? {
        let track_id = integer(row, "id").map_err(SchemaReadError::table(TABLE))?;
        let mut track = Track {
            id: format!("track-{track_id}"),
            name: text(row, "name").map_err(SchemaReadError::table(TABLE))?,
            color: integer(row, "color").map_err(SchemaReadError::table(TABLE))?,
            remarks: text(row, "description").map_err(SchemaReadError::table(TABLE))?,
            vertices: Vec::new(),
        };
        track.vertices = read_track_points(connection, track_id, &track.id)?;
        tracks.push(track);
    }
    Ok(tracks)
}

fn read_track_points(
    connection: &Connection,
    track_id: i64,
    owner_id: &str,
) -> Result<Vec<Point>, SchemaReadError> {
    const TABLE: &str = "track_points";
    let mut statement = connection
        .prepare_cached(
            "SELECT rowid, * FROM track_points WHERE track_id = ?1 ORDER BY seq, rowid",
        )
        .map_err(SchemaReadError::table(TABLE))?;
    statement
        .query_map([track_id], |row| {
            let seq = integer(row, "seq")?;
            Ok(Point {
                id: point_id(owner_id, row.get(0)?),
                feature_id: owner_id.to_owned(),
                seq,
                latitude: real(row, "lat")?,
                longitude: real(row, "lon")?,
                elevation: real(row, "elv")?,
                time: integer(row, "time")?,
                speed: real(row, "speed")?,
                fix_quality: integer(row, "fix_quality")?,
                ..Point::default()
            })
        })
        .map_err(SchemaReadError::table(TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(SchemaReadError::table(TABLE))
}

fn read_photo_points(connection: &Connection) -> Result<Vec<PhotoPoint>, SchemaReadError> {
    const TABLE: &str = "photos";
    let mut statement = connection
        .prepare("SELECT * FROM photos ORDER BY rowid")
        .map_err(SchemaReadError::table(TABLE))?;
    statement
        .query_map([], photo_from_row)
        .map_err(SchemaReadError::table(TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(SchemaReadError::table(TABLE))
}

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<PhotoPoint> {
    let id = format!("photo-{}", integer(row, "id")?);
    let location = Point {
        id: format!("{id}:0"),
        feature_id: id.clone(),
        seq: 0,
        latitude: real(row, "lat")?,
        longitude: real(row, "lon")?,
        elevation: real(row, "elv")?,
        time: integer(row, "time")?,
        ..Point::default()
    };
    Ok(PhotoPoint {
        remarks: text(row, "remarks")?,
        file_name: text(row, "photo_path")?,
        location: Some(location),
        id,
    })
}
