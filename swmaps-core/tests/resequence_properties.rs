//! Property tests for point resequencing and field-name resolution.

use proptest::prelude::*;
use swmaps_core::{AttributeField, AttributeValue, Feature, FeatureLayer, Point, Project, Track};

fn points_from(stored: &[i64], owner: &str) -> Vec<Point> {
    stored
        .iter()
        .enumerate()
        .map(|(index, seq)| Point {
            id: format!("p{index}"),
            feature_id: owner.to_owned(),
            seq: *seq,
            time: i64::try_from(index).unwrap_or(i64::MAX),
            ..Point::default()
        })
        .collect()
}

/// Reference ordering: stable sort of read positions by stored sequence.
fn expected_order(stored: &[i64]) -> Vec<String> {
    let mut indexed: Vec<(usize, i64)> = stored.iter().copied().enumerate().collect();
    indexed.sort_by_key(|(_, seq)| *seq);
    indexed
        .into_iter()
        .map(|(index, _)| format!("p{index}"))
        .collect()
}

proptest! {
    #[test]
    fn feature_points_are_numbered_densely(stored in prop::collection::vec(-5_i64..50, 0..40)) {
        let mut project = Project::default();
        project.features.push(Feature {
            id: "F1".into(),
            points: points_from(&stored, "elsewhere"),
            ..Feature::default()
        });

        project.normalise();

        let points = &project.features[0].points;
        let seqs: Vec<i64> = points.iter().map(|point| point.seq).collect();
        let dense: Vec<i64> = (0_i64..).take(stored.len()).collect();
        prop_assert_eq!(seqs, dense);
        let ids: Vec<String> = points.iter().map(|point| point.id.clone()).collect();
        prop_assert_eq!(ids, expected_order(&stored));
        prop_assert!(points.iter().all(|point| point.feature_id == "F1"));
    }

    #[test]
    fn track_normalisation_is_idempotent(stored in prop::collection::vec(0_i64..20, 0..30)) {
        let mut project = Project::default();
        project.tracks.push(Track {
            id: "T1".into(),
            vertices: points_from(&stored, "T0"),
            ..Track::default()
        });

        project.normalise();
        let once = project.clone();
        project.normalise();

        prop_assert_eq!(project, once);
    }

    #[test]
    fn field_names_match_layer_schema(field_ids in prop::collection::vec("[ab][0-3]", 0..10)) {
        let mut project = Project::default();
        project.feature_layers.push(FeatureLayer {
            id: "L1".into(),
            attribute_fields: (0..4)
                .map(|n| AttributeField {
                    id: format!("a{n}"),
                    layer_id: "L1".into(),
                    field_name: format!("Field {n}"),
                    ..AttributeField::default()
                })
                .collect(),
            ..FeatureLayer::default()
        });
        project.features.push(Feature {
            id: "F1".into(),
            layer_id: "L1".into(),
            attribute_values: field_ids
                .iter()
                .map(|field_id| AttributeValue {
                    feature_id: "F1".into(),
                    field_id: field_id.clone(),
                    ..AttributeValue::default()
                })
                .collect(),
            ..Feature::default()
        });

        project.normalise();

        for value in &project.features[0].attribute_values {
            let expected = value
                .field_id
                .strip_prefix('a')
                .map(|n| format!("Field {n}"))
                .unwrap_or_default();
            prop_assert_eq!(&value.field_name, &expected);
        }
    }
}
