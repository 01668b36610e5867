use epervier_cli::geometry::{LatLon, ZonePolygon};
use epervier_cli::kml_exporter::KmlExporter;
use serde_json::json;

fn zone(value: serde_json::Value) -> ZonePolygon {
    serde_json::from_value(value).unwrap()
}

#[test]
fn export_swaps_axes_and_emits_both_boundaries() {
    let points = vec![LatLon::new(48.1, 2.1)];
    let zone = zone(json!({
        "type": "Polygon",
        "coordinates": [
            [[2.1, 48.1], [2.2, 48.1], [2.1, 48.1]],
            [[2.15, 48.12], [2.15, 48.12]]
        ]
    }));

    let kml = KmlExporter::export(&points, &zone);

    // Point storage is latitude-first; KML wants longitude first.
    assert!(kml.contains("<coordinates>2.1,48.1,0</coordinates>"));

    // Ring coordinates pass through in their native longitude-first order.
    assert!(kml.contains("<coordinates>2.1,48.1,0 2.2,48.1,0 2.1,48.1,0</coordinates>"));
    assert!(kml.contains("<coordinates>2.15,48.12,0 2.15,48.12,0</coordinates>"));

    assert!(kml.contains("<name>Epeire</name>"));
    assert!(kml.contains("<name>Point 1</name>"));
    assert!(kml.contains("<name>ZPP</name>"));

    let outer = kml.find("<outerBoundaryIs>").unwrap();
    let inner = kml.find("<innerBoundaryIs>").unwrap();
    assert!(outer < inner);
}

#[test]
fn points_are_numbered_from_one() {
    let points = vec![LatLon::new(48.1, 2.1), LatLon::new(48.2, 2.2)];
    let kml = KmlExporter::export(&points, &ZonePolygon::default());

    assert!(kml.contains("<name>Point 1</name>"));
    assert!(kml.contains("<name>Point 2</name>"));
    assert!(kml.contains("<coordinates>2.2,48.2,0</coordinates>"));
}

#[test]
fn hole_less_zone_still_emits_an_inner_boundary_block() {
    let zone = zone(json!({
        "type": "Polygon",
        "coordinates": [[[2.1, 48.1], [2.2, 48.1], [2.1, 48.1]]]
    }));

    let kml = KmlExporter::export(&[], &zone);

    assert!(kml.contains("<innerBoundaryIs>"));
    assert!(kml.contains("<coordinates></coordinates>"));
}

#[test]
fn empty_inputs_produce_a_stable_skeleton() {
    let kml = KmlExporter::export(&[], &ZonePolygon::default());

    assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(kml.contains("<name>Epeire</name>"));
    assert!(kml.contains("<name>ZPP</name>"));
    assert!(!kml.contains("<name>Point 1</name>"));

    // Both rings render as empty coordinate blocks.
    assert_eq!(kml.matches("<coordinates></coordinates>").count(), 2);
    assert!(kml.trim_end().ends_with("</kml>"));
}
