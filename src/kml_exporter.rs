//! KML exporter
//!
//! Pure serialization of the last search result: one placemark per
//! candidate point plus one zone placemark whose polygon carries an outer
//! boundary and a hole. No I/O happens here; the caller decides where the
//! document goes.

use crate::geometry::{LatLon, LonLat, ZonePolygon};

const DOCUMENT_NAME: &str = "Epeire";
const ZONE_PLACEMARK_NAME: &str = "ZPP";

pub struct KmlExporter;

impl KmlExporter {
    /// Serializes candidate points and the zone polygon. KML wants
    /// longitude first, so the latitude-first point storage is swapped on
    /// output while zone rings pass through unchanged.
    pub fn export(points: &[LatLon], zone: &ZonePolygon) -> String {
        let mut kml = String::new();
        kml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        kml.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
        kml.push_str("  <Document>\n");
        kml.push_str(&format!("    <name>{}</name>\n", DOCUMENT_NAME));

        for (i, point) in points.iter().enumerate() {
            kml.push_str("    <Placemark>\n");
            kml.push_str(&format!("      <name>Point {}</name>\n", i + 1));
            kml.push_str("      <Point>\n");
            kml.push_str(&format!(
                "        <coordinates>{},{},0</coordinates>\n",
                point.lon, point.lat
            ));
            kml.push_str("      </Point>\n");
            kml.push_str("    </Placemark>\n");
        }

        kml.push_str("    <Placemark>\n");
        kml.push_str(&format!("      <name>{}</name>\n", ZONE_PLACEMARK_NAME));
        kml.push_str("      <Polygon>\n");
        kml.push_str("        <outerBoundaryIs>\n");
        kml.push_str("          <LinearRing>\n");
        kml.push_str(&format!(
            "            <coordinates>{}</coordinates>\n",
            Self::ring_coordinates(zone.outer_ring())
        ));
        kml.push_str("          </LinearRing>\n");
        kml.push_str("        </outerBoundaryIs>\n");
        kml.push_str("        <innerBoundaryIs>\n");
        kml.push_str("          <LinearRing>\n");
        kml.push_str(&format!(
            "            <coordinates>{}</coordinates>\n",
            Self::ring_coordinates(zone.hole_ring())
        ));
        kml.push_str("          </LinearRing>\n");
        kml.push_str("        </innerBoundaryIs>\n");
        kml.push_str("      </Polygon>\n");
        kml.push_str("    </Placemark>\n");
        kml.push_str("  </Document>\n");
        kml.push_str("</kml>\n");
        kml
    }

    // An absent ring becomes an empty block so the document structure never
    // varies with the payload.
    fn ring_coordinates(ring: Option<&[LonLat]>) -> String {
        ring.unwrap_or(&[])
            .iter()
            .map(|pair| format!("{},{},0", pair.lon, pair.lat))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
