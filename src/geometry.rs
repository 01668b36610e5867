//! Wire model for the search backend's payloads
//!
//! The backend speaks GeoJSON-flavoured JSON with two different axis orders:
//! bare point arrays are latitude-first while polygon rings are
//! longitude-first. Each order gets its own type so a swapped pair cannot
//! slip through as a plain `[f64; 2]`.

use serde::Deserialize;
use std::fmt;

/// A position with latitude first, the map surface convention.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for LatLon {
    fn from(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[0],
            lon: pair[1],
        }
    }
}

/// A position with longitude first, the polygon ring convention.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Swap into the map surface convention.
    pub fn to_lat_lon(self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(pair: [f64; 2]) -> Self {
        Self {
            lon: pair[0],
            lat: pair[1],
        }
    }
}

/// A zone polygon in GeoJSON form. `coordinates[0]` is the outer boundary;
/// `coordinates[1]`, when present, is the hole punched out of it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZonePolygon {
    #[serde(rename = "type", default = "polygon_type")]
    pub geometry_type: String,
    #[serde(default)]
    pub coordinates: Vec<Vec<LonLat>>,
}

fn polygon_type() -> String {
    "Polygon".to_string()
}

impl Default for ZonePolygon {
    fn default() -> Self {
        Self {
            geometry_type: polygon_type(),
            coordinates: Vec::new(),
        }
    }
}

impl ZonePolygon {
    pub fn is_polygon(&self) -> bool {
        self.geometry_type == "Polygon"
    }

    pub fn outer_ring(&self) -> Option<&[LonLat]> {
        self.coordinates.first().map(|ring| ring.as_slice())
    }

    pub fn hole_ring(&self) -> Option<&[LonLat]> {
        self.coordinates.get(1).map(|ring| ring.as_slice())
    }
}

/// Node identifiers arrive as integers from one backend revision and as
/// strings from another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Name(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Number(n) => write!(f, "{n}"),
            NodeId::Name(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

impl GraphNode {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchGraph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// One `/submit` response. Every field is optional on the wire, and old
/// backend revisions answered with a bare point array instead of an object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResponse {
    pub points: Option<Vec<LatLon>>,
    pub zpp: Option<ZonePolygon>,
    pub valid_zone: Option<ZonePolygon>,
    pub graph: Option<SearchGraph>,
    pub elapsed_seconds: f64,
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct StructuredResponse {
    #[serde(default)]
    points: Option<Vec<LatLon>>,
    #[serde(default)]
    zpp: Option<ZonePolygon>,
    #[serde(default, alias = "validZone")]
    valid_zone: Option<ZonePolygon>,
    #[serde(default)]
    graph: Option<SearchGraph>,
    #[serde(default, rename = "dt", alias = "elapsedSeconds")]
    elapsed_seconds: f64,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Legacy(Vec<LatLon>),
    Structured(StructuredResponse),
}

impl<'de> Deserialize<'de> for SearchResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match WireResponse::deserialize(deserializer)? {
            WireResponse::Legacy(points) => SearchResponse {
                points: Some(points),
                ..SearchResponse::default()
            },
            WireResponse::Structured(s) => SearchResponse {
                points: s.points,
                zpp: s.zpp,
                valid_zone: s.valid_zone,
                graph: s.graph,
                elapsed_seconds: s.elapsed_seconds,
                error: s.error,
            },
        })
    }
}
