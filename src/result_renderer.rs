//! Result renderer
//!
//! Turns one `SearchResponse` into overlays on the map surface. Sub-renders
//! are independent: a malformed sub-field is logged and skipped without
//! failing the rest. Draw order keeps candidate points on top: zones first,
//! then graph nodes, then graph edges, then points.

use crate::geometry::{LatLon, NodeId, SearchGraph, SearchResponse, ZonePolygon};
use crate::map_surface::{CircleStyle, MapSurface, Overlay, StrokeStyle};
use crate::overlay_registry::OverlayRegistry;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Hard cap on polylines drawn for one graph; anything beyond is dropped.
pub const MAX_RENDERED_EDGES: usize = 10_000;

const ZONE_WEIGHT: u32 = 2;
const ZONE_OPACITY: f64 = 0.1;

const POINT_RADIUS_PX: u32 = 5;
const POINT_FILL_OPACITY: f64 = 0.6;

/// Road-graph debug overlay styling.
const GRAPH_COLOR: &str = "#0000ff";
const NODE_RADIUS_PX: u32 = 3;
const NODE_FILL_OPACITY: f64 = 0.4;
const EDGE_WEIGHT: u32 = 1;
const EDGE_OPACITY: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub point_color: String,
    pub zone_color: String,
    /// Draw the `validZone` polygon as well (`zpp` always draws).
    pub show_valid_zone: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            point_color: "#ff0000".to_string(),
            zone_color: "#3388ff".to_string(),
            show_valid_zone: true,
        }
    }
}

/// What one render pass actually drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub zones: usize,
    pub points: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub skipped_edges: usize,
}

impl RenderStats {
    pub fn total(&self) -> usize {
        self.zones + self.points + self.graph_nodes + self.graph_edges
    }
}

pub struct ResultRenderer;

impl ResultRenderer {
    pub fn render(
        response: &SearchResponse,
        options: &RenderOptions,
        surface: &mut dyn MapSurface,
        registry: &mut OverlayRegistry,
    ) -> RenderStats {
        let mut stats = RenderStats::default();

        if let Some(zone) = &response.zpp {
            stats.zones += Self::render_zone(zone, "zpp", options, surface, registry);
        }
        if options.show_valid_zone {
            if let Some(zone) = &response.valid_zone {
                stats.zones += Self::render_zone(zone, "validZone", options, surface, registry);
            }
        }
        if let Some(graph) = &response.graph {
            Self::render_graph(graph, surface, registry, &mut stats);
        }
        if let Some(points) = &response.points {
            for point in points {
                let id = surface.add_overlay(Overlay::Circle {
                    position: *point,
                    style: CircleStyle {
                        color: options.point_color.clone(),
                        fill_color: options.point_color.clone(),
                        fill_opacity: POINT_FILL_OPACITY,
                        radius_px: POINT_RADIUS_PX,
                    },
                });
                registry.track(id);
            }
            stats.points = points.len();
        }

        debug!(
            target: "render",
            "drew {} zone(s), {} node(s), {} edge(s), {} point(s)",
            stats.zones, stats.graph_nodes, stats.graph_edges, stats.points
        );
        stats
    }

    fn render_zone(
        zone: &ZonePolygon,
        label: &str,
        options: &RenderOptions,
        surface: &mut dyn MapSurface,
        registry: &mut OverlayRegistry,
    ) -> usize {
        if !zone.is_polygon() {
            warn!(
                target: "render",
                "{} geometry type {:?} is not a polygon, skipping",
                label, zone.geometry_type
            );
            return 0;
        }
        if zone.coordinates.is_empty() {
            warn!(target: "render", "{} has no rings, skipping", label);
            return 0;
        }

        // Ring coordinates arrive longitude-first; the surface wants
        // latitude-first.
        let rings: Vec<Vec<LatLon>> = zone
            .coordinates
            .iter()
            .map(|ring| ring.iter().map(|pair| pair.to_lat_lon()).collect())
            .collect();

        let id = surface.add_overlay(Overlay::Polygon {
            rings,
            style: StrokeStyle {
                color: options.zone_color.clone(),
                weight: ZONE_WEIGHT,
                opacity: ZONE_OPACITY,
            },
        });
        registry.track(id);
        1
    }

    fn render_graph(
        graph: &SearchGraph,
        surface: &mut dyn MapSurface,
        registry: &mut OverlayRegistry,
        stats: &mut RenderStats,
    ) {
        for node in &graph.nodes {
            let id = surface.add_overlay(Overlay::Circle {
                position: node.position(),
                style: CircleStyle {
                    color: GRAPH_COLOR.to_string(),
                    fill_color: GRAPH_COLOR.to_string(),
                    fill_opacity: NODE_FILL_OPACITY,
                    radius_px: NODE_RADIUS_PX,
                },
            });
            registry.track(id);
        }
        stats.graph_nodes = graph.nodes.len();

        // Built once per render; resolving each edge against the node list
        // would be quadratic on real road graphs.
        let index: HashMap<&NodeId, LatLon> = graph
            .nodes
            .iter()
            .map(|node| (&node.id, node.position()))
            .collect();

        let mut drawn = 0usize;
        let mut unresolved = 0usize;
        for edge in &graph.edges {
            if drawn == MAX_RENDERED_EDGES {
                let dropped = graph.edges.len() - drawn - unresolved;
                warn!(
                    target: "render",
                    "edge cap {} reached, dropping {} edge(s)",
                    MAX_RENDERED_EDGES, dropped
                );
                stats.skipped_edges += dropped;
                break;
            }
            let (Some(source), Some(target)) =
                (index.get(&edge.source), index.get(&edge.target))
            else {
                debug!(
                    target: "render",
                    "edge {} -> {} references a missing node, skipping",
                    edge.source, edge.target
                );
                unresolved += 1;
                continue;
            };
            let id = surface.add_overlay(Overlay::Polyline {
                path: vec![*source, *target],
                style: StrokeStyle {
                    color: GRAPH_COLOR.to_string(),
                    weight: EDGE_WEIGHT,
                    opacity: EDGE_OPACITY,
                },
            });
            registry.track(id);
            drawn += 1;
        }
        stats.graph_edges = drawn;
        stats.skipped_edges += unresolved;
    }
}
