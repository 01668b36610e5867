use epervier_cli::geometry::{GraphEdge, GraphNode, LatLon, NodeId, SearchGraph, SearchResponse};
use epervier_cli::map_surface::{HeadlessMapSurface, Overlay, OverlayKind};
use epervier_cli::overlay_registry::OverlayRegistry;
use epervier_cli::result_renderer::{RenderOptions, ResultRenderer, MAX_RENDERED_EDGES};
use serde_json::json;

fn parse(value: serde_json::Value) -> SearchResponse {
    serde_json::from_value(value).unwrap()
}

fn full_payload() -> SearchResponse {
    parse(json!({
        "points": [[48.1, 2.1], [48.2, 2.2]],
        "zpp": {
            "type": "Polygon",
            "coordinates": [[[2.0, 48.0], [2.5, 48.0], [2.0, 48.0]]]
        },
        "validZone": {
            "type": "Polygon",
            "coordinates": [[[2.0, 48.0], [2.9, 48.0], [2.0, 48.0]]]
        },
        "graph": {
            "nodes": [
                {"id": 1, "lat": 48.3, "lon": 2.3},
                {"id": 2, "lat": 48.4, "lon": 2.4}
            ],
            "edges": [{"source": 1, "target": 2}]
        },
        "dt": 1.0
    }))
}

#[test]
fn full_payload_draws_every_overlay_kind() {
    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();

    let stats = ResultRenderer::render(
        &full_payload(),
        &RenderOptions::default(),
        &mut surface,
        &mut registry,
    );

    assert_eq!(stats.zones, 2);
    assert_eq!(stats.points, 2);
    assert_eq!(stats.graph_nodes, 2);
    assert_eq!(stats.graph_edges, 1);
    assert_eq!(stats.skipped_edges, 0);
    assert_eq!(stats.total(), 7);

    assert_eq!(surface.count_of(OverlayKind::Polygon), 2);
    assert_eq!(surface.count_of(OverlayKind::Polyline), 1);
    // two graph nodes plus two candidate points
    assert_eq!(surface.count_of(OverlayKind::CircleMarker), 4);
    assert_eq!(surface.overlay_count(), 7);

    // every drawn overlay is tracked for the next reset
    assert_eq!(registry.len(), surface.overlay_count());
}

#[test]
fn absent_fields_draw_nothing() {
    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();

    let stats = ResultRenderer::render(
        &parse(json!({"dt": 0.5})),
        &RenderOptions::default(),
        &mut surface,
        &mut registry,
    );

    assert_eq!(stats.total(), 0);
    assert_eq!(surface.overlay_count(), 0);
    assert!(registry.is_empty());
}

#[test]
fn points_draw_after_zones_so_they_sit_on_top() {
    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();

    let response = parse(json!({
        "points": [[48.1, 2.1]],
        "zpp": {
            "type": "Polygon",
            "coordinates": [[[2.0, 48.0], [2.5, 48.0], [2.0, 48.0]]]
        }
    }));
    ResultRenderer::render(&response, &RenderOptions::default(), &mut surface, &mut registry);

    let kinds: Vec<OverlayKind> = surface.overlays().map(|overlay| overlay.kind()).collect();
    assert_eq!(kinds.first(), Some(&OverlayKind::Polygon));
    assert_eq!(kinds.last(), Some(&OverlayKind::CircleMarker));
}

#[test]
fn styles_come_from_the_render_options() {
    let options = RenderOptions {
        point_color: "#00ff00".to_string(),
        zone_color: "#123456".to_string(),
        show_valid_zone: true,
    };

    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();
    let response = parse(json!({
        "points": [[48.1, 2.1]],
        "zpp": {
            "type": "Polygon",
            "coordinates": [[[2.0, 48.0], [2.5, 48.0], [2.0, 48.0]]]
        }
    }));
    ResultRenderer::render(&response, &options, &mut surface, &mut registry);

    let polygon_style = surface
        .overlays()
        .find_map(|overlay| match overlay {
            Overlay::Polygon { style, .. } => Some(style.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(polygon_style.color, "#123456");
    assert_eq!(polygon_style.weight, 2);
    assert_eq!(polygon_style.opacity, 0.1);

    let point_style = surface
        .overlays()
        .find_map(|overlay| match overlay {
            Overlay::Circle { style, .. } => Some(style.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(point_style.fill_color, "#00ff00");
    assert_eq!(point_style.fill_opacity, 0.6);
    assert_eq!(point_style.radius_px, 5);
}

#[test]
fn valid_zone_rendering_can_be_turned_off() {
    let options = RenderOptions {
        show_valid_zone: false,
        ..RenderOptions::default()
    };

    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();
    let stats = ResultRenderer::render(&full_payload(), &options, &mut surface, &mut registry);

    // the ZPP still draws, only the validZone is gated
    assert_eq!(stats.zones, 1);
    assert_eq!(surface.count_of(OverlayKind::Polygon), 1);
}

#[test]
fn malformed_zones_are_skipped_without_failing_the_rest() {
    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();

    let response = parse(json!({
        "points": [[48.1, 2.1]],
        "zpp": {
            "type": "MultiPolygon",
            "coordinates": [[[2.0, 48.0], [2.5, 48.0], [2.0, 48.0]]]
        },
        "validZone": {"type": "Polygon", "coordinates": []}
    }));
    let stats = ResultRenderer::render(
        &response,
        &RenderOptions::default(),
        &mut surface,
        &mut registry,
    );

    assert_eq!(stats.zones, 0);
    assert_eq!(surface.count_of(OverlayKind::Polygon), 0);
    assert_eq!(stats.points, 1);
}

#[test]
fn hole_rings_survive_into_the_polygon_overlay() {
    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();

    let response = parse(json!({
        "zpp": {
            "type": "Polygon",
            "coordinates": [
                [[2.0, 48.0], [2.5, 48.0], [2.0, 48.0]],
                [[2.15, 48.12], [2.16, 48.12], [2.15, 48.12]]
            ]
        }
    }));
    ResultRenderer::render(&response, &RenderOptions::default(), &mut surface, &mut registry);

    let rings = surface
        .overlays()
        .find_map(|overlay| match overlay {
            Overlay::Polygon { rings, .. } => Some(rings.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(rings.len(), 2);

    // ring pairs arrive longitude-first and come out latitude-first
    assert_eq!(rings[0][0], LatLon::new(48.0, 2.0));
    assert_eq!(rings[1][0], LatLon::new(48.12, 2.15));
}

#[test]
fn edges_with_missing_endpoints_are_skipped() {
    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();

    let response = parse(json!({
        "graph": {
            "nodes": [{"id": 1, "lat": 48.3, "lon": 2.3}],
            "edges": [{"source": 1, "target": 99}]
        }
    }));
    let stats = ResultRenderer::render(
        &response,
        &RenderOptions::default(),
        &mut surface,
        &mut registry,
    );

    assert_eq!(stats.graph_nodes, 1);
    assert_eq!(stats.graph_edges, 0);
    assert_eq!(stats.skipped_edges, 1);
    assert_eq!(surface.count_of(OverlayKind::Polyline), 0);
}

#[test]
fn edge_cap_bounds_the_polyline_count() {
    let nodes = vec![
        GraphNode {
            id: NodeId::Number(1),
            lat: 48.0,
            lon: 2.0,
        },
        GraphNode {
            id: NodeId::Number(2),
            lat: 48.1,
            lon: 2.1,
        },
    ];
    let edges = (0..MAX_RENDERED_EDGES + 50)
        .map(|_| GraphEdge {
            source: NodeId::Number(1),
            target: NodeId::Number(2),
        })
        .collect();
    let response = SearchResponse {
        graph: Some(SearchGraph { nodes, edges }),
        ..SearchResponse::default()
    };

    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();
    let stats = ResultRenderer::render(
        &response,
        &RenderOptions::default(),
        &mut surface,
        &mut registry,
    );

    assert_eq!(stats.graph_edges, MAX_RENDERED_EDGES);
    assert_eq!(stats.skipped_edges, 50);
    assert_eq!(surface.count_of(OverlayKind::Polyline), MAX_RENDERED_EDGES);
}

#[test]
fn legacy_bare_array_payload_renders_points() {
    let response: SearchResponse = serde_json::from_str("[[48.85, 2.35], [48.86, 2.36]]").unwrap();

    let mut surface = HeadlessMapSurface::new();
    let mut registry = OverlayRegistry::new();
    let stats = ResultRenderer::render(
        &response,
        &RenderOptions::default(),
        &mut surface,
        &mut registry,
    );

    assert_eq!(stats.points, 2);
    assert_eq!(surface.count_of(OverlayKind::CircleMarker), 2);
    assert_eq!(surface.count_of(OverlayKind::Polygon), 0);
}
