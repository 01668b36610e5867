//! Map surface capability
//!
//! The renderer and the reset controller never talk to a concrete map
//! widget; they go through the `MapSurface` trait. `HeadlessMapSurface` is
//! the in-memory implementation behind the terminal front end and the tests.

use crate::geometry::LatLon;
use std::fmt;

/// Handle to one drawn overlay, unique per surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Marker,
    CircleMarker,
    Polyline,
    Polygon,
}

/// Styling for filled circle markers, web-map option names.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleStyle {
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub radius_px: u32,
}

/// Stroke styling shared by polylines and polygon outlines.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Address pin.
    Marker { position: LatLon },
    Circle {
        position: LatLon,
        style: CircleStyle,
    },
    Polyline {
        path: Vec<LatLon>,
        style: StrokeStyle,
    },
    /// Ring 0 is the outer boundary, later rings are holes.
    Polygon {
        rings: Vec<Vec<LatLon>>,
        style: StrokeStyle,
    },
}

impl Overlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::Marker { .. } => OverlayKind::Marker,
            Overlay::Circle { .. } => OverlayKind::CircleMarker,
            Overlay::Polyline { .. } => OverlayKind::Polyline,
            Overlay::Polygon { .. } => OverlayKind::Polygon,
        }
    }
}

pub trait MapSurface {
    /// Recenter and zoom in one step.
    fn set_view(&mut self, center: LatLon, zoom: u8);

    fn add_overlay(&mut self, overlay: Overlay) -> OverlayId;

    /// Returns false when the id is unknown (already removed).
    fn remove_overlay(&mut self, id: OverlayId) -> bool;

    /// Ids of every overlay whose kind satisfies the predicate.
    fn find_overlays(&self, predicate: &dyn Fn(OverlayKind) -> bool) -> Vec<OverlayId>;
}

/// In-memory surface with monotonic ids. Insertion order is draw order,
/// so later overlays sit visually on top.
#[derive(Debug, Default)]
pub struct HeadlessMapSurface {
    next_id: u64,
    view: Option<(LatLon, u8)>,
    overlays: Vec<(OverlayId, Overlay)>,
}

impl HeadlessMapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<(LatLon, u8)> {
        self.view
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter().map(|(_, overlay)| overlay)
    }

    pub fn count_of(&self, kind: OverlayKind) -> usize {
        self.overlays
            .iter()
            .filter(|(_, overlay)| overlay.kind() == kind)
            .count()
    }
}

impl MapSurface for HeadlessMapSurface {
    fn set_view(&mut self, center: LatLon, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn add_overlay(&mut self, overlay: Overlay) -> OverlayId {
        self.next_id += 1;
        let id = OverlayId(self.next_id);
        self.overlays.push((id, overlay));
        id
    }

    fn remove_overlay(&mut self, id: OverlayId) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|(existing, _)| *existing != id);
        self.overlays.len() != before
    }

    fn find_overlays(&self, predicate: &dyn Fn(OverlayKind) -> bool) -> Vec<OverlayId> {
        self.overlays
            .iter()
            .filter(|(_, overlay)| predicate(overlay.kind()))
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_at(lat: f64, lon: f64) -> Overlay {
        Overlay::Marker {
            position: LatLon::new(lat, lon),
        }
    }

    #[test]
    fn ids_are_unique_and_removal_reports_membership() {
        let mut surface = HeadlessMapSurface::new();
        let a = surface.add_overlay(marker_at(48.0, 2.0));
        let b = surface.add_overlay(marker_at(48.1, 2.1));
        assert_ne!(a, b);
        assert_eq!(surface.overlay_count(), 2);

        assert!(surface.remove_overlay(a));
        assert!(!surface.remove_overlay(a));
        assert_eq!(surface.overlay_count(), 1);
    }

    #[test]
    fn find_overlays_filters_by_kind() {
        let mut surface = HeadlessMapSurface::new();
        surface.add_overlay(marker_at(48.0, 2.0));
        let polygon = surface.add_overlay(Overlay::Polygon {
            rings: vec![vec![LatLon::new(48.0, 2.0)]],
            style: StrokeStyle {
                color: "#3388ff".to_string(),
                weight: 2,
                opacity: 0.1,
            },
        });

        let found = surface.find_overlays(&|kind| kind == OverlayKind::Polygon);
        assert_eq!(found, vec![polygon]);
    }

    #[test]
    fn set_view_replaces_the_previous_view() {
        let mut surface = HeadlessMapSurface::new();
        surface.set_view(LatLon::new(48.8566, 2.3522), 12);
        surface.set_view(LatLon::new(43.6, 1.44), 10);
        assert_eq!(surface.view(), Some((LatLon::new(43.6, 1.44), 10)));
    }
}
