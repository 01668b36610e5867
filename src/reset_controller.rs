use crate::map_surface::{MapSurface, OverlayKind};
use crate::overlay_registry::OverlayRegistry;
use tracing::{debug, info};

/// Clears everything a render pass put on the map. Removes the registered
/// overlays first, then sweeps the surface for polygon-kind overlays so a
/// zone layer drawn outside the registry cannot survive a reset.
pub struct ResetController;

impl ResetController {
    pub fn reset(surface: &mut dyn MapSurface, registry: &mut OverlayRegistry) {
        let handles = registry.drain();
        let tracked = handles.len();
        for id in handles {
            if !surface.remove_overlay(id) {
                debug!(target: "reset", "{} was already gone", id);
            }
        }

        let stray_zones = surface.find_overlays(&|kind| kind == OverlayKind::Polygon);
        let swept = stray_zones.len();
        for id in stray_zones {
            surface.remove_overlay(id);
        }

        info!(
            target: "reset",
            "cleared {} tracked overlay(s), swept {} stray zone layer(s)",
            tracked, swept
        );
    }
}
