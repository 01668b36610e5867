use crate::map_surface::OverlayId;

/// Every overlay handle created since the last reset. The renderer appends
/// here for each overlay it draws so nothing is orphaned on the surface.
#[derive(Debug, Default)]
pub struct OverlayRegistry {
    handles: Vec<OverlayId>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, id: OverlayId) {
        self.handles.push(id);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Takes every tracked handle, leaving the registry empty.
    pub fn drain(&mut self) -> Vec<OverlayId> {
        std::mem::take(&mut self.handles)
    }
}
