use std::collections::HashMap;

use hyperspeed_platform::{DrawingSurface, SurfaceLocator};
use tracing::debug;

/// Named surfaces waiting to be claimed. Locating a surface hands it over.
pub struct SurfaceRegistry<S> {
    surfaces: HashMap<String, S>,
}

impl<S: DrawingSurface> SurfaceRegistry<S> {
    pub fn new() -> Self {
        Self {
            surfaces: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, surface: S) {
        self.surfaces.insert(id.into(), surface);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.surfaces.contains_key(id)
    }
}

impl<S: DrawingSurface> Default for SurfaceRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DrawingSurface> SurfaceLocator for SurfaceRegistry<S> {
    type Surface = S;

    fn locate(&mut self, id: &str) -> Option<S> {
        let surface = self.surfaces.remove(id);
        debug!("Surface lookup {:?} => {}", id, if surface.is_some() { "found" } else { "missing" });
        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingSurface;
    use hyperspeed_platform::ViewportSize;

    #[test]
    fn locate_claims_surface_once() {
        let mut registry = SurfaceRegistry::new();
        registry.insert("bg", RecordingSurface::new(ViewportSize::new(4.0, 4.0)));
        assert!(registry.contains("bg"));
        assert!(registry.locate("other").is_none());
        assert!(registry.locate("bg").is_some());
        assert!(registry.locate("bg").is_none());
    }
}
