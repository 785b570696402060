use glam::Vec2;
use hyperspeed_platform::ViewportSize;

/// Surface dimensions as seen by the stepper and projector. Always replaced
/// as a whole, never field by field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub width: f32,
    pub height: f32,
    pub center: Vec2,
}

impl SurfaceState {
    pub fn from_size(size: ViewportSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            center: size.center(),
        }
    }

    pub fn size(&self) -> ViewportSize {
        ViewportSize::new(self.width, self.height)
    }
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self::from_size(ViewportSize::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_follows_size() {
        let state = SurfaceState::from_size(ViewportSize::new(800.0, 600.0));
        assert_eq!(state.center, Vec2::new(400.0, 300.0));

        let state = SurfaceState::from_size(ViewportSize::new(400.0, 600.0));
        assert_eq!(state.center.x, 200.0);
        assert_eq!(state.size(), ViewportSize::new(400.0, 600.0));
    }
}
