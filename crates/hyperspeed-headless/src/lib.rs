//! Display-less platform implementations for Hyperspeed: software raster,
//! draw recording, manual frame scheduling and a shared viewport.

mod pixel;
mod recording;
mod registry;
mod scheduler;
mod viewport;

pub use crate::pixel::{Pixel, PixelSurface};
pub use crate::recording::{DrawCommand, RecordingSurface};
pub use crate::registry::SurfaceRegistry;
pub use crate::scheduler::ManualScheduler;
pub use crate::viewport::SharedViewport;
