use glam::Vec2;
use hyperspeed_platform::{DrawingSurface, Rgba, ViewportSize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Resize(ViewportSize),
    FillRect { origin: Vec2, extent: Vec2, color: Rgba },
    StrokeLine { from: Vec2, to: Vec2, width: f32, color: Rgba },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    Clear,
}

/// Surface that logs every call verbatim, invisible ones included.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: ViewportSize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> ViewportSize {
        self.size
    }

    fn resize(&mut self, size: ViewportSize) {
        self.size = size;
        self.commands.push(DrawCommand::Resize(size));
    }

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            extent,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }
}
