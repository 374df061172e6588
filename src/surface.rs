//! Drawing surface abstraction and the fixed swarm palette.
//!
//! The render system never touches a real display. It produces
//! [`DrawCommand`]s and replays them onto whatever [`Surface`] it was
//! constructed with.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Viewport;

/// 24-bit RGB color, `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
    }
}

pub const BACKGROUND: Color = Color(0xffffff);
pub const BOX_FILL: Color = Color(0xf28d89);
pub const BOX_STROKE: Color = Color(0x800904);
pub const CIRCLE_FILL: Color = Color(0x888888);
pub const CIRCLE_STROKE: Color = Color(0x222222);
pub const STROKE_WIDTH: f64 = 1.0;

/// Host drawing surface
pub trait Surface: Send {
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);

    fn fill_and_stroke_circle(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    );

    fn fill_and_stroke_box(
        &mut self,
        x: f64,
        y: f64,
        side: f64,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    );
}

/// One recorded draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Color,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    },
    Box {
        x: f64,
        y: f64,
        side: f64,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    },
}

impl DrawCommand {
    /// Replay onto a surface
    pub fn draw_on(&self, surface: &mut dyn Surface) {
        match *self {
            DrawCommand::Clear(color) => surface.clear(color),
            DrawCommand::FillRect { x, y, w, h, color } => surface.fill_rect(x, y, w, h, color),
            DrawCommand::Circle {
                cx,
                cy,
                r,
                fill,
                stroke,
                stroke_width,
            } => surface.fill_and_stroke_circle(cx, cy, r, fill, stroke, stroke_width),
            DrawCommand::Box {
                x,
                y,
                side,
                fill,
                stroke,
                stroke_width,
            } => surface.fill_and_stroke_box(x, y, side, fill, stroke, stroke_width),
        }
    }
}

/// Full-viewport background fill
pub fn background(viewport: Viewport) -> DrawCommand {
    DrawCommand::FillRect {
        x: 0.0,
        y: 0.0,
        w: f64::from(viewport.width),
        h: f64::from(viewport.height),
        color: BACKGROUND,
    }
}

/// Box anchored one `size` up and left of the position, with side `size`
pub fn box_primitive(x: f64, y: f64, size: f64) -> DrawCommand {
    DrawCommand::Box {
        x: x - size,
        y: y - size,
        side: size,
        fill: BOX_FILL,
        stroke: BOX_STROKE,
        stroke_width: STROKE_WIDTH,
    }
}

pub fn circle_primitive(x: f64, y: f64, size: f64) -> DrawCommand {
    DrawCommand::Circle {
        cx: x,
        cy: y,
        r: size,
        fill: CIRCLE_FILL,
        stroke: CIRCLE_STROKE,
        stroke_width: STROKE_WIDTH,
    }
}

/// Surface that records every call into a shared log.
///
/// Clones share the same log, so a test can keep one handle while the render
/// system owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<Vec<DrawCommand>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.lock().clone()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.log.lock())
    }

    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }

    fn push(&self, command: DrawCommand) {
        self.log.lock().push(command);
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn fill_and_stroke_circle(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    ) {
        self.push(DrawCommand::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
            stroke_width,
        });
    }

    fn fill_and_stroke_box(
        &mut self,
        x: f64,
        y: f64,
        side: f64,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    ) {
        self.push(DrawCommand::Box {
            x,
            y,
            side,
            fill,
            stroke,
            stroke_width,
        });
    }
}
