//! Pan/zoom viewport controller.
//!
//! One continuous state plus a boolean panning flag. The screen transform is
//! `screen = content * scale + offset`. There is no inertia and no bounds
//! clamping; the pointer leaving the element ends a pan the same way a
//! pointer-up does.
//!
//! Wheel handling is pure math here; hosts embedding the controller must
//! consume the wheel event themselves so it does not also scroll the page.

use serde::Serialize;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;

const ZOOM_IN_STEP: f64 = 1.1;
const ZOOM_OUT_STEP: f64 = 0.9;
const FIT_PADDING: f64 = 40.0;
const FIT_SHRINK: f64 = 0.9;

/// Fraction of the viewport width a focused node should occupy.
const NODE_FOCUS_FRACTION: f64 = 0.25;
const NODE_FOCUS_MIN_SCALE: f64 = 0.5;
const NODE_FOCUS_MAX_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn expand(&self, pad: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - pad,
            min_y: self.min_y - pad,
            max_x: self.max_x + pad,
            max_y: self.max_y + pad,
        }
    }
}

/// Axis-aligned bounding box over node rects given as `(center, width, height)`.
/// An empty input yields the full-viewport default box instead of an error.
pub fn node_bounds<I>(nodes: I, viewport_width: f64, viewport_height: f64) -> Bounds
where
    I: IntoIterator<Item = (Point, f64, f64)>,
{
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut any = false;

    for (center, w, h) in nodes {
        any = true;
        min_x = min_x.min(center.x - w / 2.0);
        min_y = min_y.min(center.y - h / 2.0);
        max_x = max_x.max(center.x + w / 2.0);
        max_y = max_y.max(center.y + h / 2.0);
    }

    if any {
        Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    } else {
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: viewport_width,
            max_y: viewport_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    offset: Point,
    scale: f64,
    panning: bool,
    pan_start: Point,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            offset: Point::default(),
            scale: 1.0,
            panning: false,
            pan_start: Point::default(),
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn reset(&mut self) {
        self.offset = Point::default();
        self.scale = 1.0;
        self.panning = false;
    }

    /// Screen to content space.
    pub fn to_content(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Content to screen space.
    pub fn to_screen(&self, content: Point) -> Point {
        Point::new(
            content.x * self.scale + self.offset.x,
            content.y * self.scale + self.offset.y,
        )
    }

    /// Primary-button press: start panning.
    pub fn pointer_down(&mut self, pointer: Point) {
        self.panning = true;
        self.pan_start = Point::new(pointer.x - self.offset.x, pointer.y - self.offset.y);
    }

    pub fn pointer_move(&mut self, pointer: Point) {
        if self.panning {
            self.offset = Point::new(pointer.x - self.pan_start.x, pointer.y - self.pan_start.y);
        }
    }

    pub fn pointer_up(&mut self) {
        self.panning = false;
    }

    /// Pointer leaving the element ends a pan.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Multiplicative wheel zoom keeping the content point under `cursor` fixed.
    pub fn wheel(&mut self, cursor: Point, zoom_in: bool) {
        let step = if zoom_in { ZOOM_IN_STEP } else { ZOOM_OUT_STEP };
        let new_scale = (self.scale * step).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;
        self.offset = Point::new(
            cursor.x - (cursor.x - self.offset.x) * ratio,
            cursor.y - (cursor.y - self.offset.y) * ratio,
        );
        self.scale = new_scale;
    }

    /// Fits `bounds` (plus fixed padding) into the viewport, centered, never
    /// enlarging past 1:1. Depends only on the input, so repeated calls with
    /// unchanged bounds are idempotent.
    pub fn zoom_to_fit(&mut self, bounds: Bounds) {
        let padded = bounds.expand(FIT_PADDING);
        let bw = padded.width().max(1.0);
        let bh = padded.height().max(1.0);
        let scale = (self.width / bw).min(self.height / bh).min(1.0) * FIT_SHRINK;

        self.scale = scale;
        self.offset = Point::new(
            (self.width - bw * scale) / 2.0 - padded.min_x * scale,
            (self.height - bh * scale) / 2.0 - padded.min_y * scale,
        );
    }

    /// Centers on a node and scales so it occupies a fixed fraction of the
    /// viewport width, clamped to `[0.5, 10]`.
    pub fn zoom_to_node(&mut self, center: Point, node_width: f64) {
        let scale = (self.width * NODE_FOCUS_FRACTION / node_width.max(1.0))
            .clamp(NODE_FOCUS_MIN_SCALE, NODE_FOCUS_MAX_SCALE);
        self.scale = scale;
        self.offset = Point::new(
            self.width / 2.0 - center.x * scale,
            self.height / 2.0 - center.y * scale,
        );
    }
}
