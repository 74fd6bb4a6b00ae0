//! Pure coordinate and visibility math.
//!
//! Window rectangles live in logical units, monitor rectangles in physical
//! pixels. Conversions multiply or divide by a monitor's scale factor. No
//! function here touches the OS.

use crate::config::EDGE_MARGIN;
use crate::display::{Point, Rect};
use crate::monitor::{self, MonitorRecord};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A window's position and size in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Centre point in logical units.
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Same size, new origin.
    pub fn moved_to(self, left: f64, top: f64) -> Self {
        Self { left, top, ..self }
    }
}

/// Per-axis logical-to-physical scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    /// Per-axis scale of a monitor's DPI.
    pub fn of(monitor: &MonitorRecord) -> Self {
        Self {
            x: monitor.dpi.scale_x(),
            y: monitor.dpi.scale_y(),
        }
    }
}

/// A rectangle in physical pixels, as edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Logical-unit edges a window is pulled back inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLimits {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl EdgeLimits {
    /// Convert a physical work area to logical limits.
    pub fn from_work_area(work_area: &Rect, scale: Scale) -> Self {
        Self {
            left: work_area.x as f64 / scale.x,
            top: work_area.y as f64 / scale.y,
            right: work_area.right() as f64 / scale.x,
            bottom: work_area.bottom() as f64 / scale.y,
        }
    }
}

/// Primary monitor of a snapshot, falling back to the first record.
fn reference_monitor(monitors: &[MonitorRecord]) -> Option<&MonitorRecord> {
    monitor::primary(monitors).or_else(|| monitors.first())
}

/// Scale used to project `window` into physical pixels.
///
/// This is the scale of the first monitor whose bounds contain the window
/// centre projected at that monitor's own scale. If no monitor contains it
/// the primary monitor's scale is used.
pub fn reference_scale(window: &WindowRect, monitors: &[MonitorRecord]) -> Scale {
    let (cx, cy) = window.center();
    monitors
        .iter()
        .find(|m| {
            let scale = Scale::of(m);
            let (px, py) = (cx * scale.x, cy * scale.y);
            let b = &m.bounds;
            px >= b.x as f64 && py >= b.y as f64 && px < b.right() as f64 && py < b.bottom() as f64
        })
        .or_else(|| reference_monitor(monitors))
        .map(Scale::of)
        .unwrap_or(Scale::IDENTITY)
}

/// Project a logical rectangle into physical pixels.
pub fn to_physical(window: &WindowRect, scale: Scale) -> PhysicalRect {
    let left = window.left * scale.x;
    let top = window.top * scale.y;
    PhysicalRect {
        left,
        top,
        right: left + window.width * scale.x,
        bottom: top + window.height * scale.y,
    }
}

/// Whether a physical rectangle overlaps a work area.
pub fn intersects(window: &PhysicalRect, work_area: &Rect) -> bool {
    window.right > work_area.x as f64
        && window.left < work_area.right() as f64
        && window.bottom > work_area.y as f64
        && window.top < work_area.bottom() as f64
}

/// Whether `window` overlaps the work area of any monitor.
pub fn is_visible(window: &WindowRect, monitors: &[MonitorRecord]) -> bool {
    let physical = to_physical(window, reference_scale(window, monitors));
    monitors.iter().any(|m| intersects(&physical, &m.work_area))
}

/// Centre `window` on a monitor's work-area size.
///
/// The result is anchored at the monitor's bounds origin; only the work
/// area's dimensions are used, not its offset inside the bounds.
pub fn center_on_monitor(window: &WindowRect, monitor: &MonitorRecord, scale: Scale) -> WindowRect {
    let origin_x = monitor.bounds.x as f64 / scale.x;
    let origin_y = monitor.bounds.y as f64 / scale.y;
    let width = monitor.work_area.width as f64 / scale.x;
    let height = monitor.work_area.height as f64 / scale.y;
    window.moved_to(
        origin_x + (width - window.width) / 2.0,
        origin_y + (height - window.height) / 2.0,
    )
}

/// Pull a window back inside `limits`, tolerating `margin` of overhang.
///
/// The four checks run in sequence and each sees the result of the previous
/// one.
pub fn correct_edges(window: &WindowRect, limits: &EdgeLimits, margin: f64) -> WindowRect {
    let mut rect = *window;
    if rect.left + margin > limits.right {
        rect.left = limits.right - rect.width;
    }
    if rect.top + margin > limits.bottom {
        rect.top = limits.bottom - rect.height;
    }
    if rect.left + rect.width - margin < limits.left {
        rect.left = limits.left;
    }
    if rect.top + rect.height - margin < limits.top {
        rect.top = limits.top;
    }
    rect
}

/// [`ensure_visible_with`] using the default edge margin.
pub fn ensure_visible(window: &WindowRect, monitors: &[MonitorRecord]) -> WindowRect {
    ensure_visible_with(window, monitors, EDGE_MARGIN)
}

/// Reposition `window` so it ends up anchored to the primary work area.
///
/// A window that overlaps no work area is centred on the primary monitor and
/// then edge-corrected. A window that overlaps some work area is
/// edge-corrected and then centred on the primary monitor as well. An empty
/// snapshot leaves the window unchanged.
pub fn ensure_visible_with(
    window: &WindowRect,
    monitors: &[MonitorRecord],
    margin: f64,
) -> WindowRect {
    let Some(primary) = reference_monitor(monitors) else {
        log::debug!("no monitors, leaving window at {window:?}");
        return *window;
    };

    let visible = is_visible(window, monitors);
    let scale = Scale::of(primary);

    let mut rect = *window;
    if !visible {
        rect = center_on_monitor(&rect, primary, scale);
    }

    let limits = EdgeLimits::from_work_area(&primary.work_area, scale);
    rect = correct_edges(&rect, &limits, margin);

    if visible {
        rect = center_on_monitor(&rect, primary, scale);
    }

    log::debug!("visible={visible}: {window:?} -> {rect:?}");
    rect
}

/// Clamp `window` into a work area.
///
/// Each axis is clamped independently with `max(low, min(value, high))`, so a
/// window larger than the work area is aligned to its left/top edge.
pub fn clamp_to_work_area(window: &WindowRect, work_area: &Rect) -> WindowRect {
    let left = window
        .left
        .min(work_area.right() as f64 - window.width)
        .max(work_area.x as f64);
    let top = window
        .top
        .min(work_area.bottom() as f64 - window.height)
        .max(work_area.y as f64);
    window.moved_to(left, top)
}

/// Centre of a logical rectangle as a screen point, truncated toward zero.
pub fn center_point(window: &WindowRect) -> Point {
    let (x, y) = window.center();
    Point::new(x as i32, y as i32)
}
