//! Display geometry types and the display query capability.

use crate::error::Result;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference DPI that corresponds to a scale factor of 1.0.
pub const BASE_DPI: u32 = 96;

/// A rectangle in physical virtual-desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left coordinate.
    pub x: i32,
    /// Top coordinate.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its four edges.
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// X coordinate of the right edge (exclusive).
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge (exclusive).
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check whether a point is inside this rectangle.
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.right() && point.y < self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// A point in physical virtual-desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a point from screen coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Effective dots-per-inch of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dpi {
    pub x: u32,
    pub y: u32,
}

impl Dpi {
    /// Create a DPI pair from horizontal and vertical dots per inch.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Horizontal scale factor relative to 96 DPI.
    pub fn scale_x(&self) -> f64 {
        self.x as f64 / BASE_DPI as f64
    }

    /// Vertical scale factor relative to 96 DPI.
    pub fn scale_y(&self) -> f64 {
        self.y as f64 / BASE_DPI as f64
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::new(BASE_DPI, BASE_DPI)
    }
}

/// Opaque OS-issued identifier of a live monitor.
///
/// Only meaningful for the display topology that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorHandle(pub isize);

impl fmt::Display for MonitorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A live display as reported by the OS, before metadata correlation.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayInfo {
    /// OS device name (e.g. `\\.\DISPLAY1`).
    pub device_id: String,
    /// Handle used for DPI and work-area lookups.
    pub handle: MonitorHandle,
    /// Full monitor bounds.
    pub bounds: Rect,
    /// Bounds minus taskbars, docks and other reserved chrome.
    pub work_area: Rect,
    /// Whether this is the primary display.
    pub is_primary: bool,
}

/// Access to the OS display primitives.
///
/// Everything above this trait (enumeration, geometry, the visibility
/// controller) is platform independent and can run against a fake.
pub trait DisplaySystem: Send + Sync {
    /// List the live displays in native enumeration order.
    fn list_displays(&self) -> Result<Vec<DisplayInfo>>;

    /// Effective DPI of a monitor.
    fn dpi_of(&self, handle: MonitorHandle) -> Result<Dpi>;

    /// Monitor containing a point, if any.
    fn monitor_at(&self, point: Point) -> Option<MonitorHandle>;

    /// Work area of a monitor, if the handle is still live.
    fn work_area_of(&self, handle: MonitorHandle) -> Option<Rect>;
}

/// [`DisplaySystem`] backed by the current platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDisplays;

impl DisplaySystem for SystemDisplays {
    fn list_displays(&self) -> Result<Vec<DisplayInfo>> {
        crate::platform::displays()
    }

    fn dpi_of(&self, handle: MonitorHandle) -> Result<Dpi> {
        crate::platform::dpi_of(handle)
    }

    fn monitor_at(&self, point: Point) -> Option<MonitorHandle> {
        crate::platform::monitor_at(point)
    }

    fn work_area_of(&self, handle: MonitorHandle) -> Option<Rect> {
        crate::platform::work_area_of(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(-1920, 0, 1920, 1080);
        assert_eq!(rect.right(), 0);
        assert_eq!(rect.bottom(), 1080);
        assert_eq!(Rect::from_edges(-1920, 0, 0, 1080), rect);
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(0, 0, 100, 50);
        assert!(rect.contains(Point::new(0, 0)));
        assert!(rect.contains(Point::new(99, 49)));
        assert!(!rect.contains(Point::new(100, 10)));
        assert!(!rect.contains(Point::new(10, 50)));
        assert!(!rect.contains(Point::new(-1, 10)));
    }

    #[test]
    fn test_dpi_scale() {
        assert_eq!(Dpi::default(), Dpi::new(96, 96));
        assert_eq!(Dpi::default().scale_x(), 1.0);
        let dpi = Dpi::new(144, 192);
        assert_eq!(dpi.scale_x(), 1.5);
        assert_eq!(dpi.scale_y(), 2.0);
    }
}
