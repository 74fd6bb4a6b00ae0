//! macOS platform implementation.
//!
//! Bounds are reported in pixels: each display's point-space rectangle is
//! multiplied by its own backing scale, and the scale is reported as DPI
//! (`96 * scale`).

mod display;

pub use display::{displays, dpi_of, hardware_ids, monitor_at, work_area_of};

use crate::error::{Error, Result};

/// Reconfiguration callbacks are delivered through the main run loop, which
/// belongs to the host's toolkit; hosts forward those to
/// [`DisplayChangeHub::notify`](crate::notify::DisplayChangeHub::notify).
pub fn start_display_watch() -> Result<()> {
    Err(Error::NotSupported(
        "display change notifications on macOS".into(),
    ))
}
