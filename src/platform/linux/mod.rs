//! Linux platform implementation.
//!
//! Display geometry comes from XRandR and needs the `x11` feature, which is
//! not enabled by default. Monitor identification reads the EDID blobs the
//! kernel exposes under `/sys/class/drm` and works without a display server.
//!
//! There is no native display-change source; hosts drive
//! [`DisplayChangeHub::notify`](crate::notify::DisplayChangeHub::notify)
//! themselves (e.g. from their toolkit's screen-changed signal).

mod metadata;

#[cfg(feature = "x11")]
mod x11;

pub use metadata::hardware_ids;

#[cfg(feature = "x11")]
pub use x11::{displays, dpi_of, monitor_at, work_area_of};

#[cfg(not(feature = "x11"))]
pub use stub::{displays, dpi_of, monitor_at, work_area_of};

use crate::error::{Error, Result};

pub fn start_display_watch() -> Result<()> {
    Err(Error::NotSupported(
        "display change notifications on Linux".into(),
    ))
}

#[cfg(not(feature = "x11"))]
mod stub {
    use crate::display::{DisplayInfo, Dpi, MonitorHandle, Point, Rect};
    use crate::error::{Error, Result};

    pub fn displays() -> Result<Vec<DisplayInfo>> {
        Err(Error::NotSupported(
            "No Linux display backend enabled. Enable the 'x11' feature.".into(),
        ))
    }

    pub fn dpi_of(_handle: MonitorHandle) -> Result<Dpi> {
        Err(Error::NotSupported("per-monitor DPI on Linux".into()))
    }

    pub fn monitor_at(_point: Point) -> Option<MonitorHandle> {
        None
    }

    pub fn work_area_of(_handle: MonitorHandle) -> Option<Rect> {
        None
    }
}
