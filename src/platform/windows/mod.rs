//! Windows platform implementation.

mod display;
mod metadata;
mod watch;

pub use display::{displays, dpi_of, monitor_at, work_area_of};
pub use metadata::hardware_ids;
pub use watch::start_display_watch;
