//! # screenkeep
//!
//! Keep an application window on screen across multi-monitor, mixed-DPI
//! desktops, and report per-monitor hardware metadata.
//!
//! ## Features
//!
//! - One canonical [`MonitorRecord`] per display: bounds, work area, DPI,
//!   manufacturer/model/serial and position relative to the primary monitor
//! - Pure geometry: DPI-aware intersection tests, re-centring, edge
//!   correction and work-area clamping
//! - A per-window [`VisibilityController`] that follows window moves, resizes
//!   and display-configuration changes
//! - OS primitives behind the [`DisplaySystem`] and [`MetadataSource`]
//!   traits, with fakes in [`testing`]
//!
//! ## Quick Start
//!
//! ### Listing Monitors
//!
//! ```no_run
//! use screenkeep::MonitorEnumerator;
//!
//! for monitor in MonitorEnumerator::system().enumerate().expect("Failed to enumerate") {
//!     println!("{monitor}");
//! }
//! ```
//!
//! ### Repositioning a Window
//!
//! ```
//! use screenkeep::testing::{FakeDisplaySystem, FakeMetadataSource};
//! use screenkeep::{MonitorEnumerator, Rect, WindowRect, ensure_visible};
//! use std::sync::Arc;
//!
//! let displays = FakeDisplaySystem::new().with_monitor(Rect::new(0, 0, 1920, 1080), true);
//! let enumerator = MonitorEnumerator::new(Arc::new(displays), Arc::new(FakeMetadataSource::empty()));
//! let monitors = enumerator.enumerate().unwrap();
//!
//! let window = WindowRect::new(-1000.0, 0.0, 800.0, 600.0);
//! assert_eq!(ensure_visible(&window, &monitors), WindowRect::new(560.0, 240.0, 800.0, 600.0));
//! ```
//!
//! ## Platform Support
//!
//! | Platform | Displays | Metadata | Change notifications |
//! |---|---|---|---|
//! | Windows | always | registry EDID | `WM_DISPLAYCHANGE`, work-area changes |
//! | macOS | always | vendor/model/serial numbers | host-driven |
//! | Linux | `x11` feature | `/sys/class/drm` EDID | host-driven |
//!
//! The `x11` feature is off by default so the crate builds without libX11.
//! Without it, [`MonitorEnumerator::system`] fails with
//! [`Error::NotSupported`] on Linux; enable it with
//! `screenkeep = { version = "0.1", features = ["x11"] }`. On platforms marked
//! host-driven, call [`DisplayChangeHub::notify`] from the toolkit's
//! screen-changed signal.
//!
//! ## Coordinate Spaces
//!
//! Window rectangles are in logical units. Monitor bounds and work areas are
//! in physical pixels of the virtual desktop. A monitor's scale factor is its
//! DPI divided by 96.

pub mod config;
pub mod controller;
pub mod correlate;
pub mod display;
pub mod edid;
pub mod error;
pub mod geometry;
pub mod metadata;
pub mod monitor;
pub mod notify;
pub mod testing;

mod platform;

// Re-exports
pub use config::Config;
pub use controller::{MonitorChangeHandler, VisibilityController, WindowHost};
pub use correlate::{Correlation, OrdinalCorrelation};
pub use display::{DisplayInfo, DisplaySystem, Dpi, MonitorHandle, Point, Rect, SystemDisplays};
pub use error::{Error, Result};
pub use geometry::{WindowRect, clamp_to_work_area, ensure_visible};
pub use metadata::{HardwareId, MetadataSource, SystemMetadata};
pub use monitor::{MonitorEnumerator, MonitorRecord, PositionDescriptor};
pub use notify::{DisplayChangeHub, DisplayChangeNotifier, SubscriptionToken, system_notifier};
