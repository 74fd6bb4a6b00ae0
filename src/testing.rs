//! In-memory display and metadata sources for tests and host-side
//! simulations.
//!
//! Monitors added to a [`FakeDisplaySystem`] get handles `1, 2, ...` and
//! device names `\\.\DISPLAY1, \\.\DISPLAY2, ...` in insertion order.

use crate::display::{DisplayInfo, DisplaySystem, Dpi, MonitorHandle, Point, Rect};
use crate::error::{Error, Result};
use crate::metadata::{HardwareId, MetadataSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct FakeMonitor {
    info: DisplayInfo,
    dpi: Option<Dpi>,
}

/// A [`DisplaySystem`] over a synthetic monitor set.
///
/// The set can be replaced at runtime to simulate topology changes.
#[derive(Debug, Default)]
pub struct FakeDisplaySystem {
    monitors: Mutex<Vec<FakeMonitor>>,
    work_area_lookups: Mutex<Vec<MonitorHandle>>,
}

impl FakeDisplaySystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a 96 DPI monitor whose work area equals its bounds.
    pub fn with_monitor(self, bounds: Rect, is_primary: bool) -> Self {
        self.with_monitor_dpi(bounds, is_primary, Some(Dpi::default()))
    }

    /// Add a monitor; `None` makes its DPI query fail.
    pub fn with_monitor_dpi(self, bounds: Rect, is_primary: bool, dpi: Option<Dpi>) -> Self {
        self.with_work_area(bounds, bounds, is_primary, dpi)
    }

    /// Add a monitor with a distinct work area.
    pub fn with_work_area(
        self,
        bounds: Rect,
        work_area: Rect,
        is_primary: bool,
        dpi: Option<Dpi>,
    ) -> Self {
        if let Ok(mut monitors) = self.monitors.lock() {
            let index = monitors.len() + 1;
            monitors.push(FakeMonitor {
                info: DisplayInfo {
                    device_id: format!(r"\\.\DISPLAY{index}"),
                    handle: MonitorHandle(index as isize),
                    bounds,
                    work_area,
                    is_primary,
                },
                dpi,
            });
        }
        self
    }

    /// Replace the whole monitor set with the monitors of `other`.
    pub fn replace_with(&self, other: FakeDisplaySystem) {
        let next = other.monitors.into_inner().unwrap_or_default();
        if let Ok(mut monitors) = self.monitors.lock() {
            *monitors = next;
        }
    }

    /// Handles passed to [`DisplaySystem::work_area_of`], oldest first.
    pub fn work_area_lookups(&self) -> Vec<MonitorHandle> {
        self.work_area_lookups
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default()
    }

    fn snapshot(&self) -> Vec<FakeMonitor> {
        self.monitors.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl DisplaySystem for FakeDisplaySystem {
    fn list_displays(&self) -> Result<Vec<DisplayInfo>> {
        Ok(self.snapshot().into_iter().map(|m| m.info).collect())
    }

    fn dpi_of(&self, handle: MonitorHandle) -> Result<Dpi> {
        self.snapshot()
            .into_iter()
            .find(|m| m.info.handle == handle)
            .and_then(|m| m.dpi)
            .ok_or_else(|| Error::Platform(format!("no DPI for monitor {handle}")))
    }

    fn monitor_at(&self, point: Point) -> Option<MonitorHandle> {
        self.snapshot()
            .into_iter()
            .find(|m| m.info.bounds.contains(point))
            .map(|m| m.info.handle)
    }

    fn work_area_of(&self, handle: MonitorHandle) -> Option<Rect> {
        if let Ok(mut lookups) = self.work_area_lookups.lock() {
            lookups.push(handle);
        }
        self.snapshot()
            .into_iter()
            .find(|m| m.info.handle == handle)
            .map(|m| m.info.work_area)
    }
}

/// A [`MetadataSource`] returning a fixed list, or failing.
///
/// Clones share one query counter.
#[derive(Debug, Clone, Default)]
pub struct FakeMetadataSource {
    ids: Option<Vec<HardwareId>>,
    queries: Arc<AtomicUsize>,
}

impl FakeMetadataSource {
    pub fn new(ids: Vec<HardwareId>) -> Self {
        Self {
            ids: Some(ids),
            queries: Arc::default(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// A source whose query always fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Number of [`MetadataSource::list_hardware_ids`] calls so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl MetadataSource for FakeMetadataSource {
    fn list_hardware_ids(&self) -> Result<Vec<HardwareId>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.ids
            .clone()
            .ok_or_else(|| Error::MetadataUnavailable("hardware table query failed".into()))
    }
}
