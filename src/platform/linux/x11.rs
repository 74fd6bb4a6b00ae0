//! X11 display queries through XRandR monitors.

use crate::display::{DisplayInfo, Dpi, MonitorHandle, Point, Rect};
use crate::error::{Error, Result};
use std::ffi::CStr;
use std::ptr::null;
use x11::{xlib, xrandr};

pub fn displays() -> Result<Vec<DisplayInfo>> {
    with_display(|display| unsafe {
        let root = xlib::XDefaultRootWindow(display);
        let mut count: i32 = 0;
        let monitors = xrandr::XRRGetMonitors(display, root, xlib::True, &mut count);
        if monitors.is_null() {
            return Err(Error::Platform("XRRGetMonitors failed".into()));
        }

        let infos = std::slice::from_raw_parts(monitors, count.max(0) as usize);
        let displays = infos
            .iter()
            .map(|monitor| {
                let bounds = Rect::new(monitor.x, monitor.y, monitor.width, monitor.height);
                DisplayInfo {
                    device_id: atom_name(display, monitor.name),
                    handle: MonitorHandle(monitor.name as isize),
                    bounds,
                    // XRandR has no notion of reserved areas.
                    work_area: bounds,
                    is_primary: monitor.primary != 0,
                }
            })
            .collect();

        xrandr::XRRFreeMonitors(monitors);
        Ok(displays)
    })
}

/// X11 reports physical size only, which says nothing about the desktop's
/// scale factor, so callers fall back to 96 DPI.
pub fn dpi_of(_handle: MonitorHandle) -> Result<Dpi> {
    Err(Error::NotSupported("per-monitor DPI on X11".into()))
}

pub fn monitor_at(point: Point) -> Option<MonitorHandle> {
    displays()
        .ok()?
        .into_iter()
        .find(|display| display.bounds.contains(point))
        .map(|display| display.handle)
}

pub fn work_area_of(handle: MonitorHandle) -> Option<Rect> {
    displays()
        .ok()?
        .into_iter()
        .find(|display| display.handle == handle)
        .map(|display| display.work_area)
}

unsafe fn atom_name(display: *mut xlib::Display, atom: xlib::Atom) -> String {
    unsafe {
        let raw = xlib::XGetAtomName(display, atom);
        if raw.is_null() {
            return format!("monitor-{}", atom);
        }
        let name = CStr::from_ptr(raw).to_string_lossy().into_owned();
        xlib::XFree(raw.cast());
        name
    }
}

fn with_display<T>(f: impl FnOnce(*mut xlib::Display) -> Result<T>) -> Result<T> {
    unsafe {
        let display = xlib::XOpenDisplay(null());
        if display.is_null() {
            return Err(Error::Platform("XOpenDisplay failed".into()));
        }
        let result = f(display);
        xlib::XCloseDisplay(display);
        result
    }
}
