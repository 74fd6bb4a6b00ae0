//! Windows display queries.

use crate::display::{DisplayInfo, Dpi, MonitorHandle, Point, Rect};
use crate::error::{Error, Result};
use crate::metadata::decode_fixed_width;
use std::mem::size_of;
use windows::Win32::Foundation::{BOOL, LPARAM, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITOR_DEFAULTTONULL, MONITORINFO,
    MONITORINFOEXW, MonitorFromPoint,
};
use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};
use windows::Win32::UI::WindowsAndMessaging::MONITORINFOF_PRIMARY;

pub fn displays() -> Result<Vec<DisplayInfo>> {
    let mut displays: Vec<DisplayInfo> = Vec::new();

    let ok = unsafe {
        EnumDisplayMonitors(
            None,
            None,
            Some(monitor_enum_proc),
            LPARAM(&mut displays as *mut _ as isize),
        )
    };

    if ok.as_bool() {
        Ok(displays)
    } else {
        Err(Error::Platform("EnumDisplayMonitors failed".into()))
    }
}

pub fn dpi_of(handle: MonitorHandle) -> Result<Dpi> {
    let mut dpi_x: u32 = 0;
    let mut dpi_y: u32 = 0;
    unsafe { GetDpiForMonitor(hmonitor(handle), MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) }
        .map_err(|e| Error::Platform(format!("GetDpiForMonitor failed: {}", e)))?;
    Ok(Dpi::new(dpi_x, dpi_y))
}

pub fn monitor_at(point: Point) -> Option<MonitorHandle> {
    let hmonitor = unsafe {
        MonitorFromPoint(
            POINT {
                x: point.x,
                y: point.y,
            },
            MONITOR_DEFAULTTONULL,
        )
    };
    if hmonitor.0.is_null() {
        None
    } else {
        Some(MonitorHandle(hmonitor.0 as isize))
    }
}

pub fn work_area_of(handle: MonitorHandle) -> Option<Rect> {
    monitor_info(hmonitor(handle)).map(|info| rect(&info.monitorInfo.rcWork))
}

fn hmonitor(handle: MonitorHandle) -> HMONITOR {
    HMONITOR(handle.0 as *mut _)
}

unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _lprc: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let displays = unsafe { &mut *(lparam.0 as *mut Vec<DisplayInfo>) };
    match monitor_info(hmonitor) {
        Some(info) => displays.push(display_from_info(hmonitor, &info)),
        None => log::warn!("GetMonitorInfoW failed for monitor {:?}", hmonitor.0),
    }
    BOOL(1)
}

fn monitor_info(hmonitor: HMONITOR) -> Option<MONITORINFOEXW> {
    let mut info = MONITORINFOEXW {
        monitorInfo: MONITORINFO {
            cbSize: size_of::<MONITORINFOEXW>() as u32,
            ..Default::default()
        },
        ..Default::default()
    };
    let ok = unsafe { GetMonitorInfoW(hmonitor, &mut info as *mut _ as *mut MONITORINFO) };
    ok.as_bool().then_some(info)
}

fn display_from_info(hmonitor: HMONITOR, info: &MONITORINFOEXW) -> DisplayInfo {
    DisplayInfo {
        device_id: decode_fixed_width(&info.szDevice),
        handle: MonitorHandle(hmonitor.0 as isize),
        bounds: rect(&info.monitorInfo.rcMonitor),
        work_area: rect(&info.monitorInfo.rcWork),
        is_primary: (info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY) != 0,
    }
}

fn rect(r: &RECT) -> Rect {
    Rect::from_edges(r.left, r.top, r.right, r.bottom)
}
