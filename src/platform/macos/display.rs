//! macOS display queries.

use crate::display::{BASE_DPI, DisplayInfo, Dpi, MonitorHandle, Point, Rect};
use crate::edid::manufacturer_from_code;
use crate::error::{Error, Result};
use crate::metadata::HardwareId;
use objc2_core_graphics::{
    CGDirectDisplayID, CGDisplayBounds, CGDisplayModelNumber, CGDisplayPixelsWide,
    CGDisplaySerialNumber, CGDisplayVendorNumber, CGError, CGGetActiveDisplayList,
    CGMainDisplayID,
};

fn active_display_ids() -> Result<Vec<CGDirectDisplayID>> {
    let mut max_displays = 8usize;
    loop {
        let mut ids = vec![0; max_displays];
        let mut count: u32 = 0;
        let status =
            unsafe { CGGetActiveDisplayList(max_displays as u32, ids.as_mut_ptr(), &mut count) };
        if status != CGError::Success {
            return Err(Error::Platform(format!(
                "CGGetActiveDisplayList failed: {:?}",
                status
            )));
        }

        if (count as usize) <= max_displays {
            ids.truncate(count as usize);
            return Ok(ids);
        }

        max_displays = count as usize;
    }
}

fn backing_scale(display_id: CGDirectDisplayID) -> f64 {
    #[allow(unused_unsafe)]
    let (bounds, pixels_wide) =
        unsafe { (CGDisplayBounds(display_id), CGDisplayPixelsWide(display_id)) };
    let width_points = bounds.size.width as f64;
    if width_points > 0.0 {
        pixels_wide as f64 / width_points
    } else {
        1.0
    }
}

fn display_info(display_id: CGDirectDisplayID) -> DisplayInfo {
    #[allow(unused_unsafe)]
    let (bounds, main) = unsafe { (CGDisplayBounds(display_id), CGMainDisplayID()) };
    let scale = backing_scale(display_id);
    let scaled = |v: f64| (v * scale).round() as i32;
    let rect = Rect::new(
        scaled(bounds.origin.x as f64),
        scaled(bounds.origin.y as f64),
        scaled(bounds.size.width as f64),
        scaled(bounds.size.height as f64),
    );

    DisplayInfo {
        device_id: format!("display-{}", display_id),
        handle: MonitorHandle(display_id as isize),
        bounds: rect,
        // The menu bar and Dock are only known to AppKit.
        work_area: rect,
        is_primary: display_id == main,
    }
}

pub fn displays() -> Result<Vec<DisplayInfo>> {
    Ok(active_display_ids()?.into_iter().map(display_info).collect())
}

pub fn dpi_of(handle: MonitorHandle) -> Result<Dpi> {
    let dpi = (backing_scale(handle.0 as CGDirectDisplayID) * BASE_DPI as f64).round() as u32;
    Ok(Dpi::new(dpi, dpi))
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

/// Vendor, model and serial numbers in active-display order.
pub fn hardware_ids() -> Result<Vec<HardwareId>> {
    Ok(active_display_ids()?
        .into_iter()
        .map(|display_id| {
            #[allow(unused_unsafe)]
            let (vendor, model, serial) = unsafe {
                (
                    CGDisplayVendorNumber(display_id),
                    CGDisplayModelNumber(display_id),
                    CGDisplaySerialNumber(display_id),
                )
            };
            HardwareId {
                instance_name: format!("display-{}", display_id),
                manufacturer: manufacturer_from_code(vendor as u16),
                model: if model == 0 {
                    String::new()
                } else {
                    format!("{:04X}", model)
                },
                serial: if serial == 0 {
                    String::new()
                } else {
                    serial.to_string()
                },
            }
        })
        .collect())
}
