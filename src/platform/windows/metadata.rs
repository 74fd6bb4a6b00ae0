//! Monitor identification from the display device tree and registry EDID.

use crate::edid;
use crate::error::{Error, Result};
use crate::metadata::{HardwareId, decode_fixed_width};
use std::mem::size_of;
use windows::Win32::Foundation::ERROR_SUCCESS;
use windows::Win32::Graphics::Gdi::{DISPLAY_DEVICEW, EnumDisplayDevicesW};
use windows::Win32::System::Registry::{HKEY_LOCAL_MACHINE, RRF_RT_REG_BINARY, RegGetValueW};
use windows::core::{HSTRING, PCWSTR};

/// Report the device interface path in `DeviceID` instead of the hardware id.
const EDD_GET_DEVICE_INTERFACE_NAME: u32 = 0x0000_0001;

pub fn hardware_ids() -> Result<Vec<HardwareId>> {
    let mut ids = Vec::new();
    let mut adapters = 0;

    while let Some(adapter) = display_device(None, adapters, 0) {
        adapters += 1;
        let mut index = 0;
        while let Some(monitor) = display_device(
            Some(&adapter.DeviceName[..]),
            index,
            EDD_GET_DEVICE_INTERFACE_NAME,
        ) {
            index += 1;
            let interface = decode_fixed_width(&monitor.DeviceID);
            if let Some(path) = DevicePath::parse(&interface) {
                ids.push(hardware_id(&path));
            }
        }
    }

    if adapters == 0 {
        return Err(Error::MetadataUnavailable(
            "EnumDisplayDevicesW returned no adapters".into(),
        ));
    }
    Ok(ids)
}

fn display_device(parent: Option<&[u16]>, index: u32, flags: u32) -> Option<DISPLAY_DEVICEW> {
    let mut device = DISPLAY_DEVICEW {
        cb: size_of::<DISPLAY_DEVICEW>() as u32,
        ..Default::default()
    };
    let name = parent.map_or(PCWSTR::null(), |name| PCWSTR(name.as_ptr()));
    let ok = unsafe { EnumDisplayDevicesW(name, index, &mut device, flags) };
    ok.as_bool().then_some(device)
}

fn hardware_id(path: &DevicePath) -> HardwareId {
    let identity = read_edid(path).and_then(|bytes| edid::parse(&bytes));
    match identity {
        Some(identity) => HardwareId {
            instance_name: path.instance_name(),
            manufacturer: identity.manufacturer,
            model: identity.model,
            serial: identity.serial,
        },
        None => {
            log::debug!("no EDID for {}", path.instance_name());
            HardwareId {
                instance_name: path.instance_name(),
                manufacturer: path.hardware_id.chars().take(3).collect(),
                model: String::new(),
                serial: String::new(),
            }
        }
    }
}

fn read_edid(path: &DevicePath) -> Option<Vec<u8>> {
    let key = HSTRING::from(path.registry_key());
    let value = HSTRING::from("EDID");
    let mut buffer = vec![0u8; 256];
    let mut len = buffer.len() as u32;

    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            PCWSTR(key.as_ptr()),
            PCWSTR(value.as_ptr()),
            RRF_RT_REG_BINARY,
            None,
            Some(buffer.as_mut_ptr().cast()),
            Some(&mut len as *mut u32),
        )
    };
    if status != ERROR_SUCCESS {
        return None;
    }
    buffer.truncate(len as usize);
    Some(buffer)
}

/// Parsed monitor device interface path, e.g.
/// `\\?\DISPLAY#DEL41A4#5&1a2b3c&0&UID4353#{e6f07b5f-ee97-4a90-b076-33f57bf4eaa7}`.
#[derive(Debug, PartialEq, Eq)]
struct DevicePath {
    class: String,
    hardware_id: String,
    instance: String,
}

impl DevicePath {
    fn parse(interface: &str) -> Option<Self> {
        let trimmed = interface.strip_prefix(r"\\?\").unwrap_or(interface);
        let mut parts = trimmed.split('#');
        let class = parts.next().filter(|s| !s.is_empty())?;
        let hardware_id = parts.next().filter(|s| !s.is_empty())?;
        let instance = parts.next().filter(|s| !s.is_empty())?;
        Some(Self {
            class: class.to_string(),
            hardware_id: hardware_id.to_string(),
            instance: instance.to_string(),
        })
    }

    fn instance_name(&self) -> String {
        format!(r"{}\{}\{}", self.class, self.hardware_id, self.instance)
    }

    fn registry_key(&self) -> String {
        format!(
            r"SYSTEM\CurrentControlSet\Enum\{}\Device Parameters",
            self.instance_name()
        )
    }
}
