//! Hardware identification of attached monitors.

use crate::error::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw identification strings for one display, as reported by the
/// platform's hardware tables.
///
/// Any field may be empty when the underlying table entry is malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HardwareId {
    /// Platform instance path of the monitor device.
    pub instance_name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
}

/// Source of per-display hardware identification.
pub trait MetadataSource: Send + Sync {
    /// List identification entries in the platform's enumeration order.
    ///
    /// An error means the hardware tables could not be queried at all.
    fn list_hardware_ids(&self) -> Result<Vec<HardwareId>>;
}

/// [`MetadataSource`] backed by the current platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMetadata;

impl MetadataSource for SystemMetadata {
    fn list_hardware_ids(&self) -> Result<Vec<HardwareId>> {
        crate::platform::hardware_ids()
    }
}

/// Decode a fixed-width UTF-16 field, stopping at the first NUL.
pub fn decode_fixed_width(data: &[u16]) -> String {
    let len = data.iter().position(|&c| c == 0).unwrap_or(data.len());
    String::from_utf16_lossy(&data[..len])
}

/// Rewrite the instance name of a lone metadata entry.
///
/// Every `DISPLAY` substring of a single-entry list becomes `DISPLAY1`.
/// Lists of any other length are left untouched.
pub fn normalize_instance_names(ids: &mut [HardwareId]) {
    if let [only] = ids {
        only.instance_name = only.instance_name.replace("DISPLAY", "DISPLAY1");
    }
}
