//! Monitor identification from DRM connector EDID blobs.

use crate::edid;
use crate::error::{Error, Result};
use crate::metadata::HardwareId;
use std::fs;
use std::path::Path;

const DRM_ROOT: &str = "/sys/class/drm";

pub fn hardware_ids() -> Result<Vec<HardwareId>> {
    hardware_ids_in(Path::new(DRM_ROOT))
}

/// Connected connectors under `root`, sorted by connector name.
fn hardware_ids_in(root: &Path) -> Result<Vec<HardwareId>> {
    let entries = fs::read_dir(root)
        .map_err(|e| Error::MetadataUnavailable(format!("{}: {}", root.display(), e)))?;

    let mut connectors: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_connected(path))
        .collect();
    connectors.sort();

    Ok(connectors
        .iter()
        .map(|path| {
            let instance_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let identity = fs::read(path.join("edid"))
                .ok()
                .and_then(|bytes| edid::parse(&bytes));
            match identity {
                Some(identity) => HardwareId {
                    instance_name,
                    manufacturer: identity.manufacturer,
                    model: identity.model,
                    serial: identity.serial,
                },
                None => {
                    log::debug!("{}: no usable EDID", instance_name);
                    HardwareId {
                        instance_name,
                        ..Default::default()
                    }
                }
            }
        })
        .collect())
}

fn is_connected(connector: &Path) -> bool {
    fs::read_to_string(connector.join("status"))
        .map(|status| status.trim() == "connected")
        .unwrap_or(false)
}
