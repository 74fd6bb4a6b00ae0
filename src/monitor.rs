//! Canonical per-monitor records built from display and metadata queries.

use crate::config::Config;
use crate::correlate::{Correlation, OrdinalCorrelation};
use crate::display::{DisplayInfo, DisplaySystem, Dpi, MonitorHandle, Rect, SystemDisplays};
use crate::error::Result;
use crate::metadata::{self, HardwareId, MetadataSource, SystemMetadata};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a monitor sits relative to the primary monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PositionDescriptor {
    /// This is the primary monitor.
    Primary,
    /// Entirely left of the primary.
    LeftOf,
    /// Entirely right of the primary.
    RightOf,
    /// Entirely above the primary.
    Above,
    /// Entirely below the primary.
    Below,
    /// Overlapping the primary, or no primary to compare against.
    Overlapping,
}

impl PositionDescriptor {
    /// Classify `bounds` against the primary monitor's bounds.
    ///
    /// The tests run in a fixed order and the first match wins.
    pub fn relative_to(bounds: &Rect, primary: &Rect) -> Self {
        if bounds.right() <= primary.x {
            Self::LeftOf
        } else if bounds.x >= primary.right() {
            Self::RightOf
        } else if bounds.bottom() <= primary.y {
            Self::Above
        } else if bounds.y >= primary.bottom() {
            Self::Below
        } else {
            Self::Overlapping
        }
    }

    /// Human-readable description, as shown in monitor reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::LeftOf => "left of primary",
            Self::RightOf => "right of primary",
            Self::Above => "above primary",
            Self::Below => "below primary",
            Self::Overlapping => "overlapping / custom",
        }
    }
}

impl fmt::Display for PositionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One physical display in an enumeration snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorRecord {
    /// OS device name, unique within the snapshot.
    pub device_id: String,
    /// Handle of the monitor in the current topology.
    pub handle: MonitorHandle,
    pub is_primary: bool,
    /// Physical-pixel bounds in virtual-desktop coordinates.
    pub bounds: Rect,
    /// Physical-pixel bounds minus reserved chrome.
    pub work_area: Rect,
    pub dpi: Dpi,
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
    pub position: PositionDescriptor,
}

impl MonitorRecord {
    /// Horizontal DPI relative to 96.
    pub fn scale_factor(&self) -> f64 {
        self.dpi.scale_x()
    }
}

impl fmt::Display for MonitorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} dpi {}x{} (scale {:.2}) {} {} #{}",
            self.device_id,
            self.position,
            self.bounds,
            self.dpi.x,
            self.dpi.y,
            self.scale_factor(),
            self.manufacturer,
            self.model,
            self.serial,
        )
    }
}

/// The primary record of a snapshot, if any.
pub fn primary(monitors: &[MonitorRecord]) -> Option<&MonitorRecord> {
    monitors.iter().find(|m| m.is_primary)
}

/// Serialize a snapshot as pretty-printed JSON.
#[cfg(feature = "serde")]
pub fn snapshot_json(monitors: &[MonitorRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(monitors)?)
}

/// Builds [`MonitorRecord`] snapshots.
///
/// Nothing is cached; every call to [`enumerate`](Self::enumerate) queries
/// both sources again.
pub struct MonitorEnumerator {
    displays: Arc<dyn DisplaySystem>,
    metadata: Arc<dyn MetadataSource>,
    correlation: Box<dyn Correlation>,
    config: Config,
}

impl MonitorEnumerator {
    /// Create an enumerator over the given display and metadata sources,
    /// pairing them with [`OrdinalCorrelation`] and the default [`Config`].
    pub fn new(displays: Arc<dyn DisplaySystem>, metadata: Arc<dyn MetadataSource>) -> Self {
        Self {
            displays,
            metadata,
            correlation: Box::new(OrdinalCorrelation),
            config: Config::default(),
        }
    }

    /// Enumerator backed by the current platform.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemDisplays), Arc::new(SystemMetadata))
    }

    /// Use a different strategy for pairing metadata with displays.
    pub fn with_correlation(mut self, correlation: impl Correlation + 'static) -> Self {
        self.correlation = Box::new(correlation);
        self
    }

    /// Use `config` for DPI fallback and unknown-field labels.
    pub fn with_config(mut self, config: Config) -> Self {
        self.set_config(config);
        self
    }

    /// Replace the configuration for subsequent snapshots.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The display capability this enumerator queries.
    pub fn display_system(&self) -> &Arc<dyn DisplaySystem> {
        &self.displays
    }

    /// Take a fresh snapshot of all monitors in native display order.
    ///
    /// Fails only when the display list or the metadata source fails outright.
    pub fn enumerate(&self) -> Result<Vec<MonitorRecord>> {
        let displays = self.displays.list_displays()?;
        let mut ids = self.metadata.list_hardware_ids()?;
        metadata::normalize_instance_names(&mut ids);

        let paired = self.correlation.correlate(&displays, ids);
        let primary_bounds = displays.iter().find(|d| d.is_primary).map(|d| d.bounds);
        if primary_bounds.is_none() && !displays.is_empty() {
            log::warn!("no primary display among {} displays", displays.len());
        }

        let records: Vec<MonitorRecord> = displays
            .into_iter()
            .zip(paired)
            .map(|(display, id)| self.record(display, id, primary_bounds.as_ref()))
            .collect();

        log::debug!("enumerated {} monitors", records.len());
        Ok(records)
    }

    fn record(
        &self,
        display: DisplayInfo,
        id: Option<HardwareId>,
        primary_bounds: Option<&Rect>,
    ) -> MonitorRecord {
        let dpi = match self.displays.dpi_of(display.handle) {
            Ok(dpi) if dpi.x > 0 && dpi.y > 0 => dpi,
            Ok(dpi) => {
                log::warn!("{} reported DPI {}x{}, using fallback", display.device_id, dpi.x, dpi.y);
                self.config.fallback_dpi
            }
            Err(e) => {
                log::warn!("DPI query for {} failed: {}", display.device_id, e);
                self.config.fallback_dpi
            }
        };

        let position = if display.is_primary {
            PositionDescriptor::Primary
        } else {
            match primary_bounds {
                Some(primary) => PositionDescriptor::relative_to(&display.bounds, primary),
                None => PositionDescriptor::Overlapping,
            }
        };

        let id = id.unwrap_or_default();
        MonitorRecord {
            device_id: display.device_id,
            handle: display.handle,
            is_primary: display.is_primary,
            bounds: display.bounds,
            work_area: display.work_area,
            dpi,
            manufacturer: self.or_unknown(id.manufacturer),
            model: self.or_unknown(id.model),
            serial: self.or_unknown(id.serial),
            position,
        }
    }

    fn or_unknown(&self, value: String) -> String {
        if value.is_empty() {
            self.config.unknown_label.clone()
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::{FakeDisplaySystem, FakeMetadataSource};

    const UNKNOWN_LABEL: &str = crate::config::UNKNOWN;

    fn enumerator(displays: FakeDisplaySystem, metadata: FakeMetadataSource) -> MonitorEnumerator {
        MonitorEnumerator::new(Arc::new(displays), Arc::new(metadata))
    }

    fn id(manufacturer: &str, model: &str, serial: &str) -> HardwareId {
        HardwareId {
            instance_name: r"DISPLAY\X\1".to_string(),
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            serial: serial.to_string(),
        }
    }

    #[test]
    fn test_position_precedence() {
        let primary = Rect::new(0, 0, 1920, 1080);
        let cases = [
            (Rect::new(-1920, 0, 1920, 1080), PositionDescriptor::LeftOf),
            (Rect::new(1920, 0, 2560, 1440), PositionDescriptor::RightOf),
            (Rect::new(0, -1080, 1920, 1080), PositionDescriptor::Above),
            (Rect::new(0, 1080, 1920, 1080), PositionDescriptor::Below),
            (Rect::new(100, 100, 800, 600), PositionDescriptor::Overlapping),
            // Diagonal: left wins over above.
            (Rect::new(-1920, -1080, 1920, 1080), PositionDescriptor::LeftOf),
            // Diagonal: right wins over below.
            (Rect::new(1920, 1080, 1920, 1080), PositionDescriptor::RightOf),
        ];
        for (bounds, expected) in cases {
            assert_eq!(PositionDescriptor::relative_to(&bounds, &primary), expected, "{bounds}");
        }
    }

    #[test]
    fn test_primary_is_always_primary() {
        let fake = FakeDisplaySystem::new()
            .with_monitor(Rect::new(-1920, 0, 1920, 1080), false)
            .with_monitor(Rect::new(0, 0, 1920, 1080), true)
            .with_monitor(Rect::new(1920, 0, 1920, 1080), false)
            .with_monitor(Rect::new(0, -1080, 1920, 1080), false);
        let records = enumerator(fake, FakeMetadataSource::empty()).enumerate().unwrap();

        let positions: Vec<_> = records.iter().map(|r| r.position).collect();
        assert_eq!(
            positions,
            [
                PositionDescriptor::LeftOf,
                PositionDescriptor::Primary,
                PositionDescriptor::RightOf,
                PositionDescriptor::Above,
            ]
        );
        assert_eq!(records.iter().filter(|r| r.position == PositionDescriptor::Primary).count(), 1);
    }

    #[test]
    fn test_two_displays_one_metadata_entry() {
        let fake = FakeDisplaySystem::new()
            .with_monitor(Rect::new(0, 0, 1920, 1080), true)
            .with_monitor(Rect::new(1920, 0, 1920, 1080), false);
        let metadata = FakeMetadataSource::new(vec![id("DEL", "U2720Q", "ABC123")]);
        let records = enumerator(fake, metadata).enumerate().unwrap();

        assert_eq!(records[0].manufacturer, "DEL");
        assert_eq!(records[0].model, "U2720Q");
        assert_eq!(records[0].serial, "ABC123");
        assert_eq!(records[1].manufacturer, UNKNOWN_LABEL);
        assert_eq!(records[1].model, UNKNOWN_LABEL);
        assert_eq!(records[1].serial, UNKNOWN_LABEL);
    }

    #[test]
    fn test_empty_fields_become_unknown() {
        let fake = FakeDisplaySystem::new().with_monitor(Rect::new(0, 0, 1920, 1080), true);
        let metadata = FakeMetadataSource::new(vec![id("SAM", "", "")]);
        let records = enumerator(fake, metadata).enumerate().unwrap();
        assert_eq!(records[0].manufacturer, "SAM");
        assert_eq!(records[0].model, UNKNOWN_LABEL);
        assert_eq!(records[0].serial, UNKNOWN_LABEL);
    }

    #[test]
    fn test_dpi_failure_falls_back() {
        let fake = FakeDisplaySystem::new()
            .with_monitor(Rect::new(0, 0, 1920, 1080), true)
            .with_monitor_dpi(Rect::new(1920, 0, 3840, 2160), false, None);
        let records = enumerator(fake, FakeMetadataSource::empty()).enumerate().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].dpi, Dpi::new(96, 96));
        assert_eq!(records[1].scale_factor(), 1.0);
    }

    #[test]
    fn test_dpi_is_reported() {
        let fake = FakeDisplaySystem::new().with_monitor_dpi(
            Rect::new(0, 0, 3840, 2160),
            true,
            Some(Dpi::new(144, 144)),
        );
        let records = enumerator(fake, FakeMetadataSource::empty()).enumerate().unwrap();
        assert_eq!(records[0].scale_factor(), 1.5);
    }

    #[test]
    fn test_metadata_failure_is_fatal() {
        let fake = FakeDisplaySystem::new().with_monitor(Rect::new(0, 0, 1920, 1080), true);
        let result = enumerator(fake, FakeMetadataSource::failing()).enumerate();
        assert!(matches!(result, Err(Error::MetadataUnavailable(_))));
    }

    #[test]
    fn test_missing_primary_is_degraded() {
        let fake = FakeDisplaySystem::new()
            .with_monitor(Rect::new(0, 0, 1920, 1080), false)
            .with_monitor(Rect::new(1920, 0, 1920, 1080), false);
        let records = enumerator(fake, FakeMetadataSource::empty()).enumerate().unwrap();
        assert!(records.iter().all(|r| r.position == PositionDescriptor::Overlapping));
        assert!(primary(&records).is_none());
    }

    #[test]
    fn test_custom_unknown_label() {
        let fake = FakeDisplaySystem::new().with_monitor(Rect::new(0, 0, 1920, 1080), true);
        let records = enumerator(fake, FakeMetadataSource::empty())
            .with_config(Config::new().with_unknown_label("Unbekannt"))
            .enumerate()
            .unwrap();
        assert_eq!(records[0].model, "Unbekannt");
    }

    #[test]
    fn test_display_summary() {
        let fake = FakeDisplaySystem::new().with_monitor(Rect::new(0, 0, 1920, 1080), true);
        let metadata = FakeMetadataSource::new(vec![id("DEL", "U2720Q", "ABC123")]);
        let records = enumerator(fake, metadata).enumerate().unwrap();
        let line = records[0].to_string();
        assert!(line.contains("[primary]"));
        assert!(line.contains("1920x1080+0+0"));
        assert!(line.contains("U2720Q"));
    }
}
