//! Pairing of hardware metadata with live displays.

use crate::display::DisplayInfo;
use crate::metadata::HardwareId;

/// Strategy that assigns metadata entries to displays.
///
/// The returned vector has exactly one slot per display, in display order.
pub trait Correlation: Send + Sync {
    /// Assign each display at most one metadata entry.
    fn correlate(
        &self,
        displays: &[DisplayInfo],
        metadata: Vec<HardwareId>,
    ) -> Vec<Option<HardwareId>>;
}

/// Pairs display `i` with metadata entry `i`.
///
/// The two lists share no key. If the sources enumerate in different orders
/// the pairs are wrong; displays beyond the metadata count get nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinalCorrelation;

impl Correlation for OrdinalCorrelation {
    fn correlate(
        &self,
        displays: &[DisplayInfo],
        metadata: Vec<HardwareId>,
    ) -> Vec<Option<HardwareId>> {
        if metadata.len() != displays.len() {
            log::warn!(
                "{} metadata entries for {} displays, pairing by position",
                metadata.len(),
                displays.len()
            );
        }

        let mut metadata = metadata.into_iter();
        displays.iter().map(|_| metadata.next()).collect()
    }
}
