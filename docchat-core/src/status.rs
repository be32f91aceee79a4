//! Transient status messages per UI region.
//!
//! A success message clears itself [`SUCCESS_CLEAR_DELAY`] after it was set.
//! Any later `set`/`clear` on the same region bumps the region's generation,
//! which disarms the pending clear: a stale timer can never wipe a newer
//! message.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::types::{Region, Status, StatusKind};

/// How long a success message stays visible.
pub const SUCCESS_CLEAR_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Default)]
struct Slot {
    status: Option<Status>,
    generation: u64,
    /// Pending auto-clear: (due time, generation it was armed for)
    clear_at: Option<(Instant, u64)>,
}

/// Renders transient status text into named regions.
#[derive(Debug, Default)]
pub struct StatusPresenter {
    slots: BTreeMap<Region, Slot>,
}

impl StatusPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the region's content.
    pub fn set_status(&mut self, region: Region, text: impl Into<String>, kind: StatusKind) {
        self.set_status_at(region, text, kind, Instant::now());
    }

    /// Replace the region's content as of `now`.
    pub fn set_status_at(
        &mut self,
        region: Region,
        text: impl Into<String>,
        kind: StatusKind,
        now: Instant,
    ) {
        let slot = self.slots.entry(region).or_default();
        slot.generation += 1;
        slot.status = Some(Status {
            text: text.into(),
            kind,
        });
        slot.clear_at = match kind {
            StatusKind::Success => Some((now + SUCCESS_CLEAR_DELAY, slot.generation)),
            StatusKind::Loading | StatusKind::Error => None,
        };
        tracing::trace!(region = region.name(), ?kind, "Status set");
    }

    /// Empty the region.
    pub fn clear_status(&mut self, region: Region) {
        let slot = self.slots.entry(region).or_default();
        slot.generation += 1;
        slot.status = None;
        slot.clear_at = None;
    }

    /// Current content of a region.
    pub fn status(&self, region: Region) -> Option<&Status> {
        self.slots.get(&region).and_then(|s| s.status.as_ref())
    }

    /// Fire every auto-clear that is due at `now`.
    ///
    /// Returns the regions that were cleared.
    pub fn tick(&mut self, now: Instant) -> Vec<Region> {
        let mut cleared = Vec::new();
        for (region, slot) in self.slots.iter_mut() {
            if let Some((due, generation)) = slot.clear_at {
                if due <= now && generation == slot.generation {
                    slot.status = None;
                    slot.clear_at = None;
                    cleared.push(*region);
                }
            }
        }
        cleared
    }

    /// Earliest pending auto-clear, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots
            .values()
            .filter_map(|slot| slot.clear_at.map(|(due, _)| due))
            .min()
    }
}
