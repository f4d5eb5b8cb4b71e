#![forbid(unsafe_code)]

//! Shared per-corner occupancy ledger.
//!
//! Every notification in a corner reads and mutates the same
//! [`LedgerEntry`]: it reserves its payload when constructed, joins when it
//! starts animating, and leaves when it finishes. All operations run under a
//! single mutex so that notifications created and destroyed in overlapping
//! windows always observe a consistent entry.
//!
//! # Invariants
//!
//! 1. `occupied_extent` never goes negative.
//! 2. `occupied_extent` only grows through [`CornerLedger::reserve`] and only
//!    shrinks through [`CornerLedger::leave`] / [`CornerLedger::release`].
//! 3. Once every reservation in a corner has been returned, the entry is
//!    exactly empty (`active_count == 0`, `occupied_extent == 0.0`).
//!
//! # Failure Modes
//!
//! - Unbalanced `leave`/`release` calls saturate at zero instead of wrapping.
//! - A poisoned mutex is recovered; each critical section leaves the entry
//!   consistent before it can panic.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::corner::Corner;

/// Snapshot of one corner's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedgerEntry {
    /// Notifications currently animating in the corner.
    pub active_count: u32,
    /// Vertical space claimed by the corner's notifications, margins included.
    pub occupied_extent: f64,
    /// Constructed notifications whose payload is still accrued.
    pub reserved: u32,
}

impl LedgerEntry {
    /// The entry holds no notifications and no extent.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_count == 0 && self.reserved == 0 && self.occupied_extent == 0.0
    }
}

/// Result of [`CornerLedger::join`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// 1-based rank among the corner's active notifications.
    pub index: u32,
    /// Occupied extent observed under the same lock as the increment.
    pub occupied_extent: f64,
}

impl Slot {
    /// This notification is the only active one in its corner.
    #[inline]
    #[must_use]
    pub fn is_sole_occupant(&self) -> bool {
        self.index == 1
    }
}

/// What a departing notification contributed to its corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Departure {
    /// Payload accrued at construction (`height + original margin_y`).
    pub payload: f64,
    /// Vertical margin at the time of leaving (stacked margin if adjusted).
    pub margin_y: f64,
    /// Surface height.
    pub height: f64,
}

impl Departure {
    /// Extent returned when siblings remain in the corner.
    ///
    /// Kept as `margin_y - (payload - height)`: only the stacking adjustment
    /// to the margin is unwound, the rest stays with the siblings.
    #[inline]
    #[must_use]
    pub fn partial_share(&self) -> f64 {
        self.margin_y - (self.payload - self.height)
    }
}

/// Per-corner occupancy counters shared by all notifications.
///
/// Create one with [`CornerLedger::new`] and share it through an [`Arc`], or
/// use the process-wide [`CornerLedger::global`] instance.
#[derive(Debug, Default)]
pub struct CornerLedger {
    entries: Mutex<[LedgerEntry; 4]>,
}

impl CornerLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide ledger shared by notifications that were not given one.
    pub fn global() -> Arc<CornerLedger> {
        static GLOBAL: OnceLock<Arc<CornerLedger>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(CornerLedger::new())))
    }

    fn lock(&self) -> MutexGuard<'_, [LedgerEntry; 4]> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of a corner's entry.
    #[must_use]
    pub fn entry(&self, corner: Corner) -> LedgerEntry {
        self.lock()[corner.index()]
    }

    /// Accrue a newly constructed notification's payload.
    ///
    /// Happens before the notification joins, so a second notification
    /// constructed while the first is still sliding in already sees the
    /// first one's extent.
    pub fn reserve(&self, corner: Corner, payload: f64) -> LedgerEntry {
        let mut entries = self.lock();
        let entry = &mut entries[corner.index()];
        entry.occupied_extent += payload;
        entry.reserved = entry.reserved.saturating_add(1);
        let snapshot = *entry;
        drop(entries);

        tracing::debug!(
            target: "perch.ledger",
            corner = %corner,
            payload,
            occupied_extent = snapshot.occupied_extent,
            reserved = snapshot.reserved,
            "payload reserved"
        );
        snapshot
    }

    /// Register an animating notification and assign its slot.
    pub fn join(&self, corner: Corner) -> Slot {
        let mut entries = self.lock();
        let entry = &mut entries[corner.index()];
        entry.active_count = entry.active_count.saturating_add(1);
        let slot = Slot {
            index: entry.active_count,
            occupied_extent: entry.occupied_extent,
        };
        drop(entries);

        tracing::debug!(
            target: "perch.ledger",
            corner = %corner,
            slot = slot.index,
            occupied_extent = slot.occupied_extent,
            "joined corner"
        );
        slot
    }

    /// Deregister a finished notification and unwind its extent.
    ///
    /// If other notifications are still active in the corner only
    /// [`Departure::partial_share`] is subtracted; otherwise the full payload
    /// is returned.
    pub fn leave(&self, corner: Corner, departure: Departure) -> LedgerEntry {
        let mut entries = self.lock();
        let entry = &mut entries[corner.index()];
        entry.active_count = entry.active_count.saturating_sub(1);
        let siblings_remain = entry.active_count > 0;
        let returned = if siblings_remain {
            departure.partial_share()
        } else {
            departure.payload
        };
        entry.occupied_extent -= returned;
        entry.reserved = entry.reserved.saturating_sub(1);
        settle(corner, entry);
        let snapshot = *entry;
        drop(entries);

        tracing::debug!(
            target: "perch.ledger",
            corner = %corner,
            siblings_remain,
            returned,
            active_count = snapshot.active_count,
            occupied_extent = snapshot.occupied_extent,
            "left corner"
        );
        snapshot
    }

    /// Return the reservation of a notification that never joined.
    pub fn release(&self, corner: Corner, payload: f64) -> LedgerEntry {
        let mut entries = self.lock();
        let entry = &mut entries[corner.index()];
        entry.occupied_extent -= payload;
        entry.reserved = entry.reserved.saturating_sub(1);
        settle(corner, entry);
        let snapshot = *entry;
        drop(entries);

        tracing::debug!(
            target: "perch.ledger",
            corner = %corner,
            payload,
            occupied_extent = snapshot.occupied_extent,
            "reservation released"
        );
        snapshot
    }
}

/// Clamp the extent and clear residual drift once the corner is vacated.
fn settle(corner: Corner, entry: &mut LedgerEntry) {
    if entry.occupied_extent < 0.0 {
        tracing::warn!(
            target: "perch.ledger",
            corner = %corner,
            occupied_extent = entry.occupied_extent,
            "occupied extent went negative; clamping to zero"
        );
        entry.occupied_extent = 0.0;
    }
    if entry.reserved == 0 && entry.active_count == 0 && entry.occupied_extent != 0.0 {
        tracing::debug!(
            target: "perch.ledger",
            corner = %corner,
            residual = entry.occupied_extent,
            "corner vacated; clearing residual extent"
        );
        entry.occupied_extent = 0.0;
    }
}
