//! Shell boards compared slot by slot to detect puzzle completion.

use tidepool_core::{BoardSlot, ReferenceArrangement, ShellColor};

/// Four-slot shell board laid out as `0 1 / 2 3`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShellBoard {
    slots: [Option<ShellColor>; BoardSlot::COUNT],
}

impl ShellBoard {
    /// Board with every slot empty.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            slots: [None; BoardSlot::COUNT],
        }
    }

    /// Board with the provided slot contents.
    #[must_use]
    pub const fn from_slots(slots: [Option<ShellColor>; BoardSlot::COUNT]) -> Self {
        Self { slots }
    }

    /// Fully populated board showing a reference arrangement.
    #[must_use]
    pub fn reference(arrangement: ReferenceArrangement) -> Self {
        Self {
            slots: arrangement.slots().map(Some),
        }
    }

    /// Slot contents in slot order.
    #[must_use]
    pub const fn slots(&self) -> [Option<ShellColor>; BoardSlot::COUNT] {
        self.slots
    }

    /// Shell stored in the slot, if any.
    #[must_use]
    pub fn occupant(&self, slot: BoardSlot) -> Option<ShellColor> {
        self.slots[slot.index()]
    }

    /// Stores `color` in an empty slot; returns `false` if the slot is taken.
    pub fn insert(&mut self, slot: BoardSlot, color: ShellColor) -> bool {
        let entry = &mut self.slots[slot.index()];
        if entry.is_some() {
            return false;
        }
        *entry = Some(color);
        true
    }

    /// Empties the slot, returning the shell it held.
    pub fn take(&mut self, slot: BoardSlot) -> Option<ShellColor> {
        self.slots[slot.index()].take()
    }
}
