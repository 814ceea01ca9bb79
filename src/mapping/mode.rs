//! Active mode selection among the enabled modes
//!
//! The resolver only moves indices around. Flushing held outputs and
//! notifying the host after a change is the engine's job; every method that
//! changes the index reports the new index so the engine can do that.
//!
//! ```text
//!   Idle (no enabled mode) ──► Active(i) ──► TempShift { previous: i, current: j }
//!                                 ▲                  │
//!                                 └──── release ─────┘
//! ```

use crate::controller::snapshot::{ControlId, SideId};
use crate::mapping::config::{Direction, Preferences};
use crate::mapping::edge::Edge;
use std::collections::HashMap;
use tracing::debug;

/// Bookkeeping of an active temporary shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempShift {
    pub previous_index: usize,
    pub control: ControlId,
}

/// Source of a mode switch, tracked independently of the active mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchKey {
    Control(ControlId),
    Direction { stick: SideId, direction: Direction },
}

impl From<ControlId> for SwitchKey {
    fn from(control: ControlId) -> Self {
        SwitchKey::Control(control)
    }
}

/// Outcome of resolving the active mode at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No enabled mode
    Idle,
    /// `changed` is set when the index differs from the last committed one
    Active { index: usize, changed: bool },
}

/// What a temporary shift press should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftStart {
    Rejected,
    /// The index already moved to the named target
    Jumped(usize),
    /// No usable target, cycle forward instead
    CycleForward,
}

#[derive(Debug, Default)]
pub struct ModeResolver {
    mode_index: usize,
    last_mode_index: Option<usize>,
    temp_shift: Option<TempShift>,
    switch_controls: HashMap<SwitchKey, bool>,
}

impl ModeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode_index(&self) -> usize {
        self.mode_index
    }

    pub fn temp_shift(&self) -> Option<TempShift> {
        self.temp_shift
    }

    /// Clamps and validates the remembered index for this tick
    pub fn resolve(&mut self, prefs: &Preferences) -> Resolution {
        if prefs.modes.is_empty() {
            return Resolution::Idle;
        }
        let enabled = prefs.enabled_indices();
        if enabled.is_empty() {
            return Resolution::Idle;
        }

        self.mode_index = self.mode_index.min(prefs.modes.len() - 1);
        if !enabled.contains(&self.mode_index) {
            self.mode_index = fallback_index(self.mode_index, &enabled);
        }

        let changed = self.last_mode_index != Some(self.mode_index);
        if changed {
            self.last_mode_index = Some(self.mode_index);
        }
        Resolution::Active {
            index: self.mode_index,
            changed,
        }
    }

    /// Records that the engine adopted `index`
    pub fn commit(&mut self, index: usize) {
        self.mode_index = index;
        self.last_mode_index = Some(index);
    }

    /// Rotates by `delta` within the enabled subset
    pub fn cycle(&mut self, enabled: &[usize], delta: i32) -> Option<usize> {
        let first = *enabled.first()?;
        if !enabled.contains(&self.mode_index) {
            self.mode_index = first;
        }
        if enabled.len() < 2 {
            return None;
        }
        let slot = enabled.iter().position(|&i| i == self.mode_index)?;
        let next = (slot as i64 + delta as i64).rem_euclid(enabled.len() as i64) as usize;
        if next == slot {
            return None;
        }
        self.mode_index = enabled[next];
        Some(self.mode_index)
    }

    /// Explicit jump, refused for disabled or already active targets
    pub fn jump(&mut self, enabled: &[usize], target: usize) -> Option<usize> {
        if !enabled.contains(&target) || target == self.mode_index {
            return None;
        }
        self.mode_index = target;
        Some(target)
    }

    /// Edge of a mode switch source, tracked independently of any mode
    pub fn observe_switch(&mut self, key: impl Into<SwitchKey>, pressed: bool) -> Edge {
        let key = key.into();
        let previous = self.switch_controls.get(&key).copied().unwrap_or(false);
        let edge = Edge::between(previous, pressed);
        match edge {
            Edge::Pressed => {
                self.switch_controls.insert(key, true);
            }
            Edge::Released => {
                self.switch_controls.remove(&key);
            }
            Edge::Unchanged => {}
        }
        edge
    }

    /// Records a release seen while the source is bound to something else
    pub fn forget_switch(&mut self, key: impl Into<SwitchKey>) {
        self.switch_controls.remove(&key.into());
    }

    pub fn begin_shift(
        &mut self,
        enabled: &[usize],
        control: ControlId,
        target: Option<usize>,
    ) -> ShiftStart {
        if self.temp_shift.is_some() || enabled.len() < 2 {
            return ShiftStart::Rejected;
        }
        self.temp_shift = Some(TempShift {
            previous_index: self.mode_index,
            control,
        });
        debug!(
            "Temporary shift from mode {} held by {}",
            self.mode_index, control
        );
        match target {
            Some(index) if enabled.contains(&index) && index != self.mode_index => {
                self.mode_index = index;
                ShiftStart::Jumped(index)
            }
            _ => ShiftStart::CycleForward,
        }
    }

    /// Ends the shift; returns the restored index if that mode is still enabled
    pub fn end_shift(&mut self, enabled: &[usize]) -> Option<usize> {
        let shift = self.temp_shift.take()?;
        // the release edge is consumed here, drop it so the next press counts
        self.switch_controls.remove(&SwitchKey::Control(shift.control));
        if enabled.contains(&shift.previous_index) {
            self.mode_index = shift.previous_index;
            Some(shift.previous_index)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.mode_index = 0;
        self.last_mode_index = None;
        self.temp_shift = None;
        self.switch_controls.clear();
    }
}

/// Smallest enabled index at or after `current`, else the first enabled one
pub fn fallback_index(current: usize, enabled: &[usize]) -> usize {
    enabled
        .iter()
        .copied()
        .find(|&index| index >= current)
        .or_else(|| enabled.first().copied())
        .unwrap_or(0)
}
