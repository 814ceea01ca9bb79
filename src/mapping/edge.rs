//! Press/release detection for discrete controls and stick directions
//!
//! State is keyed by mode so that a button held across a mode switch is seen
//! as a fresh press under the new mode's table. Only changes are stored; a
//! flush empties both maps.

use crate::controller::snapshot::{ControlId, SideId};
use crate::mapping::config::Direction;
use std::collections::HashMap;

/// Transition of a boolean reading relative to the stored state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
    Unchanged,
}

impl Edge {
    pub const fn between(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => Edge::Pressed,
            (true, false) => Edge::Released,
            _ => Edge::Unchanged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub mode: usize,
    pub control: ControlId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectionKey {
    pub mode: usize,
    pub stick: SideId,
    pub direction: Direction,
}

#[derive(Debug, Default)]
pub struct EdgeTracker {
    buttons: HashMap<StateKey, bool>,
    directions: HashMap<DirectionKey, bool>,
}

impl EdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, key: StateKey, pressed: bool) -> Edge {
        observe_in(&mut self.buttons, key, pressed)
    }

    pub fn observe_direction(&mut self, key: DirectionKey, active: bool) -> Edge {
        observe_in(&mut self.directions, key, active)
    }

    pub fn clear(&mut self) {
        self.buttons.clear();
        self.directions.clear();
    }
}

fn observe_in<K: std::hash::Hash + Eq>(map: &mut HashMap<K, bool>, key: K, current: bool) -> Edge {
    let previous = map.get(&key).copied().unwrap_or(false);
    let edge = Edge::between(previous, current);
    if edge != Edge::Unchanged {
        map.insert(key, current);
    }
    edge
}
