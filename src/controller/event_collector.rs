//! gilrs backed input source
//!
//! The collector drains pending gilrs events once per tick and folds them
//! into a [`SnapshotState`] the mapping engine reads. Only one gamepad is
//! followed at a time; when it disconnects the snapshot goes neutral and the
//! collector looks for another pad every `rediscovery_interval`.
//!
//! ```text
//! Initializing ──initialize()──► Collecting ──poll()──► &SnapshotState
//! ```

use crate::controller::snapshot::{Analog, Button, SnapshotState};
use gilrs::{Axis, Event, EventType, GamepadId, Gilrs};
use statum::{machine, state};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Clone, Debug)]
pub struct CollectorSettings {
    /// Pause between searches while no gamepad is connected
    pub rediscovery_interval: Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            rediscovery_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize collector: {0}")]
    InitializationError(String),
}

#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

#[machine]
#[derive(Debug)]
pub struct EventCollector<S: CollectionState> {
    gilrs: Gilrs,

    // Followed gamepad
    active_gamepad: Option<GamepadId>,

    settings: CollectorSettings,

    // Current readings of the followed gamepad
    snapshot: SnapshotState,

    next_discovery: Instant,

    // Avoids repeating the "no gamepad" warning every search
    reported_missing: bool,
}

impl<S: CollectionState> EventCollector<S> {
    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    pub fn active_gamepad(&self) -> Option<GamepadId> {
        self.active_gamepad
    }

    pub fn gamepad_name(&self) -> Option<String> {
        self.active_gamepad
            .map(|id| self.gilrs.gamepad(id).name().to_string())
    }

    /// Follows the first connected gamepad, if any
    fn discover(&mut self) {
        let found = self
            .gilrs
            .gamepads()
            .find(|(_, gamepad)| gamepad.is_connected())
            .map(|(id, gamepad)| {
                info!("Selected gamepad: {} ({})", gamepad.name(), id);
                id
            });
        match found {
            Some(id) => {
                self.active_gamepad = Some(id);
                self.reported_missing = false;
            }
            None if !self.reported_missing => {
                warn!("No gamepad connected, mapping stays idle until one appears");
                self.reported_missing = true;
            }
            None => {}
        }
        self.next_discovery = Instant::now() + self.settings.rediscovery_interval;
    }
}

impl EventCollector<Initializing> {
    pub fn create(settings: Option<CollectorSettings>) -> Result<Self, CollectorError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating Event Collector with settings: {:?}", settings);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(CollectorError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(
            gilrs,
            None,
            settings,
            SnapshotState::new(),
            Instant::now(),
            false,
        ))
    }

    pub fn initialize(mut self) -> Result<EventCollector<Collecting>, CollectorError> {
        let count = self.gilrs.gamepads().count();
        info!("Found {} gamepads", count);
        for (id, gamepad) in self.gilrs.gamepads() {
            debug!(
                "  ID: {}, Name: {}, UUID: {:?}",
                id,
                gamepad.name(),
                gamepad.uuid()
            );
        }
        self.discover();

        info!("Event Collector initialized, transitioning to Collecting state");
        Ok(self.transition())
    }
}

impl EventCollector<Collecting> {
    /// Applies every pending event and returns the current readings
    pub fn poll(&mut self) -> &SnapshotState {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            self.handle_event(id, event);
        }

        if self.active_gamepad.is_none() && Instant::now() >= self.next_discovery {
            self.discover();
        }
        &self.snapshot
    }

    fn handle_event(&mut self, id: GamepadId, event: EventType) {
        match event {
            EventType::Connected => {
                if self.active_gamepad.is_none() {
                    info!("Gamepad {} connected", id);
                    self.active_gamepad = Some(id);
                    self.reported_missing = false;
                }
                return;
            }
            EventType::Disconnected if Some(id) == self.active_gamepad => {
                warn!("Gamepad {} disconnected, releasing all inputs", id);
                self.active_gamepad = None;
                self.snapshot.clear();
                self.next_discovery = Instant::now();
                return;
            }
            _ => {}
        }

        if self.active_gamepad != Some(id) {
            return;
        }

        match event {
            EventType::ButtonPressed(button, _) => {
                if let Some(button) = map_button(button) {
                    debug!("Button pressed: {}", button);
                    self.snapshot.set_button(button, true);
                }
            }
            EventType::ButtonReleased(button, _) => {
                if let Some(button) = map_button(button) {
                    debug!("Button released: {}", button);
                    self.snapshot.set_button(button, false);
                }
            }
            EventType::ButtonChanged(button, value, _) => {
                if let Some(analog) = map_trigger(button) {
                    self.snapshot.set_axis(analog, value);
                }
            }
            EventType::AxisChanged(axis, value, _) => {
                if let Some((analog, value)) = map_axis(axis, value) {
                    self.snapshot.set_axis(analog, value);
                }
            }
            _ => {}
        }
    }
}

fn map_button(button: gilrs::Button) -> Option<Button> {
    match button {
        gilrs::Button::South => Some(Button::A),
        gilrs::Button::East => Some(Button::B),
        gilrs::Button::West => Some(Button::X),
        gilrs::Button::North => Some(Button::Y),
        gilrs::Button::Start => Some(Button::Start),
        gilrs::Button::Select => Some(Button::Back),
        gilrs::Button::LeftTrigger => Some(Button::LeftShoulder),
        gilrs::Button::RightTrigger => Some(Button::RightShoulder),
        gilrs::Button::LeftThumb => Some(Button::LeftStick),
        gilrs::Button::RightThumb => Some(Button::RightStick),
        gilrs::Button::DPadUp => Some(Button::DpadUp),
        gilrs::Button::DPadDown => Some(Button::DpadDown),
        gilrs::Button::DPadLeft => Some(Button::DpadLeft),
        gilrs::Button::DPadRight => Some(Button::DpadRight),
        _ => None,
    }
}

/// Analog triggers reported as buttons with a value
fn map_trigger(button: gilrs::Button) -> Option<Analog> {
    match button {
        gilrs::Button::LeftTrigger2 => Some(Analog::LeftTrigger),
        gilrs::Button::RightTrigger2 => Some(Analog::RightTrigger),
        _ => None,
    }
}

/// gilrs reports stick Y up-positive, snapshots are down-positive
fn map_axis(axis: Axis, value: f32) -> Option<(Analog, f32)> {
    match axis {
        Axis::LeftStickX => Some((Analog::LeftX, value)),
        Axis::LeftStickY => Some((Analog::LeftY, -value)),
        Axis::RightStickX => Some((Analog::RightX, value)),
        Axis::RightStickY => Some((Analog::RightY, -value)),
        Axis::LeftZ => Some((Analog::LeftTrigger, value)),
        Axis::RightZ => Some((Analog::RightTrigger, value)),
        _ => None,
    }
}
