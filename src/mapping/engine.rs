//! Controller input mapping engine
//!
//! [`InputMapper`] is evaluated once per poll tick. It reads an
//! [`InputSnapshot`], resolves the active [`Mode`] and turns press/release
//! edges and stick deflections into host operators, view deltas and
//! synthetic input.
//!
//! # Tick
//!
//! ```text
//! reconcile trigger mouse buttons
//!        │
//! resolve mode ──(changed)──► flush
//!        │
//! temp shift released? ──yes──► restore previous mode, end tick
//!        │
//! left:  6 buttons ─► trigger ─► stick
//! right: 6 buttons ─► trigger ─► stick
//! misc:  back ─► start
//! ```
//!
//! A mode change in the middle of a tick ends that tick, so no tick mixes
//! two mode tables.
//!
//! # Lifecycle
//!
//! ```text
//! Stopped ──start()──► Running ──stop()/start()──► Stopped
//!                        │  ▲
//!                        └──┘ reset() (flush, back to mode 0)
//! ```

use crate::controller::snapshot::{Button, ControlId, InputSnapshot, SideId};
use crate::mapping::axis::{read_stick, Granularity, StickReading, ViewMotion};
use crate::mapping::config::{Action, AxisSettings, ButtonBinding, Direction, Mode, Preferences};
use crate::mapping::cursor::{CursorAccumulator, WindowInfo};
use crate::mapping::dispatch::{Dispatcher, EventInjector, Host, MouseButton, Origin};
use crate::mapping::edge::{DirectionKey, Edge, EdgeTracker, StateKey};
use crate::mapping::mode::{ModeResolver, Resolution, ShiftStart, SwitchKey, TempShift};
use std::collections::HashMap;
use std::ops::ControlFlow;
use tracing::{debug, info};

/// Maps controller input onto view navigation, tools and synthetic input
pub struct InputMapper<I: EventInjector> {
    tracker: EdgeTracker,
    modes: ModeResolver,
    cursor: CursorAccumulator,
    dispatcher: Dispatcher<I>,
    overlay_controls: HashMap<ControlId, bool>,
    overlay_held: bool,
    running: bool,
    mode_label: String,
}

impl<I: EventInjector> InputMapper<I> {
    pub fn new(injector: I) -> Self {
        Self {
            tracker: EdgeTracker::new(),
            modes: ModeResolver::new(),
            cursor: CursorAccumulator::new(),
            dispatcher: Dispatcher::new(injector),
            overlay_controls: HashMap::new(),
            overlay_held: false,
            running: false,
            mode_label: String::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mode_index(&self) -> usize {
        self.modes.mode_index()
    }

    /// Name of the mode used by the last tick
    pub fn mode_label(&self) -> &str {
        &self.mode_label
    }

    pub fn temp_shift(&self) -> Option<TempShift> {
        self.modes.temp_shift()
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.dispatcher.is_held(button)
    }

    pub fn cursor(&self) -> &CursorAccumulator {
        &self.cursor
    }

    pub fn injector(&self) -> &I {
        self.dispatcher.injector()
    }

    pub fn injector_mut(&mut self) -> &mut I {
        self.dispatcher.injector_mut()
    }

    /// Starts mapping, or stops it when already running
    pub fn start(&mut self, prefs: &mut Preferences, host: &mut dyn Host) -> bool {
        if self.running {
            self.stop(prefs, host);
            return false;
        }
        self.running = true;
        info!("Input mapper started with {} modes", prefs.modes.len());
        true
    }

    pub fn stop(&mut self, prefs: &mut Preferences, host: &mut dyn Host) {
        self.reset(host);
        self.running = false;
        prefs.update_mode_statuses(None);
        host.redraw_indicators();
        info!("Input mapper stopped");
    }

    /// Releases everything held and rewinds to mode 0
    pub fn reset(&mut self, host: &mut dyn Host) {
        self.flush(host);
        self.cursor.reset();
        self.modes.reset();
        self.mode_label.clear();
        debug!("Input mapper reset");
    }

    /// Explicit mode selection from outside the controller
    pub fn set_mode(&mut self, prefs: &mut Preferences, host: &mut dyn Host, target: usize) -> bool {
        let enabled = prefs.enabled_indices();
        match self.modes.jump(&enabled, target) {
            Some(index) => {
                self.adopt_mode(prefs, host, index);
                prefs.modes_index = index;
                true
            }
            None => {
                debug!("Mode {} not selectable", target);
                false
            }
        }
    }

    /// A real mouse moved inside `window`
    pub fn notify_mouse_move(&mut self, window: &WindowInfo, x: f32, y: f32) {
        self.cursor.notify_mouse_move(window, x, y);
    }

    /// Evaluates one tick
    pub fn apply(&mut self, prefs: &mut Preferences, input: &dyn InputSnapshot, host: &mut dyn Host) {
        if !self.running {
            return;
        }
        self.reconcile_trigger_buttons(input);

        let window = host.window();
        if let Some(window) = &window {
            self.cursor.ensure_defaults(window);
        }

        let index = match self.modes.resolve(prefs) {
            Resolution::Idle => {
                self.flush(host);
                prefs.update_mode_statuses(None);
                self.mode_label.clear();
                return;
            }
            Resolution::Active { index, changed } => {
                if changed {
                    self.flush(host);
                    debug!("Mode {} adopted", index);
                }
                index
            }
        };
        prefs.update_mode_statuses(Some(index));
        self.mode_label.clone_from(&prefs.modes[index].name);

        if let Some(shift) = self.modes.temp_shift() {
            if !input.control_pressed(shift.control) {
                let enabled = prefs.enabled_indices();
                match self.modes.end_shift(&enabled) {
                    Some(restored) => self.adopt_mode(prefs, host, restored),
                    None => debug!("Temporary shift ended, previous mode is disabled"),
                }
                return;
            }
        }

        let mode = prefs.modes[index].clone();
        if self
            .process_mode(prefs, input, host, window, index, &mode)
            .is_break()
        {
            debug!("Mode changed mid-tick, rest of the tick skipped");
        }
    }

    fn process_mode(
        &mut self,
        prefs: &mut Preferences,
        input: &dyn InputSnapshot,
        host: &mut dyn Host,
        window: Option<WindowInfo>,
        index: usize,
        mode: &Mode,
    ) -> ControlFlow<()> {
        for side in SideId::ALL {
            let config = mode.side(side);
            for button in side.buttons() {
                self.process_control(
                    prefs,
                    host,
                    index,
                    ControlId::Button(button),
                    config.binding(button),
                    input.button(button),
                )?;
            }
            self.process_control(
                prefs,
                host,
                index,
                ControlId::Trigger(side),
                &config.trigger,
                input.trigger_pressed(side),
            )?;
            self.process_stick(prefs, input, host, window, index, side, &config.axis)?;
        }
        for button in Button::MISC {
            self.process_control(
                prefs,
                host,
                index,
                ControlId::Button(button),
                mode.binding(button),
                input.button(button),
            )?;
        }
        ControlFlow::Continue(())
    }

    fn process_control(
        &mut self,
        prefs: &mut Preferences,
        host: &mut dyn Host,
        index: usize,
        control: ControlId,
        binding: &ButtonBinding,
        pressed: bool,
    ) -> ControlFlow<()> {
        let action = binding.action;
        if !pressed && !action.is_mode_switch() {
            self.modes.forget_switch(control);
        }
        if action.is_none() {
            return ControlFlow::Continue(());
        }

        if action.is_mode_switch() {
            if self.modes.observe_switch(control, pressed) == Edge::Pressed {
                if action == Action::TempModeShift {
                    self.activate_temp_shift(prefs, host, control, binding.target_mode.as_deref());
                } else {
                    self.run_mode_switch(prefs, host, action);
                }
            }
            return self.still_in(index);
        }

        if action.is_overlay() {
            self.process_overlay(host, control, action, pressed);
            return ControlFlow::Continue(());
        }

        match self.tracker.observe(StateKey { mode: index, control }, pressed) {
            Edge::Pressed => {
                debug!("{} pressed: {}", control, action);
                self.dispatcher.begin(host, action, Origin::Control(control));
            }
            Edge::Released => {
                debug!("{} released: {}", control, action);
                self.dispatcher.end(action);
            }
            Edge::Unchanged => {}
        }
        self.still_in(index)
    }

    #[allow(clippy::too_many_arguments)]
    fn process_stick(
        &mut self,
        prefs: &mut Preferences,
        input: &dyn InputSnapshot,
        host: &mut dyn Host,
        window: Option<WindowInfo>,
        index: usize,
        side: SideId,
        axis: &AxisSettings,
    ) -> ControlFlow<()> {
        let (axis_x, axis_y) = side.stick();
        match read_stick(axis, input.axis(axis_x), input.axis(axis_y)) {
            StickReading::Motions(motions) => {
                for motion in motions {
                    self.apply_motion(host, window, motion);
                }
                ControlFlow::Continue(())
            }
            StickReading::Direction {
                active,
                granularity,
            } => self.process_directions(prefs, host, index, side, axis, active, granularity),
        }
    }

    fn apply_motion(&mut self, host: &mut dyn Host, window: Option<WindowInfo>, motion: ViewMotion) {
        if let ViewMotion::Pointer { x, y, speed } = motion {
            let Some(window) = window else {
                return;
            };
            if let Some(delta) = self.cursor.accumulate(&window, x, y, speed) {
                self.dispatcher.mouse_move(delta);
            }
            return;
        }

        let Some(view) = host.viewport() else {
            return;
        };
        match motion {
            ViewMotion::Pan { dx, dy, speed } => view.pan(dx, dy, speed),
            ViewMotion::Dolly { amount, speed } => view.dolly(amount, speed),
            ViewMotion::Orbit { yaw, pitch } => view.orbit(yaw, pitch),
            ViewMotion::Rotate { yaw, pitch } => view.rotate_in_place(yaw, pitch),
            ViewMotion::Zoom { amount } => view.zoom(amount),
            ViewMotion::Pointer { .. } => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn process_directions(
        &mut self,
        prefs: &mut Preferences,
        host: &mut dyn Host,
        index: usize,
        side: SideId,
        axis: &AxisSettings,
        active: Option<Direction>,
        granularity: Granularity,
    ) -> ControlFlow<()> {
        let slots = &axis.directions;
        let target =
            active.filter(|direction| granularity.allows(*direction) && !slots.get(*direction).is_none());
        let tracked = target.filter(|direction| !slots.get(*direction).is_mode_switch());
        let key = |direction| DirectionKey {
            mode: index,
            stick: side,
            direction,
        };

        // releases first, so a sweep never holds two directions at once
        for direction in Direction::ALL {
            if Some(direction) == tracked {
                continue;
            }
            if self.tracker.observe_direction(key(direction), false) == Edge::Released {
                debug!("{} stick {} released", side, direction);
                self.dispatcher.end(slots.get(direction));
            }
        }

        // mode switches survive the flush they cause, like switch buttons
        for direction in Direction::ALL {
            let action = slots.get(direction);
            let switch = SwitchKey::Direction {
                stick: side,
                direction,
            };
            let held = Some(direction) == target;
            if !action.is_mode_switch() {
                if !held {
                    self.modes.forget_switch(switch);
                }
                continue;
            }
            if self.modes.observe_switch(switch, held) == Edge::Pressed {
                debug!("{} stick {} pressed: {}", side, direction, action);
                self.run_mode_switch(prefs, host, action);
                self.still_in(index)?;
            }
        }

        if let Some(direction) = tracked {
            if self.tracker.observe_direction(key(direction), true) == Edge::Pressed {
                let action = slots.get(direction);
                debug!("{} stick {} pressed: {}", side, direction, action);
                if action.is_overlay() {
                    debug!("{} ignored on a stick direction", action);
                } else {
                    self.dispatcher.begin(
                        host,
                        action,
                        Origin::Direction {
                            stick: side,
                            direction,
                        },
                    );
                }
            }
        }
        self.still_in(index)
    }

    /// Press edge of NEXT_MODE or PREV_MODE; a shift needs a held control
    fn run_mode_switch(&mut self, prefs: &mut Preferences, host: &mut dyn Host, action: Action) {
        match action {
            Action::NextMode => {
                self.change_mode(prefs, host, 1);
            }
            Action::PrevMode => {
                self.change_mode(prefs, host, -1);
            }
            _ => debug!("{} ignored on a stick direction", action),
        }
    }

    fn process_overlay(&mut self, host: &mut dyn Host, control: ControlId, action: Action, pressed: bool) {
        let previous = self.overlay_controls.get(&control).copied().unwrap_or(false);
        if previous == pressed {
            return;
        }
        self.overlay_controls.insert(control, pressed);

        match (action, pressed) {
            (Action::ToggleOverlay, true) => {
                let visible = !host.overlay_visible();
                set_overlay(host, visible);
            }
            (Action::ShowOverlay, true) => {
                self.overlay_held = true;
                set_overlay(host, true);
            }
            (Action::ShowOverlay, false) if self.overlay_held => {
                self.overlay_held = false;
                set_overlay(host, false);
            }
            _ => {}
        }
    }

    fn activate_temp_shift(
        &mut self,
        prefs: &mut Preferences,
        host: &mut dyn Host,
        control: ControlId,
        target: Option<&str>,
    ) {
        let enabled = prefs.enabled_indices();
        let target_index = target.and_then(|name| prefs.find_enabled(name));
        match self.modes.begin_shift(&enabled, control, target_index) {
            ShiftStart::Rejected => debug!("Temporary shift on {} rejected", control),
            ShiftStart::Jumped(index) => self.adopt_mode(prefs, host, index),
            ShiftStart::CycleForward => {
                self.change_mode(prefs, host, 1);
            }
        }
    }

    fn change_mode(&mut self, prefs: &mut Preferences, host: &mut dyn Host, delta: i32) -> bool {
        let enabled = prefs.enabled_indices();
        if enabled.is_empty() {
            self.flush(host);
            return false;
        }
        match self.modes.cycle(&enabled, delta) {
            Some(index) => {
                self.adopt_mode(prefs, host, index);
                true
            }
            None => false,
        }
    }

    fn adopt_mode(&mut self, prefs: &mut Preferences, host: &mut dyn Host, index: usize) {
        self.flush(host);
        self.modes.commit(index);
        prefs.update_mode_statuses(Some(index));
        if let Some(mode) = prefs.modes.get(index) {
            self.mode_label.clone_from(&mode.name);
            info!("Switched to mode '{}' ({})", mode.name, index);
        }
        host.redraw_indicators();
    }

    /// Releases every held output and forgets all per-mode state
    fn flush(&mut self, host: &mut dyn Host) {
        let released = self.dispatcher.release_all();
        if self.overlay_held {
            self.overlay_held = false;
            set_overlay(host, false);
        }
        self.overlay_controls.clear();
        self.tracker.clear();
        if released > 0 {
            debug!("Flush released {} mouse buttons", released);
        }
    }

    /// Releases trigger-held mouse buttons whose trigger is already up
    fn reconcile_trigger_buttons(&mut self, input: &dyn InputSnapshot) {
        let stale: Vec<MouseButton> = self
            .dispatcher
            .held()
            .filter(|(_, origin)| {
                origin
                    .trigger_side()
                    .is_some_and(|side| !input.trigger_pressed(side))
            })
            .map(|(button, _)| button)
            .collect();
        for button in stale {
            debug!("Trigger up, releasing {:?}", button);
            self.dispatcher.release_mouse(button);
        }
    }

    fn still_in(&self, index: usize) -> ControlFlow<()> {
        if self.modes.mode_index() == index {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}

fn set_overlay(host: &mut dyn Host, visible: bool) {
    if host.overlay_visible() != visible {
        host.set_overlay_visible(visible);
    }
}

#[cfg(test)]
mod tests;
