//! Input edge detection shared by every menu in a pool.
//!
//! Hosts report level-sensed input ("is this action held right now") through
//! [`InputSource`]. [`InputGate`] turns that into discrete edges by comparing a
//! frame clock against one cooldown deadline shared by all menus and all
//! actions: an accepted edge on any action throttles every other action too.
use std::time::Duration;

use enum_map::{Enum, EnumMap};

use crate::systems::audio::{AudioCue, MenuSound};

pub const DEFAULT_NORMAL_INTERVAL: Duration = Duration::from_millis(80);
pub const DEFAULT_FAST_INTERVAL: Duration = Duration::from_millis(20);
pub const DEFAULT_TRANSITION_INTERVAL: Duration = Duration::from_millis(350);

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Up,
    Down,
    Left,
    Right,
    Accept,
    Cancel,
}

impl MenuAction {
    pub const fn sound(self) -> MenuSound {
        match self {
            Self::Up | Self::Down | Self::Left | Self::Right => MenuSound::Navigate,
            Self::Accept => MenuSound::Select,
            Self::Cancel => MenuSound::Back,
        }
    }
}

/// Horizontal direction reported to left/right listeners and value controls.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

/// Level-sensed input queries. Implementations resolve logical actions to
/// whichever physical controls are bound for the current input method.
pub trait InputSource {
    fn is_held(&self, action: MenuAction) -> bool;
    fn is_fast_modifier_held(&self) -> bool;
    fn is_gamepad(&self) -> bool;
}

/// A frozen view of held actions for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    held: EnumMap<MenuAction, bool>,
    fast: bool,
    gamepad: bool,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_held(mut self, action: MenuAction) -> Self {
        self.held[action] = true;
        self
    }

    pub fn with_fast_modifier(mut self) -> Self {
        self.fast = true;
        self
    }

    pub fn with_gamepad(mut self) -> Self {
        self.gamepad = true;
        self
    }

    pub fn set_held(&mut self, action: MenuAction, held: bool) {
        self.held[action] = held;
    }

    pub fn set_fast_modifier(&mut self, held: bool) {
        self.fast = held;
    }

    pub fn set_gamepad(&mut self, gamepad: bool) {
        self.gamepad = gamepad;
    }

    pub fn release_all(&mut self) {
        self.held = EnumMap::default();
        self.fast = false;
    }
}

impl InputSource for InputSnapshot {
    fn is_held(&self, action: MenuAction) -> bool {
        self.held[action]
    }

    fn is_fast_modifier_held(&self) -> bool {
        self.fast
    }

    fn is_gamepad(&self) -> bool {
        self.gamepad
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputTiming {
    /// Cooldown after an ordinary accepted edge.
    pub normal: Duration,
    /// Cooldown after up/down navigation while the fast modifier is held.
    pub fast: Duration,
    /// Cooldown after a submenu transition or going back.
    pub transition: Duration,
}

impl Default for InputTiming {
    fn default() -> Self {
        Self {
            normal: DEFAULT_NORMAL_INTERVAL,
            fast: DEFAULT_FAST_INTERVAL,
            transition: DEFAULT_TRANSITION_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputGate {
    timing: InputTiming,
    now: Duration,
    deadline: Duration,
}

impl InputGate {
    pub fn new(timing: InputTiming) -> Self {
        Self {
            timing,
            now: Duration::ZERO,
            deadline: Duration::ZERO,
        }
    }

    pub fn timing(&self) -> InputTiming {
        self.timing
    }

    pub fn set_timing(&mut self, timing: InputTiming) {
        self.timing = timing;
    }

    /// Frame clock, accumulated from every `advance` call.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Moves the frame clock forward. Negative, NaN and overflowing deltas are ignored.
    pub fn advance(&mut self, elapsed_seconds: f32) {
        if let Ok(elapsed) = Duration::try_from_secs_f32(elapsed_seconds) {
            self.now = self.now.saturating_add(elapsed);
        }
    }

    pub fn is_open(&self) -> bool {
        self.now >= self.deadline
    }

    pub fn is_held(&self, input: &dyn InputSource, action: MenuAction) -> bool {
        input.is_held(action)
    }

    /// Returns true when `action` is held and the shared cooldown has
    /// elapsed. An accepted edge re-arms the cooldown with the normal interval
    /// and plays the action's cue; a rejected one has no side effects.
    pub fn just_pressed(
        &mut self,
        input: &dyn InputSource,
        audio: &mut dyn AudioCue,
        action: MenuAction,
    ) -> bool {
        if !input.is_held(action) || !self.is_open() {
            return false;
        }
        self.rearm(self.timing.normal);
        audio.play(action.sound());
        true
    }

    pub fn rearm(&mut self, interval: Duration) {
        self.deadline = self.now.saturating_add(interval);
    }

    pub fn rearm_navigation(&mut self, fast: bool) {
        let interval = if fast {
            self.timing.fast
        } else {
            self.timing.normal
        };
        self.rearm(interval);
    }

    pub fn rearm_transition(&mut self) {
        self.rearm(self.timing.transition);
    }
}

/// Collaborators a menu needs while it runs its frame.
pub struct FrameInput<'a> {
    pub gate: &'a mut InputGate,
    pub input: &'a dyn InputSource,
    pub audio: &'a mut dyn AudioCue,
}

impl FrameInput<'_> {
    pub fn fast_modifier_held(&self) -> bool {
        self.input.is_fast_modifier_held()
    }
}

/// Edges accepted by one menu during the current frame.
///
/// Each action is polled against the gate at most once per frame. Later
/// queries within the same frame reuse the first answer, so a single press is
/// seen by every stage of the frame and produces a single cue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEdges {
    polled: EnumMap<MenuAction, bool>,
    pressed: EnumMap<MenuAction, bool>,
    fast: bool,
}

impl FrameEdges {
    pub fn reset(&mut self, fast: bool) {
        *self = Self {
            fast,
            ..Self::default()
        };
    }

    pub fn poll(&mut self, frame: &mut FrameInput<'_>, action: MenuAction) -> bool {
        if !self.polled[action] {
            self.polled[action] = true;
            self.pressed[action] = frame.gate.just_pressed(frame.input, &mut *frame.audio, action);
        }
        self.pressed[action]
    }

    pub fn pressed(&self, action: MenuAction) -> bool {
        self.pressed[action]
    }

    pub fn fast_modifier_held(&self) -> bool {
        self.fast
    }

    /// Left/right edge of this frame, left winning ties.
    pub fn direction(&self) -> Option<Direction> {
        if self.pressed[MenuAction::Left] {
            Some(Direction::Left)
        } else if self.pressed[MenuAction::Right] {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_pressed_is_throttled_until_interval_elapses() {
        let mut gate = InputGate::default();
        let mut audio: Vec<MenuSound> = Vec::new();
        let input = InputSnapshot::new().with_held(MenuAction::Down);

        assert!(gate.just_pressed(&input, &mut audio, MenuAction::Down));
        gate.advance(0.05);
        assert!(!gate.just_pressed(&input, &mut audio, MenuAction::Down));
        gate.advance(0.05);
        assert!(gate.just_pressed(&input, &mut audio, MenuAction::Down));

        assert_eq!(audio, vec![MenuSound::Navigate, MenuSound::Navigate]);
    }

    #[test]
    fn cooldown_is_shared_across_actions() {
        let mut gate = InputGate::default();
        let mut audio: Vec<MenuSound> = Vec::new();
        let input = InputSnapshot::new()
            .with_held(MenuAction::Accept)
            .with_held(MenuAction::Left);

        assert!(gate.just_pressed(&input, &mut audio, MenuAction::Accept));
        assert!(!gate.just_pressed(&input, &mut audio, MenuAction::Left));
        assert_eq!(audio, vec![MenuSound::Select]);
    }

    #[test]
    fn released_action_never_produces_an_edge() {
        let mut gate = InputGate::default();
        let mut audio: Vec<MenuSound> = Vec::new();
        let input = InputSnapshot::new();

        assert!(!gate.just_pressed(&input, &mut audio, MenuAction::Up));
        assert!(gate.is_open());
        assert!(audio.is_empty());
    }

    #[test]
    fn fast_navigation_uses_short_interval() {
        let mut gate = InputGate::default();
        gate.rearm_navigation(true);
        assert_eq!(gate.deadline(), DEFAULT_FAST_INTERVAL);
        gate.rearm_navigation(false);
        assert_eq!(gate.deadline(), DEFAULT_NORMAL_INTERVAL);
        gate.rearm_transition();
        assert_eq!(gate.deadline(), DEFAULT_TRANSITION_INTERVAL);
    }

    #[test]
    fn advance_ignores_invalid_deltas() {
        let mut gate = InputGate::default();
        gate.advance(-1.0);
        gate.advance(f32::NAN);
        assert_eq!(gate.now(), Duration::ZERO);
        gate.advance(0.25);
        assert_eq!(gate.now(), Duration::from_secs_f32(0.25));
    }

    #[test]
    fn frame_edges_poll_each_action_once() {
        let mut gate = InputGate::default();
        let mut audio: Vec<MenuSound> = Vec::new();
        let input = InputSnapshot::new().with_held(MenuAction::Right);
        let mut edges = FrameEdges::default();

        {
            let mut frame = FrameInput {
                gate: &mut gate,
                input: &input,
                audio: &mut audio,
            };
            assert!(edges.poll(&mut frame, MenuAction::Right));
            assert!(edges.poll(&mut frame, MenuAction::Right));
            assert!(!edges.poll(&mut frame, MenuAction::Left));
        }

        assert_eq!(audio, vec![MenuSound::Navigate]);
        assert_eq!(edges.direction(), Some(Direction::Right));

        edges.reset(true);
        assert!(!edges.pressed(MenuAction::Right));
        assert!(edges.fast_modifier_held());
    }
}
