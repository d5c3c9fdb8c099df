use tracing::{debug, info, trace};

use crate::actor::{Actor, ActorState, MoveOutcome};
use crate::grid::GridModel;
use crate::report::DecisionReporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

impl InputAction {
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "Up" | "up" | "w" | "W" => Some(InputAction::MoveUp),
            "ArrowDown" | "Down" | "down" | "s" | "S" => Some(InputAction::MoveDown),
            "ArrowLeft" | "Left" | "left" | "a" | "A" => Some(InputAction::MoveLeft),
            "ArrowRight" | "Right" | "right" | "d" | "D" => Some(InputAction::MoveRight),
            _ => None,
        }
    }

    pub const fn delta(self) -> (i32, i32) {
        match self {
            InputAction::MoveUp => (0, -1),
            InputAction::MoveDown => (0, 1),
            InputAction::MoveLeft => (-1, 0),
            InputAction::MoveRight => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Blocked(ActorState),
    Moved(ActorState),
}

impl KeyOutcome {
    /// Recognized keys swallow the host's default handling even when blocked.
    /// Hosts with a default key action (scrolling, focus changes) consult
    /// this; winit delivers keys with no default action, so `run_app` only
    /// needs [`KeyOutcome::moved_state`].
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }

    pub fn moved_state(&self) -> Option<ActorState> {
        match self {
            KeyOutcome::Moved(state) => Some(*state),
            _ => None,
        }
    }
}

/// Sole writer of the actor snapshot. Each key is handled to completion
/// before the next one is accepted.
pub struct InputRouter {
    actor: Actor,
    reporter: Box<dyn DecisionReporter>,
}

impl InputRouter {
    pub fn new(actor: Actor, reporter: Box<dyn DecisionReporter>) -> Self {
        Self { actor, reporter }
    }

    pub fn actor(&self) -> ActorState {
        self.actor.state()
    }

    pub fn grid(&self) -> &GridModel {
        self.actor.grid()
    }

    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        let Some(action) = InputAction::from_key_name(key) else {
            trace!(key, "key_ignored");
            return KeyOutcome::Ignored;
        };
        self.handle_action(action)
    }

    pub fn handle_action(&mut self, action: InputAction) -> KeyOutcome {
        let (dx, dy) = action.delta();
        match self.actor.move_by(dx, dy) {
            MoveOutcome::Moved(state) => {
                info!(
                    x = state.x,
                    y = state.y,
                    facing = %state.facing,
                    "actor_moved"
                );
                self.reporter.report(state);
                KeyOutcome::Moved(state)
            }
            MoveOutcome::Blocked(state) => {
                debug!(action = ?action, x = state.x, y = state.y, "move_blocked");
                KeyOutcome::Blocked(state)
            }
        }
    }
}
