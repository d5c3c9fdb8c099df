use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::grid::{GridError, GridModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    pub const fn as_str(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Facing::Left | Facing::Right)
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the controlled entity. Serializes as the decision-service
/// request body: `{"x": 5, "y": 5, "facing": "right"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActorState {
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
}

impl ActorState {
    pub fn cell(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(ActorState),
    /// Clamping left the position where it was; the stored snapshot is untouched.
    Blocked(ActorState),
}

impl MoveOutcome {
    pub fn state(&self) -> ActorState {
        match self {
            MoveOutcome::Moved(state) | MoveOutcome::Blocked(state) => *state,
        }
    }

    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved(_))
    }
}

pub const DEFAULT_FACING: Facing = Facing::Right;

#[derive(Debug, Clone)]
pub struct Actor {
    grid: GridModel,
    current: ActorState,
}

impl Actor {
    pub fn new(grid: GridModel, start: (i32, i32), facing: Facing) -> Result<Self, GridError> {
        let (x, y) = start;
        if !grid.contains(x, y) {
            return Err(GridError::OutOfRange {
                x,
                y,
                width: grid.width(),
                height: grid.height(),
            });
        }
        Ok(Self {
            grid,
            current: ActorState { x, y, facing },
        })
    }

    pub fn at_center(grid: GridModel) -> Self {
        let (x, y) = grid.center();
        Self {
            grid,
            current: ActorState {
                x,
                y,
                facing: DEFAULT_FACING,
            },
        }
    }

    pub fn state(&self) -> ActorState {
        self.current
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) -> MoveOutcome {
        let (x, y) = self.grid.clamp(
            self.current.x.saturating_add(dx),
            self.current.y.saturating_add(dy),
        );
        if (x, y) == self.current.cell() {
            return MoveOutcome::Blocked(self.current);
        }

        let facing = facing_for_delta(dx, dy, self.current.facing).unwrap_or(self.current.facing);
        let next = ActorState { x, y, facing };
        self.current = next;
        MoveOutcome::Moved(next)
    }
}

fn facing_for_delta(dx: i32, dy: i32, previous: Facing) -> Option<Facing> {
    if dx == 0 && dy == 0 {
        return None;
    }

    let horizontal = match dx.unsigned_abs().cmp(&dy.unsigned_abs()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => previous.is_horizontal(),
    };

    let facing = match (horizontal, dx > 0, dy > 0) {
        (true, true, _) => Facing::Right,
        (true, false, _) => Facing::Left,
        (false, _, true) => Facing::Down,
        (false, _, false) => Facing::Up,
    };
    Some(facing)
}
