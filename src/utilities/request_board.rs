/// ----- REQUEST BOARD -----
/// Per-floor "someone is waiting here to go up/down" flags, shared between
/// the call panels that set them and the dispatcher that serves them.

use std::sync::{Mutex, MutexGuard, PoisonError};

use shared_resources::direction::Direction;
use shared_resources::floor_range::FloorRange;

use super::error::{DispatchError, DispatchResult};

/// Copy of both request arrays, lowest floor first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub floors: FloorRange,
    pub up: Vec<bool>,
    pub down: Vec<bool>,
}

#[derive(Debug)]
struct Flags {
    up: Vec<bool>,
    down: Vec<bool>,
}

impl Flags {
    fn lane_mut(&mut self, direction: Direction) -> Option<&mut Vec<bool>> {
        match direction {
            Direction::Up => Some(&mut self.up),
            Direction::Down => Some(&mut self.down),
            Direction::Idle => None,
        }
    }

    fn any_at(&self, index: usize) -> bool {
        self.up[index] || self.down[index]
    }
}

#[derive(Debug)]
pub struct RequestBoard {
    floors: FloorRange,
    // both lanes behind one lock
    flags: Mutex<Flags>,
}

impl RequestBoard {
    pub fn new(floors: FloorRange) -> Self {
        RequestBoard {
            floors,
            flags: Mutex::new(Flags {
                up: vec![false; floors.len()],
                down: vec![false; floors.len()],
            }),
        }
    }

    pub fn set_request(&self, direction: Direction, floor: i32) -> DispatchResult<()> {
        let reject = |reason| DispatchError::InvalidRequest { direction, floor, reason };
        let index = self.floors.index_of(floor).ok_or_else(|| reject("floor is not served"))?;
        match direction {
            Direction::Idle => return Err(reject("idle is not a travel direction")),
            Direction::Up if floor == self.floors.max() => return Err(reject("there is no floor above")),
            Direction::Down if floor == self.floors.min() => return Err(reject("there is no floor below")),
            _ => {}
        }

        let mut flags = self.lock();
        let lane = flags.lane_mut(direction).ok_or(DispatchError::InvalidDirection(direction))?;
        lane[index] = true;
        Ok(())
    }

    pub fn clear_request(&self, direction: Direction, floor: i32) -> DispatchResult<()> {
        let index = self.index_of(floor)?;
        let mut flags = self.lock();
        let lane = flags.lane_mut(direction).ok_or(DispatchError::InvalidDirection(direction))?;
        lane[index] = false;
        Ok(())
    }

    /// Whether a rider waits at `floor` to travel in `direction`. For `Idle`,
    /// whether anyone waits at `floor` at all.
    pub fn has_waiting_request(&self, direction: Direction, floor: i32) -> DispatchResult<bool> {
        let index = self.index_of(floor)?;
        let flags = self.lock();
        Ok(match direction {
            Direction::Up => flags.up[index],
            Direction::Down => flags.down[index],
            Direction::Idle => flags.any_at(index),
        })
    }

    /// Distance from `from_floor` to the farthest floor in `direction` that
    /// has a request of either kind, or 0 when there is none. A request at
    /// `from_floor` itself counts as distance 0.
    pub fn max_distance_to_move(&self, direction: Direction, from_floor: i32) -> DispatchResult<usize> {
        let start = self.index_of(from_floor)?;
        let flags = self.lock();
        let farthest = match direction {
            Direction::Up => (start..flags.up.len()).rev().find(|&i| flags.any_at(i)).map(|i| i - start),
            Direction::Down => (0..=start).find(|&i| flags.any_at(i)).map(|i| start - i),
            Direction::Idle => return Err(DispatchError::InvalidDirection(direction)),
        };
        Ok(farthest.unwrap_or(0))
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let flags = self.lock();
        BoardSnapshot {
            floors: self.floors,
            up: flags.up.clone(),
            down: flags.down.clone(),
        }
    }

    fn index_of(&self, floor: i32) -> DispatchResult<usize> {
        self.floors
            .index_of(floor)
            .ok_or(DispatchError::InvalidFloor { floor, range: self.floors })
    }

    // Flags are never left half-written, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
