/// ----- DISPATCH ENGINE -----
/// Decides, once per tick, whether the car keeps going, turns around or
/// stops, clears the requests it serves on the way and moves the car at most
/// one floor.

use std::sync::Arc;

use shared_resources::direction::Direction;
use shared_resources::status_message::StatusMessage;

use super::car::Car;
use super::error::DispatchResult;
use super::request_board::RequestBoard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarState {
    /// Floor the car is at after the last completed tick.
    pub floor: i32,
    pub direction: Direction,
}

/// What a completed tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub floor: i32,
    pub direction: Direction,
    /// The car turned around here and dropped the old direction's request.
    pub reversed: bool,
    /// Requests cleared at `floor` as served.
    pub served: Vec<Direction>,
}

pub struct DispatchEngine<C: Car> {
    board: Arc<RequestBoard>,
    car: C,
    state: CarState,
}

impl<C: Car> DispatchEngine<C> {
    /// A new engine starts idle.
    pub fn new(board: Arc<RequestBoard>, car: C, start_floor: i32) -> Self {
        Self::with_state(board, car, CarState { floor: start_floor, direction: Direction::Idle })
    }

    pub fn with_state(board: Arc<RequestBoard>, car: C, state: CarState) -> Self {
        DispatchEngine { board, car, state }
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    pub fn board(&self) -> &Arc<RequestBoard> {
        &self.board
    }

    pub fn car(&self) -> &C {
        &self.car
    }

    /// Direction the car should take from `floor`, given where it is heading
    /// now. Does not touch the board.
    pub fn pick_next_direction(&self, floor: i32) -> DispatchResult<Direction> {
        match self.state.direction {
            Direction::Idle => {
                let up = self.board.max_distance_to_move(Direction::Up, floor)?;
                let down = self.board.max_distance_to_move(Direction::Down, floor)?;
                Ok(match (up, down) {
                    (0, 0) => Direction::Idle,
                    (_, 0) => Direction::Up,
                    (0, _) => Direction::Down,
                    (up, down) if up <= down => Direction::Up,
                    _ => Direction::Down,
                })
            }
            current => {
                if self.board.max_distance_to_move(current, floor)? != 0 {
                    Ok(current)
                } else if self.board.max_distance_to_move(current.reverse(), floor)? != 0 {
                    Ok(current.reverse())
                } else {
                    Ok(Direction::Idle)
                }
            }
        }
    }

    /// One dispatch step. On error nothing about the car's direction has
    /// changed and the next tick starts over.
    pub fn tick(&mut self) -> DispatchResult<TickReport> {
        let floor = self.car.current_floor()?;
        let previous = self.state.direction;
        let picked = self.pick_next_direction(floor)?;

        // Turning around drops the old direction's request at this floor.
        let reversed = previous.is_moving() && picked == previous.reverse();
        if reversed {
            self.board.clear_request(previous, floor)?;
        }

        let served = self.serve_floor(picked, floor)?;

        if picked.is_moving() {
            self.car.step(picked)?;
        }
        self.state = CarState { floor: floor + picked.step(), direction: picked };

        Ok(TickReport { floor, direction: picked, reversed, served })
    }

    /// Status picture built from one board snapshot and the car position.
    pub fn status(&self, tick_error: Option<String>) -> StatusMessage {
        let snapshot = self.board.snapshot();
        StatusMessage {
            min_floor: snapshot.floors.min(),
            max_floor: snapshot.floors.max(),
            floor: self.car.current_floor().ok(),
            direction: self.state.direction,
            up_requests: snapshot.up,
            down_requests: snapshot.down,
            tick_error,
        }
    }

    // A car that keeps moving picks up riders heading its way. A car that
    // stops here takes everyone waiting.
    fn serve_floor(&self, picked: Direction, floor: i32) -> DispatchResult<Vec<Direction>> {
        let mut served = Vec::new();
        let candidates: Vec<Direction> = if picked.is_moving() {
            vec![picked]
        } else {
            Direction::iter_moving().collect()
        };
        for direction in candidates {
            if self.board.has_waiting_request(direction, floor)? {
                self.board.clear_request(direction, floor)?;
                served.push(direction);
            }
        }
        Ok(served)
    }
}
