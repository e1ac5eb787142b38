use thiserror::Error;

use shared_resources::direction::Direction;
use shared_resources::floor_range::FloorRange;

use super::car::CarError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("floor {floor} is outside {range}")]
    InvalidFloor { floor: i32, range: FloorRange },

    #[error("direction {0} is not valid here")]
    InvalidDirection(Direction),

    #[error("cannot request {direction} at floor {floor}: {reason}")]
    InvalidRequest {
        direction: Direction,
        floor: i32,
        reason: &'static str,
    },

    #[error("car actuator unavailable: {0}")]
    ActuatorUnavailable(#[from] CarError),
}

impl DispatchError {
    /// Caller errors are rejected before any state changes; everything else
    /// is an operational fault that the next tick retries.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, DispatchError::ActuatorUnavailable(_))
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
