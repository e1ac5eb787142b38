/// ----- CAR ACTUATOR -----
/// The dispatcher only ever asks the car where it is and tells it to move one
/// floor. `MockCar` is the simulated car used by the binary.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use shared_resources::direction::Direction;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CarError {
    #[error("cannot step the car in direction {0}")]
    NoTravelDirection(Direction),

    #[error("car fault: {0}")]
    Fault(String),
}

pub trait Car {
    fn current_floor(&self) -> Result<i32, CarError>;

    /// Move exactly one floor in `direction` (`Up` or `Down`).
    fn step(&self, direction: Direction) -> Result<(), CarError>;
}

impl<C: Car + ?Sized> Car for Arc<C> {
    fn current_floor(&self) -> Result<i32, CarError> {
        (**self).current_floor()
    }

    fn step(&self, direction: Direction) -> Result<(), CarError> {
        (**self).step(direction)
    }
}

#[derive(Debug)]
pub struct MockCar {
    floor: Mutex<i32>,
}

impl MockCar {
    pub fn new(start_floor: i32) -> Self {
        MockCar { floor: Mutex::new(start_floor) }
    }
}

impl Car for MockCar {
    fn current_floor(&self) -> Result<i32, CarError> {
        self.floor
            .lock()
            .map(|floor| *floor)
            .map_err(|_| CarError::Fault("position lock poisoned".to_string()))
    }

    fn step(&self, direction: Direction) -> Result<(), CarError> {
        if !direction.is_moving() {
            return Err(CarError::NoTravelDirection(direction));
        }
        let mut floor = self
            .floor
            .lock()
            .map_err(|_| CarError::Fault("position lock poisoned".to_string()))?;
        *floor += direction.step();
        Ok(())
    }
}
