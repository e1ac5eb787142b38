use std::ops::RangeInclusive;

use super::direction::Direction;

/// Read-only picture of the dispatcher: both request arrays (lowest floor
/// first), where the car is and where it is heading.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub min_floor: i32,
    pub max_floor: i32,
    /// `None` when the car could not be read.
    pub floor: Option<i32>,
    pub direction: Direction,
    pub up_requests: Vec<bool>,
    pub down_requests: Vec<bool>,
    /// Why the most recent tick was aborted, if it was.
    pub tick_error: Option<String>,
}

impl StatusMessage {
    pub fn floors(&self) -> RangeInclusive<i32> {
        self.min_floor..=self.max_floor
    }

    /// `(up, down)` flags at `floor`; `(false, false)` outside the range.
    pub fn requests_at(&self, floor: i32) -> (bool, bool) {
        let index = i64::from(floor) - i64::from(self.min_floor);
        if index < 0 {
            return (false, false);
        }
        let index = index as usize;
        (
            self.up_requests.get(index).copied().unwrap_or(false),
            self.down_requests.get(index).copied().unwrap_or(false),
        )
    }

    /// Three strips of `x`/`_`, one character per floor, lowest floor first.
    pub fn render(&self) -> String {
        let car = self.floors().map(|floor| self.floor == Some(floor));
        format!(
            "{}up request\n{}down request\n{}elevator\n",
            strip(self.up_requests.iter().copied()),
            strip(self.down_requests.iter().copied()),
            strip(car),
        )
    }
}

fn strip(flags: impl Iterator<Item = bool>) -> String {
    flags.map(|set| if set { 'x' } else { '_' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> StatusMessage {
        StatusMessage {
            min_floor: -1,
            max_floor: 3,
            floor: Some(0),
            direction: Direction::Up,
            up_requests: vec![false, false, true, false, false],
            down_requests: vec![false, false, false, false, true],
            tick_error: None,
        }
    }

    #[test]
    fn renders_one_column_per_floor() {
        assert_eq!(
            status().render(),
            "__x__up request\n____xdown request\n_x___elevator\n"
        );
    }

    #[test]
    fn unknown_car_position_renders_empty_strip() {
        let mut status = status();
        status.floor = None;
        assert!(status.render().ends_with("_____elevator\n"));
    }

    #[test]
    fn requests_at_maps_negative_floors() {
        let status = status();
        assert_eq!(status.requests_at(1), (true, false));
        assert_eq!(status.requests_at(3), (false, true));
        assert_eq!(status.requests_at(-2), (false, false));
        assert_eq!(status.requests_at(9), (false, false));
    }
}
