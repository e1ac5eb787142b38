use std::fmt;
use std::ops::RangeInclusive;

/// Contiguous, inclusive span of floors served by the car. The lowest floor
/// may be negative (basements).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorRange {
    min: i32,
    max: i32,
}

impl FloorRange {
    /// Returns `None` when `min > max`.
    pub fn new(min: i32, max: i32) -> Option<Self> {
        (min <= max).then_some(FloorRange { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn len(&self) -> usize {
        (i64::from(self.max) - i64::from(self.min)) as usize + 1
    }

    pub fn contains(&self, floor: i32) -> bool {
        (self.min..=self.max).contains(&floor)
    }

    /// Position of `floor` in per-floor storage; index 0 is the lowest floor.
    pub fn index_of(&self, floor: i32) -> Option<usize> {
        self.contains(floor)
            .then(|| (i64::from(floor) - i64::from(self.min)) as usize)
    }

    pub fn floors(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }
}

impl fmt::Display for FloorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        assert!(FloorRange::new(3, 2).is_none());
        assert!(FloorRange::new(2, 2).is_some());
    }

    #[test]
    fn indexes_from_the_lowest_floor() {
        let range = FloorRange::new(-2, 20).unwrap();
        assert_eq!(range.len(), 23);
        assert_eq!(range.index_of(-2), Some(0));
        assert_eq!(range.index_of(0), Some(2));
        assert_eq!(range.index_of(20), Some(22));
        assert_eq!(range.index_of(21), None);
        assert_eq!(range.index_of(-3), None);
    }
}
