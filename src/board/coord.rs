//! Board coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseCoordError;

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Get adjacent coordinates (up, down, left, right).
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count. `self` is
    /// assumed to already be inside the `width` x `height` board.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, width: u16, height: u16) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.y > 0 {
            result[count as usize] = Coord::new(self.x, self.y - 1); // up
            count += 1;
        }
        if u32::from(self.y) + 1 < u32::from(height) {
            result[count as usize] = Coord::new(self.x, self.y + 1); // down
            count += 1;
        }
        if self.x > 0 {
            result[count as usize] = Coord::new(self.x - 1, self.y); // left
            count += 1;
        }
        if u32::from(self.x) + 1 < u32::from(width) {
            result[count as usize] = Coord::new(self.x + 1, self.y); // right
            count += 1;
        }

        (result, count)
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    #[inline]
    pub fn distance_to(&self, other: Coord) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let Some((x, y)) = trimmed.split_once(',') else {
            return Err(ParseCoordError::Format(s.to_string()));
        };
        let parse = |part: &str| {
            part.trim()
                .parse::<u16>()
                .map_err(|_| ParseCoordError::Component(part.trim().to_string()))
        };
        Ok(Coord::new(parse(x)?, parse(y)?))
    }
}
