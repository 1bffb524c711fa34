// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::place::Position;

/// One of the eight compass directions used as edge labels between places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    West,
    East,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Self::North,
        Self::South,
        Self::West,
        Self::East,
        Self::NorthWest,
        Self::NorthEast,
        Self::SouthWest,
        Self::SouthEast,
    ];

    /// Slot index used by `Neighbors`; matches the order of `ALL`.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::South => 1,
            Self::West => 2,
            Self::East => 3,
            Self::NorthWest => 4,
            Self::NorthEast => 5,
            Self::SouthWest => 6,
            Self::SouthEast => 7,
        }
    }

    /// The geometric opposite: N/S, E/W, NE/SW, NW/SE.
    pub fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
            Self::NorthWest => Self::SouthEast,
            Self::SouthEast => Self::NorthWest,
            Self::SouthWest => Self::NorthEast,
            Self::NorthEast => Self::SouthWest,
        }
    }

    /// Numeric keypad layout: 7 8 9 / 4 . 6 / 1 2 3, north up.
    pub fn from_keypad(key: u8) -> Option<Self> {
        match key {
            8 => Some(Self::North),
            2 => Some(Self::South),
            4 => Some(Self::West),
            6 => Some(Self::East),
            7 => Some(Self::NorthWest),
            9 => Some(Self::NorthEast),
            1 => Some(Self::SouthWest),
            3 => Some(Self::SouthEast),
            _ => None,
        }
    }

    pub fn keypad(self) -> u8 {
        match self {
            Self::North => 8,
            Self::South => 2,
            Self::West => 4,
            Self::East => 6,
            Self::NorthWest => 7,
            Self::NorthEast => 9,
            Self::SouthWest => 1,
            Self::SouthEast => 3,
        }
    }

    /// Canvas offset of a neighbor placed in this direction (y grows northwards).
    pub fn offset(self, spacing_x: f32, spacing_y: f32) -> Position {
        let (x, y) = match self {
            Self::North => (0.0, spacing_y),
            Self::South => (0.0, -spacing_y),
            Self::West => (-spacing_x, 0.0),
            Self::East => (spacing_x, 0.0),
            Self::NorthWest => (-spacing_x, spacing_y),
            Self::NorthEast => (spacing_x, spacing_y),
            Self::SouthWest => (-spacing_x, -spacing_y),
            Self::SouthEast => (spacing_x, -spacing_y),
        };
        Position::new(x, y)
    }

    /// Short key used as the JSON field name of the neighbor slot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::West => "w",
            Self::East => "e",
            Self::NorthWest => "nw",
            Self::NorthEast => "ne",
            Self::SouthWest => "sw",
            Self::SouthEast => "se",
        }
    }

    /// Walking command name, as typed by players.
    pub fn command(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
            Self::NorthWest => "northwest",
            Self::NorthEast => "northeast",
            Self::SouthWest => "southwest",
            Self::SouthEast => "southeast",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid direction '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|dir| dir.as_str() == lowered || dir.command() == lowered)
            .ok_or_else(|| ParseDirectionError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Direction;

    #[test]
    fn reverse_is_an_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.reverse().reverse(), dir);
            assert_ne!(dir.reverse(), dir);
        }
    }

    #[test]
    fn slot_indices_follow_all_order() {
        for (i, dir) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[rstest]
    #[case(7, Direction::NorthWest)]
    #[case(8, Direction::North)]
    #[case(9, Direction::NorthEast)]
    #[case(4, Direction::West)]
    #[case(6, Direction::East)]
    #[case(1, Direction::SouthWest)]
    #[case(2, Direction::South)]
    #[case(3, Direction::SouthEast)]
    fn keypad_digits_map_to_compass(#[case] key: u8, #[case] expected: Direction) {
        assert_eq!(Direction::from_keypad(key), Some(expected));
        assert_eq!(expected.keypad(), key);
    }

    #[test]
    fn keypad_center_and_zero_have_no_direction() {
        assert_eq!(Direction::from_keypad(5), None);
        assert_eq!(Direction::from_keypad(0), None);
    }

    #[test]
    fn offsets_follow_spacing() {
        let offset = Direction::NorthWest.offset(180.0, 120.0);
        assert_eq!((offset.x, offset.y), (-180.0, 120.0));

        let offset = Direction::South.offset(180.0, 120.0);
        assert_eq!((offset.x, offset.y), (0.0, -120.0));
    }

    #[test]
    fn parses_short_keys_and_commands() {
        assert_eq!("ne".parse::<Direction>().unwrap(), Direction::NorthEast);
        assert_eq!("SouthWest".parse::<Direction>().unwrap(), Direction::SouthWest);
        assert!("up".parse::<Direction>().is_err());
    }
}
