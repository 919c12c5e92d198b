use core::fmt;
use serde::{Deserialize, Serialize};

/// Table seat. Play proceeds North, West, South, East; partners sit opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerPosition {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl PlayerPosition {
    pub const LOOP: [PlayerPosition; 4] = [
        PlayerPosition::North,
        PlayerPosition::East,
        PlayerPosition::South,
        PlayerPosition::West,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerPosition::North),
            1 => Some(PlayerPosition::East),
            2 => Some(PlayerPosition::South),
            3 => Some(PlayerPosition::West),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Seat that plays after this one.
    pub const fn next(self) -> PlayerPosition {
        match self {
            PlayerPosition::North => PlayerPosition::West,
            PlayerPosition::West => PlayerPosition::South,
            PlayerPosition::South => PlayerPosition::East,
            PlayerPosition::East => PlayerPosition::North,
        }
    }

    /// Seat that played before this one.
    pub const fn previous(self) -> PlayerPosition {
        match self {
            PlayerPosition::North => PlayerPosition::East,
            PlayerPosition::East => PlayerPosition::South,
            PlayerPosition::South => PlayerPosition::West,
            PlayerPosition::West => PlayerPosition::North,
        }
    }

    pub const fn partner(self) -> PlayerPosition {
        match self {
            PlayerPosition::North => PlayerPosition::South,
            PlayerPosition::East => PlayerPosition::West,
            PlayerPosition::South => PlayerPosition::North,
            PlayerPosition::West => PlayerPosition::East,
        }
    }

    /// Team index: 0 for North/South, 1 for East/West.
    pub const fn team(self) -> usize {
        self as usize % 2
    }

    /// Seat that occupies `position` (0..4) in a trick led by `self`.
    pub const fn nth_after(self, position: usize) -> PlayerPosition {
        let mut seat = self;
        let mut step = 0;
        while step < position % 4 {
            seat = seat.next();
            step += 1;
        }
        seat
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerPosition::North => "North",
            PlayerPosition::East => "East",
            PlayerPosition::South => "South",
            PlayerPosition::West => "West",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerPosition;

    #[test]
    fn play_order_runs_north_west_south_east() {
        assert_eq!(PlayerPosition::North.next(), PlayerPosition::West);
        assert_eq!(PlayerPosition::West.next(), PlayerPosition::South);
        assert_eq!(PlayerPosition::East.next(), PlayerPosition::North);
    }

    #[test]
    fn previous_inverts_next() {
        for seat in PlayerPosition::LOOP {
            assert_eq!(seat.next().previous(), seat);
        }
    }

    #[test]
    fn partner_is_opposite_and_shares_team() {
        assert_eq!(PlayerPosition::North.partner(), PlayerPosition::South);
        assert_eq!(PlayerPosition::East.partner(), PlayerPosition::West);
        for seat in PlayerPosition::LOOP {
            assert_eq!(seat.team(), seat.partner().team());
            assert_ne!(seat.team(), seat.next().team());
        }
    }

    #[test]
    fn nth_after_walks_play_order() {
        assert_eq!(PlayerPosition::North.nth_after(0), PlayerPosition::North);
        assert_eq!(PlayerPosition::North.nth_after(2), PlayerPosition::South);
        assert_eq!(PlayerPosition::South.nth_after(3), PlayerPosition::West);
    }

    #[test]
    fn index_roundtrip() {
        for (i, seat) in PlayerPosition::LOOP.iter().enumerate() {
            assert_eq!(PlayerPosition::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
        }
    }
}
