//! Connector direction and rotation algebra
//!
//! All adjacency reasoning in the generator reduces to arithmetic on the four
//! edge directions of a square tile and the four quarter-turn rotations that
//! can be applied to it. Grid coordinates are `[x, y]` with x growing right
//! and y growing down, so `Top` is `[0, -1]`.

/// One edge of a square snippet, and equivalently one step on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Negative y
    Top,
    /// Positive x
    Right,
    /// Positive y
    Bottom,
    /// Negative x
    Left,
}

impl Direction {
    /// All directions in fixed enumeration order (Top, Right, Bottom, Left)
    ///
    /// Every candidate search in the generator walks this order, which is
    /// what makes tie-breaks reproducible for a given seed.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Stable index in `0..4`, matching the order of [`Self::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }

    /// The direction pointing back at this one
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Unit grid offset for one step in this direction
    pub const fn offset(self) -> [i32; 2] {
        match self {
            Self::Top => [0, -1],
            Self::Right => [1, 0],
            Self::Bottom => [0, 1],
            Self::Left => [-1, 0],
        }
    }

    /// Apply one step from `from`, returning the neighboring coordinate
    pub const fn step(self, from: [i32; 2]) -> [i32; 2] {
        let [dx, dy] = self.offset();
        [from[0] + dx, from[1] + dy]
    }

    /// Direction rotated clockwise by `rotation`
    pub const fn rotated(self, rotation: Rotation) -> Self {
        let index = (self.index() + rotation.quarter_turns()) % 4;
        match index {
            0 => Self::Top,
            1 => Self::Right,
            2 => Self::Bottom,
            _ => Self::Left,
        }
    }

    /// Parse a definition-file angle (0 = Top, 90 = Right, 180 = Bottom,
    /// 270 = Left); any other value is rejected
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Top),
            90 => Some(Self::Right),
            180 => Some(Self::Bottom),
            270 => Some(Self::Left),
            _ => None,
        }
    }

    /// Direction from `from` to an orthogonally adjacent `to`, if any
    pub fn between(from: [i32; 2], to: [i32; 2]) -> Option<Self> {
        let delta = [to[0] - from[0], to[1] - from[1]];
        Self::ALL.into_iter().find(|d| d.offset() == delta)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        };
        write!(f, "{name}")
    }
}

/// Clockwise quarter-turn rotation applied to a placed snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    /// No rotation
    #[default]
    R0,
    /// 90° clockwise
    R90,
    /// 180°
    R180,
    /// 270° clockwise
    R270,
}

impl Rotation {
    /// All rotations in the order they are tried during candidate searches
    pub const ALL: [Self; 4] = [Self::R0, Self::R90, Self::R180, Self::R270];

    /// Number of clockwise quarter turns
    pub const fn quarter_turns(self) -> usize {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }

    /// Rotation angle in degrees
    pub const fn degrees(self) -> u16 {
        (self.quarter_turns() as u16) * 90
    }
}

/// Set of connector directions on one snippet edge profile
///
/// Backed by four bits indexed by [`Direction::index`]; cheap to copy and
/// compare, which lets repair passes match required connector profiles by
/// plain equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirectionSet(u8);

impl DirectionSet {
    /// The empty set (the profile of the designated empty snippet)
    pub const EMPTY: Self = Self(0);

    /// Build a set from a slice of directions
    pub fn from_directions(directions: &[Direction]) -> Self {
        let mut set = Self::EMPTY;
        for &direction in directions {
            set.insert(direction);
        }
        set
    }

    /// Add a direction to the set
    pub const fn insert(&mut self, direction: Direction) {
        self.0 |= 1 << direction.index();
    }

    /// Whether the set carries a connector in `direction`
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & (1 << direction.index()) != 0
    }

    /// Number of connectors in the set
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set has no connectors
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The set with every member rotated clockwise by `rotation`
    pub fn rotated(self, rotation: Rotation) -> Self {
        let mut set = Self::EMPTY;
        for direction in self.iter() {
            set.insert(direction.rotated(rotation));
        }
        set
    }

    /// Iterate members in fixed Top, Right, Bottom, Left order
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, DirectionSet, Rotation};

    #[test]
    fn test_opposites_are_involutive() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            let neighbor = direction.step([3, -2]);
            assert_eq!(direction.opposite().step(neighbor), [3, -2]);
        }
    }

    #[test]
    fn test_rotation_wraps_clockwise() {
        assert_eq!(Direction::Top.rotated(Rotation::R90), Direction::Right);
        assert_eq!(Direction::Left.rotated(Rotation::R90), Direction::Top);
        assert_eq!(Direction::Bottom.rotated(Rotation::R270), Direction::Right);
        for direction in Direction::ALL {
            assert_eq!(direction.rotated(Rotation::R0), direction);
            assert_eq!(
                direction.rotated(Rotation::R180),
                direction.opposite()
            );
        }
    }

    #[test]
    fn test_direction_between_adjacent_coordinates() {
        assert_eq!(Direction::between([0, 0], [1, 0]), Some(Direction::Right));
        assert_eq!(Direction::between([0, 0], [0, -1]), Some(Direction::Top));
        assert_eq!(Direction::between([0, 0], [1, 1]), None);
        assert_eq!(Direction::between([0, 0], [0, 0]), None);
    }

    #[test]
    fn test_direction_set_rotation_preserves_count() {
        let set = DirectionSet::from_directions(&[Direction::Top, Direction::Right]);
        for rotation in Rotation::ALL {
            assert_eq!(set.rotated(rotation).len(), 2);
        }
        assert_eq!(
            set.rotated(Rotation::R90),
            DirectionSet::from_directions(&[Direction::Right, Direction::Bottom])
        );
    }

    #[test]
    fn test_degrees_round_trip() {
        for direction in Direction::ALL {
            let degrees = (direction.index() as u16) * 90;
            assert_eq!(Direction::from_degrees(degrees), Some(direction));
        }
        assert_eq!(Direction::from_degrees(45), None);
    }
}
