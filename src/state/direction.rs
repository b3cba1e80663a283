use crate::Arbitrary;

/// movement directions. None is a deliberate rest, used both for entities
/// that have not chosen a heading yet and for planned stalls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
    None = 4,
}

/// the four moves a plan may take, in tie-break order
pub const CARDINALS: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Down,
    Direction::Right,
];

impl Direction {
    /// (row, col) displacement of a single step
    pub fn deltas(&self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
            Direction::None => (0, 0),
        }
    }

    pub fn reverse(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }
}

/// server wire bijection
impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => b'w',
            Direction::Left => b'a',
            Direction::Down => b's',
            Direction::Right => b'd',
            Direction::None => b'.',
        }
    }
}
impl From<u8> for Direction {
    fn from(byte: u8) -> Self {
        match byte {
            b'w' => Direction::Up,
            b'a' => Direction::Left,
            b's' => Direction::Down,
            b'd' => Direction::Right,
            b'.' => Direction::None,
            _ => unreachable!("invalid direction byte"),
        }
    }
}

impl Arbitrary for Direction {
    fn random() -> Self {
        use rand::Rng;
        match rand::rng().random_range(0..5) {
            0 => Direction::Up,
            1 => Direction::Left,
            2 => Direction::Down,
            3 => Direction::Right,
            _ => Direction::None,
        }
    }
}
