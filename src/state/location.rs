use super::direction::CARDINALS;
use super::direction::Direction;
use crate::board;
use crate::Arbitrary;
use crate::COLS;
use crate::ROWS;

/// the off-board sentinel cell (entity temporarily removed from play)
pub const OFF_BOARD: (u8, u8) = (32, 32);

/// position and heading of an entity.
///
/// serializes to 16 bits: 2-bit signed row direction, 6-bit row,
/// 2-bit signed col direction, 6-bit col. the sentinel row/col 32 fits the
/// 6-bit field, so off-board entities survive the round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub row: u8,
    pub col: u8,
    pub row_dir: i8,
    pub col_dir: i8,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            row: OFF_BOARD.0,
            col: OFF_BOARD.1,
            row_dir: 0,
            col_dir: 0,
        }
    }
}

impl Location {
    pub fn new(row: u8, col: u8) -> Self {
        Self {
            row,
            col,
            row_dir: 0,
            col_dir: 0,
        }
    }

    pub fn cell(&self) -> (u8, u8) {
        (self.row, self.col)
    }

    pub fn is_valid(&self) -> bool {
        (self.row as usize) < ROWS && (self.col as usize) < COLS
    }

    /// whether this location occupies the given cell.
    /// always false off the board, so removed entities collide with nothing.
    pub fn at(&self, row: u8, col: u8) -> bool {
        self.is_valid() && self.row == row && self.col == col
    }

    pub fn set_direction(&mut self, direction: Direction) {
        let (dr, dc) = direction.deltas();
        self.row_dir = dr;
        self.col_dir = dc;
    }

    pub fn direction(&self) -> Direction {
        CARDINALS
            .into_iter()
            .find(|d| d.deltas() == (self.row_dir, self.col_dir))
            .unwrap_or(Direction::None)
    }

    /// advance one cell along the current heading, unless a wall blocks it
    pub fn advance(&mut self) {
        let row = self.row as i16 + self.row_dir as i16;
        let col = self.col as i16 + self.col_dir as i16;
        if !board::wall_at(row, col) {
            self.row = row as u8;
            self.col = col as u8;
        }
    }
}

/// 16-bit wire bijection
impl From<u16> for Location {
    fn from(bits: u16) -> Self {
        let row_byte = (bits >> 8) as u8;
        let col_byte = bits as u8;
        Self {
            row: row_byte & 0x3f,
            col: col_byte & 0x3f,
            row_dir: (row_byte as i8) >> 6,
            col_dir: (col_byte as i8) >> 6,
        }
    }
}
impl From<Location> for u16 {
    fn from(loc: Location) -> Self {
        let row_byte = ((loc.row_dir as u8 & 0x03) << 6) | (loc.row & 0x3f);
        let col_byte = ((loc.col_dir as u8 & 0x03) << 6) | (loc.col & 0x3f);
        u16::from(row_byte) << 8 | u16::from(col_byte)
    }
}

impl Arbitrary for Location {
    fn random() -> Self {
        use rand::Rng;
        let mut loc = Self::new(
            rand::rng().random_range(0..ROWS as u8),
            rand::rng().random_range(0..COLS as u8),
        );
        loc.set_direction(Direction::random());
        loc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_u16() {
        for _ in 0..100 {
            let loc = Location::random();
            assert_eq!(loc, Location::from(u16::from(loc)));
        }
        let off = Location::default();
        assert_eq!(off, Location::from(u16::from(off)));
    }

    #[test]
    fn advance_blocked_by_wall() {
        let mut loc = Location::new(1, 1);
        loc.set_direction(Direction::Up);
        loc.advance();
        assert_eq!(loc.cell(), (1, 1));
    }

    #[test]
    fn advance_through_corridor() {
        let mut loc = Location::new(1, 1);
        loc.set_direction(Direction::Right);
        loc.advance();
        assert_eq!(loc.cell(), (1, 2));
    }

    #[test]
    fn off_board_never_collides() {
        let loc = Location::default();
        assert!(!loc.at(32, 32));
    }

    #[test]
    fn heading_round_trips_through_deltas() {
        let mut loc = Location::new(5, 5);
        for direction in CARDINALS {
            loc.set_direction(direction);
            assert_eq!(loc.direction(), direction);
        }
    }
}
