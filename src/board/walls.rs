use crate::COLS;
use crate::ROWS;

/// static wall bitmap, bit `col` of word `row`
#[rustfmt::skip]
pub const WALLS: [u32; ROWS] = [
    0b0000_1111111111111111111111111111, // row 0
    0b0000_1000000000000110000000000001, // row 1
    0b0000_1011110111110110111110111101, // row 2
    0b0000_1011110111110110111110111101, // row 3
    0b0000_1011110111110110111110111101, // row 4
    0b0000_1000000000000000000000000001, // row 5
    0b0000_1011110110111111110110111101, // row 6
    0b0000_1011110110111111110110111101, // row 7
    0b0000_1000000110000110000110000001, // row 8
    0b0000_1111110111110110111110111111, // row 9
    0b0000_1111110111110110111110111111, // row 10
    0b0000_1111110110000000000110111111, // row 11
    0b0000_1111110110111111110110111111, // row 12
    0b0000_1111110110111111110110111111, // row 13
    0b0000_1111110000111111110000111111, // row 14
    0b0000_1111110110111111110110111111, // row 15
    0b0000_1111110110111111110110111111, // row 16
    0b0000_1111110110000000000110111111, // row 17
    0b0000_1111110110111111110110111111, // row 18
    0b0000_1111110110111111110110111111, // row 19
    0b0000_1000000000000110000000000001, // row 20
    0b0000_1011110111110110111110111101, // row 21
    0b0000_1011110111110110111110111101, // row 22
    0b0000_1000110000000000000000110001, // row 23
    0b0000_1110110110111111110110110111, // row 24
    0b0000_1110110110111111110110110111, // row 25
    0b0000_1000000110000110000110000001, // row 26
    0b0000_1011111111110110111111111101, // row 27
    0b0000_1011111111110110111111111101, // row 28
    0b0000_1000000000000000000000000001, // row 29
    0b0000_1111111111111111111111111111, // row 30
];

/// whether a wall occupies the given cell.
/// out-of-range coordinates count as walls.
pub fn wall_at(row: i16, col: i16) -> bool {
    if row < 0 || row >= ROWS as i16 || col < 0 || col >= COLS as i16 {
        return true;
    }
    (WALLS[row as usize] >> col) & 1 == 1
}

/// whether the cell is on the board and traversable
pub fn valid(row: i16, col: i16) -> bool {
    !wall_at(row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borders_are_walls() {
        assert!((0..COLS as i16).all(|c| wall_at(0, c)));
        assert!((0..COLS as i16).all(|c| wall_at(ROWS as i16 - 1, c)));
        assert!((0..ROWS as i16).all(|r| wall_at(r, 0)));
        assert!((0..ROWS as i16).all(|r| wall_at(r, COLS as i16 - 1)));
    }

    #[test]
    fn out_of_range_is_wall() {
        assert!(wall_at(-1, 5));
        assert!(wall_at(5, -1));
        assert!(wall_at(31, 5));
        assert!(wall_at(32, 32));
    }

    #[test]
    fn super_pellet_cells_are_corridors() {
        assert!(valid(3, 1));
        assert!(valid(3, 26));
        assert!(valid(23, 1));
        assert!(valid(23, 26));
    }
}
