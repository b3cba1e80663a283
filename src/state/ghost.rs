use super::direction::Direction;
use super::direction::CARDINALS;
use super::location::Location;
use super::mode::Mode;
use crate::board;
use crate::board::dist_sq;

/// ghost identities, in fixed wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostColor {
    Red = 0,
    Pink = 1,
    Cyan = 2,
    Orange = 3,
}

pub const GHOST_COLORS: [GhostColor; 4] = [
    GhostColor::Red,
    GhostColor::Pink,
    GhostColor::Cyan,
    GhostColor::Orange,
];

/// squared-distance threshold under which Orange retreats to its corner
const ORANGE_RADIUS_SQ: i32 = 64;

impl GhostColor {
    /// fixed scatter corner. the top corners sit off the board, which is
    /// fine: scatter targets only steer the squared-distance tie-break.
    pub fn scatter(&self) -> (i16, i16) {
        match self {
            GhostColor::Red => (-3, 25),
            GhostColor::Pink => (-3, 2),
            GhostColor::Cyan => (31, 27),
            GhostColor::Orange => (31, 0),
        }
    }
}

/// position, fright timer, and projected heading of one ghost.
///
/// the server only reports where a ghost is, not where it will go; the
/// projected `plan` is our one-step-lookahead reconstruction of the classic
/// chase/scatter targeting rules, refreshed by the simulator every tick.
#[derive(Debug, Clone, Copy)]
pub struct Ghost {
    pub color: GhostColor,
    pub loc: Location,
    pub fright_steps: u8,
    pub spawning: bool,
    pub plan: Direction,
}

impl Ghost {
    pub fn new(color: GhostColor) -> Self {
        Self {
            color,
            loc: Location::default(),
            fright_steps: 0,
            spawning: true,
            plan: Direction::None,
        }
    }

    pub fn frightened(&self) -> bool {
        self.fright_steps > 0
    }

    /// auxiliary wire byte: top bit spawning, low six bits fright steps
    pub fn serialize_aux(&self) -> u8 {
        (u8::from(self.spawning) << 7) | (self.fright_steps & 0x3f)
    }

    pub fn update_aux(&mut self, aux: u8) {
        self.fright_steps = aux & 0x3f;
        self.spawning = aux >> 7 != 0;
    }

    /// one simulated tick: advance along the current heading when the maze
    /// allows it, then adopt the projected heading. spawning ghosts hold
    /// still, the best short-horizon guess for a ghost inside the lair.
    pub fn advance(&mut self) {
        if self.spawning {
            return;
        }
        self.loc.advance();
        self.loc.set_direction(self.plan);
        if self.fright_steps > 0 {
            self.fright_steps -= 1;
        }
    }

    /// reconstruct the heading this ghost is most likely to take next.
    ///
    /// candidates are the cells adjacent to the ghost's next position,
    /// excluding the direct reversal; a hunting ghost minimises squared
    /// Euclidean distance to its target, a frightened one maximises it.
    /// ties resolve through the fixed candidate enumeration.
    pub fn project(&self, mode: Mode, pacman: Location, red: (u8, u8)) -> Direction {
        let next = (
            self.loc.row as i16 + self.loc.row_dir as i16,
            self.loc.col as i16 + self.loc.col_dir as i16,
        );
        let pac = (pacman.row as i16, pacman.col as i16);
        let ahead = (
            pac.0 + 4 * pacman.row_dir as i16,
            pac.1 + 4 * pacman.col_dir as i16,
        );
        let target = match mode {
            Mode::Chase => match self.color {
                GhostColor::Red => pac,
                GhostColor::Pink => ahead,
                GhostColor::Cyan => (
                    2 * ahead.0 - red.0 as i16, //
                    2 * ahead.1 - red.1 as i16,
                ),
                GhostColor::Orange => {
                    if dist_sq(next, pac) >= ORANGE_RADIUS_SQ {
                        pac
                    } else {
                        self.color.scatter()
                    }
                }
            },
            Mode::Scatter => self.color.scatter(),
            Mode::Paused => (0, 0),
        };
        let mut nearest = (i32::MAX, Direction::Up);
        let mut farthest = (i32::MIN, Direction::Up);
        for direction in CARDINALS {
            let (dr, dc) = direction.deltas();
            if dr as i16 + self.loc.row_dir as i16 == 0 && dc as i16 + self.loc.col_dir as i16 == 0
            {
                continue;
            }
            let candidate = (next.0 + dr as i16, next.1 + dc as i16);
            if board::wall_at(candidate.0, candidate.1) {
                continue;
            }
            let sq = dist_sq(candidate, target);
            if sq < nearest.0 {
                nearest = (sq, direction);
            }
            if sq >= farthest.0 {
                farthest = (sq, direction);
            }
        }
        if self.frightened() {
            farthest.1
        } else {
            nearest.1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_aux_byte() {
        for aux in [0x00, 0x28, 0x3f, 0x80, 0xa8] {
            let mut ghost = Ghost::new(GhostColor::Red);
            ghost.update_aux(aux);
            assert_eq!(ghost.serialize_aux(), aux);
        }
    }

    #[test]
    fn fright_decrements_on_advance() {
        let mut ghost = Ghost::new(GhostColor::Pink);
        ghost.spawning = false;
        ghost.loc = Location::new(5, 5);
        ghost.fright_steps = 2;
        ghost.advance();
        assert_eq!(ghost.fright_steps, 1);
    }

    #[test]
    fn spawning_ghost_holds_still() {
        let mut ghost = Ghost::new(GhostColor::Cyan);
        ghost.loc = Location::new(5, 5);
        ghost.loc.set_direction(Direction::Right);
        ghost.advance();
        assert_eq!(ghost.loc.cell(), (5, 5));
    }

    #[test]
    fn red_chases_pacman() {
        let mut ghost = Ghost::new(GhostColor::Red);
        ghost.spawning = false;
        ghost.loc = Location::new(5, 10);
        ghost.loc.set_direction(Direction::Left);
        // pacman to the west; best non-reversing step closes the gap
        let mut pacman = Location::new(5, 1);
        pacman.set_direction(Direction::Left);
        let plan = ghost.project(Mode::Chase, pacman, (5, 10));
        assert_eq!(plan, Direction::Left);
    }

    #[test]
    fn scatter_sends_orange_to_its_corner() {
        let mut ghost = Ghost::new(GhostColor::Orange);
        ghost.spawning = false;
        ghost.loc = Location::new(23, 7);
        ghost.loc.set_direction(Direction::Down);
        let plan = ghost.project(Mode::Scatter, Location::new(1, 1), (1, 1));
        // corner is (31, 0): keep heading down-left, never reverse upward
        assert_ne!(plan, Direction::Up);
    }

    #[test]
    fn frightened_ghost_flees() {
        let mut ghost = Ghost::new(GhostColor::Red);
        ghost.spawning = false;
        ghost.fright_steps = 10;
        ghost.loc = Location::new(5, 10);
        ghost.loc.set_direction(Direction::Left);
        // pacman right on the projected next cell; fleeing means not Left
        let mut pacman = Location::new(5, 8);
        pacman.set_direction(Direction::Right);
        let plan = ghost.project(Mode::Chase, pacman, (5, 10));
        assert_ne!(plan, Direction::Left);
    }
}

impl crate::Arbitrary for GhostColor {
    fn random() -> Self {
        use rand::Rng;
        GHOST_COLORS[rand::rng().random_range(0..4)]
    }
}

impl crate::Arbitrary for Ghost {
    fn random() -> Self {
        use crate::Arbitrary;
        use rand::Rng;
        let mut ghost = Ghost::new(GhostColor::random());
        ghost.loc = Location::random();
        ghost.fright_steps = rand::rng().random_range(0..64);
        ghost.spawning = rand::rng().random_bool(0.5);
        ghost
    }
}
