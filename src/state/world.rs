use super::action::Action;
use super::direction::Direction;
use super::ghost::Ghost;
use super::ghost::GHOST_COLORS;
use super::location::Location;
use super::mode::Mode;
use super::snapshot::Snapshot;
use byteorder::BigEndian;
use byteorder::ByteOrder;
use std::collections::VecDeque;

/// serialized frame length: 10 header bytes, 4 x 3 ghost bytes,
/// 2 + 2 entity locations, 2 fruit counters, 31 x 4 pellet words
pub const FRAME_LEN: usize = 152;

/// result of one simulated tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Safe,
    Dead,
}

/// the mutable game world, decoded from server frames.
///
/// one instance lives for the whole session and is shared by the receive,
/// planning, and comms tasks. the `locked` flag is a cooperative marker:
/// while the planner holds it, inbound frames are dropped rather than
/// buffered, because the next frame will be fresher anyway.
#[derive(Debug, Clone)]
pub struct World {
    pub ticks: crate::Ticks,
    pub update_period: u8,
    pub mode: Mode,
    pub mode_steps: u8,
    pub mode_duration: u8,
    pub score: crate::Score,
    pub level: u8,
    pub lives: u8,
    pub ghosts: [Ghost; 4],
    pub pacman: Location,
    pub fruit: Location,
    pub fruit_steps: u8,
    pub fruit_duration: u8,
    pub pellets: [u32; crate::ROWS],
    locked: bool,
    connected: bool,
    queue: VecDeque<Action>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            ticks: 0,
            update_period: 12,
            mode: Mode::Paused,
            mode_steps: 0,
            mode_duration: 255,
            score: 0,
            level: 0,
            lives: 3,
            ghosts: GHOST_COLORS.map(Ghost::new),
            pacman: Location::default(),
            fruit: Location::default(),
            fruit_steps: 0,
            fruit_duration: crate::FRUIT_STEPS,
            pellets: [0; crate::ROWS],
            locked: false,
            connected: false,
            queue: VecDeque::new(),
        }
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// mark the state as read-held by the planner
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// decode a server frame into this state.
    ///
    /// a frame arriving while the planner holds the lock is dropped
    /// silently unless the caller overrides (snapshot restore does).
    /// a malformed frame is an error and leaves the state untouched.
    pub fn update(&mut self, frame: &[u8], allow_while_locked: bool) -> anyhow::Result<()> {
        if self.locked && !allow_while_locked {
            return Ok(());
        }
        anyhow::ensure!(
            frame.len() == FRAME_LEN,
            "frame length {} != {}",
            frame.len(),
            FRAME_LEN
        );
        let mode = Mode::try_from(frame[3])?;
        self.ticks = BigEndian::read_u16(&frame[0..2]);
        self.update_period = frame[2];
        self.mode = mode;
        self.mode_steps = frame[4];
        self.mode_duration = frame[5];
        self.score = BigEndian::read_u16(&frame[6..8]);
        self.level = frame[8];
        self.lives = frame[9];
        for (i, ghost) in self.ghosts.iter_mut().enumerate() {
            let at = 10 + 3 * i;
            ghost.loc = Location::from(BigEndian::read_u16(&frame[at..at + 2]));
            ghost.update_aux(frame[at + 2]);
            ghost.plan = Direction::None;
        }
        self.pacman = Location::from(BigEndian::read_u16(&frame[22..24]));
        self.fruit = Location::from(BigEndian::read_u16(&frame[24..26]));
        self.fruit_steps = frame[26];
        self.fruit_duration = frame[27];
        for (row, word) in self.pellets.iter_mut().enumerate() {
            *word = BigEndian::read_u32(&frame[28 + 4 * row..32 + 4 * row]);
        }
        Ok(())
    }

    /// encode this state in the server's frame layout
    pub fn serialize(&self) -> [u8; FRAME_LEN] {
        let mut bytes = [0u8; FRAME_LEN];
        BigEndian::write_u16(&mut bytes[0..2], self.ticks);
        bytes[2] = self.update_period;
        bytes[3] = u8::from(self.mode);
        bytes[4] = self.mode_steps;
        bytes[5] = self.mode_duration;
        BigEndian::write_u16(&mut bytes[6..8], self.score);
        bytes[8] = self.level;
        bytes[9] = self.lives;
        for (i, ghost) in self.ghosts.iter().enumerate() {
            let at = 10 + 3 * i;
            BigEndian::write_u16(&mut bytes[at..at + 2], u16::from(ghost.loc));
            bytes[at + 2] = ghost.serialize_aux();
        }
        BigEndian::write_u16(&mut bytes[22..24], u16::from(self.pacman));
        BigEndian::write_u16(&mut bytes[24..26], u16::from(self.fruit));
        bytes[26] = self.fruit_steps;
        bytes[27] = self.fruit_duration;
        for (row, word) in self.pellets.iter().enumerate() {
            BigEndian::write_u32(&mut bytes[28 + 4 * row..32 + 4 * row], *word);
        }
        bytes
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bytes: self.serialize(),
            plans: self.plans(),
        }
    }

    /// overwrite the live state from a snapshot, bypassing the lock
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.update(&snapshot.bytes, true)
            .expect("snapshot bytes are well-formed");
        self.set_plans(snapshot.plans);
    }

    pub fn plans(&self) -> [Direction; 4] {
        [
            self.ghosts[0].plan,
            self.ghosts[1].plan,
            self.ghosts[2].plan,
            self.ghosts[3].plan,
        ]
    }

    pub fn set_plans(&mut self, plans: [Direction; 4]) {
        for (ghost, plan) in self.ghosts.iter_mut().zip(plans) {
            ghost.plan = plan;
        }
    }

    pub fn pellet_at(&self, row: u8, col: u8) -> bool {
        if row as usize >= crate::ROWS || col as usize >= crate::COLS {
            return false;
        }
        (self.pellets[row as usize] >> col) & 1 == 1
    }

    pub fn super_pellet_at(&self, row: u8, col: u8) -> bool {
        self.pellet_at(row, col) && (row == 3 || row == 23) && (col == 1 || col == 26)
    }

    pub fn fruit_at(&self, row: u8, col: u8) -> bool {
        self.fruit_steps > 0 && self.fruit.at(row, col)
    }

    pub fn num_pellets(&self) -> u32 {
        self.pellets.iter().map(|word| word.count_ones()).sum()
    }

    pub fn num_super_pellets(&self) -> u32 {
        [(3, 1), (3, 26), (23, 1), (23, 26)]
            .into_iter()
            .filter(|&(row, col)| self.pellet_at(row, col))
            .count() as u32
    }

    /// append a plan step for the dispatcher, dropping the oldest
    /// entry once the bound is hit
    pub fn queue_action(&mut self, delay: u8, direction: Direction) {
        if self.queue.len() == crate::QUEUE_BOUND {
            self.queue.pop_front();
        }
        self.queue.push_back(Action::new(delay, direction));
    }

    pub fn pop_action(&mut self) -> Option<Action> {
        self.queue.pop_front()
    }

    pub fn peek_action(&self) -> Option<Action> {
        self.queue.front().copied()
    }

    pub fn backlog(&self) -> usize {
        self.queue.len()
    }

    /// advance the world by one logical tick, with Pac-Man attempting a
    /// single step in the given direction.
    ///
    /// deterministic: the same state and direction always produce the same
    /// resulting state. a wall-blocked Pac-Man move keeps the cell and is
    /// Safe; only ghost contact kills.
    pub fn step(&mut self, direction: Direction) -> Step {
        for i in 0..self.ghosts.len() {
            if self.ghosts[i].plan == Direction::None {
                self.project(i);
            }
        }
        for ghost in self.ghosts.iter_mut() {
            ghost.advance();
        }
        if !self.safety_check() {
            return Step::Dead;
        }
        self.mode_steps = self.mode_steps.saturating_sub(1);
        if self.mode_steps == 0 {
            self.cycle_mode();
        }
        for i in 0..self.ghosts.len() {
            self.project(i);
        }
        if direction != Direction::None {
            self.pacman.set_direction(direction);
            self.pacman.advance();
        }
        self.collect_pellet(self.pacman.row, self.pacman.col);
        if !self.safety_check() {
            return Step::Dead;
        }
        self.ticks = self.ticks.wrapping_add(1);
        Step::Safe
    }

    /// refresh one ghost's projected heading
    fn project(&mut self, i: usize) {
        if self.ghosts[i].spawning {
            return;
        }
        let red = self.ghosts[0].loc.cell();
        let plan = self.ghosts[i].project(self.mode, self.pacman, red);
        self.ghosts[i].plan = plan;
    }

    /// scatter and chase alternate on a fixed cadence, except that the
    /// endgame pins the world in chase once few pellets remain
    fn cycle_mode(&mut self) {
        match self.mode {
            Mode::Scatter => {
                self.mode = Mode::Chase;
                self.mode_steps = crate::CHASE_STEPS;
                self.mode_duration = crate::CHASE_STEPS;
            }
            Mode::Chase => {
                if self.num_pellets() >= crate::ENDGAME_PELLETS {
                    self.mode = Mode::Scatter;
                    self.mode_steps = crate::SCATTER_STEPS;
                    self.mode_duration = crate::SCATTER_STEPS;
                } else {
                    self.mode_steps = crate::CHASE_STEPS;
                }
            }
            Mode::Paused => {}
        }
    }

    /// whether Pac-Man survives contact at his current cell. frightened
    /// ghosts sharing the cell are eaten and sent back to spawn.
    fn safety_check(&mut self) -> bool {
        let (row, col) = self.pacman.cell();
        for ghost in self.ghosts.iter_mut() {
            if ghost.loc.at(row, col) {
                if !ghost.frightened() {
                    return false;
                }
                ghost.spawning = true;
            }
        }
        true
    }

    /// collect the pellet under Pac-Man, scoring it and triggering fright
    /// or the fruit spawn where the rules say so
    fn collect_pellet(&mut self, row: u8, col: u8) {
        if !self.pellet_at(row, col) {
            return;
        }
        let super_pellet = self.super_pellet_at(row, col);
        self.pellets[row as usize] &= !(1 << col);
        self.score = self
            .score
            .wrapping_add(if super_pellet { 50 } else { 10 });
        let remaining = self.num_pellets();
        if crate::FRUIT_SPAWN_COUNTS.contains(&remaining) {
            self.fruit = Location::new(crate::FRUIT_CELL.0, crate::FRUIT_CELL.1);
            self.fruit_steps = crate::FRUIT_STEPS;
        }
        if super_pellet {
            for ghost in self.ghosts.iter_mut() {
                ghost.fright_steps = crate::FRIGHT_STEPS;
                ghost.plan = ghost.plan.reverse();
            }
        }
    }
}


impl crate::Arbitrary for World {
    fn random() -> Self {
        use crate::Arbitrary;
        use rand::Rng;
        let mut rng = rand::rng();
        let mut world = World::default();
        world.ticks = rng.random();
        world.update_period = rng.random();
        world.mode = Mode::random();
        world.mode_steps = rng.random();
        world.mode_duration = rng.random();
        world.score = rng.random();
        world.level = rng.random();
        world.lives = rng.random();
        for ghost in world.ghosts.iter_mut() {
            let color = ghost.color;
            *ghost = Ghost::random();
            ghost.color = color;
        }
        world.pacman = Location::random();
        world.fruit = Location::random();
        world.fruit_steps = rng.random();
        world.fruit_duration = rng.random();
        for word in world.pellets.iter_mut() {
            *word = rng.random::<u32>() & 0x0fff_ffff;
        }
        world
    }
}
