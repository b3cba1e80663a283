use super::node::Node;
use super::target;
use crate::board;
use crate::board::Metric;
use crate::state::Direction;
use crate::state::GhostColor;
use crate::state::Step;
use crate::state::World;
use crate::state::CARDINALS;
use crate::Cost;
use crate::ROWS;
use std::collections::BinaryHeap;

/// bounded best-first planner over simulated world snapshots.
///
/// no optimality is claimed: the ghost-repulsion penalty breaks
/// admissibility on purpose, trading provable paths for responsiveness
/// within the short horizon.
pub struct Planner {
    metric: Metric,
}

impl Planner {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }

    /// run one bounded search and commit the winning action buffer onto
    /// the world's outbound queue.
    ///
    /// the victim and pellet target persist between invocations so the
    /// planner stays committed to a hunt or a sweep across plans; the
    /// returned pair is what the next invocation should be handed back.
    pub fn plan(
        &self,
        world: &mut World,
        delay: u8,
        victim: Option<GhostColor>,
        pellet: (u8, u8),
    ) -> (Option<GhostColor>, (u8, u8)) {
        let victim = target::select_victim(world, self.metric, victim);
        let pellet = target::select_pellet_target(world, pellet);
        let goal = target::select_search_target(world, self.metric, pellet);
        let root = world.snapshot();
        let mut frontier = BinaryHeap::new();
        let mut visited = [0u32; ROWS];
        let mut seq = 0u64;
        frontier.push(Node::root(root.clone(), self.heuristic(world, victim, goal)));
        while let Some(node) = frontier.pop() {
            if node.victim_caught || node.target_caught {
                self.commit(world, &node.directions, &node.delays);
                world.restore(&root);
                return (victim, pellet);
            }
            if node.depth() >= crate::PLAN_DEPTH {
                let half = node.depth() / 2;
                self.commit(world, &node.directions[..half], &node.delays[..half]);
                world.restore(&root);
                return (victim, pellet);
            }
            for direction in Self::moves(victim) {
                world.restore(&node.snapshot);
                let from = world.pacman.cell();
                if world.step(direction) == Step::Dead {
                    continue;
                }
                let cell = world.pacman.cell();
                // a wall-blocked move is as good as dead to the planner
                if direction != Direction::None && cell == from {
                    continue;
                }
                if visited[cell.0 as usize] >> cell.1 & 1 == 1 {
                    continue;
                }
                visited[cell.0 as usize] |= 1 << cell.1;
                let victim_caught = victim.is_some_and(|color| {
                    let ghost = &world.ghosts[color as usize];
                    !ghost.frightened() || ghost.spawning
                });
                let target_caught = world.pacman.at(goal.0, goal.1)
                    || !world.pellet_at(pellet.0, pellet.1)
                    || world.fruit_at(cell.0, cell.1);
                let gcost = node.gcost + 1;
                let mut fcost = gcost
                    .saturating_add(self.heuristic(world, victim, goal))
                    .saturating_add(self.penalty(world));
                if victim_caught {
                    fcost -= crate::VICTIM_BONUS;
                }
                seq += 1;
                let mut directions = node.directions.clone();
                let mut delays = node.delays.clone();
                directions.push(direction);
                delays.push(delay);
                frontier.push(Node {
                    snapshot: world.snapshot(),
                    fcost,
                    gcost,
                    directions,
                    delays,
                    victim_caught,
                    target_caught,
                    seq,
                });
            }
        }
        // trapped: every expansion died. commit nothing and let the next
        // tick try again from a fresher frame.
        log::debug!("planner trapped, no surviving expansion");
        world.restore(&root);
        (victim, pellet)
    }

    /// stalling in place is only on the menu when nothing is being hunted
    fn moves(victim: Option<GhostColor>) -> impl Iterator<Item = Direction> {
        CARDINALS
            .into_iter()
            .chain(victim.is_none().then_some(Direction::None))
    }

    /// maze distance to the effective target: the hunted ghost when one is
    /// set, else the search goal, else the fruit when it is both live and
    /// decisively closer
    fn heuristic(&self, world: &World, victim: Option<GhostColor>, goal: (u8, u8)) -> Cost {
        if !world.pacman.is_valid() || board::wall_at(goal.0 as i16, goal.1 as i16) {
            return 0;
        }
        let pacman = world.pacman.cell();
        if let Some(color) = victim {
            let ghost = &world.ghosts[color as usize];
            if !ghost.spawning && ghost.loc.is_valid() {
                return Cost::from(self.metric.dist(pacman, ghost.loc.cell()));
            }
        }
        let goal_dist = self.metric.dist(pacman, goal);
        if world.fruit_steps > 0 && world.fruit.is_valid() {
            let fruit_dist = self.metric.dist(pacman, world.fruit.cell());
            if fruit_dist < goal_dist / crate::FRUIT_DIVISOR {
                return Cost::from(fruit_dist);
            }
        }
        Cost::from(goal_dist)
    }

    /// soft repulsion from live hunting ghosts: exponential in inverse
    /// distance, zero beyond the radius. computed in double precision and
    /// rounded once; the cast saturates rather than overflows at distance 1.
    fn penalty(&self, world: &World) -> Cost {
        let pacman = world.pacman.cell();
        world
            .ghosts
            .iter()
            .filter(|ghost| !ghost.spawning && !ghost.frightened() && ghost.loc.is_valid())
            .map(|ghost| self.metric.dist(pacman, ghost.loc.cell()))
            .filter(|&dist| dist >= 1 && dist <= crate::PENALTY_RADIUS)
            .map(|dist| (crate::PENALTY_SCALE * (crate::PENALTY_DECAY / f64::from(dist)).exp()).round() as Cost)
            .fold(0, Cost::saturating_add)
    }

    fn commit(&self, world: &mut World, directions: &[Direction], delays: &[u8]) {
        for (&direction, &delay) in directions.iter().zip(delays) {
            world.queue_action(delay, direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Location;
    use crate::state::Mode;

    fn world() -> World {
        let mut world = World::default();
        world.mode = Mode::Chase;
        world.mode_steps = 200;
        world
    }

    fn place(world: &mut World, color: GhostColor, row: u8, col: u8, fright: u8) {
        let ghost = &mut world.ghosts[color as usize];
        ghost.loc = Location::new(row, col);
        ghost.spawning = false;
        ghost.fright_steps = fright;
    }

    /// drain the committed queue onto the world, as the robot would
    fn drain(world: &mut World) -> Vec<(u8, u8)> {
        let mut cells = Vec::new();
        while let Some(action) = world.pop_action() {
            assert_eq!(world.step(action.direction), Step::Safe);
            cells.push(world.pacman.cell());
        }
        cells
    }

    #[test]
    fn adjacent_pellet_is_taken() {
        let mut world = world();
        world.mode = Mode::Scatter;
        world.pacman = Location::new(23, 13);
        world.pellets[23] |= 1 << 12;
        let planner = Planner::new(Metric::Maze);
        let (victim, pellet) = planner.plan(&mut world, 6, None, (23, 12));
        assert_eq!(victim, None);
        assert_eq!(pellet, (23, 12));
        assert!(world.backlog() > 0);
        drain(&mut world);
        assert_eq!(world.score, 10);
        assert!(!world.pellet_at(23, 12));
    }

    #[test]
    fn committed_plans_walk_corridors() {
        let mut world = world();
        world.mode = Mode::Scatter;
        world.pacman = Location::new(23, 13);
        world.pellets[29] = 0b0111111111111111111111111110;
        let planner = Planner::new(Metric::Maze);
        planner.plan(&mut world, 6, None, (29, 14));
        assert!(world.backlog() > 0);
        for cell in drain(&mut world) {
            assert!(crate::board::valid(cell.0 as i16, cell.1 as i16));
        }
    }

    #[test]
    fn deep_search_commits_half_buffer() {
        let mut world = world();
        world.mode = Mode::Scatter;
        world.pacman = Location::new(23, 13);
        world.pellets[29] |= 1 << 26;
        let planner = Planner::new(Metric::Maze);
        let (victim, pellet) = planner.plan(&mut world, 6, None, (29, 26));
        assert_eq!(victim, None);
        assert_eq!(pellet, (29, 26));
        assert_eq!(world.backlog(), crate::PLAN_DEPTH / 2);
        drain(&mut world);
    }

    #[test]
    fn adjacent_victim_is_eaten() {
        let mut world = world();
        world.mode = Mode::Scatter;
        world.pacman = Location::new(23, 14);
        place(&mut world, GhostColor::Red, 23, 13, 30);
        world.pellets[23] |= 1 << 9;
        let planner = Planner::new(Metric::Maze);
        let (victim, _) = planner.plan(&mut world, 6, None, (23, 9));
        assert_eq!(victim, Some(GhostColor::Red));
        assert_eq!(world.backlog(), 1);
        drain(&mut world);
        assert!(world.ghosts[0].spawning);
    }

    #[test]
    fn surrounded_planner_is_trapped() {
        let mut world = world();
        world.pacman = Location::new(1, 1);
        place(&mut world, GhostColor::Red, 1, 1, 0);
        world.pellets[29] |= 1 << 1;
        let planner = Planner::new(Metric::Maze);
        let (victim, pellet) = planner.plan(&mut world, 6, None, (29, 1));
        assert_eq!(victim, None);
        assert_eq!(pellet, (29, 1));
        assert_eq!(world.backlog(), 0);
    }

    #[test]
    fn stalls_beside_the_last_super_pellet() {
        let mut world = world();
        world.pacman = Location::new(23, 3);
        world.pellets[23] = 1 << 1; // only the south-west super pellet remains
        let planner = Planner::new(Metric::Maze);
        let mut victim = None;
        let mut pellet = (5, 1);
        for _ in 0..8 {
            let (v, p) = planner.plan(&mut world, 6, victim, pellet);
            victim = v;
            pellet = p;
            for cell in drain(&mut world) {
                assert_ne!(cell, (23, 1), "stake-out must not spend the pellet");
                assert!(Metric::Maze.dist(cell, (23, 1)) <= 2);
            }
        }
        assert!(world.super_pellet_at(23, 1));
    }

    #[test]
    fn penalty_repels_close_ghosts_only() {
        let mut world = world();
        world.pacman = Location::new(23, 13);
        let planner = Planner::new(Metric::Maze);
        assert_eq!(planner.penalty(&world), 0);
        place(&mut world, GhostColor::Red, 23, 9, 0);
        let near = planner.penalty(&world);
        assert!(near > 0);
        place(&mut world, GhostColor::Red, 5, 10, 0);
        assert_eq!(planner.penalty(&world), 0);
    }

    #[test]
    fn penalty_saturates_at_contact_range() {
        let mut world = world();
        world.pacman = Location::new(23, 13);
        place(&mut world, GhostColor::Red, 23, 12, 0);
        let planner = Planner::new(Metric::Maze);
        // exp(50) rounds through the saturating cast, not past it
        assert_eq!(planner.penalty(&world), Cost::MAX);
    }

    #[test]
    fn heuristic_prefers_victim_over_goal() {
        let mut world = world();
        world.pacman = Location::new(23, 13);
        place(&mut world, GhostColor::Red, 23, 11, 30);
        let planner = Planner::new(Metric::Maze);
        let hunted = planner.heuristic(&world, Some(GhostColor::Red), (29, 26));
        let sweeping = planner.heuristic(&world, None, (29, 26));
        assert_eq!(hunted, 2);
        assert!(sweeping > hunted);
    }
}
