use crate::board::Metric;
use crate::state::GhostColor;
use crate::state::Mode;
use crate::state::World;
use crate::state::CARDINALS;
use crate::state::GHOST_COLORS;
use crate::ROWS;
use std::collections::VecDeque;

/// high-risk pellets cleared along the opening route, before the ghosts
/// spread out and make the corners expensive
const OPENING_PELLETS: [(u8, u8); 6] = [(29, 1), (29, 26), (26, 21), (22, 6), (5, 6), (5, 18)];

/// each super pellet with its two interior waiting cells. in chase mode we
/// idle on whichever waiting cell is closer, holding the fright trigger
/// until the ghosts commit
const WAITING_SPOTS: [((u8, u8), [(u8, u8); 2]); 4] = [
    ((3, 1), [(2, 1), (4, 1)]),
    ((3, 26), [(2, 26), (4, 26)]),
    ((23, 1), [(22, 1), (23, 2)]),
    ((23, 26), [(22, 26), (23, 25)]),
];

/// whether hunting this ghost would walk into an escort: an unfrightened
/// live ghost patrolling within touching distance of the would-be victim
pub fn dangerous_neighbour(world: &World, metric: Metric, victim: GhostColor) -> bool {
    let hunted = &world.ghosts[victim as usize];
    GHOST_COLORS
        .into_iter()
        .filter(|&color| color != victim)
        .map(|color| &world.ghosts[color as usize])
        .filter(|ghost| !ghost.spawning && !ghost.frightened() && ghost.loc.is_valid())
        .any(|ghost| metric.dist(hunted.loc.cell(), ghost.loc.cell()) <= crate::DANGER_RADIUS)
}

/// pick the frightened ghost to hunt, if any.
///
/// a committed victim is kept while it stays huntable; otherwise the
/// nearest frightened ghost without an escort takes its place.
pub fn select_victim(
    world: &World,
    metric: Metric,
    victim: Option<GhostColor>,
) -> Option<GhostColor> {
    if let Some(color) = victim {
        let ghost = &world.ghosts[color as usize];
        if ghost.frightened()
            && !ghost.spawning
            && ghost.loc.is_valid()
            && !dangerous_neighbour(world, metric, color)
        {
            return Some(color);
        }
    }
    GHOST_COLORS
        .into_iter()
        .filter(|&color| {
            let ghost = &world.ghosts[color as usize];
            ghost.frightened() && !ghost.spawning && ghost.loc.is_valid()
        })
        .filter(|&color| !dangerous_neighbour(world, metric, color))
        .min_by_key(|&color| metric.dist(world.pacman.cell(), world.ghosts[color as usize].loc.cell()))
}

/// nearest ordinary pellet by corridor BFS from Pac-Man. super pellet
/// cells are fenced out of the traversal entirely: their collection is a
/// deliberate act, not a grazing accident.
pub fn nearest_pellet(world: &World) -> Option<(u8, u8)> {
    if !world.pacman.is_valid() {
        return None;
    }
    let start = world.pacman.cell();
    let mut visited = [0u32; ROWS];
    let mut queue = VecDeque::new();
    visited[start.0 as usize] |= 1 << start.1;
    queue.push_back(start);
    while let Some((row, col)) = queue.pop_front() {
        if world.pellet_at(row, col) && !world.super_pellet_at(row, col) {
            return Some((row, col));
        }
        for direction in CARDINALS {
            let (dr, dc) = direction.deltas();
            let (r, c) = (row as i16 + dr as i16, col as i16 + dc as i16);
            if crate::board::wall_at(r, c) {
                continue;
            }
            let (r, c) = (r as u8, c as u8);
            if world.super_pellet_at(r, c) || visited[r as usize] >> c & 1 == 1 {
                continue;
            }
            visited[r as usize] |= 1 << c;
            queue.push_back((r, c));
        }
    }
    None
}

/// keep the committed pellet target while it remains a live pellet that
/// Pac-Man has not just collected (and no fruit was just taken); otherwise
/// fall back to the nearest pellet
pub fn select_pellet_target(world: &World, pellet: (u8, u8)) -> (u8, u8) {
    let (row, col) = world.pacman.cell();
    if world.pellet_at(pellet.0, pellet.1)
        && !world.pacman.at(pellet.0, pellet.1)
        && !world.fruit_at(row, col)
    {
        return pellet;
    }
    nearest_pellet(world).unwrap_or(pellet)
}

/// choose the cell the search actually steers toward.
///
/// chase mode turns a surviving super pellet into a stake-out: target the
/// closer of its waiting cells instead of the pellet itself. failing that,
/// sweep any surviving opening pellet, then the committed pellet target.
pub fn select_search_target(world: &World, metric: Metric, pellet: (u8, u8)) -> (u8, u8) {
    let pacman = world.pacman.cell();
    if world.mode == Mode::Chase {
        for (corner, spots) in WAITING_SPOTS {
            if world.super_pellet_at(corner.0, corner.1) {
                return spots
                    .into_iter()
                    .min_by_key(|&spot| metric.dist(pacman, spot))
                    .expect("two waiting spots per corner");
            }
        }
    }
    if let Some(opening) = OPENING_PELLETS
        .into_iter()
        .filter(|&(row, col)| world.pellet_at(row, col))
        .min_by_key(|&cell| metric.dist(pacman, cell))
    {
        return opening;
    }
    pellet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Location;

    fn world() -> World {
        let mut world = World::default();
        world.mode = Mode::Chase;
        world.mode_steps = 100;
        world.pacman = Location::new(23, 13);
        world
    }

    fn place(world: &mut World, color: GhostColor, row: u8, col: u8, fright: u8) {
        let ghost = &mut world.ghosts[color as usize];
        ghost.loc = Location::new(row, col);
        ghost.spawning = false;
        ghost.fright_steps = fright;
    }

    #[test]
    fn victim_none_without_frightened_ghosts() {
        let mut world = world();
        place(&mut world, GhostColor::Red, 5, 10, 0);
        assert_eq!(select_victim(&world, Metric::Maze, None), None);
    }

    #[test]
    fn nearest_frightened_ghost_is_hunted() {
        let mut world = world();
        place(&mut world, GhostColor::Red, 5, 10, 10);
        place(&mut world, GhostColor::Pink, 23, 9, 10);
        let victim = select_victim(&world, Metric::Maze, None);
        assert_eq!(victim, Some(GhostColor::Pink));
    }

    #[test]
    fn committed_victim_is_kept() {
        let mut world = world();
        place(&mut world, GhostColor::Red, 5, 10, 10);
        place(&mut world, GhostColor::Pink, 23, 9, 10);
        let victim = select_victim(&world, Metric::Maze, Some(GhostColor::Red));
        assert_eq!(victim, Some(GhostColor::Red));
    }

    #[test]
    fn escorted_victim_is_abandoned() {
        let mut world = world();
        place(&mut world, GhostColor::Red, 5, 10, 10);
        place(&mut world, GhostColor::Pink, 5, 11, 0);
        assert_eq!(select_victim(&world, Metric::Maze, Some(GhostColor::Red)), None);
    }

    #[test]
    fn bfs_finds_adjacent_pellet() {
        let mut world = world();
        world.pellets[23] |= 1 << 12;
        assert_eq!(nearest_pellet(&world), Some((23, 12)));
    }

    #[test]
    fn bfs_routes_around_super_pellets() {
        let mut world = world();
        world.pacman = Location::new(2, 1);
        world.pellets[3] |= 1 << 1; // super pellet next door
        world.pellets[5] |= 1 << 1;
        assert_eq!(nearest_pellet(&world), Some((5, 1)));
    }

    #[test]
    fn live_pellet_target_is_kept() {
        let mut world = world();
        world.pellets[23] |= 1 << 9;
        world.pellets[23] |= 1 << 12;
        assert_eq!(select_pellet_target(&world, (23, 9)), (23, 9));
    }

    #[test]
    fn collected_pellet_target_is_replaced() {
        let mut world = world();
        world.pellets[23] |= 1 << 12;
        assert_eq!(select_pellet_target(&world, (23, 9)), (23, 12));
    }

    #[test]
    fn chase_waits_beside_super_pellet() {
        let mut world = world();
        world.pellets[23] |= 1 << 1;
        world.pacman = Location::new(23, 6);
        let target = select_search_target(&world, Metric::Maze, (23, 12));
        assert_eq!(target, (22, 1));
    }

    #[test]
    fn scatter_ignores_waiting_spots() {
        let mut world = world();
        world.mode = Mode::Scatter;
        world.pellets[23] |= 1 << 1;
        world.pellets[23] |= 1 << 12;
        let target = select_search_target(&world, Metric::Maze, (23, 12));
        assert_eq!(target, (23, 12));
    }

    #[test]
    fn opening_pellets_take_priority() {
        let mut world = world();
        world.mode = Mode::Scatter;
        world.pellets[29] |= 1 << 1;
        world.pellets[23] |= 1 << 12;
        let target = select_search_target(&world, Metric::Maze, (23, 12));
        assert_eq!(target, (29, 1));
    }
}
