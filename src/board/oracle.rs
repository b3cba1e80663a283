use super::walls::valid;
use crate::COLS;
use crate::ROWS;
use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;
use petgraph::graph::UnGraph;
use std::sync::OnceLock;

const CELLS: usize = ROWS * COLS;

/// all-pairs shortest-path table over the corridor graph.
///
/// the Manhattan metric overestimates badly around detours, so we pay the
/// one-time cost of exact distances: build the corridor graph and run a
/// unit-weight Dijkstra from every corridor cell. pairs involving a wall or
/// off-board cell read back as u16::MAX.
pub struct Oracle {
    table: Vec<u16>,
}

static ORACLE: OnceLock<Oracle> = OnceLock::new();

impl Oracle {
    pub fn get() -> &'static Self {
        ORACLE.get_or_init(Self::compute)
    }

    pub fn dist(&self, a: (u8, u8), b: (u8, u8)) -> u16 {
        let i = index(a.0 as i16, a.1 as i16);
        let j = index(b.0 as i16, b.1 as i16);
        match (i, j) {
            (Some(i), Some(j)) => self.table[i * CELLS + j],
            _ => u16::MAX,
        }
    }

    fn compute() -> Self {
        let mut graph = UnGraph::<(), ()>::default();
        let mut nodes: Vec<Option<NodeIndex>> = vec![None; CELLS];
        let mut cells: Vec<usize> = Vec::new();
        for row in 0..ROWS as i16 {
            for col in 0..COLS as i16 {
                if valid(row, col) {
                    let cell = index(row, col).expect("corridor cell in range");
                    nodes[cell] = Some(graph.add_node(()));
                    cells.push(cell);
                }
            }
        }
        for row in 0..ROWS as i16 {
            for col in 0..COLS as i16 {
                if let Some(here) = index(row, col).and_then(|i| nodes[i]) {
                    for (dr, dc) in [(0, 1), (1, 0)] {
                        if let Some(there) = index(row + dr, col + dc).and_then(|i| nodes[i]) {
                            graph.add_edge(here, there, ());
                        }
                    }
                }
            }
        }
        let mut table = vec![u16::MAX; CELLS * CELLS];
        for (node, &cell) in cells.iter().enumerate() {
            let source = NodeIndex::new(node);
            for (reached, steps) in dijkstra(&graph, source, None, |_| 1u16) {
                table[cell * CELLS + cells[reached.index()]] = steps;
            }
        }
        Self { table }
    }
}

fn index(row: i16, col: i16) -> Option<usize> {
    if row < 0 || row >= ROWS as i16 || col < 0 || col >= COLS as i16 {
        return None;
    }
    Some(row as usize * COLS + col as usize)
}
