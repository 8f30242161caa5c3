#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic randomized-frontier maze generation system.
//!
//! The generator grows a spanning tree outward from a start cell: every
//! time a cell joins the tree its undecided boundary walls enter a
//! candidate pool, and each tick one candidate is drawn uniformly at
//! random. A candidate whose endpoints straddle the visited frontier is
//! carved open through a world command; a candidate whose endpoints are
//! both already visited is a stale duplicate and is discarded. The pool
//! draining empty is the completion signal.

use quantum_maze_core::{CellCoord, Command, Direction, Event, TopologyView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the generation system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    columns: u32,
    rows: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration for the provided grid dimensions and seed.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, rng_seed: u64) -> Self {
        Self {
            columns,
            rows,
            rng_seed,
        }
    }
}

/// Undecided wall between a frontier cell and one of its neighbors.
///
/// `near` is the cell that was visited when the candidate was produced;
/// `far` may have been visited since through another passage, which is
/// what makes a candidate stale.
#[derive(Clone, Copy, Debug)]
struct WallCandidate {
    near: CellCoord,
    far: CellCoord,
}

/// Pure system that emits carve commands until the maze spans the grid.
#[derive(Debug)]
pub struct MazeGenerator {
    columns: u32,
    rows: u32,
    rng: ChaCha8Rng,
    frontier: Vec<WallCandidate>,
    visited: Vec<bool>,
    complete: bool,
}

impl MazeGenerator {
    /// Creates a new generator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            columns: config.columns.max(1),
            rows: config.rows.max(1),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            frontier: Vec::new(),
            visited: Vec::new(),
            complete: false,
        }
    }

    /// Reports whether the candidate pool has drained and the maze spans
    /// every cell.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Picks a uniformly random start cell, claims it through a command,
    /// and seeds the candidate pool with its boundary walls.
    pub fn begin(&mut self, out: &mut Vec<Command>) -> CellCoord {
        let start = CellCoord::new(
            self.rng.gen_range(0..self.columns),
            self.rng.gen_range(0..self.rows),
        );
        self.begin_at(start, out);
        start
    }

    /// Claims the provided start cell and seeds the candidate pool.
    /// Out-of-bounds starts are clamped into the grid.
    pub fn begin_at(&mut self, start: CellCoord, out: &mut Vec<Command>) {
        let start = CellCoord::new(
            start.column().min(self.columns - 1),
            start.row().min(self.rows - 1),
        );
        self.frontier.clear();
        self.visited.clear();
        self.visited
            .resize(self.columns as usize * self.rows as usize, false);
        self.complete = false;
        out.push(Command::BeginGeneration { start });
        self.mark_visited(start);
        self.seed_candidates(start);
    }

    /// Consumes world events and the topology view, advancing generation by
    /// one candidate per elapsed tick.
    pub fn handle(&mut self, events: &[Event], topology: &TopologyView<'_>, out: &mut Vec<Command>) {
        for event in events {
            if matches!(event, Event::TimeAdvanced { .. }) {
                self.step(topology, out);
            }
        }
    }

    /// Draws and resolves a single wall candidate.
    pub fn step(&mut self, topology: &TopologyView<'_>, out: &mut Vec<Command>) {
        if self.complete {
            return;
        }
        if self.frontier.is_empty() {
            self.complete = true;
            return;
        }

        let index = self.rng.gen_range(0..self.frontier.len());
        let candidate = self.frontier.swap_remove(index);

        // The view lags behind commands emitted earlier in the same batch,
        // so visitation is tracked locally as well; the generator is the
        // only component that ever marks cells visited.
        let near_visited = self.is_visited(candidate.near, topology);
        let far_visited = self.is_visited(candidate.far, topology);
        if near_visited == far_visited {
            // Stale duplicate seeded from the other side of the wall.
            return;
        }

        let (from, to) = if near_visited {
            (candidate.near, candidate.far)
        } else {
            (candidate.far, candidate.near)
        };
        out.push(Command::CarvePassage { from, to });
        self.mark_visited(to);
        self.seed_candidates(to);
    }

    fn is_visited(&self, cell: CellCoord, topology: &TopologyView<'_>) -> bool {
        self.index(cell)
            .and_then(|index| self.visited.get(index).copied())
            .unwrap_or(false)
            || topology.is_visited(cell)
    }

    fn mark_visited(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(flag) = self.visited.get_mut(index) {
                *flag = true;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            Some(cell.row() as usize * self.columns as usize + cell.column() as usize)
        } else {
            None
        }
    }

    fn seed_candidates(&mut self, cell: CellCoord) {
        for direction in Direction::ALL {
            let Some(neighbor) = cell.step(direction) else {
                continue;
            };
            if neighbor.column() < self.columns && neighbor.row() < self.rows {
                self.frontier.push(WallCandidate {
                    near: cell,
                    far: neighbor,
                });
            }
        }
    }
}
