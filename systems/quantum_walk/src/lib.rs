#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Discrete quantum-walk probability field over the maze topology.
//!
//! The field holds one non-negative weight per cell. A diffusion step
//! splits every cell's weight evenly across its open walls and hands the
//! shares to the corresponding neighbors, synchronously: the new
//! distribution is accumulated in a staging buffer and swapped in whole,
//! so no step ever reads a value it has already written. Sampling the
//! field down to a single definite cell (collapse) and resuming diffusion
//! from the untouched distribution (un-collapse) are two independent
//! operations; the driver decides when to call each.

use quantum_maze_core::{CellCoord, Direction, TopologyView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the probability field.
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

/// Dense per-cell probability distribution with an optional collapsed cell.
#[derive(Debug)]
pub struct ProbabilityField {
    columns: u32,
    rows: u32,
    weights: Vec<f32>,
    staging: Vec<f32>,
    collapsed: Option<CellCoord>,
    rng: ChaCha8Rng,
}

impl ProbabilityField {
    /// Creates a field spanning the grid with a uniform distribution.
    #[must_use]
    pub fn uniform(config: Config) -> Self {
        let columns = config.columns.max(1);
        let rows = config.rows.max(1);
        let count = columns as usize * rows as usize;
        let mut field = Self {
            columns,
            rows,
            weights: vec![0.0; count],
            staging: vec![0.0; count],
            collapsed: None,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        };
        field.reset_uniform();
        field
    }

    /// Resets every cell's weight to `1 / (columns * rows)` and clears any
    /// recorded collapse.
    pub fn reset_uniform(&mut self) {
        let uniform = 1.0 / self.weights.len() as f32;
        for weight in &mut self.weights {
            *weight = uniform;
        }
        self.collapsed = None;
    }

    /// Concentrates the whole distribution on a single cell and clears any
    /// recorded collapse. Out-of-bounds cells leave the field unchanged.
    pub fn concentrate_at(&mut self, cell: CellCoord) {
        let Some(index) = self.index(cell) else {
            return;
        };
        for weight in &mut self.weights {
            *weight = 0.0;
        }
        self.weights[index] = 1.0;
        self.collapsed = None;
    }

    /// Performs one synchronous diffusion step across open walls.
    ///
    /// Every cell with positive weight splits it evenly among its open
    /// walls; a cell with zero open exits contributes nothing, dropping
    /// its mass for the step. On a fully generated maze that case never
    /// arises, since every reachable cell keeps at least one open wall.
    /// A topology whose dimensions disagree with the field is ignored.
    pub fn diffuse_step(&mut self, topology: &TopologyView<'_>) {
        if topology.dimensions() != (self.columns, self.rows) {
            return;
        }

        for slot in &mut self.staging {
            *slot = 0.0;
        }

        for row in 0..self.rows {
            for column in 0..self.columns {
                let cell = CellCoord::new(column, row);
                let index = match self.index(cell) {
                    Some(index) => index,
                    None => continue,
                };
                let weight = self.weights[index];
                if weight <= 0.0 {
                    continue;
                }

                let Some(state) = topology.cell(cell) else {
                    continue;
                };
                let exits = state.open_wall_count();
                if exits == 0 {
                    continue;
                }

                let share = weight / exits as f32;
                for direction in Direction::ALL {
                    if !state.is_open(direction) {
                        continue;
                    }
                    let Some(neighbor) = topology.neighbor(cell, direction) else {
                        continue;
                    };
                    if let Some(neighbor_index) = self.index(neighbor) {
                        self.staging[neighbor_index] += share;
                    }
                }
            }
        }

        std::mem::swap(&mut self.weights, &mut self.staging);
    }

    /// Samples one definite cell from the distribution and records it.
    ///
    /// Draws `r` uniformly from `[0, 1)`, walks the cells in row-major
    /// order accumulating weight, and selects the first cell whose running
    /// sum exceeds `r`. Floating-point accumulation can leave the final sum
    /// a hair under 1.0; when `r` falls in that gap the last cell is
    /// selected so a collapse always lands in bounds. The stored weights
    /// are not altered.
    pub fn collapse(&mut self) -> CellCoord {
        let r: f32 = self.rng.gen();
        let mut running = 0.0_f32;
        let mut selected = self.cell_for(self.weights.len() - 1);

        for (index, weight) in self.weights.iter().enumerate() {
            running += weight;
            if r < running {
                selected = self.cell_for(index);
                break;
            }
        }

        self.collapsed = Some(selected);
        selected
    }

    /// Forgets the recorded collapse so diffusion can resume from the
    /// preserved distribution.
    pub fn clear_collapse(&mut self) {
        self.collapsed = None;
    }

    /// Cell recorded by the most recent collapse, if any.
    #[must_use]
    pub const fn collapsed(&self) -> Option<CellCoord> {
        self.collapsed
    }

    /// Row-major slice of every cell's weight.
    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight of a single cell; out-of-bounds coordinates read as zero.
    #[must_use]
    pub fn weight(&self, cell: CellCoord) -> f32 {
        self.index(cell)
            .and_then(|index| self.weights.get(index).copied())
            .unwrap_or(0.0)
    }

    /// Sum of every cell's weight. Stays within a small epsilon of 1.0
    /// across diffusion steps, since diffusion only redistributes mass.
    #[must_use]
    pub fn total_mass(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Dimensions of the field in whole cells.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            Some(cell.row() as usize * self.columns as usize + cell.column() as usize)
        } else {
            None
        }
    }

    fn cell_for(&self, index: usize) -> CellCoord {
        let columns = self.columns as usize;
        CellCoord::new((index % columns) as u32, (index / columns) as u32)
    }
}
