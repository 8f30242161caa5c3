//! Dense grid of cells and the walls between them.

use quantum_maze_core::{CarveError, CellCoord, CellState, Direction, TopologyView, Vec2};

/// Rectangular grid of cells whose walls start fully present.
///
/// The topology is the one structure shared by generation, diffusion, and
/// body integration. Wall state changes exclusively through
/// [`GridTopology::open_wall`], which clears the flag on both sides of the
/// wall in the same call, so the symmetry invariant holds by construction.
#[derive(Clone, Debug)]
pub struct GridTopology {
    columns: u32,
    rows: u32,
    cell_length: f32,
    cells: Vec<CellState>,
}

impl GridTopology {
    /// Builds a grid where every cell has all four walls present and no
    /// visitation mark. Dimensions are clamped to at least one cell per
    /// axis so construction is total and deterministic.
    #[must_use]
    pub fn all_walls_present(columns: u32, rows: u32, cell_length: f32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let count = columns as usize * rows as usize;
        Self {
            columns,
            rows,
            cell_length,
            cells: vec![CellState::sealed(); count],
        }
    }

    /// Number of cell columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Captures a read-only view of the cell grid.
    #[must_use]
    pub fn view(&self) -> TopologyView<'_> {
        TopologyView::new(&self.cells, self.columns, self.rows, self.cell_length)
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn is_in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the in-bounds neighbor of a cell in the provided direction.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let stepped = cell.step(direction)?;
        self.is_in_bounds(stepped).then_some(stepped)
    }

    /// Returns the direction from `a` to `b` if the two cells are
    /// orthogonally adjacent.
    #[must_use]
    pub fn direction_between(&self, a: CellCoord, b: CellCoord) -> Option<Direction> {
        Direction::between(a, b)
    }

    /// Opens the wall between two adjacent in-bounds cells, clearing the
    /// flag on both sides.
    pub(crate) fn open_wall(&mut self, a: CellCoord, b: CellCoord) -> Result<(), CarveError> {
        if !self.is_in_bounds(a) || !self.is_in_bounds(b) {
            return Err(CarveError::OutOfBounds);
        }
        let direction = Direction::between(a, b).ok_or(CarveError::NotAdjacent)?;

        let index_a = self.index(a);
        let index_b = self.index(b);
        self.cells[index_a].open_wall(direction);
        self.cells[index_b].open_wall(direction.opposite());
        Ok(())
    }

    /// Marks a cell as visited by generation. Out-of-bounds coordinates are
    /// ignored and reported as `false`.
    pub(crate) fn mark_visited(&mut self, cell: CellCoord) -> bool {
        if self.is_in_bounds(cell) {
            let index = self.index(cell);
            self.cells[index].mark_visited();
            true
        } else {
            false
        }
    }

    /// Reports whether the wall on the provided side of a cell is present.
    /// Out-of-bounds queries read as walled.
    pub(crate) fn has_wall(&self, cell: CellCoord, direction: Direction) -> bool {
        if self.is_in_bounds(cell) {
            self.cells[self.index(cell)].has_wall(direction)
        } else {
            true
        }
    }

    /// Continuous position of a cell's origin corner.
    pub(crate) fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_length,
            cell.row() as f32 * self.cell_length,
        )
    }

    /// Discrete cell containing the provided continuous position, clamped
    /// into the grid so a committed position always maps to a valid cell.
    pub(crate) fn cell_at(&self, position: Vec2) -> CellCoord {
        CellCoord::new(
            clamp_axis(position.x, self.cell_length, self.columns),
            clamp_axis(position.y, self.cell_length, self.rows),
        )
    }

    fn index(&self, cell: CellCoord) -> usize {
        cell.row() as usize * self.columns as usize + cell.column() as usize
    }
}

/// Floor of `value / cell_length` clamped into `0..extent`.
fn clamp_axis(value: f32, cell_length: f32, extent: u32) -> u32 {
    let raw = (value / cell_length).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as u32).min(extent.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::GridTopology;
    use quantum_maze_core::{CarveError, CellCoord, Direction, Vec2};

    #[test]
    fn opening_a_wall_clears_both_sides() {
        let mut topology = GridTopology::all_walls_present(3, 3, 1.0);
        let a = CellCoord::new(1, 1);
        let b = CellCoord::new(2, 1);
        topology.open_wall(a, b).expect("adjacent cells");

        let view = topology.view();
        assert!(view.is_open(a, Direction::East));
        assert!(view.is_open(b, Direction::West));
        assert!(!view.is_open(a, Direction::West));
    }

    #[test]
    fn carving_between_non_adjacent_cells_is_rejected() {
        let mut topology = GridTopology::all_walls_present(3, 3, 1.0);
        assert_eq!(
            topology.open_wall(CellCoord::new(0, 0), CellCoord::new(2, 0)),
            Err(CarveError::NotAdjacent)
        );
        assert_eq!(
            topology.open_wall(CellCoord::new(2, 2), CellCoord::new(3, 2)),
            Err(CarveError::OutOfBounds)
        );
        assert!(topology.view().cells().iter().all(|cell| cell.open_wall_count() == 0));
    }

    #[test]
    fn degenerate_dimensions_are_clamped_to_one_cell() {
        let topology = GridTopology::all_walls_present(0, 0, 1.0);
        assert_eq!(topology.view().dimensions(), (1, 1));
    }

    #[test]
    fn positions_map_to_clamped_cells() {
        let topology = GridTopology::all_walls_present(4, 3, 2.0);
        assert_eq!(topology.cell_at(Vec2::new(5.0, 1.0)), CellCoord::new(2, 0));
        assert_eq!(topology.cell_at(Vec2::new(-1.0, 0.5)), CellCoord::new(0, 0));
        assert_eq!(topology.cell_at(Vec2::new(99.0, 99.0)), CellCoord::new(3, 2));
    }
}
