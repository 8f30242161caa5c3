#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Quantum Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::ops::{Add, AddAssign, Mul};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cardinal directions across cell walls.
///
/// The discriminant order matches the wall-flag storage inside
/// [`CellState`]: east, south, west, north. Opposite directions differ by
/// two positions, which keeps the symmetry bookkeeping trivial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward decreasing row indices.
    North,
}

impl Direction {
    /// All four directions in wall-storage order.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Index of the direction within a cell's wall-flag array.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Direction::East => 0,
            Direction::South => 1,
            Direction::West => 2,
            Direction::North => 3,
        }
    }

    /// Direction pointing back across the same wall.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::North => Direction::South,
        }
    }

    /// Returns the direction from `from` to `to` if and only if the two
    /// cells are orthogonally adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        let delta_column = i64::from(to.column()) - i64::from(from.column());
        let delta_row = i64::from(to.row()) - i64::from(from.row());
        match (delta_column, delta_row) {
            (1, 0) => Some(Direction::East),
            (0, 1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            (0, -1) => Some(Direction::North),
            _ => None,
        }
    }
}

/// Axis of motion used when reporting blocked integration steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal motion across east/west walls.
    Column,
    /// Vertical motion across south/north walls.
    Row,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Coordinate one cell over in the provided direction, without any grid
    /// bounds check. Returns `None` when the step would leave the coordinate
    /// space entirely (below zero or past `u32::MAX`).
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::East => (self.column.checked_add(1)?, self.row),
            Direction::South => (self.column, self.row.checked_add(1)?),
            Direction::West => (self.column.checked_sub(1)?, self.row),
            Direction::North => (self.column, self.row.checked_sub(1)?),
        };
        Some(Self::new(column, row))
    }
}

/// Two-component vector used for continuous positions, velocities, and
/// accelerations expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component, increasing toward higher columns.
    pub x: f32,
    /// Vertical component, increasing toward higher rows.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the vector scaled to unit length, or the zero vector when the
    /// input is too short to normalize meaningfully.
    #[must_use]
    pub fn normalized_or_zero(self) -> Vec2 {
        let length = self.length();
        if length <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / length, self.y / length)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Unique identifier assigned to a kinematic body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(u32);

impl BodyId {
    /// Creates a new body identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Visual appearance applied to a kinematic body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl BodyColor {
    /// Creates a new body color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Wall and visitation state of a single grid cell.
///
/// Walls are stored as four presence flags in [`Direction`] storage order.
/// A freshly sealed cell has every wall present and is unvisited; the world
/// keeps the symmetry invariant by always clearing flags pairwise through
/// its carve entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellState {
    walls: [bool; 4],
    visited: bool,
}

impl CellState {
    /// Creates a cell with all four walls present and no visitation mark.
    #[must_use]
    pub const fn sealed() -> Self {
        Self {
            walls: [true; 4],
            visited: false,
        }
    }

    /// Reports whether the wall in the provided direction is still present.
    #[must_use]
    pub const fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.index()]
    }

    /// Reports whether the wall in the provided direction has been opened.
    #[must_use]
    pub const fn is_open(&self, direction: Direction) -> bool {
        !self.has_wall(direction)
    }

    /// Number of walls that have been opened around this cell.
    #[must_use]
    pub fn open_wall_count(&self) -> usize {
        self.walls.iter().filter(|wall| !**wall).count()
    }

    /// Clears the wall flag in the provided direction.
    pub fn open_wall(&mut self, direction: Direction) {
        self.walls[direction.index()] = false;
    }

    /// Reports whether generation has visited this cell.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Marks this cell as visited by generation.
    pub fn mark_visited(&mut self) {
        self.visited = true;
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::sealed()
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the grid topology with every wall present and clears the
    /// body arena. This is the atomic reset entry point.
    ConfigureGrid {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
        /// Side length of each square cell measured in world units.
        cell_length: f32,
    },
    /// Marks the generation start cell as visited.
    BeginGeneration {
        /// Cell chosen by the generator as the root of the spanning tree.
        start: CellCoord,
    },
    /// Opens the wall between two adjacent cells and marks the destination
    /// cell as visited.
    CarvePassage {
        /// Already-visited cell on the near side of the wall.
        from: CellCoord,
        /// Newly reached cell on the far side of the wall.
        to: CellCoord,
    },
    /// Requests creation of a kinematic body at the origin of a cell.
    SpawnBody {
        /// Cell whose origin the body should occupy after spawning.
        cell: CellCoord,
        /// Appearance to assign to the spawned body.
        color: BodyColor,
    },
    /// Overwrites a body's velocity and acceleration before integration.
    SetBodyMotion {
        /// Identifier of the body whose motion is being controlled.
        body: BodyId,
        /// New velocity in world units per second.
        velocity: Vec2,
        /// New acceleration in world units per second squared.
        acceleration: Vec2,
    },
    /// Requests that a body move by exactly one cell, wall permitting.
    SnapBodyToCell {
        /// Identifier of the body attempting the step.
        body: BodyId,
        /// Cell the body should occupy after the step.
        target: CellCoord,
    },
    /// Advances the simulation clock and integrates every body.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the grid was rebuilt with the provided dimensions.
    GridConfigured {
        /// Number of cell columns in the rebuilt grid.
        columns: u32,
        /// Number of cell rows in the rebuilt grid.
        rows: u32,
        /// Side length of each square cell in world units.
        cell_length: f32,
    },
    /// Confirms that generation claimed its start cell.
    GenerationStarted {
        /// Cell now marked as the visited root of the spanning tree.
        start: CellCoord,
    },
    /// Confirms that a wall was opened between two adjacent cells.
    PassageCarved {
        /// Cell on the near side of the opened wall.
        from: CellCoord,
        /// Cell on the far side of the opened wall, now visited.
        to: CellCoord,
    },
    /// Reports that a carve request was rejected.
    CarveRejected {
        /// Cell on the near side of the requested wall.
        from: CellCoord,
        /// Cell on the far side of the requested wall.
        to: CellCoord,
        /// Specific reason the carve failed.
        reason: CarveError,
    },
    /// Confirms that a body was created.
    BodySpawned {
        /// Identifier assigned to the new body by the world.
        body: BodyId,
        /// Cell the body occupies after spawning.
        cell: CellCoord,
        /// Appearance applied to the body.
        color: BodyColor,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that integration moved a body into a different cell.
    BodyCellChanged {
        /// Identifier of the body that crossed a cell boundary.
        body: BodyId,
        /// Cell the body occupied before the tick.
        from: CellCoord,
        /// Cell the body occupies after the tick.
        to: CellCoord,
    },
    /// Reports that a closed wall reflected one axis of a body's motion.
    BodyBlocked {
        /// Identifier of the body whose motion was reflected.
        body: BodyId,
        /// Axis whose velocity component was negated.
        axis: Axis,
        /// Direction of the closed wall that blocked the crossing.
        direction: Direction,
    },
    /// Confirms that a body completed a discrete one-cell step.
    BodySnapped {
        /// Identifier of the body that stepped.
        body: BodyId,
        /// Cell the body occupied before the step.
        from: CellCoord,
        /// Cell the body occupies after the step.
        to: CellCoord,
    },
    /// Reports that a discrete step request was rejected.
    SnapRejected {
        /// Identifier of the body whose step was refused.
        body: BodyId,
        /// Cell the step attempted to reach.
        target: CellCoord,
        /// Specific reason the step failed.
        reason: StepError,
    },
}

/// Reasons a carve request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarveError {
    /// At least one endpoint lies outside the configured grid.
    OutOfBounds,
    /// The endpoints are not orthogonally adjacent.
    NotAdjacent,
}

/// Reasons a discrete body step may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepError {
    /// The target cell lies outside the configured grid.
    OutOfBounds,
    /// The target cell is not orthogonally adjacent to the body's cell.
    NotAdjacent,
    /// The wall toward the target cell is still present; the body's
    /// velocity was reflected instead of moving.
    WallClosed,
}

/// Read-only view into the dense grid of cell states.
#[derive(Clone, Copy, Debug)]
pub struct TopologyView<'a> {
    cells: &'a [CellState],
    columns: u32,
    rows: u32,
    cell_length: f32,
}

impl<'a> TopologyView<'a> {
    /// Captures a new topology view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellState], columns: u32, rows: u32, cell_length: f32) -> Self {
        Self {
            cells,
            columns,
            rows,
            cell_length,
        }
    }

    /// Provides the dimensions of the underlying grid in whole cells.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Row-major slice of every cell state in the grid.
    #[must_use]
    pub const fn cells(&self) -> &'a [CellState] {
        self.cells
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

    /// Reports whether the wall on the provided side of a cell is open.
    /// Out-of-bounds queries read as closed.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord, direction: Direction) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .is_some_and(|state| state.is_open(direction))
    }

    /// Reports whether generation has visited the provided cell.
    /// Out-of-bounds queries read as unvisited.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .is_some_and(CellState::is_visited)
    }

    /// Retrieves the state of a single cell, if in bounds.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).and_then(|index| self.cells.get(index)).copied()
    }

    /// Row-major index of the coordinate within [`Self::cells`].
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.is_in_bounds(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Immutable representation of a single body's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    /// Unique identifier assigned to the body.
    pub id: BodyId,
    /// Grid cell currently occupied by the body.
    pub cell: CellCoord,
    /// Continuous position in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Appearance assigned to the body.
    pub color: BodyColor,
}

/// Read-only snapshot describing all bodies within the maze.
#[derive(Clone, Debug, Default)]
pub struct BodyView {
    snapshots: Vec<BodySnapshot>,
}

impl BodyView {
    /// Creates a new body view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BodySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured body snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &BodySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BodySnapshot> {
        self.snapshots
    }
}
