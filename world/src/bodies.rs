//! Kinematic bodies and their wall-constrained integration.

use quantum_maze_core::{Axis, BodyColor, BodyId, BodySnapshot, CellCoord, Direction, Event, StepError, Vec2};

use crate::topology::GridTopology;

/// A point mass advanced by explicit Euler integration and constrained by
/// the walls of the grid it inhabits.
///
/// Bodies live in the world's arena and are addressed by stable [`BodyId`]
/// handles; the whole arena is discarded together with the topology on
/// reset, so no handle ever dangles.
#[derive(Clone, Copy, Debug)]
pub(crate) struct KinematicBody {
    pub(crate) id: BodyId,
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    cell: CellCoord,
    color: BodyColor,
}

impl KinematicBody {
    /// Creates a body resting at the origin corner of the provided cell.
    pub(crate) fn spawned_at(
        id: BodyId,
        cell: CellCoord,
        topology: &GridTopology,
        color: BodyColor,
    ) -> Self {
        Self {
            id,
            position: topology.cell_origin(cell),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            cell,
            color,
        }
    }

    /// Captures the body's externally visible state.
    pub(crate) fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            cell: self.cell,
            position: self.position,
            velocity: self.velocity,
            color: self.color,
        }
    }

    /// Overwrites the body's velocity and acceleration.
    pub(crate) fn set_motion(&mut self, velocity: Vec2, acceleration: Vec2) {
        self.velocity = velocity;
        self.acceleration = acceleration;
    }

    /// Advances the body by `dt` seconds, resolving wall crossings one axis
    /// at a time.
    ///
    /// Each axis walks the cell boundaries on its path one at a time,
    /// checking the wall of every cell the step passes through: the first
    /// closed wall negates that velocity component and reverts the
    /// tentative position on that axis only, so diagonal motion against a
    /// single wall keeps sliding along it. The grid's outer walls never
    /// open, so a committed position always stays inside the grid and the
    /// discrete coordinate always equals the floored position.
    pub(crate) fn integrate(
        &mut self,
        dt: f32,
        topology: &GridTopology,
        out_events: &mut Vec<Event>,
    ) {
        self.velocity += self.acceleration * dt;
        let mut tentative = self.position + self.velocity * dt;

        let cell_length = topology.cell_length();
        let mut column = floor_cell(self.position.x, cell_length);
        let target_column = floor_cell(tentative.x, cell_length);
        while column != target_column {
            let direction = if target_column > column {
                Direction::East
            } else {
                Direction::West
            };
            let from = CellCoord::new(column as u32, self.cell.row());
            if topology.has_wall(from, direction) {
                self.velocity.x = -self.velocity.x;
                tentative.x = self.position.x;
                out_events.push(Event::BodyBlocked {
                    body: self.id,
                    axis: Axis::Column,
                    direction,
                });
                break;
            }
            column += if target_column > column { 1 } else { -1 };
        }

        let mut row = floor_cell(self.position.y, cell_length);
        let target_row = floor_cell(tentative.y, cell_length);
        while row != target_row {
            let direction = if target_row > row {
                Direction::South
            } else {
                Direction::North
            };
            let from = CellCoord::new(self.cell.column(), row as u32);
            if topology.has_wall(from, direction) {
                self.velocity.y = -self.velocity.y;
                tentative.y = self.position.y;
                out_events.push(Event::BodyBlocked {
                    body: self.id,
                    axis: Axis::Row,
                    direction,
                });
                break;
            }
            row += if target_row > row { 1 } else { -1 };
        }

        self.position = tentative;
        let landed = topology.cell_at(self.position);
        if landed != self.cell {
            out_events.push(Event::BodyCellChanged {
                body: self.id,
                from: self.cell,
                to: landed,
            });
            self.cell = landed;
        }
    }

    /// Moves the body by exactly one cell, wall permitting, snapping the
    /// continuous position to the target cell's origin.
    ///
    /// A closed wall reflects the velocity component normal to it and
    /// refuses the move; out-of-bounds or non-adjacent targets leave the
    /// body entirely untouched.
    pub(crate) fn snap_to(
        &mut self,
        target: CellCoord,
        topology: &GridTopology,
    ) -> Result<CellCoord, StepError> {
        if !topology.is_in_bounds(target) {
            return Err(StepError::OutOfBounds);
        }
        let direction = topology
            .direction_between(self.cell, target)
            .ok_or(StepError::NotAdjacent)?;
        if topology.has_wall(self.cell, direction) {
            match direction {
                Direction::East | Direction::West => self.velocity.x = -self.velocity.x,
                Direction::South | Direction::North => self.velocity.y = -self.velocity.y,
            }
            return Err(StepError::WallClosed);
        }

        let from = self.cell;
        self.cell = target;
        self.position = topology.cell_origin(target);
        Ok(from)
    }
}

/// Discrete cell index along one axis for a continuous coordinate.
fn floor_cell(value: f32, cell_length: f32) -> i64 {
    (value / cell_length).floor() as i64
}
