#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Quantum Maze simulation.
//!
//! The world owns the one mutable structure everything else shares: the
//! grid topology, plus the arena of kinematic bodies moving through it.
//! All mutation flows through [`apply`], which turns [`Command`] values
//! into deterministic state changes and broadcasts [`Event`] values;
//! systems observe the world exclusively through the [`query`] module.

use quantum_maze_core::{BodyId, Command, Event};

mod bodies;
mod topology;

pub use topology::GridTopology;

use bodies::KinematicBody;

const DEFAULT_GRID_COLUMNS: u32 = 30;
const DEFAULT_GRID_ROWS: u32 = 20;
const DEFAULT_CELL_LENGTH: f32 = 15.0;

/// Represents the authoritative Quantum Maze world state.
#[derive(Debug)]
pub struct World {
    topology: GridTopology,
    bodies: Vec<KinematicBody>,
    next_body: u32,
}

impl World {
    /// Creates a new world with the default grid dimensions, every wall
    /// present, and an empty body arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            topology: GridTopology::all_walls_present(
                DEFAULT_GRID_COLUMNS,
                DEFAULT_GRID_ROWS,
                DEFAULT_CELL_LENGTH,
            ),
            bodies: Vec::new(),
            next_body: 0,
        }
    }

    fn body_mut(&mut self, body: BodyId) -> Option<&mut KinematicBody> {
        self.bodies.iter_mut().find(|candidate| candidate.id == body)
    }

    fn integrate_bodies(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let Self {
            topology, bodies, ..
        } = self;
        for body in bodies.iter_mut() {
            body.integrate(dt, topology, out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            columns,
            rows,
            cell_length,
        } => {
            let cell_length = if cell_length > 0.0 {
                cell_length
            } else {
                DEFAULT_CELL_LENGTH
            };
            world.topology = GridTopology::all_walls_present(columns, rows, cell_length);
            world.bodies.clear();
            world.next_body = 0;
            out_events.push(Event::GridConfigured {
                columns: world.topology.columns(),
                rows: world.topology.rows(),
                cell_length,
            });
        }
        Command::BeginGeneration { start } => {
            if world.topology.mark_visited(start) {
                out_events.push(Event::GenerationStarted { start });
            }
        }
        Command::CarvePassage { from, to } => match world.topology.open_wall(from, to) {
            Ok(()) => {
                let _ = world.topology.mark_visited(to);
                out_events.push(Event::PassageCarved { from, to });
            }
            Err(reason) => {
                out_events.push(Event::CarveRejected { from, to, reason });
            }
        },
        Command::SpawnBody { cell, color } => {
            if world.topology.is_in_bounds(cell) {
                let id = BodyId::new(world.next_body);
                world.next_body = world.next_body.saturating_add(1);
                world
                    .bodies
                    .push(KinematicBody::spawned_at(id, cell, &world.topology, color));
                out_events.push(Event::BodySpawned {
                    body: id,
                    cell,
                    color,
                });
            }
        }
        Command::SetBodyMotion {
            body,
            velocity,
            acceleration,
        } => {
            if let Some(body) = world.body_mut(body) {
                body.set_motion(velocity, acceleration);
            }
        }
        Command::SnapBodyToCell { body, target } => {
            let Some(index) = world.bodies.iter().position(|candidate| candidate.id == body)
            else {
                return;
            };
            match world.bodies[index].snap_to(target, &world.topology) {
                Ok(from) => out_events.push(Event::BodySnapped {
                    body,
                    from,
                    to: target,
                }),
                Err(reason) => out_events.push(Event::SnapRejected {
                    body,
                    target,
                    reason,
                }),
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.integrate_bodies(dt.as_secs_f32(), out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use quantum_maze_core::{BodyId, BodySnapshot, BodyView, TopologyView};

    use super::World;

    /// Captures a read-only view of the grid topology.
    #[must_use]
    pub fn topology_view(world: &World) -> TopologyView<'_> {
        world.topology.view()
    }

    /// Captures snapshots of every body in deterministic identifier order.
    #[must_use]
    pub fn body_view(world: &World) -> BodyView {
        BodyView::from_snapshots(world.bodies.iter().map(|body| body.snapshot()).collect())
    }

    /// Snapshot of a single body, if it exists.
    #[must_use]
    pub fn body_snapshot(world: &World, body: BodyId) -> Option<BodySnapshot> {
        world
            .bodies
            .iter()
            .find(|candidate| candidate.id == body)
            .map(|candidate| candidate.snapshot())
    }
}
