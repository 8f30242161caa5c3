#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for the Quantum Maze simulation.
//!
//! The driver owns everything the core leaves external: the frame clock,
//! the finish cell, win/lose evaluation, reset, and a scripted stand-in
//! for keyboard input. Each tick runs the fixed order the simulation
//! demands: one generation step while the maze is still building, then
//! body integration, then one diffusion step with a periodic collapse.

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use quantum_maze_core::{BodyColor, BodyId, CellCoord, Command, Direction, Event, Vec2};
use quantum_maze_presentation::compose_scene;
use quantum_maze_system_generation::{Config as GenerationConfig, MazeGenerator};
use quantum_maze_system_quantum_walk::{Config as FieldConfig, ProbabilityField};
use quantum_maze_system_steering::{Config as SteeringConfig, Steering};
use quantum_maze_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const TICK: Duration = Duration::from_millis(16);
/// Player speed in cells per second, scaled by the cell length.
const PLAYER_SPEED_CELLS: f32 = 4.0;
/// Ticks between field collapses once the maze is complete.
const COLLAPSE_INTERVAL: u64 = 30;
/// Ticks between re-rolls of the scripted player intent.
const INTENT_INTERVAL: u64 = 45;

/// Headless Quantum Maze simulation driver.
#[derive(Debug, Parser)]
#[command(name = "quantum-maze")]
struct Args {
    /// Number of cell columns in the maze.
    #[arg(long, default_value_t = 30)]
    columns: u32,
    /// Number of cell rows in the maze.
    #[arg(long, default_value_t = 20)]
    rows: u32,
    /// Side length of a single square cell in world units.
    #[arg(long, default_value_t = 15.0)]
    cell_length: f32,
    /// Seed for every random decision in the run.
    #[arg(long, default_value_t = 0x51EE_D001)]
    seed: u64,
    /// Maximum number of ticks simulated per round.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Number of autonomous bot bodies to spawn alongside the player.
    #[arg(long, default_value_t = 3)]
    bots: u32,
    /// Number of rounds to play; every round resets the maze.
    #[arg(long, default_value_t = 1)]
    rounds: u32,
}

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    /// The player's body reached the finish cell.
    PlayerReachedFinish,
    /// The collapsed field landed on the finish cell first.
    QuantumReachedFinish,
    /// The tick budget ran out.
    TimedOut,
}

/// One round's worth of simulation state, rebuilt wholesale on reset.
struct Session {
    world: World,
    generator: MazeGenerator,
    field: ProbabilityField,
    steering: Steering,
    rng: ChaCha8Rng,
    player: BodyId,
    finish: CellCoord,
}

impl Session {
    /// Builds a fresh session: new topology, new generator start, player
    /// and bots at their spawn cells, a new finish cell, and a uniform
    /// field. This is the atomic reset entry point; nothing of the
    /// previous round survives it.
    fn start(args: &Args, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = World::new();
        let mut events = Vec::new();

        world::apply(
            &mut world,
            Command::ConfigureGrid {
                columns: args.columns,
                rows: args.rows,
                cell_length: args.cell_length,
            },
            &mut events,
        );

        let mut generator =
            MazeGenerator::new(GenerationConfig::new(args.columns, args.rows, rng.gen()));
        let mut commands = Vec::new();
        let _ = generator.begin(&mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }

        let player = spawn_body(
            &mut world,
            CellCoord::new(0, 0),
            BodyColor::from_rgb(0x2f, 0x95, 0x32),
        )
        .context("player spawn was rejected")?;

        for _ in 0..args.bots {
            let cell = CellCoord::new(
                rng.gen_range(0..args.columns),
                rng.gen_range(0..args.rows),
            );
            let color = BodyColor::from_rgb(rng.gen(), rng.gen(), rng.gen());
            let bot = spawn_body(&mut world, cell, color).context("bot spawn was rejected")?;
            world::apply(
                &mut world,
                Command::SetBodyMotion {
                    body: bot,
                    velocity: Vec2::new(
                        rng.gen_range(-1.0..1.0_f32) * args.cell_length,
                        rng.gen_range(-1.0..1.0_f32) * args.cell_length,
                    ),
                    acceleration: Vec2::ZERO,
                },
                &mut events,
            );
        }

        let finish = CellCoord::new(
            rng.gen_range(0..args.columns),
            rng.gen_range(0..args.rows),
        );

        Ok(Self {
            world,
            generator,
            field: ProbabilityField::uniform(FieldConfig::new(args.columns, args.rows, rng.gen())),
            steering: Steering::new(SteeringConfig::new(args.cell_length * PLAYER_SPEED_CELLS)),
            rng,
            player,
            finish,
        })
    }

    /// Runs the round until someone reaches the finish or the budget runs
    /// out, returning the outcome and the tick it happened on.
    fn run(&mut self, max_ticks: u64) -> (Outcome, u64) {
        for tick_index in 0..max_ticks {
            // 1. Maze generation advances by one candidate.
            if !self.generator.is_complete() {
                let mut out = Vec::new();
                let view = query::topology_view(&self.world);
                self.generator.step(&view, &mut out);
                let mut events = Vec::new();
                for command in out {
                    world::apply(&mut self.world, command, &mut events);
                }
            }

            // 2. Bodies integrate against the current walls.
            let mut events = Vec::new();
            world::apply(&mut self.world, Command::Tick { dt: TICK }, &mut events);

            if tick_index % INTENT_INTERVAL == 0 {
                let intent = self.random_intent();
                self.steering.set_intent(intent);
            }
            let body_view = query::body_view(&self.world);
            let mut commands = Vec::new();
            self.steering
                .handle(&events, &body_view, self.player, &mut commands);
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }

            if self.player_cell() == Some(self.finish) {
                return (Outcome::PlayerReachedFinish, tick_index);
            }

            // 3. The probability field diffuses once the maze is carved,
            //    with a periodic collapse acting as the measurement.
            if self.generator.is_complete() {
                self.field.diffuse_step(&query::topology_view(&self.world));
                if tick_index % COLLAPSE_INTERVAL == 0 {
                    let cell = self.field.collapse();
                    if cell == self.finish {
                        return (Outcome::QuantumReachedFinish, tick_index);
                    }
                    self.field.clear_collapse();
                }
            }
        }
        (Outcome::TimedOut, max_ticks)
    }

    fn random_intent(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.gen_range(-1.0..1.0_f32),
            self.rng.gen_range(-1.0..1.0_f32),
        )
    }

    fn player_cell(&self) -> Option<CellCoord> {
        query::body_snapshot(&self.world, self.player).map(|snapshot| snapshot.cell)
    }

    /// Prints the maze with the player, finish, and any collapsed field
    /// cell marked.
    fn print_maze(&self) {
        let view = query::topology_view(&self.world);
        let (columns, rows) = view.dimensions();
        let player = self.player_cell();
        let collapsed = self.field.collapsed();

        for row in 0..rows {
            let mut top = String::new();
            let mut mid = String::new();
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                top.push('+');
                top.push_str(if view.is_open(cell, Direction::North) {
                    "   "
                } else {
                    "---"
                });
                mid.push(if view.is_open(cell, Direction::West) {
                    ' '
                } else {
                    '|'
                });
                let glyph = if player == Some(cell) {
                    " P "
                } else if collapsed == Some(cell) {
                    " Q "
                } else if cell == self.finish {
                    " F "
                } else {
                    "   "
                };
                mid.push_str(glyph);
            }
            top.push('+');
            mid.push('|');
            println!("{top}");
            println!("{mid}");
        }
        let mut bottom = String::new();
        for _ in 0..columns {
            bottom.push_str("+---");
        }
        bottom.push('+');
        println!("{bottom}");
    }
}

fn spawn_body(world: &mut World, cell: CellCoord, color: BodyColor) -> Option<BodyId> {
    let mut events = Vec::new();
    world::apply(world, Command::SpawnBody { cell, color }, &mut events);
    events.iter().find_map(|event| match event {
        Event::BodySpawned { body, .. } => Some(*body),
        _ => None,
    })
}


fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(args.columns >= 1 && args.rows >= 1, "the grid needs at least one cell");
    ensure!(args.cell_length > 0.0, "cell length must be positive");
    ensure!(args.rounds >= 1, "at least one round is required");

    for round in 0..args.rounds {
        let mut session = Session::start(&args, args.seed.wrapping_add(u64::from(round)))?;
        let (outcome, tick) = session.run(args.ticks);

        println!("round {}: {:?} after {} ticks", round + 1, outcome, tick);
        session.print_maze();

        let scene = compose_scene(
            &query::topology_view(&session.world),
            &query::body_view(&session.world),
            &session.field,
        )?;
        println!(
            "scene: {} passage shapes, {} bodies, finish at ({}, {})",
            scene.passages.len(),
            scene.bodies.len(),
            session.finish.column(),
            session.finish.row(),
        );
    }

    Ok(())
}
