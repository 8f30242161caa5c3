#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure steering system that turns input intent into body motion commands.
//!
//! The input collaborator hands over a direction vector each frame; this
//! system normalizes it, scales it by the configured speed constant, and
//! emits a motion command for the controlled body on every elapsed tick.
//! A queued discrete step instead emits a one-cell snap command, which the
//! world validates against bounds and walls.

use quantum_maze_core::{BodyId, BodyView, Command, Direction, Event, Vec2};

/// Configuration parameters required to construct the steering system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    speed: f32,
}

impl Config {
    /// Creates a new configuration using the provided speed constant,
    /// expressed in world units per second.
    #[must_use]
    pub const fn new(speed: f32) -> Self {
        Self { speed }
    }
}

/// Pure system that emits motion and step commands for a controlled body.
#[derive(Debug)]
pub struct Steering {
    speed: f32,
    intent: Vec2,
    pending_step: Option<Direction>,
}

impl Steering {
    /// Creates a new steering system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            speed: config.speed,
            intent: Vec2::ZERO,
            pending_step: None,
        }
    }

    /// Stores the current input intent. The vector is normalized so the
    /// speed constant alone decides how fast the body moves; a zero or
    /// degenerate vector stops the body.
    pub fn set_intent(&mut self, intent: Vec2) {
        self.intent = intent.normalized_or_zero();
    }

    /// Queues a discrete one-cell step to be attempted on the next tick,
    /// replacing any step already queued.
    pub fn request_step(&mut self, direction: Direction) {
        self.pending_step = Some(direction);
    }

    /// Consumes world events and the body view to emit commands for the
    /// controlled body. Steps whose target would leave the coordinate
    /// space entirely are dropped; the world reports every other
    /// rejection itself.
    pub fn handle(
        &mut self,
        events: &[Event],
        body_view: &BodyView,
        controlled: BodyId,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if !matches!(event, Event::TimeAdvanced { .. }) {
                continue;
            }

            if let Some(direction) = self.pending_step.take() {
                let snapshot = body_view.iter().find(|snapshot| snapshot.id == controlled);
                if let Some(snapshot) = snapshot {
                    if let Some(target) = snapshot.cell.step(direction) {
                        out.push(Command::SnapBodyToCell {
                            body: controlled,
                            target,
                        });
                    }
                }
                continue;
            }

            out.push(Command::SetBodyMotion {
                body: controlled,
                velocity: self.intent * self.speed,
                acceleration: Vec2::ZERO,
            });
        }
    }
}
