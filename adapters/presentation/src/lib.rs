#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Quantum Maze adapters.
//!
//! Renderers never touch the world directly: this crate turns the
//! topology view, the body view, and the probability field into plain
//! frame data — passage rectangles, body discs, and either a per-cell
//! probability overlay or a single collapsed marker. What a backend does
//! with the shapes is its own business; nothing here rasterizes.

use anyhow::{ensure, Result as AnyResult};
use glam::Vec2;
use quantum_maze_core::{BodyColor, BodyView, CellCoord, Direction, TopologyView};
use quantum_maze_system_quantum_walk::ProbabilityField;

/// Fraction of a cell covered by the inner passage square.
const PASSAGE_SCALE: f32 = 0.6;
/// Body disc radius as a fraction of the cell length.
const BODY_RADIUS_SCALE: f32 = 0.3;
/// Weights below this threshold are not worth a blob.
const OVERLAY_THRESHOLD: f32 = 0.01;
/// Blob radius grows with weight at this multiple of the cell length.
const OVERLAY_RADIUS_SCALE: f32 = 1.5;

/// Color applied to the probability overlay and the collapsed marker.
const FIELD_COLOR: Color = Color::new(1.0, 0.0, 1.0, 1.0);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

impl From<BodyColor> for Color {
    fn from(color: BodyColor) -> Self {
        Color::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Axis-aligned rectangle expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectShape {
    /// Upper-left corner of the rectangle.
    pub origin: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
}

/// Filled disc expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscShape {
    /// Center of the disc.
    pub center: Vec2,
    /// Radius of the disc.
    pub radius: f32,
    /// Fill color of the disc.
    pub color: Color,
}

/// Probability overlay blob anchored to a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldBlob {
    /// Cell the blob represents.
    pub cell: CellCoord,
    /// Disc drawn for the blob, alpha scaled by the cell's weight.
    pub disc: DiscShape,
}

/// Either the diffuse overlay or the single collapsed marker.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldPresentation {
    /// Pre-collapse: one blob per cell whose weight clears the threshold.
    Diffuse {
        /// Blobs for every visible cell, in row-major order.
        blobs: Vec<FieldBlob>,
    },
    /// Post-collapse: a single definite marker.
    Collapsed {
        /// Cell the field collapsed onto.
        cell: CellCoord,
        /// Marker disc at the collapsed cell.
        marker: DiscShape,
    },
}

/// Complete frame description handed to a rendering backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of cell columns in the grid.
    pub columns: u32,
    /// Number of cell rows in the grid.
    pub rows: u32,
    /// Side length of a single square cell in world units.
    pub cell_length: f32,
    /// Inner squares and wall-gap fillers for every carved cell.
    pub passages: Vec<RectShape>,
    /// One disc per kinematic body, in identifier order.
    pub bodies: Vec<DiscShape>,
    /// Probability overlay or collapsed marker.
    pub field: FieldPresentation,
}

/// Builds the frame description for the current simulation state.
///
/// Fails only when the probability field was built for a different grid
/// than the topology describes.
pub fn compose_scene(
    topology: &TopologyView<'_>,
    bodies: &BodyView,
    field: &ProbabilityField,
) -> AnyResult<Scene> {
    let (columns, rows) = topology.dimensions();
    ensure!(
        field.dimensions() == (columns, rows),
        "probability field covers {:?} but the topology is {:?}",
        field.dimensions(),
        (columns, rows),
    );

    let cell_length = topology.cell_length();
    let mut passages = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            push_passage_shapes(topology, CellCoord::new(column, row), &mut passages);
        }
    }

    let body_discs = bodies
        .iter()
        .map(|snapshot| DiscShape {
            center: Vec2::new(snapshot.position.x, snapshot.position.y)
                + Vec2::splat(cell_length * 0.5),
            radius: cell_length * BODY_RADIUS_SCALE,
            color: snapshot.color.into(),
        })
        .collect();

    Ok(Scene {
        columns,
        rows,
        cell_length,
        passages,
        bodies: body_discs,
        field: compose_field(field, cell_length),
    })
}

/// Emits the inner square and per-open-wall gap fillers for one cell.
///
/// A cell with every wall present stays dark; once any wall opens, the
/// inner square appears and each open side gets a filler rectangle that
/// visually merges the two passages.
fn push_passage_shapes(
    topology: &TopologyView<'_>,
    cell: CellCoord,
    out: &mut Vec<RectShape>,
) {
    let Some(state) = topology.cell(cell) else {
        return;
    };
    if state.open_wall_count() == 0 {
        return;
    }

    let cell_length = topology.cell_length();
    let inner = cell_length * PASSAGE_SCALE;
    let gap = (cell_length - inner) / 2.0;
    let origin = Vec2::new(
        cell.column() as f32 * cell_length,
        cell.row() as f32 * cell_length,
    );

    out.push(RectShape {
        origin: origin + Vec2::splat(gap),
        size: Vec2::splat(inner),
    });

    for direction in Direction::ALL {
        if !state.is_open(direction) {
            continue;
        }
        let filler = match direction {
            Direction::East => RectShape {
                origin: origin + Vec2::new(gap + inner, gap),
                size: Vec2::new(gap, inner),
            },
            Direction::South => RectShape {
                origin: origin + Vec2::new(gap, gap + inner),
                size: Vec2::new(inner, gap),
            },
            Direction::West => RectShape {
                origin: origin + Vec2::new(0.0, gap),
                size: Vec2::new(gap, inner),
            },
            Direction::North => RectShape {
                origin: origin + Vec2::new(gap, 0.0),
                size: Vec2::new(inner, gap),
            },
        };
        out.push(filler);
    }
}

fn compose_field(field: &ProbabilityField, cell_length: f32) -> FieldPresentation {
    if let Some(cell) = field.collapsed() {
        let center = Vec2::new(
            (cell.column() as f32 + 0.5) * cell_length,
            (cell.row() as f32 + 0.5) * cell_length,
        );
        return FieldPresentation::Collapsed {
            cell,
            marker: DiscShape {
                center,
                radius: cell_length * BODY_RADIUS_SCALE,
                color: FIELD_COLOR,
            },
        };
    }

    let (columns, _) = field.dimensions();
    let blobs = field
        .weights()
        .iter()
        .enumerate()
        .filter(|(_, weight)| **weight > OVERLAY_THRESHOLD)
        .map(|(index, weight)| {
            let cell = CellCoord::new(
                (index as u32) % columns,
                (index as u32) / columns,
            );
            let center = Vec2::new(
                (cell.column() as f32 + 0.5) * cell_length,
                (cell.row() as f32 + 0.5) * cell_length,
            );
            FieldBlob {
                cell,
                disc: DiscShape {
                    center,
                    radius: cell_length * weight * OVERLAY_RADIUS_SCALE,
                    color: FIELD_COLOR.with_alpha(weight.clamp(0.0, 1.0)),
                },
            }
        })
        .collect();

    FieldPresentation::Diffuse { blobs }
}

#[cfg(test)]
mod tests {
    use super::{compose_scene, FieldPresentation, OVERLAY_THRESHOLD};
    use quantum_maze_core::{BodyColor, CellCoord, Command};
    use quantum_maze_system_quantum_walk::{Config, ProbabilityField};
    use quantum_maze_world::{self as world, query, World};

    fn configured_world(columns: u32, rows: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureGrid {
                columns,
                rows,
                cell_length: 10.0,
            },
            &mut events,
        );
        world
    }

    #[test]
    fn sealed_grid_has_no_passage_shapes() {
        let world = configured_world(4, 4);
        let field = ProbabilityField::uniform(Config::new(4, 4, 1));
        let scene = compose_scene(
            &query::topology_view(&world),
            &query::body_view(&world),
            &field,
        )
        .expect("matching dimensions");
        assert!(scene.passages.is_empty());
    }

    #[test]
    fn carved_cells_emit_inner_square_and_fillers() {
        let mut world = configured_world(2, 1);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::CarvePassage {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(1, 0),
            },
            &mut events,
        );

        let field = ProbabilityField::uniform(Config::new(2, 1, 1));
        let scene = compose_scene(
            &query::topology_view(&world),
            &query::body_view(&world),
            &field,
        )
        .expect("matching dimensions");
        // Two inner squares plus one filler on each side of the shared wall.
        assert_eq!(scene.passages.len(), 4);
    }

    #[test]
    fn collapse_switches_the_field_presentation() {
        let world = configured_world(3, 3);
        let mut field = ProbabilityField::uniform(Config::new(3, 3, 1));

        let scene = compose_scene(
            &query::topology_view(&world),
            &query::body_view(&world),
            &field,
        )
        .expect("matching dimensions");
        match &scene.field {
            FieldPresentation::Diffuse { blobs } => {
                // Uniform weight 1/9 clears the visibility threshold everywhere.
                assert_eq!(blobs.len(), 9);
                assert!(blobs
                    .iter()
                    .all(|blob| blob.disc.color.alpha > OVERLAY_THRESHOLD));
            }
            other => panic!("expected diffuse field, got {other:?}"),
        }

        let cell = field.collapse();
        let scene = compose_scene(
            &query::topology_view(&world),
            &query::body_view(&world),
            &field,
        )
        .expect("matching dimensions");
        match &scene.field {
            FieldPresentation::Collapsed {
                cell: collapsed, ..
            } => assert_eq!(*collapsed, cell),
            other => panic!("expected collapsed field, got {other:?}"),
        }
    }

    #[test]
    fn bodies_become_discs_with_their_colors() {
        let mut world = configured_world(2, 2);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SpawnBody {
                cell: CellCoord::new(1, 1),
                color: BodyColor::from_rgb(0xc8, 0x2a, 0x36),
            },
            &mut events,
        );

        let field = ProbabilityField::uniform(Config::new(2, 2, 1));
        let scene = compose_scene(
            &query::topology_view(&world),
            &query::body_view(&world),
            &field,
        )
        .expect("matching dimensions");
        assert_eq!(scene.bodies.len(), 1);
        assert!((scene.bodies[0].radius - 3.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_field_dimensions_are_rejected() {
        let world = configured_world(3, 3);
        let field = ProbabilityField::uniform(Config::new(2, 2, 1));
        assert!(compose_scene(
            &query::topology_view(&world),
            &query::body_view(&world),
            &field,
        )
        .is_err());
    }
}
