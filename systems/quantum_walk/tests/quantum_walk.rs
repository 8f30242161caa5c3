use quantum_maze_core::{CellCoord, Command, Event};
use quantum_maze_system_generation::{Config as GenerationConfig, MazeGenerator};
use quantum_maze_system_quantum_walk::{Config, ProbabilityField};
use quantum_maze_world::{self as world, query, World};

const MASS_TOLERANCE: f32 = 1e-4;

fn configure(world: &mut World, columns: u32, rows: u32) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::ConfigureGrid {
            columns,
            rows,
            cell_length: 1.0,
        },
        &mut events,
    );
}

fn generate_maze(world: &mut World, columns: u32, rows: u32, seed: u64) {
    configure(world, columns, rows);
    let mut generator = MazeGenerator::new(GenerationConfig::new(columns, rows, seed));
    let mut events: Vec<Event> = Vec::new();
    let mut commands = Vec::new();
    let _ = generator.begin(&mut commands);
    for command in commands {
        world::apply(world, command, &mut events);
    }
    while !generator.is_complete() {
        let mut out = Vec::new();
        let view = query::topology_view(world);
        generator.step(&view, &mut out);
        for command in out {
            world::apply(world, command, &mut events);
        }
    }
}

fn carve(world: &mut World, from: CellCoord, to: CellCoord) {
    let mut events = Vec::new();
    world::apply(world, Command::CarvePassage { from, to }, &mut events);
    assert!(
        events
            .iter()
            .any(|event| matches!(event, Event::PassageCarved { .. })),
        "expected carve between {from:?} and {to:?} to succeed"
    );
}

#[test]
fn diffusion_conserves_mass_on_a_generated_maze() {
    let mut world = World::new();
    generate_maze(&mut world, 10, 8, 0xC0FF_EE00);

    let mut field = ProbabilityField::uniform(Config::new(10, 8, 1));
    for step in 0..50 {
        field.diffuse_step(&query::topology_view(&world));
        let mass = field.total_mass();
        assert!(
            (mass - 1.0).abs() < MASS_TOLERANCE,
            "mass drifted to {mass} after step {step}"
        );
        assert!(
            field.weights().iter().all(|weight| *weight >= 0.0),
            "negative weight after step {step}"
        );
    }
}

#[test]
fn fully_open_two_by_two_stays_uniform() {
    let mut world = World::new();
    configure(&mut world, 2, 2);
    carve(&mut world, CellCoord::new(0, 0), CellCoord::new(1, 0));
    carve(&mut world, CellCoord::new(0, 1), CellCoord::new(1, 1));
    carve(&mut world, CellCoord::new(0, 0), CellCoord::new(0, 1));
    carve(&mut world, CellCoord::new(1, 0), CellCoord::new(1, 1));

    let mut field = ProbabilityField::uniform(Config::new(2, 2, 3));
    field.diffuse_step(&query::topology_view(&world));

    for weight in field.weights() {
        assert!(
            (*weight - 0.25).abs() < 1e-6,
            "symmetric fan-out should cancel, got {weight}"
        );
    }
}

#[test]
fn sealed_topology_drops_all_mass() {
    // Every wall closed means zero open exits everywhere; the policy is to
    // contribute nothing rather than fail.
    let mut world = World::new();
    configure(&mut world, 3, 3);

    let mut field = ProbabilityField::uniform(Config::new(3, 3, 5));
    field.diffuse_step(&query::topology_view(&world));
    assert!(field.total_mass().abs() < 1e-6);
}

#[test]
fn collapse_on_a_concentrated_distribution_is_deterministic() {
    let mut field = ProbabilityField::uniform(Config::new(4, 4, 9));
    let target = CellCoord::new(2, 3);
    field.concentrate_at(target);

    for _ in 0..20 {
        assert_eq!(field.collapse(), target);
        assert_eq!(field.collapsed(), Some(target));
    }
    // Sampling must not disturb the stored distribution.
    assert!((field.weight(target) - 1.0).abs() < 1e-6);
}

#[test]
fn collapse_always_lands_in_bounds() {
    let mut world = World::new();
    generate_maze(&mut world, 6, 5, 0xFEED);

    let mut field = ProbabilityField::uniform(Config::new(6, 5, 42));
    for _ in 0..100 {
        field.diffuse_step(&query::topology_view(&world));
        let cell = field.collapse();
        assert!(cell.column() < 6 && cell.row() < 5, "collapsed at {cell:?}");
        field.clear_collapse();
    }
}

#[test]
fn clear_collapse_resumes_from_the_preserved_distribution() {
    let mut world = World::new();
    generate_maze(&mut world, 5, 5, 0xB0B0);

    let mut sampled = ProbabilityField::uniform(Config::new(5, 5, 77));
    let mut untouched = ProbabilityField::uniform(Config::new(5, 5, 77));

    for _ in 0..5 {
        sampled.diffuse_step(&query::topology_view(&world));
        untouched.diffuse_step(&query::topology_view(&world));
    }

    let _ = sampled.collapse();
    sampled.clear_collapse();
    assert_eq!(sampled.collapsed(), None);

    sampled.diffuse_step(&query::topology_view(&world));
    untouched.diffuse_step(&query::topology_view(&world));
    assert_eq!(sampled.weights(), untouched.weights());
}

#[test]
fn identical_seeds_replay_identical_collapse_sequences() {
    let mut world = World::new();
    generate_maze(&mut world, 6, 6, 0xABCD);

    let run = |field_seed: u64| {
        let mut field = ProbabilityField::uniform(Config::new(6, 6, field_seed));
        let mut cells = Vec::new();
        for _ in 0..10 {
            field.diffuse_step(&query::topology_view(&world));
            cells.push(field.collapse());
            field.clear_collapse();
        }
        cells
    };

    assert_eq!(run(0x1234), run(0x1234));
}
