use std::time::Duration;

use quantum_maze_core::{
    BodyColor, BodyId, CellCoord, Command, Direction, Event, StepError, Vec2,
};
use quantum_maze_system_steering::{Config, Steering};
use quantum_maze_world::{self as world, query, World};

const CELL_LENGTH: f32 = 10.0;

fn configure(world: &mut World, columns: u32, rows: u32) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::ConfigureGrid {
            columns,
            rows,
            cell_length: CELL_LENGTH,
        },
        &mut events,
    );
}

fn spawn_body(world: &mut World, cell: CellCoord) -> BodyId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnBody {
            cell,
            color: BodyColor::from_rgb(0x2f, 0x95, 0x32),
        },
        &mut events,
    );
    events
        .iter()
        .find_map(|event| match event {
            Event::BodySpawned { body, .. } => Some(*body),
            _ => None,
        })
        .expect("spawn must emit BodySpawned")
}

fn carve(world: &mut World, from: CellCoord, to: CellCoord) {
    let mut events = Vec::new();
    world::apply(world, Command::CarvePassage { from, to }, &mut events);
}

fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);
    events
}

fn drive_one_tick(
    world: &mut World,
    steering: &mut Steering,
    controlled: BodyId,
    dt: Duration,
) -> Vec<Event> {
    let events = tick(world, dt);
    let body_view = query::body_view(world);
    let mut commands = Vec::new();
    steering.handle(&events, &body_view, controlled, &mut commands);
    let mut applied = Vec::new();
    for command in commands {
        world::apply(world, command, &mut applied);
    }
    applied
}

#[test]
fn sealed_cell_traps_the_body_regardless_of_dt() {
    let mut world = World::new();
    configure(&mut world, 3, 3);
    let body = spawn_body(&mut world, CellCoord::new(1, 1));

    let mut steering = Steering::new(Config::new(40.0));
    steering.set_intent(Vec2::new(1.0, 1.0));

    for dt_millis in [1_u64, 16, 250, 5_000] {
        let _ = drive_one_tick(&mut world, &mut steering, body, Duration::from_millis(16));
        let _ = tick(&mut world, Duration::from_millis(dt_millis));
        let snapshot = query::body_snapshot(&world, body).expect("body exists");
        assert_eq!(
            snapshot.cell,
            CellCoord::new(1, 1),
            "a fully sealed cell must never let the discrete coordinate change"
        );
    }
}

#[test]
fn body_crosses_only_open_walls() {
    let mut world = World::new();
    configure(&mut world, 3, 1);
    carve(&mut world, CellCoord::new(0, 0), CellCoord::new(1, 0));
    let body = spawn_body(&mut world, CellCoord::new(0, 0));

    let mut steering = Steering::new(Config::new(CELL_LENGTH));
    steering.set_intent(Vec2::new(1.0, 0.0));

    // One second per cell at this speed: first crossing is open.
    let _ = drive_one_tick(&mut world, &mut steering, body, Duration::from_millis(16));
    let events = tick(&mut world, Duration::from_secs(1));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::BodyCellChanged { .. })));
    let snapshot = query::body_snapshot(&world, body).expect("body exists");
    assert_eq!(snapshot.cell, CellCoord::new(1, 0));

    // The wall between (1,0) and (2,0) is closed: velocity reflects.
    let _ = drive_one_tick(&mut world, &mut steering, body, Duration::from_millis(16));
    let events = tick(&mut world, Duration::from_secs(1));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::BodyBlocked { .. })));
    let snapshot = query::body_snapshot(&world, body).expect("body exists");
    assert_eq!(snapshot.cell, CellCoord::new(1, 0));
    assert!(snapshot.velocity.x < 0.0, "blocked axis must reflect");
}

#[test]
fn large_dt_cannot_carry_the_body_out_of_the_grid() {
    let mut world = World::new();
    configure(&mut world, 3, 1);
    carve(&mut world, CellCoord::new(0, 0), CellCoord::new(1, 0));
    let body = spawn_body(&mut world, CellCoord::new(0, 0));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetBodyMotion {
            body,
            velocity: Vec2::new(1000.0, 0.0),
            acceleration: Vec2::ZERO,
        },
        &mut events,
    );

    // One tick covers a hundred cells; only the first wall is open.
    let events = tick(&mut world, Duration::from_secs(1));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::BodyBlocked { .. })));

    let snapshot = query::body_snapshot(&world, body).expect("body exists");
    assert_eq!(snapshot.cell, CellCoord::new(0, 0));
    assert!(
        snapshot.position.x >= 0.0 && snapshot.position.x < 3.0 * CELL_LENGTH,
        "committed position left the grid at {}",
        snapshot.position.x
    );
    assert_eq!(
        (snapshot.position.x / CELL_LENGTH).floor() as u32,
        snapshot.cell.column(),
        "the discrete cell must track the committed position"
    );
    assert!(snapshot.velocity.x < 0.0, "blocked axis must reflect");
}

#[test]
fn queued_step_snaps_through_an_open_wall() {
    let mut world = World::new();
    configure(&mut world, 2, 2);
    carve(&mut world, CellCoord::new(0, 0), CellCoord::new(1, 0));
    let body = spawn_body(&mut world, CellCoord::new(0, 0));

    let mut steering = Steering::new(Config::new(CELL_LENGTH));
    steering.request_step(Direction::East);

    let applied = drive_one_tick(&mut world, &mut steering, body, Duration::from_millis(16));
    assert!(applied.iter().any(|event| matches!(
        event,
        Event::BodySnapped {
            to,
            ..
        } if *to == CellCoord::new(1, 0)
    )));

    let snapshot = query::body_snapshot(&world, body).expect("body exists");
    assert_eq!(snapshot.cell, CellCoord::new(1, 0));
    assert_eq!(snapshot.position, Vec2::new(CELL_LENGTH, 0.0));
}

#[test]
fn rejected_snaps_leave_the_body_untouched() {
    let mut world = World::new();
    configure(&mut world, 3, 3);
    let body = spawn_body(&mut world, CellCoord::new(1, 1));
    let before = query::body_snapshot(&world, body).expect("body exists");

    let cases = [
        (CellCoord::new(10, 1), StepError::OutOfBounds),
        (CellCoord::new(1, 1), StepError::NotAdjacent),
        (CellCoord::new(2, 2), StepError::NotAdjacent),
    ];
    for (target, expected) in cases {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SnapBodyToCell { body, target },
            &mut events,
        );
        assert!(
            events.iter().any(|event| matches!(
                event,
                Event::SnapRejected { reason, .. } if *reason == expected
            )),
            "expected {expected:?} for target {target:?}"
        );
        let after = query::body_snapshot(&world, body).expect("body exists");
        assert_eq!(after.cell, before.cell);
        assert_eq!(after.position, before.position);
        assert_eq!(after.velocity, before.velocity);
    }
}

#[test]
fn blocked_snap_reflects_velocity_and_reports_wall() {
    let mut world = World::new();
    configure(&mut world, 2, 1);
    let body = spawn_body(&mut world, CellCoord::new(0, 0));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetBodyMotion {
            body,
            velocity: Vec2::new(7.0, 0.0),
            acceleration: Vec2::ZERO,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SnapBodyToCell {
            body,
            target: CellCoord::new(1, 0),
        },
        &mut events,
    );

    assert!(events.iter().any(|event| matches!(
        event,
        Event::SnapRejected {
            reason: StepError::WallClosed,
            ..
        }
    )));
    let snapshot = query::body_snapshot(&world, body).expect("body exists");
    assert_eq!(snapshot.cell, CellCoord::new(0, 0));
    assert_eq!(snapshot.velocity, Vec2::new(-7.0, 0.0));
}

#[test]
fn zero_intent_stops_the_body() {
    let mut world = World::new();
    configure(&mut world, 2, 1);
    carve(&mut world, CellCoord::new(0, 0), CellCoord::new(1, 0));
    let body = spawn_body(&mut world, CellCoord::new(0, 0));

    let mut steering = Steering::new(Config::new(25.0));
    steering.set_intent(Vec2::new(1.0, 0.0));
    let _ = drive_one_tick(&mut world, &mut steering, body, Duration::from_millis(16));

    steering.set_intent(Vec2::ZERO);
    let _ = drive_one_tick(&mut world, &mut steering, body, Duration::from_millis(16));
    let snapshot = query::body_snapshot(&world, body).expect("body exists");
    assert_eq!(snapshot.velocity, Vec2::ZERO);
}
