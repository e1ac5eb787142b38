use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::unbounded;
use elevator_dispatch::modules::dispatcher;
use elevator_dispatch::utilities::car::MockCar;
use elevator_dispatch::utilities::engine::DispatchEngine;
use elevator_dispatch::utilities::request_board::RequestBoard;
use shared_resources::direction::Direction;
use shared_resources::floor_range::FloorRange;

const SUBMITTERS: i32 = 6;

#[test]
fn submitters_on_distinct_floors_never_clobber_each_other() {
    let floors = FloorRange::new(-2, 20).unwrap();
    let board = RequestBoard::new(floors);

    thread::scope(|s| {
        for id in 0..SUBMITTERS {
            let board = &board;
            s.spawn(move || {
                for floor in floors.floors().filter(|f| f.rem_euclid(SUBMITTERS) == id) {
                    // every floor takes one call, in the direction it can have
                    let direction = if floor == floors.max() { Direction::Down } else { Direction::Up };
                    for _ in 0..50 {
                        board.set_request(direction, floor).unwrap();
                    }
                }
            });
        }
    });

    let snapshot = board.snapshot();
    let mut expected_up = vec![true; floors.len()];
    let mut expected_down = vec![false; floors.len()];
    expected_up[floors.len() - 1] = false;
    expected_down[floors.len() - 1] = true;
    assert_eq!(snapshot.up, expected_up);
    assert_eq!(snapshot.down, expected_down);
}

#[test]
fn calls_arriving_while_the_dispatcher_runs_are_all_served() {
    let board = Arc::new(RequestBoard::new(FloorRange::new(0, 9).unwrap()));
    let engine = DispatchEngine::new(Arc::clone(&board), MockCar::new(0), 0);
    let (status_tx, status_rx) = unbounded();
    let (shutdown_tx, shutdown_rx) = unbounded();
    let driver = thread::spawn(move || dispatcher::main(engine, Duration::from_millis(2), status_tx, shutdown_rx));

    thread::scope(|s| {
        s.spawn(|| board.set_request(Direction::Up, 3).unwrap());
        s.spawn(|| board.set_request(Direction::Down, 9).unwrap());
        s.spawn(|| board.set_request(Direction::Down, 6).unwrap());
    });

    let mut seen_pending = false;
    let drained = status_rx.iter().take(500).any(|status| {
        let pending = status.up_requests.iter().chain(&status.down_requests).any(|set| *set);
        seen_pending |= pending;
        seen_pending && !pending && status.direction == Direction::Idle
    });
    drop(shutdown_tx);
    driver.join().unwrap();

    assert!(drained);
}
