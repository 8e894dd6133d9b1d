use grid_replan::dynamics::MovingObstacle;
use grid_replan::{Controller, Event, Point, SessionConfig};
use std::time::Duration;

// A wall with a single gap sits between the start and the goal, and one obstacle patrols the
// column in front of the wall. The agent detours through the gap and replans whenever the
// patrol is about to step onto its cell. Events are collected in a Vec and printed once the run
// settles.
//  __________
// |...M.#....|
// |.....#..G.|
// |..........|
// |.....#....|
// |.....#....|
// |.....#....|
// |.S...#....|
// |.....#....|
//  __________

fn main() -> Result<(), grid_replan::ConfigError> {
    let mut config = SessionConfig::with_grid(10, 8);
    config.timing.obstacle_interval_ms = 250;
    let mut controller = Controller::new(config, Vec::<Event>::new())?;
    for y in 0..8 {
        if y != 2 {
            controller.on_user_adds_obstacle(Point::new(5, y));
        }
    }
    controller
        .session_mut()
        .grid
        .moving
        .push(MovingObstacle::new(Point::new(3, 0)));
    controller.on_start();
    println!("{}", controller.session());
    controller.advance(Duration::from_secs(3));
    println!("{}", controller.session());
    for event in controller.sink() {
        if *event != Event::GridRepainted {
            println!("{:?}", event);
        }
    }
    println!("Final state: {:?}", controller.state());
    Ok(())
}
