//! Runs a session in real time and redraws the grid in the terminal after every change.
//!
//! ```text
//! cargo run --example simulate -- --randomize --moving 4 --seed 7
//! RUST_LOG=debug cargo run --example simulate -- --config session.toml
//! ```
use clap::Parser;
use grid_replan::{Controller, Event, EventSink, RunState, SessionConfig};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Drive an agent across a grid with moving obstacles", long_about = None)]
struct Args {
    /// TOML session config; defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for obstacle randomization
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of moving obstacles (configured count when absent)
    #[arg(short, long)]
    moving: Option<usize>,

    /// Scatter random static obstacles before starting
    #[arg(short, long)]
    randomize: bool,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

/// Prints events as they arrive and remembers whether a redraw is due.
#[derive(Default)]
struct TerminalSink {
    dirty: bool,
}

impl EventSink for TerminalSink {
    fn emit(&mut self, event: Event) {
        match event {
            Event::GridRepainted => self.dirty = true,
            Event::PathUpdated(path) => println!("path updated: {} cells", path.len()),
            Event::AgentMoved(_) => {}
            other => println!("{:?}", other),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let frame = config.path_speed().min(config.obstacle_interval());

    let mut controller = Controller::new(config, TerminalSink::default())?;
    if args.randomize {
        controller.on_randomize();
    }
    match args.moving {
        Some(count) => controller.on_create_moving_obstacles(count),
        None => controller.on_create_default_moving_obstacles(),
    }
    controller.on_start();

    let began = Instant::now();
    let deadline = Duration::from_secs(args.timeout);
    let mut last = Instant::now();
    while controller.state() == RunState::Moving && began.elapsed() < deadline {
        thread::sleep(frame);
        let now = Instant::now();
        controller.advance(now - last);
        last = now;
        if std::mem::take(&mut controller.sink_mut().dirty) {
            print!("\x1B[2J\x1B[H");
            println!("{}", controller.session());
        }
    }
    println!("{}", controller.session());
    println!(
        "finished in state {:?} after {} cells",
        controller.state(),
        controller.session().traveled().len()
    );
    Ok(())
}
