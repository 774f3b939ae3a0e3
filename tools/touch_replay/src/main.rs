mod trace;

use std::{
    cell::{Cell, RefCell},
    path::PathBuf,
    rc::Rc,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Builder as LogBuilder;
use log::{info, LevelFilter};
use touch_gestures::{EventKind, Gesture, GestureConfig, TouchManager};

use trace::{parse_expected_kinds, parse_trace, ReplayInput};

#[derive(Debug, Parser)]
#[command(name = "touch_replay")]
#[command(about = "Replays a recorded pointer trace through the gesture engine")]
struct Cli {
    /// CSV trace with `pointer` and `mouse` rows.
    trace: PathBuf,
    /// File of expected event kind labels, one per line.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Gesture config TOML; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Run the circle classifier on release regardless of the config.
    #[arg(long)]
    circle: bool,
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, Debug)]
struct Recorded {
    ms: u64,
    kind: EventKind,
    slot: usize,
    x: f32,
    y: f32,
    start_x: f32,
    start_y: f32,
    gesture: Gesture,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    LogBuilder::from_default_env()
        .filter_level(cli.log_level)
        .init();

    let mut config = match &cli.config {
        Some(path) => GestureConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GestureConfig::default(),
    };
    if cli.circle {
        config.circle_on_release = true;
    }

    let rows = parse_trace(&cli.trace)?;
    info!(
        "touch_replay: loaded trace={} rows={}",
        cli.trace.display(),
        rows.len()
    );

    let mut manager = TouchManager::without_source(config)?;
    let now_ms = Rc::new(Cell::new(0u64));
    let events: Rc<RefCell<Vec<Recorded>>> = Rc::new(RefCell::new(Vec::new()));
    for kind in EventKind::ALL {
        let now_ms = Rc::clone(&now_ms);
        let events = Rc::clone(&events);
        manager.subscribe(kind, move |event| {
            events.borrow_mut().push(Recorded {
                ms: now_ms.get(),
                kind: event.kind,
                slot: event.slot_index,
                x: event.touch.position.x,
                y: event.touch.position.y,
                start_x: event.touch.start_position.x,
                start_y: event.touch.start_position.y,
                gesture: event.touch.gesture,
            });
        });
    }

    for row in &rows {
        now_ms.set(row.ms);
        match row.input {
            ReplayInput::Pointer(sample) => manager.process_pointers(&[sample]),
            ReplayInput::Mouse { down, cursor } => manager.process_mouse(down, cursor),
        }
    }

    let events = events.borrow();
    println!("event,ms,kind,slot,x,y,start_x,start_y,gesture");
    for event in events.iter() {
        println!(
            "event,{},{},{},{},{},{},{},{}",
            event.ms,
            event.kind.label(),
            event.slot,
            event.x,
            event.y,
            event.start_x,
            event.start_y,
            gesture_label(event.gesture)
        );
    }

    if let Some(expect_path) = &cli.expect {
        let expected = parse_expected_kinds(expect_path)?;
        let actual: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", join_labels(&expected));
            eprintln!("actual kinds:   {}", join_labels(&actual));
            bail!("event sequence mismatch");
        }
    }

    Ok(())
}

fn join_labels(kinds: &[EventKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(",")
}

fn gesture_label(gesture: Gesture) -> &'static str {
    match gesture {
        Gesture::None => "none",
        Gesture::Tap => "tap",
        Gesture::Swipe => "swipe",
        Gesture::Circle => "circle",
        Gesture::Other => "other",
    }
}
