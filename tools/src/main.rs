//! sim-runner: headless driver for the ecosystem simulation.
//!
//! Usage:
//!   sim-runner --seed 12345 --days 365 --db run.db
//!   sim-runner --seed 12345 --days 30 --realtime
//!   sim-runner --db run.db --ipc-mode

use anyhow::Result;
use ecosim_core::{
    command::{ActionOutcome, PlayerCommand},
    config::SimConfig,
    engine::SimEngine,
    outcome_subsystem::Outcome,
    snapshot::DEFAULT_SAVE_KEY,
    species::{Species, SpeciesTable},
    state::{EnvironmentSample, PopulationSample},
    store::SimStore,
    types::{Day, Health},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Step {
        #[serde(default = "one")]
        count: u64,
    },
    Command {
        command: PlayerCommand,
    },
    Quit,
}

fn one() -> u64 {
    1
}

#[derive(serde::Serialize)]
struct UiState {
    day: Day,
    health: Health,
    paused: bool,
    speed: ecosim_core::clock::SimSpeed,
    temp: f64,
    humidity: f64,
    oxygen: f64,
    soil: f64,
    water: f64,
    species: SpeciesTable,
    action_points: f64,
    budget: f64,
    disaster: Option<String>,
    disaster_days_remaining: Option<u32>,
    outcome: Outcome,
    outcome_message: String,
    population_history: Vec<PopulationSample>,
    environment_history: Vec<EnvironmentSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_action: Option<ActionOutcome>,
    events: Vec<ecosim_core::event::SimEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_opt::<u64>(&args, "--seed");
    let days = parse_arg(&args, "--days", 365u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let realtime = args.iter().any(|a| a == "--realtime");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let config = SimConfig::load_or_default(data_dir)?;

    if !ipc_mode {
        println!("EcoSim: sim-runner");
        match seed {
            Some(s) => println!("  seed:      {s}"),
            None => println!("  seed:      (entropy)"),
        }
        println!("  days:      {days}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let engine = match seed {
        Some(s) => SimEngine::new(format!("run-{s}"), s, config),
        None => SimEngine::from_entropy(config),
    };
    let mut engine = match open_store(db) {
        Some(store) => engine.with_store(store, DEFAULT_SAVE_KEY),
        None => engine,
    };

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        let ran = if realtime {
            run_realtime(&mut engine, days)?
        } else {
            engine.run_days(days)?
        };
        print_summary(&engine, ran);
    }

    Ok(())
}

/// A store that cannot be opened is not fatal: the run continues unsaved.
fn open_store(db: &str) -> Option<SimStore> {
    let opened = if db == ":memory:" {
        SimStore::in_memory()
    } else {
        SimStore::open(db)
    };
    match opened {
        Ok(store) => Some(store),
        Err(e) => {
            log::warn!("Could not open store at {db}, running without persistence: {e}");
            None
        }
    }
}

fn run_realtime(engine: &mut SimEngine, days: u64) -> Result<u64> {
    let mut ran = 0;
    while ran < days && !engine.state().is_terminal() {
        std::thread::sleep(engine.clock.tick_interval());
        if engine.clock.paused {
            continue;
        }
        engine.step()?;
        ran += 1;
        let s = engine.state();
        println!("  day {:>3} | health {:>3} | temp {:>5.1} | AP {:>5.1} | budget {:>7.1}",
            s.day, s.health, s.environment.temp, s.resources.action_points, s.resources.budget);
    }
    Ok(ran)
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let state = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Step { count } => {
                let mut events = Vec::new();
                for _ in 0..count {
                    if engine.state().is_terminal() {
                        break;
                    }
                    events.extend(engine.step()?);
                }
                build_ui_state(engine, None, events)
            }
            IpcCommand::GetState => build_ui_state(engine, None, vec![]),
            IpcCommand::Command { command } => {
                log::debug!("ipc command {}", command.label());
                let outcome = engine.apply_command(command);
                let events = engine.drain_action_events();
                build_ui_state(engine, Some(outcome), events)
            }
        };
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(
    engine: &SimEngine,
    last_action: Option<ActionOutcome>,
    events: Vec<ecosim_core::event::SimEvent>,
) -> UiState {
    let s = engine.state();
    let outcome = engine.check_outcome();
    UiState {
        day: s.day,
        health: s.health,
        paused: engine.clock.paused,
        speed: engine.clock.speed,
        temp: s.environment.temp,
        humidity: s.environment.humidity,
        oxygen: s.environment.oxygen,
        soil: s.environment.soil,
        water: s.environment.water,
        species: s.species,
        action_points: s.resources.action_points,
        budget: s.resources.budget,
        disaster: s.disaster.map(|d| d.kind.to_string()),
        disaster_days_remaining: s.disaster.map(|d| d.days_remaining),
        outcome,
        outcome_message: outcome.to_string(),
        population_history: s.history.populations().iter().copied().collect(),
        environment_history: s.history.environment().iter().copied().collect(),
        last_action,
        events,
    }
}

fn print_summary(engine: &SimEngine, days_run: u64) {
    let s = engine.state();

    println!("=== RUN SUMMARY ===");
    println!("  run_id:         {}", engine.run_id);
    println!("  days run:       {days_run}");
    println!("  final day:      {}", s.day);
    println!("  health:         {}", s.health);
    println!("  outcome:        {}", engine.check_outcome());
    println!("  action points:  {:.1}", s.resources.action_points);
    println!("  budget:         {:.1}", s.resources.budget);
    match s.disaster {
        Some(d) => println!("  disaster:       {} ({} days left)", d.kind, d.days_remaining),
        None => println!("  disaster:       none"),
    }

    println!();
    println!("=== ENVIRONMENT ===");
    let e = &s.environment;
    println!("  temp {:.1} C | humidity {:.0}% | soil {:.0}% | water {:.0}% | oxygen {:.1}",
        e.temp, e.humidity, e.soil, e.water, e.oxygen);

    println!();
    println!("=== POPULATIONS ===");
    for species in Species::ALL {
        println!("  {:<11} {:>9.1}", species.key(), s.species.get(species));
    }
    println!("  {:<11} {:>9.1}", "dead_organic", s.dead_organic);
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    parse_opt(args, flag).unwrap_or(default)
}

fn parse_opt<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
}
