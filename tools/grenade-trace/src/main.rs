//! grenade-trace: run a scripted grenade throw headless and print one JSON
//! snapshot per tick.
//!
//! Usage:
//!   grenade-trace lob --angle 45 --ticks 140
//!   grenade-trace aimed --config grenades.toml --variant field --angle 60
//!   grenade-trace hold --ticks 120

use std::path::PathBuf;
use std::process;

use grenade_core::commands::{GrenadeCommand, UseInput};
use grenade_core::config::GameConfig;
use grenade_core::constants::DEFAULT_FUSE_TIME;
use grenade_core::types::{angle_direction, ControllerId, Position};
use grenade_sim::{SimConfig, SimulationEngine};

const PLAYER: ControllerId = ControllerId(1);

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let script = match args[1].as_str() {
        "lob" => Script::Lob,
        "aimed" => Script::Aimed,
        "hold" => Script::Hold,
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    let options = match Options::parse(&args[2..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {message}");
            process::exit(1);
        }
    };

    if let Err(message) = run(script, &options) {
        eprintln!("Error: {message}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "grenade-trace: scripted grenade lifecycle runs\n\
         \n\
         Commands:\n\
         \n\
         lob     Arm, then release into the lob wind-up\n\
         aimed   Aim, arm, then throw along the aim angle\n\
         hold    Arm and keep holding until the fuse runs out\n\
         \n\
         Options:\n\
         \n\
           --config <path>   TOML configuration (default: built-in variants)\n\
           --variant <name>  Variant to throw (default: first configured)\n\
           --angle <deg>     Aim angle, 0 = up, clockwise (default: 45)\n\
           --ticks <N>       Ticks to simulate (default: fuse time + 20)\n\
           --seed <N>        RNG seed (default: 42)\n\
           --ground <y>      Height of flat ground (default: 40)\n\
         \n\
         Logs go to stderr; RUST_LOG and LOG_FORMAT=json are honored.\n"
    );
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Script {
    Lob,
    Aimed,
    Hold,
}

struct Options {
    config: Option<PathBuf>,
    variant: Option<String>,
    angle: f64,
    ticks: u32,
    seed: u64,
    ground: f64,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self, String> {
        Ok(Self {
            config: parse_value(args, "--config").map(PathBuf::from),
            variant: parse_value(args, "--variant").map(str::to_string),
            angle: parse_number(args, "--angle")?.unwrap_or(45.0),
            ticks: parse_number(args, "--ticks")?.unwrap_or(DEFAULT_FUSE_TIME + 20),
            seed: parse_number(args, "--seed")?.unwrap_or(42),
            ground: parse_number(args, "--ground")?.unwrap_or(40.0),
        })
    }
}

fn parse_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>, String> {
    match parse_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| format!("invalid value for {flag}: {raw}")),
        None => Ok(None),
    }
}

fn run(script: Script, options: &Options) -> Result<(), String> {
    let game = match &options.config {
        Some(path) => GameConfig::load(path).map_err(|e| e.to_string())?,
        None => GameConfig::builtin(),
    };
    let mut sim = SimulationEngine::with_game_config(
        SimConfig {
            seed: options.seed,
            ground_y: Some(options.ground),
        },
        game,
    );

    let variant = match &options.variant {
        Some(name) => sim
            .variant_id(name)
            .ok_or_else(|| format!("unknown variant: {name}"))?,
        None => grenade_core::variant::VariantId(0),
    };
    let agent = sim.spawn_agent(PLAYER, Position::new(0.0, options.ground - 10.0));
    let grenade = sim
        .give_grenade(agent, variant)
        .ok_or("could not hand the grenade to the agent")?;
    tracing::info!(agent = agent.0, grenade = grenade.0, "scenario ready");

    let direction = angle_direction(options.angle);
    let target = Position::new(direction.x * 10.0, direction.y * 10.0);
    let use_input = |input| GrenadeCommand::Use {
        agent,
        input,
        target,
    };

    if script == Script::Aimed {
        sim.queue_command(use_input(UseInput::AltStart));
    }
    sim.queue_command(use_input(UseInput::Start));

    for tick in 0..options.ticks {
        if tick == 1 && script != Script::Hold {
            sim.queue_command(use_input(UseInput::Stop));
        }
        let snapshot = sim.tick();
        let line = serde_json::to_string(&snapshot).map_err(|e| e.to_string())?;
        println!("{line}");
    }
    Ok(())
}
