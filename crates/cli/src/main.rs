#![deny(unsafe_code)]
//! CLI binary for the vector-field simulation.
//!
//! Subcommands:
//! - `run`: drive a session headlessly along a scripted pointer path
//! - `params`: print default configuration and the parameter schema

mod driver;
mod error;
mod pointer;

use clap::{ArgAction, Parser, Subcommand};
use driver::{simulate, JsonLinesRenderer};
use error::CliError;
use pointer::PointerPath;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use vector_field_core::seed::DEFAULT_FRAME_MS;
use vector_field_core::{FieldConfig, ParticleConfig, Renderer, Seed};

#[derive(Parser)]
#[command(name = "vector-field", about = "Pointer-reactive vector field simulation")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation headlessly for N ticks.
    Run {
        /// Viewport width.
        #[arg(short = 'W', long, default_value_t = 800.0)]
        width: f64,

        /// Viewport height.
        #[arg(short = 'H', long, default_value_t = 600.0)]
        height: f64,

        /// Number of ticks to simulate.
        #[arg(short, long, default_value_t = 120)]
        ticks: usize,

        /// Milliseconds between frames.
        #[arg(long, default_value_t = DEFAULT_FRAME_MS)]
        frame_ms: f64,

        /// PRNG seed for spawn jitter.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Configuration as JSON: {"field": {...}, "particles": {...}}.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Scripted pointer motion.
        #[arg(long, value_enum, default_value_t = PointerPath::Orbit)]
        pointer: PointerPath,

        /// Write every frame as newline-delimited JSON to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replay a saved recipe instead of the size/seed/params flags.
        #[arg(long)]
        recipe: Option<PathBuf>,

        /// Save the effective recipe (with every parameter explicit) to this file.
        #[arg(long)]
        save_recipe: Option<PathBuf>,
    },
    /// Print default parameters and the parameter schema.
    Params,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_recipe(path: &Path) -> Result<Seed, CliError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid recipe {}: {e}", path.display())))
}

fn save_recipe(seed: &Seed, path: &Path) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(seed)?;
    std::fs::write(path, text)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Params => {
            let info = serde_json::json!({
                "defaults": {
                    "field": FieldConfig::default().to_json(),
                    "particles": ParticleConfig::default().to_json(),
                },
                "schema": {
                    "field": FieldConfig::param_schema(),
                    "particles": ParticleConfig::param_schema(),
                },
            });
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Field parameters:");
                println!("{}", serde_json::to_string_pretty(&info["defaults"]["field"])?);
                println!("Particle parameters:");
                println!("{}", serde_json::to_string_pretty(&info["defaults"]["particles"])?);
            }
        }
        Command::Run {
            width,
            height,
            ticks,
            frame_ms,
            seed,
            params,
            pointer,
            output,
            recipe,
            save_recipe: save_to,
        } => {
            let recipe = match recipe {
                Some(path) => load_recipe(&path)?,
                None => {
                    let params: serde_json::Value = serde_json::from_str(&params)
                        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
                    let mut s = Seed::new(width, height, seed);
                    s.params = params;
                    s.ticks = ticks;
                    s.frame_ms = frame_ms;
                    s
                }
            };
            recipe.validate()?;

            if let Some(path) = &save_to {
                let explicit = recipe
                    .clone()
                    .with_configs(&recipe.field_config(), &recipe.particle_config());
                save_recipe(&explicit, path)?;
            }

            let summary = match &output {
                Some(path) => {
                    let mut writer = JsonLinesRenderer::new(BufWriter::new(File::create(path)?));
                    let summary = simulate(&recipe, pointer, Some(&mut writer as &mut dyn Renderer))?;
                    writer.finish()?;
                    summary
                }
                None => simulate(&recipe, pointer, None)?,
            };

            if cli.json {
                let mut info = summary.to_json();
                info["width"] = recipe.width.into();
                info["height"] = recipe.height.into();
                info["seed"] = recipe.seed.into();
                if let Some(path) = &output {
                    info["output"] = path.display().to_string().into();
                }
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "simulated {} ticks ({}x{}, seed {}): {} anchors, peak {} particles, {} live at end",
                    summary.ticks,
                    recipe.width,
                    recipe.height,
                    recipe.seed,
                    summary.anchors,
                    summary.peak_particles,
                    summary.final_particles,
                );
                if let Some(path) = &output {
                    eprintln!("frames -> {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
