#![deny(unsafe_code)]
//! Headless tracer for the point demo.
//!
//! Subcommands:
//! - `trace` — run the flow against a recording context, print the GL trace
//! - `config` — print the CLI's default configuration (the one `trace` uses
//!   without `--config`) as JSON

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use point_demo_core::config::DEFAULT_SURFACE_ID;
use point_demo_core::{
    DemoConfig, FileFetcher, FlowState, HeadlessHost, LogNotifier, SourceLocator,
};
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_VERTEX_PATH: &str = "shaders/point.vert";
const DEFAULT_FRAGMENT_PATH: &str = "shaders/point.frag";

#[derive(Parser)]
#[command(name = "point-demo", about = "Headless tracer for the point demo")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the flow headless and print every GL command it issued.
    Trace {
        /// JSON config file; CLI flags override its fields.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Surface identifier to draw on.
        #[arg(long)]
        surface: Option<String>,

        /// Vertex shader path, relative to --base-dir.
        #[arg(long)]
        vertex: Option<String>,

        /// Fragment shader path, relative to --base-dir.
        #[arg(long)]
        fragment: Option<String>,

        /// Directory shader paths are resolved against.
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,

        /// Surfaces the headless host provides (defaults to the configured one).
        #[arg(long = "host-surface")]
        host_surfaces: Vec<String>,
    },
    /// Print the CLI's default configuration (bundled shader paths).
    Config,
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig, CliError> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
            DemoConfig::from_json(&json).map_err(|e| CliError::Input(e.to_string()))
        }
        None => Ok(DemoConfig::with_uris(
            DEFAULT_SURFACE_ID,
            DEFAULT_VERTEX_PATH,
            DEFAULT_FRAGMENT_PATH,
        )),
    }
}

fn history_line(history: &[FlowState]) -> String {
    history
        .iter()
        .map(|s| format!("{s:?}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Config => {
            let config = load_config(None)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Trace {
            config,
            surface,
            vertex,
            fragment,
            base_dir,
            host_surfaces,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(surface) = surface {
                config.surface_id = surface;
            }
            if let Some(vertex) = vertex {
                config.vertex_shader = SourceLocator::Uri(vertex);
            }
            if let Some(fragment) = fragment {
                config.fragment_shader = SourceLocator::Uri(fragment);
            }

            let host = if host_surfaces.is_empty() {
                HeadlessHost::new([config.surface_id.clone()])
            } else {
                HeadlessHost::new(host_surfaces)
            };
            let fetcher = FileFetcher::new(base_dir);

            let outcome = futures::executor::block_on(point_demo_core::run(
                &config,
                &host,
                &fetcher,
                &LogNotifier,
            ));
            let commands = outcome
                .context
                .as_ref()
                .map(|gl| gl.commands())
                .unwrap_or_default();

            if cli.json {
                let info = serde_json::json!({
                    "surface": config.surface_id,
                    "state": outcome.state,
                    "history": outcome.history,
                    "commands": commands,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("state:   {:?}", outcome.state);
                println!("history: {}", history_line(&outcome.history));
                println!("commands:");
                for command in &commands {
                    println!("  {}", serde_json::to_string(command)?);
                }
            }

            if let Some(error) = outcome.error {
                return Err(error.into());
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    init_logging(cli.verbose);
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
