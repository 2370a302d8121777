#![deny(unsafe_code)]
//! CLI binary for the backdrop engine.
//!
//! Subcommands:
//! - `render <field>`: run a field for N frames, write a PNG
//! - `list`: print available fields and their parameter schemas

mod error;

use backdrop_core::{ParticleField, Scene, Size};
use backdrop_fields::headless::{self, ResizeEvent};
use backdrop_fields::FieldKind;
use clap::{Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backdrop", about = "Animated particle backdrop renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a field for N frames and write a PNG snapshot.
    Render {
        /// Field name ("circuit" or "neural"). Optional with --scene.
        field: Option<String>,

        /// Viewport width in pixels.
        #[arg(short = 'W', long, default_value_t = 1280)]
        width: u32,

        /// Viewport height in pixels.
        #[arg(short = 'H', long, default_value_t = 720)]
        height: u32,

        /// Number of frames to render.
        #[arg(short, long, default_value_t = 240)]
        frames: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Field parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Load field, size, seed, params and frame count from a scene file.
        #[arg(long, conflicts_with_all = ["width", "height", "frames", "seed", "params"])]
        scene: Option<PathBuf>,

        /// Resize the viewport before a frame, as FRAME:WIDTHxHEIGHT. Repeatable.
        #[arg(long = "resize-at", value_name = "FRAME:WxH")]
        resize_at: Vec<String>,

        /// Output file path.
        #[arg(short, long, default_value = "backdrop.png")]
        output: PathBuf,
    },
    /// List available fields and their parameters.
    List,
}

/// Parses `FRAME:WIDTHxHEIGHT`, e.g. `120:640x480`.
fn parse_resize(arg: &str) -> Result<ResizeEvent, CliError> {
    let bad = || CliError::Input(format!("invalid --resize-at {arg:?}, expected FRAME:WxH"));
    let (frame, dims) = arg.split_once(':').ok_or_else(bad)?;
    let (w, h) = dims.split_once(['x', 'X']).ok_or_else(bad)?;
    let frame = frame.trim().parse().map_err(|_| bad())?;
    let width: u32 = w.trim().parse().map_err(|_| bad())?;
    let height: u32 = h.trim().parse().map_err(|_| bad())?;
    if width == 0 || height == 0 {
        return Err(bad());
    }
    Ok(ResizeEvent {
        frame,
        size: Size::new(width, height),
    })
}

struct RenderArgs {
    field: Option<String>,
    width: u32,
    height: u32,
    frames: usize,
    seed: u64,
    params: String,
    scene: Option<PathBuf>,
}

fn build_scene(args: RenderArgs) -> Result<Scene, CliError> {
    if let Some(path) = args.scene {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
        let mut scene = Scene::from_json(&text)?;
        if let Some(field) = args.field {
            scene.field = field;
        }
        return Ok(scene);
    }

    let field = args
        .field
        .ok_or_else(|| CliError::Input("a field name or --scene is required".into()))?;
    let params: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    let mut scene = Scene::new(&field, args.width, args.height, args.seed);
    scene.params = params;
    scene.frames = args.frames;
    scene.validate()?;
    Ok(scene)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let names = FieldKind::list_fields();
            if cli.json {
                let mut fields = serde_json::Map::new();
                for name in names {
                    let field = FieldKind::from_name(name, 0, &serde_json::json!({}))?;
                    fields.insert(name.to_string(), field.param_schema());
                }
                let info = serde_json::json!({ "fields": fields });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Fields:");
                for name in names {
                    let field = FieldKind::from_name(name, 0, &serde_json::json!({}))?;
                    let params = field.param_schema();
                    let keys: Vec<&str> = params
                        .as_object()
                        .map(|o| o.keys().map(String::as_str).collect())
                        .unwrap_or_default();
                    println!("  {name:<8} {}", keys.join(", "));
                }
            }
        }
        Command::Render {
            field,
            width,
            height,
            frames,
            seed,
            params,
            scene,
            resize_at,
            output,
        } => {
            let resizes = resize_at
                .iter()
                .map(|s| parse_resize(s))
                .collect::<Result<Vec<_>, _>>()?;
            let scene = build_scene(RenderArgs {
                field,
                width,
                height,
                frames,
                seed,
                params,
                scene,
            })?;

            let rendered = headless::render(&scene, &resizes)?;
            backdrop_fields::snapshot::write_png(&rendered.pixmap, &output)?;
            info!(output = %output.display(), "snapshot written");

            let size = backdrop_core::Surface::size(&rendered.pixmap);
            if cli.json {
                let info = serde_json::json!({
                    "field": scene.field,
                    "width": size.width,
                    "height": size.height,
                    "frames": rendered.frames,
                    "seed": scene.seed,
                    "population": rendered.population,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frames, seed {}) -> {}",
                    scene.field,
                    size.width,
                    size.height,
                    rendered.frames,
                    scene.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
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
