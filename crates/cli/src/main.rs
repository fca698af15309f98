#![deny(unsafe_code)]
//! Windowed binary for the quad renderer.
//!
//! Loads a combined shader file, builds the program, uploads the quad and
//! draws it with a color that bounces between black and white until the
//! window closes (or `--frames` frames have been drawn).

mod error;
mod logging;
mod window;

use clap::Parser;
use error::CliError;
use glam::Vec4;
use logging::init_logging;
use quad_renderer_core::render::{self, Driver, FrameRenderer};
use quad_renderer_core::{RenderConfig, ShaderSourceSet};
use std::path::PathBuf;
use std::process;
use window::GlutinSurface;

#[derive(Parser)]
#[command(name = "quad-renderer", about = "Draws a color-cycling quad")]
struct Cli {
    /// Output the run summary as JSON instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// JSON configuration file. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Combined shader file with `#shader vertex` / `#shader fragment` sections.
    #[arg(short, long)]
    shader: Option<PathBuf>,

    /// Window width in pixels.
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Window height in pixels.
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Stop after this many frames.
    #[arg(short, long)]
    frames: Option<u64>,

    /// Print the split vertex and fragment sources before compiling.
    #[arg(long)]
    print_sources: bool,

    /// Log filter in env_logger syntax (defaults to RUST_LOG, then "info").
    #[arg(long)]
    log: Option<String>,
}

/// Applies the config file, then command-line overrides, then validation.
fn load_config(cli: &Cli) -> Result<RenderConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };

    if let Some(shader) = &cli.shader {
        config.shader_path = shader.clone();
    }
    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }
    if cli.frames.is_some() {
        config.max_frames = cli.frames;
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<u64, CliError> {
    let config = load_config(cli)?;

    let sources = ShaderSourceSet::load(&config.shader_path)?;
    if cli.print_sources {
        println!("Vertex Shader:\n{}", sources.vertex());
        println!("Fragment Shader:\n{}", sources.fragment());
    }

    let (mut surface, gl) = GlutinSurface::create(&config.window)?;
    log::info!("GL version {}", gl.version());

    log::info!("compiling shaders from {}", config.shader_path.display());
    let mut renderer = FrameRenderer::from_sources(
        &gl,
        &sources,
        config.animation.to_state(),
        Vec4::from_array(config.clear_color),
    )?;

    let result = render::run(&mut surface, &gl, &mut renderer, config.max_frames);
    renderer.destroy(&gl);
    Ok(result?)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    match run(&cli) {
        Ok(frames) => {
            if cli.json {
                let j = serde_json::json!({ "frames": frames });
                println!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
            } else {
                eprintln!("rendered {frames} frames");
            }
        }
        Err(e) => {
            if cli.json {
                let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
                eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
            } else {
                eprintln!("error: {e}");
            }
            process::exit(e.exit_code());
        }
    }
}
