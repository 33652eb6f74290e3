use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdl_renderer::{run, FileSink, RenderConfig, Script};

#[derive(Parser, Debug)]
#[command(name = "mdl_renderer", version)]
struct Cli {
    /// Parsed script (op list and symbol table) as JSON.
    script: PathBuf,

    /// Image width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Angular step count for spheres, tori and curves.
    #[arg(long)]
    step: Option<usize>,

    /// Frames rendered in parallel.
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Directory receiving animation frames.
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Ignore `display` commands instead of opening a window.
    #[arg(long)]
    no_display: bool,
}

fn read_script(path: &PathBuf) -> anyhow::Result<Script> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let script = Script::from_reader(BufReader::new(f)).with_context(|| format!("parse script '{}'", path.display()))?;
    return Ok(script);
}

fn render(cli: Cli) -> anyhow::Result<()> {
    let script = read_script(&cli.script)?;

    // Script settings first, flags on top.
    let mut config: RenderConfig = script.config.clone().unwrap_or_default();
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(step) = cli.step {
        config.step = step;
    }
    if let Some(jobs) = cli.jobs {
        config.jobs = jobs.max(1);
    }
    if let Some(out_dir) = cli.out_dir {
        config.output_dir = out_dir;
    }

    let mut sink = FileSink::new(config.output_dir.clone(), config.animation_delay_ms, !cli.no_display);
    let summary = run(&script, &config, &mut sink)?;
    tracing::info!(frames = summary.frames, basename = %summary.basename, "done");
    return Ok(());
}

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    render(cli)?;

    return Ok(());
}
