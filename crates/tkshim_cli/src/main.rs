//! tkshim CLI
//!
//! Build scene files on the headless host and inspect the result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tkshim_app::prelude::*;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scene;

use scene::Scene;

#[derive(Parser)]
#[command(name = "tkshim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tk-style widget scenes on a headless host", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file overriding the scene's [settings]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a scene and print the resulting container tree
    Dump {
        /// Scene file
        scene: PathBuf,

        /// Also list every widget's recorded placement
        #[arg(short, long)]
        placements: bool,
    },

    /// Build a scene and report unknown options
    Check {
        /// Scene file
        scene: PathBuf,

        /// Fail on the first unknown option
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let scene_path = match &cli.command {
        Commands::Dump { scene, .. } | Commands::Check { scene, .. } => scene.clone(),
    };
    let scene = Scene::load(&scene_path)?;
    let mut config = match &cli.config {
        Some(path) => ShimConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => scene.settings.clone(),
    };

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Dump { placements, .. } => cmd_dump(&scene, &scene_path, config, placements),
        Commands::Check { strict, .. } => {
            if strict {
                config.option_policy = OptionPolicy::Strict;
            }
            cmd_check(&scene, &scene_path, config)
        }
    }
}

fn cmd_dump(scene: &Scene, path: &Path, config: ShimConfig, placements: bool) -> Result<()> {
    let built = scene
        .build(config)
        .with_context(|| format!("Failed to build {}", path.display()))?;
    info!(
        widgets = built.ctx.widget_count(),
        warnings = built.warnings.len(),
        "scene built"
    );

    print!("{}", built.host.dump());

    if placements {
        println!();
        for (name, widget) in &built.widgets {
            match widget.placement() {
                Some(entry) => println!("{name}: {entry}"),
                None => println!("{name}: -"),
            }
        }
    }
    Ok(())
}

fn cmd_check(scene: &Scene, path: &Path, config: ShimConfig) -> Result<()> {
    let built = scene
        .build(config)
        .with_context(|| format!("Failed to build {}", path.display()))?;

    for (name, warning) in &built.warnings {
        println!("{}: {name}: {warning}", path.display());
    }
    if !built.warnings.is_empty() {
        anyhow::bail!("{} unknown option(s)", built.warnings.len());
    }

    println!(
        "{}: {} widgets, no unknown options",
        path.display(),
        built.widgets.len()
    );
    Ok(())
}
