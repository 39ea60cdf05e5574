#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that builds an isometric business map from metrics.

mod config;
mod metrics_source;
mod text_backend;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use isomap_core::{MetricsProvider, SequentialIds, Stage};
use isomap_engine::{Engine, EngineConfig};
use isomap_rendering::{Color, Presentation, RenderingBackend, Scene};
use isomap_system_layout::detect_stage;
use isomap_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use metrics_source::{FileMetrics, MockMetrics};
use text_backend::TextBackend;

const CLEAR_COLOR: Color = Color::from_rgb_u8(0xf8, 0xfa, 0xfc);

#[derive(Debug, Parser)]
#[command(name = "isomap", version, about = "Isometric business map generator")]
struct Cli {
    /// Configuration file. Defaults to ./isomap.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print the generated map as text.
    Render {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        stage: StageArgs,
        /// Animation time of the printed frame, in milliseconds. Flow
        /// particles are drawn where they would be at that moment.
        #[arg(long, default_value_t = 0)]
        elapsed_ms: u64,
    },
    /// Write the generated map as JSON.
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        stage: StageArgs,
        /// Output file. Defaults to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON document.
        #[arg(long)]
        pretty: bool,
    },
    /// Print the stage the metrics auto-detect to.
    Detect {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// JSON metrics snapshot. A seeded mock store is used when absent.
    #[arg(long)]
    metrics: Option<PathBuf>,
    /// Seed of the mock store.
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

#[derive(Debug, Args)]
struct StageArgs {
    /// Stage index 0..=4. Detected from the metrics when absent.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    stage: Option<u8>,
}

impl SourceArgs {
    fn provider(&self) -> Result<Box<dyn MetricsProvider>> {
        match &self.metrics {
            Some(path) => Ok(Box::new(FileMetrics::load(path.clone())?)),
            None => Ok(Box::new(MockMetrics::new(self.seed))),
        }
    }
}

impl StageArgs {
    fn stage(&self) -> Option<Stage> {
        self.stage.and_then(Stage::from_index)
    }
}

/// Entry point for the isomap command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        CliCommand::Render {
            source,
            stage,
            elapsed_ms,
        } => {
            let engine = build_engine(&config, &source, stage.stage())?;
            render(&engine, Duration::from_millis(elapsed_ms))
        }
        CliCommand::Export {
            source,
            stage,
            output,
            pretty,
        } => {
            let engine = build_engine(&config, &source, stage.stage())?;
            export(&engine, output.as_deref(), pretty)
        }
        CliCommand::Detect { source } => {
            let snapshot = source.provider()?.snapshot();
            let stage = detect_stage(&snapshot);
            println!("{} {}", stage.index(), stage.name());
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_engine(config: &Config, source: &SourceArgs, stage: Option<Stage>) -> Result<Engine> {
    let provider = source.provider()?;
    let mut engine = Engine::from_provider(
        provider.as_ref(),
        EngineConfig {
            grid: config.grid(),
            projection: config.projection()?,
            ids: Box::new(SequentialIds::new()),
            stage,
        },
    );
    engine.center_on_zoom(config.viewport_size(), config.viewport.zoom);
    info!(
        stage = engine.stage().name(),
        nodes = query::nodes(engine.world()).len(),
        connectors = query::connectors(engine.world()).len(),
        "map generated"
    );
    Ok(engine)
}

fn render(engine: &Engine, elapsed: Duration) -> Result<()> {
    let scene = Scene::capture(engine.world(), engine.ui(), engine.projection());
    let title = format!(
        "Stage {}: {}",
        engine.stage().index(),
        engine.stage().name()
    );
    let presentation = Presentation::new(title, CLEAR_COLOR, scene);
    TextBackend::new(io::stdout().lock(), elapsed).run(presentation, |_, _, _| {})
}

fn export(engine: &Engine, output: Option<&Path>, pretty: bool) -> Result<()> {
    let layout = query::layout(engine.world());
    let json = if pretty {
        serde_json::to_string_pretty(&layout)
    } else {
        serde_json::to_string(&layout)
    }
    .context("failed to encode layout")?;

    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write layout to {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write layout")
        }
    }
}
