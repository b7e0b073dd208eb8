//! DataPlot-RS - Command-line entry point
//!
//! Evaluates a math-channel expression against datasets from a JSON file, or
//! simplifies a polynomial expression.
//!
//! ```text
//! dataplot-rs [--simplify] [--data <file.json>] [--factor <f>] [--config <engine.json>] <expression>
//! ```

use anyhow::{bail, Context};
use clap::Parser;
use dataplot_rs::{DatasetRegistry, EngineConfig, ExpressionTree, NamedDatasets};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Evaluate or simplify a math-channel expression
#[derive(Debug, Parser)]
#[command(name = "dataplot-rs", version, about)]
struct Args {
    /// Simplify a polynomial in the free variable instead of evaluating datasets
    #[arg(long)]
    simplify: bool,

    /// JSON file with datasets, referenced in order as s1, s2, ...
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Factor applied to every dataset's X values
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    factor: f64,

    /// Engine settings file; defaults to the app data directory
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the effective engine settings to the app data directory
    #[arg(long)]
    save_config: bool,

    /// Expression to evaluate, e.g. "2*s1 + sin(s2)"
    #[arg(allow_hyphen_values = true)]
    expression: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dataplot_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_or_default(),
    };

    if args.save_config {
        let path = config.save_default()?;
        println!("{}", path.display());
    }

    let Some(expression) = args.expression.as_deref() else {
        if args.save_config {
            return Ok(());
        }
        bail!("no expression given (see --help)");
    };

    let datasets = match &args.data {
        Some(path) => Some(NamedDatasets::load(path)?),
        None => None,
    };
    if let Some(datasets) = &datasets {
        for index in 1..=datasets.count() {
            let name = datasets.name(index).unwrap_or_default();
            tracing::info!("s{} = {}", index, name);
        }
    }

    let registry = datasets.as_ref().map(|d| d as &dyn DatasetRegistry);
    let tree = ExpressionTree::new(registry).with_config(config);

    if args.simplify {
        let simplified = tree
            .solve_symbolic(expression)
            .with_context(|| format!("failed to simplify '{}'", expression))?;
        println!("{}", simplified);
        return Ok(());
    }

    let result = tree
        .solve(expression, args.factor)
        .with_context(|| format!("failed to evaluate '{}'", expression))?;
    for (x, y) in result.points() {
        println!("{}\t{}", x, y);
    }
    Ok(())
}
