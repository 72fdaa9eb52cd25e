use std::{io, path::PathBuf};

use clap::Parser;
use miette::IntoDiagnostic;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plt_toolbox_core::formats::plt::{load, LoadOptions, Output, Variable};

#[derive(Parser)]
#[command(author, version, about = "Inspect ASCII .plt files", long_about = None)]
struct Cli {
    /// Path to the .plt file
    #[arg(value_name = "FILE")]
    plt: PathBuf,

    /// Zero-based index of the first zone to load
    #[arg(long, default_value_t = 0)]
    first_zone: usize,

    /// Maximum number of zones to load
    #[arg(long)]
    n_zones: Option<usize>,

    /// Number of zones to skip between two loaded zones
    #[arg(long, default_value_t = 0)]
    skip_zones: usize,

    /// Reverse the grid axes, (zones, i, j, k) -> (zones, k, j, i)
    #[arg(long)]
    permute: bool,

    /// Remove all axes of length 1
    #[arg(long)]
    squeeze: bool,

    /// Move the zone axis to the end
    #[arg(long = "make-3d")]
    make_3d: bool,

    /// Return multiple variables as a list instead of a tuple
    #[arg(long)]
    list: bool,

    /// Write the loaded variables as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Log progress
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> LoadOptions {
        LoadOptions {
            permute: self.permute,
            squeeze: self.squeeze,
            make_3d: self.make_3d,
            varout: !self.list,
            first_zone: self.first_zone,
            n_zones: self.n_zones,
            skip_zones: self.skip_zones,
        }
    }
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let output = load(&args.plt, &args.options())?;
    info!(variables = output.len(), "Loaded {}", args.plt.display());

    if args.json {
        serde_json::to_writer(io::stdout().lock(), &output).into_diagnostic()?;
        return Ok(());
    }

    print_summary(&output);
    Ok(())
}

fn print_summary(output: &Output) {
    let kind = match output {
        Output::Single(_) => "single variable",
        Output::Tuple(_) => "tuple",
        Output::List(_) => "list",
    };
    println!("{} ({kind})", output.len());

    if let Some(first) = output.iter().next() {
        for comment in first.comments.iter() {
            println!("{comment}");
        }
    }

    for var in output.iter() {
        print_variable(var);
    }
}

fn print_variable(var: &Variable) {
    let (min, max) = var
        .data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
            (min.min(x), max.max(x))
        });
    let labels = match (var.zone_labels.first(), var.zone_labels.last()) {
        (Some(first), Some(last)) => format!("\"{first}\" .. \"{last}\""),
        _ => String::new(),
    };

    println!(
        "{}: shape {:?}, sizes ({}, {}, {}), {} zones {labels}, range [{min}, {max}]",
        var.name,
        var.shape(),
        var.size1,
        var.size2,
        var.size3,
        var.zone_count(),
    );
}
